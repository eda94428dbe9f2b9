//! `tfactory` binary.
//!
//! # Responsibility
//! - Initialize logging and configuration from the environment.
//! - Dispatch to the functions host, the interactive shell, one-shot page
//!   rendering or an API ping.

mod cli;
mod shell;

use clap::Parser;
use cli::{Cli, Command};
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tfactory_core::{
    gateway, init_logging, ApiClient, App, AppConfig, AppContext, HttpApiClient, MemoryHistory,
};
use tfactory_functions::{start_server, ServerConfig};

type CliResult = Result<(), Box<dyn Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut server = ServerConfig::from_env();
    if let Some(level) = &cli.log_level {
        server.log_level = level.clone();
    }
    if let Err(err) = init_logging(&server.log_level, server.log_dir.as_deref()) {
        eprintln!("logging disabled: {err}");
    }

    match run(cli.command, server).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, mut server: ServerConfig) -> CliResult {
    match command {
        Command::Serve { port, platform } => {
            server.port = port.unwrap_or(server.port);
            server.platform = platform.unwrap_or(server.platform);
            start_server(&server).await?;
        }
        Command::Shell { path } => {
            let (app, history) = mount(&path).await;
            shell::run(app, history).await?;
        }
        Command::Render { path } => {
            let (app, _) = mount(&path).await;
            println!("{}", app.page());
        }
        Command::Ping => ping().await?,
    }
    Ok(())
}

async fn mount(path: &str) -> (App, Arc<MemoryHistory>) {
    let config = AppConfig::from_env();
    let history = Arc::new(MemoryHistory::new(path));
    let app = App::mount(AppContext {
        history: history.clone(),
        api: Arc::new(HttpApiClient::new(config.api_base.as_str())),
        gateway: gateway::connect(&config),
        public_message: config.public_message,
    })
    .await;
    info!(
        "event=cli_mount module=cli status=ok gateway={}",
        app.has_gateway()
    );
    (app, history)
}

async fn ping() -> CliResult {
    let config = AppConfig::from_env();
    let client = HttpApiClient::new(config.api_base.as_str());

    let hello = client.hello().await?;
    println!("{}", serde_json::to_string_pretty(&hello)?);
    let notes = client.notes_env().await?;
    println!("{}", serde_json::to_string_pretty(&notes)?);
    Ok(())
}
