//! Command-line schema.

use clap::{Parser, Subcommand};
use tfactory_core::model::wire::Platform;

#[derive(Debug, Parser)]
#[command(name = "tfactory", version, about = "Template Factory app and functions host")]
pub struct Cli {
    /// Log level (trace|debug|info|warn|error). Overrides TFACTORY_LOG_LEVEL.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the functions and the entry document over HTTP.
    Serve {
        /// Port to listen on. Overrides TFACTORY_PORT.
        #[arg(long)]
        port: Option<u16>,
        /// Platform answering `/api/*` (vercel|netlify). Overrides TFACTORY_PLATFORM.
        #[arg(long)]
        platform: Option<Platform>,
    },
    /// Drive the app interactively from the terminal.
    Shell {
        /// Location to start at.
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print one page snapshot and exit.
    Render {
        path: String,
    },
    /// Call the API endpoints once and print their payloads.
    Ping,
}
