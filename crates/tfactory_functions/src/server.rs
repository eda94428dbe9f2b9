//! Functions host process.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::router::build_router;
use crate::state::FunctionsState;
use log::{error, info};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

/// Serves the router on `0.0.0.0:<port>` until Ctrl+C or SIGTERM.
pub async fn start_server(config: &ServerConfig) -> Result<(), ServerError> {
    let state = FunctionsState::from_env(config.platform);
    let address = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;
    info!(
        "event=server_start module=functions status=ok address={} platform={} secret_token={}",
        address,
        config.platform,
        if state.env.secret_token_present {
            "present"
        } else {
            "missing"
        }
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("event=server_stop module=functions status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=functions status=ok signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown_signal module=functions status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=functions status=ok signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown_signal module=functions status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
