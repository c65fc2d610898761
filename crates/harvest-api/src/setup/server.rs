//! HTTP listener and shutdown handling

use anyhow::{Context, Result};
use axum::Router;
use harvest_core::Config;
use std::fmt;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// What ended the serve loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => f.write_str("SIGINT"),
            ShutdownReason::Terminate => f.write_str("SIGTERM"),
        }
    }
}

fn listen_addr(config: &Config) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], config.server_port))
}

/// Bind the configured port and serve `app` until SIGINT or SIGTERM.
///
/// In-flight uploads are allowed to finish before this returns.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = listen_addr(config);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        storage_backend = %config.storage_backend,
        document_backend = %config.document_backend,
        collection = %config.document_collection,
        "Vegetable ingestion service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let reason = wait_for_shutdown().await;
            tracing::info!(signal = %reason, "Draining connections before exit");
        })
        .await
        .context("Server terminated with an error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves with the first shutdown signal received. A handler that fails to
/// install is logged and never fires.
async fn wait_for_shutdown() -> ShutdownReason {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => ShutdownReason::Interrupt,
        () = terminate => ShutdownReason::Terminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_uses_configured_port() {
        let config = Config {
            server_port: 9091,
            ..Config::default()
        };
        assert_eq!(listen_addr(&config).to_string(), "0.0.0.0:9091");
    }

    #[test]
    fn test_shutdown_reason_display() {
        assert_eq!(ShutdownReason::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownReason::Terminate.to_string(), "SIGTERM");
    }
}
