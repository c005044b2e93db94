use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::ServerArgs;
use negotiated_static::config::Config;
use negotiated_static::static_files::router;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(args: ServerArgs) -> Result<(), AnyError> {
    info!("Loading configuration");
    let mut config = match args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .map_err(|e| format!("Failed to load config: {}", e))?;

    if let Some(address) = args.address {
        config.server.bind_addr = address;
    }
    if let Some(root) = args.root {
        config.server.web_root = root;
    }

    if !config.server.web_root.is_dir() {
        warn!(
            web_root = %config.server.web_root.display(),
            "Web root is not a directory, every request will be a 404"
        );
    }

    let app = router(&config)?;
    let address: SocketAddr = config.server.bind_addr;

    let listener = TcpListener::bind(address).await?;
    info!(%address, web_root = %config.server.web_root.display(), "Static file server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
