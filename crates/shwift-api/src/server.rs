use crate::{create_router, AppState};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { state, addr }
    }

    pub async fn run(self) -> Result<()> {
        let sweep_every = Duration::from_secs(self.state.settings.session.sweep_interval_secs);
        let sweeper = self.state.sessions.clone().spawn_sweeper(sweep_every);

        let log_path = self.state.snapshot_log.path().to_path_buf();
        let router = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("binding {}", self.addr))?;

        info!("SHWIFT diagnostic listening on http://{}", self.addr);
        info!("Snapshot log: {}", log_path.display());
        info!("API:");
        info!("  GET  /api/tiers?tier=<code>");
        info!("  GET  /api/tiers/{{tier}}/questions");
        info!("  POST /api/sessions");
        info!("  POST /api/sessions/{{id}}/begin");
        info!("  POST /api/sessions/{{id}}/submit");

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served.context("serving HTTP")?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
