use anyhow::Context;
use clap::Parser;
use shwift_api::{logging, AppState, Server};
use shwift_core::ConfigManager;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "shwift-api", version, about = "SHWIFT transformation diagnostic server")]
struct Cli {
    /// Directory holding default.toml, {env}.toml and local.toml
    #[arg(long, env = "SHWIFT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Configuration environment (defaults to APP_ENV or "development")
    #[arg(long)]
    env: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = ConfigManager::load(cli.config_dir.as_deref(), cli.env)?;
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    logging::init_tracing(&settings.logging)?;

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                settings.server.host, settings.server.port
            )
        })?;

    let state = AppState::new(settings)?;
    info!(
        provider = state.provider.provider_name(),
        model = state.provider.model_name(),
        configured = state.provider.is_configured(),
        "Snapshot provider ready"
    );

    Server::new(addr, state).run().await
}
