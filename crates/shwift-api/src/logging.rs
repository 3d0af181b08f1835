use shwift_core::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 4] = ["shwift_api", "shwift_ai", "shwift_core", "tower_http"];

/// Directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init()?,
        "compact" => registry.with(fmt::layer().compact()).try_init()?,
        _ => registry.with(fmt::layer().pretty()).try_init()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_every_crate() {
        assert_eq!(
            default_directive("debug"),
            "shwift_api=debug,shwift_ai=debug,shwift_core=debug,tower_http=debug"
        );
    }
}
