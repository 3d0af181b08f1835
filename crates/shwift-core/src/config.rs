use crate::snapshot_log::DEFAULT_PREVIEW_CHARS;
use anyhow::{Context, Result};
use config as cfg;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the completion service credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Responses API
    #[serde(default = "LlmConfig::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub organization: Option<String>,
}

impl LlmConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            organization: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotLogConfig {
    #[serde(default = "SnapshotLogConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "SnapshotLogConfig::default_preview_chars")]
    pub preview_chars: usize,
}

impl SnapshotLogConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("shwift_diagnostic_log.csv")
    }

    fn default_preview_chars() -> usize {
        DEFAULT_PREVIEW_CHARS
    }
}

impl Default for SnapshotLogConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            preview_chars: Self::default_preview_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle sessions older than this are dropped
    #[serde(default = "SessionConfig::default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "SessionConfig::default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    fn default_ttl_secs() -> u64 {
        3600
    }

    fn default_sweep_interval_secs() -> u64 {
        60
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: Self::default_ttl_secs(),
            sweep_interval_secs: Self::default_sweep_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "trace", "debug", "info", "warn" or "error"
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// "pretty", "compact" or "json"
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    fn default_format() -> String {
        "pretty".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    // Never serialized; only read from config files or the environment.
    #[serde(default, skip_serializing, deserialize_with = "deserialize_secret")]
    pub openai_api_key: Option<SecretString>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .map(SecretString::from))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_env")]
    pub env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub snapshot_log: SnapshotLogConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            snapshot_log: SnapshotLogConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
            secrets: SecretsConfig::default(),
        }
    }
}

impl Settings {
    fn default_env() -> String {
        env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
    }

    pub fn openai_api_key(&self) -> Option<&SecretString> {
        self.secrets.openai_api_key.as_ref()
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(
            !self.llm.base_url.trim().is_empty(),
            "llm.base_url cannot be empty"
        );
        anyhow::ensure!(
            !self.snapshot_log.path.as_os_str().is_empty(),
            "snapshot_log.path cannot be empty"
        );
        anyhow::ensure!(
            self.snapshot_log.preview_chars > 0,
            "snapshot_log.preview_chars must be > 0"
        );
        anyhow::ensure!(self.session.ttl_secs > 0, "session.ttl_secs must be > 0");
        anyhow::ensure!(
            self.session.sweep_interval_secs > 0,
            "session.sweep_interval_secs must be > 0"
        );

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                other
            ),
        }
        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => anyhow::bail!(
                "Invalid log format: {}. Must be one of: pretty, compact, json",
                other
            ),
        }

        Ok(())
    }
}

/// Layered settings loader.
///
/// Sources, lowest precedence first:
/// 1. `default.toml`
/// 2. `{env}.toml`
/// 3. `local.toml`
/// 4. `SHWIFT__*` environment variables
/// 5. `OPENAI_API_KEY` (also read from `.env`)
pub struct ConfigManager;

impl ConfigManager {
    /// `./config` when present, otherwise the current directory.
    pub fn default_config_dir() -> PathBuf {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            return project_config;
        }
        cwd
    }

    pub fn load(config_dir: Option<&Path>, env_override: Option<String>) -> Result<Settings> {
        Self::load_dotenv();

        let config_dir = config_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_dir);
        let env_name = env_override.unwrap_or_else(Settings::default_env);

        let settings = Self::load_from_sources(&config_dir, &env_name)?;
        let settings = Self::apply_env_overrides(settings, env::var(API_KEY_ENV).ok());
        settings.validate()?;

        info!("Configuration loaded from {:?} (env: {})", config_dir, env_name);
        if !has_credential(settings.openai_api_key()) {
            warn!(
                "{} is not set; snapshot requests will be refused until it is configured",
                API_KEY_ENV
            );
        }
        Ok(settings)
    }

    pub fn load_from_sources(config_dir: &Path, env_name: &str) -> Result<Settings> {
        let mut settings: Settings = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                cfg::Environment::with_prefix("SHWIFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        settings.env = env_name.to_string();
        Ok(settings)
    }

    fn apply_env_overrides(mut settings: Settings, api_key: Option<String>) -> Settings {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            settings.secrets.openai_api_key = Some(SecretString::from(key));
        }
        settings
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
        }
    }
}

/// Whether a credential is present, without exposing it.
pub fn has_credential(key: Option<&SecretString>) -> bool {
    key.map(|k| !k.expose_secret().trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.snapshot_log.preview_chars, 500);
        assert_eq!(
            settings.snapshot_log.path,
            PathBuf::from("shwift_diagnostic_log.csv")
        );
        assert!(settings.openai_api_key().is_none());
    }

    #[test]
    fn files_are_layered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nhost = \"127.0.0.1\"\nport = 4000\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[server]\nhost = \"127.0.0.1\"\nport = 5000\n",
        )
        .unwrap();

        let settings = ConfigManager::load_from_sources(dir.path(), "staging").unwrap();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.env, "staging");
        assert_eq!(settings.llm.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn secret_from_file_is_read_but_never_serialized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("local.toml"),
            "[secrets]\nopenai_api_key = \"sk-file\"\n",
        )
        .unwrap();

        let settings = ConfigManager::load_from_sources(dir.path(), "test").unwrap();
        assert_eq!(
            settings.openai_api_key().map(|k| k.expose_secret().to_string()),
            Some("sk-file".to_string())
        );
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("sk-file"));
    }

    #[test]
    fn api_key_variable_overrides_and_blank_is_ignored() {
        let settings = ConfigManager::apply_env_overrides(Settings::default(), Some("sk-env".into()));
        assert!(has_credential(settings.openai_api_key()));

        let settings = ConfigManager::apply_env_overrides(Settings::default(), Some("  ".into()));
        assert!(!has_credential(settings.openai_api_key()));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".into();
        assert!(settings.validate().is_err());
    }
}
