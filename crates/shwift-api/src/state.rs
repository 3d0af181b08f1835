use crate::sessions::SessionStore;
use shwift_ai::{OpenAIConfig, OpenAIProvider, SnapshotProvider};
use shwift_core::{Settings, SnapshotLog};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub provider: Arc<dyn SnapshotProvider>,
    pub sessions: Arc<SessionStore>,
    pub snapshot_log: Arc<SnapshotLog>,
}

impl AppState {
    /// Build state backed by the OpenAI Responses API.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let provider = OpenAIProvider::new(OpenAIConfig::from(&settings))?;
        Ok(Self::with_provider(settings, Arc::new(provider)))
    }

    pub fn with_provider(settings: Settings, provider: Arc<dyn SnapshotProvider>) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(settings.session.ttl_secs));
        let snapshot_log = SnapshotLog::new(
            settings.snapshot_log.path.clone(),
            settings.snapshot_log.preview_chars,
        );
        Self {
            settings: Arc::new(settings),
            provider,
            sessions: Arc::new(sessions),
            snapshot_log: Arc::new(snapshot_log),
        }
    }
}
