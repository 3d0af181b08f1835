use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use shwift_core::{DiagnosticSession, SessionState, Tier};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// In-memory registry of diagnostic sessions, one per browser visit.
///
/// Closures passed to [`SessionStore::update`] run under the entry's shard
/// lock and must not await.
pub struct SessionStore {
    sessions: DashMap<Uuid, DiagnosticSession>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn create(&self, tier: Tier) -> DiagnosticSession {
        let session = DiagnosticSession::new(tier);
        self.sessions.insert(session.id(), session.clone());
        debug!(session_id = %session.id(), tier = %tier, "Session created");
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<DiagnosticSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Apply `f` to the session in place. `None` when the id is unknown.
    pub fn update<F, R>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut DiagnosticSession) -> R,
    {
        self.sessions.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than the TTL. In-flight sessions are kept.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = ChronoDuration::from_std(self.ttl).unwrap_or_else(|_| ChronoDuration::days(36_500));
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            session.state() == SessionState::Requesting || now - session.updated_at() < ttl
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = self.sweep_expired(Utc::now());
                if removed > 0 {
                    info!(removed, remaining = self.len(), "Expired diagnostic sessions swept");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shwift_core::collect_answers;
    use std::collections::HashMap;

    #[test]
    fn create_then_get_returns_a_copy() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create(Tier::Lab);
        let fetched = store.get(&session.id()).unwrap();
        assert_eq!(fetched.tier(), Tier::Lab);
        assert_eq!(fetched.state(), SessionState::Initial);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.update(&Uuid::new_v4(), |s| s.begin()).is_none());
    }

    #[test]
    fn sweep_drops_idle_sessions_only() {
        let store = SessionStore::new(Duration::from_secs(60));
        let idle = store.create(Tier::Community);
        let busy = store.create(Tier::Community);
        store
            .update(&busy.id(), |s| {
                s.begin().unwrap();
                let record = collect_answers(Tier::Community, &HashMap::new()).unwrap();
                s.submit(record).unwrap();
            })
            .unwrap();

        let later = Utc::now() + ChronoDuration::seconds(120);
        assert_eq!(store.sweep_expired(later), 1);
        assert!(store.get(&idle.id()).is_none());
        assert!(store.get(&busy.id()).is_some());
    }

    #[test]
    fn fresh_sessions_survive_a_sweep() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.create(Tier::Pro);
        assert_eq!(store.sweep_expired(Utc::now()), 0);
        assert!(!store.is_empty());
    }
}
