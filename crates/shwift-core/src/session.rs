use crate::answers::AnswerRecord;
use crate::tier::Tier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Where a diagnostic session is in the begin → submit → result wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initial,
    FormOpen,
    Requesting,
    SnapshotReady,
    RequestFailed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("The diagnostic has not been started yet")]
    NotBegun,

    #[error("A snapshot request is already in progress for this session")]
    RequestInFlight,

    #[error("No snapshot request is in progress for this session")]
    NotRequesting,
}

/// Outcome of the last finished request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SnapshotOutcome {
    Ready { snapshot: String },
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct DiagnosticSession {
    id: Uuid,
    tier: Tier,
    state: SessionState,
    last_answers: Option<AnswerRecord>,
    outcome: Option<SnapshotOutcome>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiagnosticSession {
    pub fn new(tier: Tier) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tier,
            state: SessionState::Initial,
            last_answers: None,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> Option<&SnapshotOutcome> {
        self.outcome.as_ref()
    }

    /// Answers of the most recent submission, kept so a failed request can
    /// be looked at again.
    pub fn last_answers(&self) -> Option<&AnswerRecord> {
        self.last_answers.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reveal the form.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Requesting => Err(SessionError::RequestInFlight),
            _ => {
                self.transition(SessionState::FormOpen);
                Ok(())
            }
        }
    }

    /// Finalise the form and move to `Requesting`.
    ///
    /// Every submission carries a freshly collected record; there is no
    /// retry of a previous one.
    pub fn submit(&mut self, answers: AnswerRecord) -> Result<(), SessionError> {
        match self.state {
            SessionState::Initial => Err(SessionError::NotBegun),
            SessionState::Requesting => Err(SessionError::RequestInFlight),
            SessionState::FormOpen | SessionState::SnapshotReady | SessionState::RequestFailed => {
                debug_assert_eq!(answers.tier(), self.tier);
                self.last_answers = Some(answers);
                self.outcome = None;
                self.transition(SessionState::Requesting);
                Ok(())
            }
        }
    }

    pub fn complete(&mut self, snapshot: String) -> Result<(), SessionError> {
        self.finish(SessionState::SnapshotReady, SnapshotOutcome::Ready { snapshot })
    }

    pub fn fail(&mut self, message: String) -> Result<(), SessionError> {
        self.finish(SessionState::RequestFailed, SnapshotOutcome::Failed { message })
    }

    fn finish(&mut self, state: SessionState, outcome: SnapshotOutcome) -> Result<(), SessionError> {
        if self.state != SessionState::Requesting {
            return Err(SessionError::NotRequesting);
        }
        self.outcome = Some(outcome);
        self.transition(state);
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(session = %self.id, from = ?self.state, to = ?next, "Session transition");
        self.state = next;
        self.updated_at = Utc::now();
    }
}
