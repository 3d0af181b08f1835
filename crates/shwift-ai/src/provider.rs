use crate::error::SnapshotResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message in the two-message exchange sent per snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Remote service that turns a built prompt into snapshot text.
///
/// Implementations make exactly one attempt per call and never cache.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Send `prompt` and return the extracted snapshot text.
    ///
    /// An empty string means the service answered without usable text.
    async fn request_snapshot(&self, prompt: &str) -> SnapshotResult<String>;

    /// Whether a credential is available. Requests fail fast when it is not.
    fn is_configured(&self) -> bool;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}
