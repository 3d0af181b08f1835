pub mod error;
pub mod openai_provider;
pub mod provider;
pub mod response;

pub use error::{SnapshotError, SnapshotResult};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, SNAPSHOT_MODEL};
pub use provider::{Message, MessageRole, SnapshotProvider};
pub use response::ProviderResponse;
