pub mod answers;
pub mod config;
pub mod content;
pub mod error;
pub mod prompt;
pub mod questions;
pub mod session;
pub mod snapshot_log;
pub mod tier;

pub use answers::{collect_answers, AnswerRecord, AnswerValue, FormError};
pub use config::{ConfigManager, LoggingConfig, Settings};
pub use error::{CoreError, Result};
pub use prompt::{build_prompt, template_for, PromptTemplate, SYSTEM_PERSONA};
pub use questions::{questions_for, Question, QuestionKind};
pub use session::{DiagnosticSession, SessionError, SessionState, SnapshotOutcome};
pub use snapshot_log::{LogEntry, SnapshotLog};
pub use tier::{resolve_tier, Tier};
