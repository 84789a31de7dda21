//! Workflow-manager profiles: database launchpad, fireworker and queue adapter.

pub mod answers;
pub mod error;
pub mod records;
pub mod store;

pub use answers::{AnswerSource, ScriptedAnswers, TerminalAnswers};
pub use error::ProfileError;
pub use records::{FWorker, LaunchPad, ProfileKind, ProfileRecord, QueueAdapter};
pub use store::ProfileStore;
