//! Errors in the library.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running a training process.
#[derive(Debug, Error)]
pub enum LwaeError {
    /// The agent checkpoint given on the command line does not exist.
    #[error("agent checkpoint not found: {0}")]
    AgentCheckpointNotFound(PathBuf),

    /// An ablation mode name that the environment does not know.
    #[error("unknown ablation mode: {0}")]
    UnknownAblation(String),

    /// A kernel form name other than `legacy` or `corrected`.
    #[error("unknown kernel form: {0}")]
    UnknownKernelForm(String),

    /// The batch size must be positive.
    #[error("invalid batch size: {0}")]
    InvalidBatchSize(usize),

    /// Record value of an unexpected type was taken out of a record.
    #[error("record value type mismatch for key: {0}")]
    RecordValueTypeError(String),
}
