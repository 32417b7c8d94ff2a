//! Error types for the simulator.

use arena_judge::JudgeError;

/// Errors that stop a simulation before it starts.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No API key for the judge backend.
    #[error("{0} not found in environment variables")]
    MissingApiKey(String),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The judge could not be set up.
    #[error("judge error: {0}")]
    Judge(#[from] JudgeError),
}
