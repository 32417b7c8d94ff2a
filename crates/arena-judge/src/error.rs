//! Error types for the battle judge.
//!
//! Uses `thiserror` for typed errors that surface through the whole judge
//! pipeline: configuration, prompt rendering, LLM calls, response parsing.

/// Errors that can occur while judging an action.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// Failed to load or render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The LLM response could not be parsed into a verdict.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The judge did not answer before the deadline.
    #[error("timeout: judge exceeded {0}ms deadline")]
    Timeout(u128),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),
}
