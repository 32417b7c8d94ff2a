//! Error types for the tick worker.
//!
//! Backend transport failures are classified up front so the tick loop can
//! tell a slow backend from one that is not running at all.

use arena_judge::JudgeError;

/// Failures talking to the arena backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request did not complete within the client timeout.
    #[error("backend timed out: {0}")]
    Timeout(String),

    /// No connection could be established.
    #[error("backend connection failed: {0}")]
    Connect(String),

    /// The backend answered with an unexpected status.
    #[error("backend returned {status} for {path}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
    },

    /// Any other transport failure.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The response body was not the expected JSON.
    #[error("backend response decode failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Errors that can occur during worker operation.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The arena backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The judge failed.
    #[error("judge error: {0}")]
    Judge(#[from] JudgeError),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}

/// How a failed tick is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFailure {
    /// The backend is up but slow; the next tick retries.
    BackendTimeout,
    /// The backend could not be reached.
    BackendUnreachable,
    /// Anything else.
    Other,
}

impl WorkerError {
    /// Classify this error for tick-level reporting.
    pub const fn tick_failure(&self) -> TickFailure {
        match self {
            Self::Backend(BackendError::Timeout(_)) => TickFailure::BackendTimeout,
            Self::Backend(BackendError::Connect(_)) => TickFailure::BackendUnreachable,
            _ => TickFailure::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_backend_failures() {
        let timeout = WorkerError::from(BackendError::Timeout("read".to_owned()));
        assert_eq!(timeout.tick_failure(), TickFailure::BackendTimeout);

        let refused = WorkerError::from(BackendError::Connect("refused".to_owned()));
        assert_eq!(refused.tick_failure(), TickFailure::BackendUnreachable);

        let status = WorkerError::from(BackendError::Status {
            status: 500,
            path: "/internal/match/update".to_owned(),
        });
        assert_eq!(status.tick_failure(), TickFailure::Other);
        assert_eq!(
            status.to_string(),
            "backend returned 500 for /internal/match/update"
        );

        let judge = WorkerError::from(JudgeError::Timeout(30_000));
        assert_eq!(judge.tick_failure(), TickFailure::Other);
    }
}
