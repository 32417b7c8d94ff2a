//! HTTP client for the arena backend's internal API.
//!
//! The backend owns persistence and the action queue. The worker polls it
//! for work each tick and posts hit-point updates back.

use std::time::Duration;

use arena_types::{ActiveMatch, MatchId, MatchState, MatchUpdate, QueuePop, QueuedAction};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::BackendError;

/// Actions taken off the queue in one pop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drained {
    /// Entries that decoded into actions.
    pub actions: Vec<QueuedAction>,
    /// Entries dropped because they did not decode.
    pub malformed: usize,
}

/// Client for the arena backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Drain the action queue. A non-200 answer yields no actions.
    ///
    /// Entries are decoded one at a time; a malformed entry is logged and
    /// counted in [`Drained::malformed`] without affecting its siblings.
    pub async fn pop_queue(&self) -> Result<Drained, BackendError> {
        let response = self.http.get(self.url("/internal/queue/pop")).send().await?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "queue pop returned no actions");
            return Ok(Drained::default());
        }
        let body: QueuePop = response.json().await?;

        let mut drained = Drained::default();
        for entry in body.into_actions() {
            match entry {
                Ok(action) => drained.actions.push(action),
                Err(e) => {
                    warn!(error = %e, "malformed queued action dropped");
                    drained.malformed = drained.malformed.saturating_add(1);
                }
            }
        }
        Ok(drained)
    }

    /// Matches currently in progress. A non-200 answer yields none, and
    /// entries that do not decode are skipped.
    pub async fn active_matches(&self) -> Result<Vec<ActiveMatch>, BackendError> {
        let response = self
            .http
            .get(self.url("/internal/matches/active"))
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "active match poll returned nothing");
            return Ok(Vec::new());
        }
        let entries: Vec<Value> = response.json().await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                serde_json::from_value(entry)
                    .inspect_err(|e| warn!(error = %e, "unreadable active match skipped"))
                    .ok()
            })
            .collect())
    }

    /// Current state of one match, or `None` if the backend does not serve it.
    pub async fn fetch_match(&self, id: &MatchId) -> Result<Option<MatchState>, BackendError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/battles/{id}")))
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        let mut state: MatchState = response.json().await?;
        if state.id.as_str().is_empty() {
            state.id = id.clone();
        }
        Ok(Some(state))
    }

    /// Post new hit points, turn and log line for a match.
    pub async fn update_match(&self, update: &MatchUpdate) -> Result<(), BackendError> {
        let path = "/internal/match/update";
        let response = self.http.post(self.url(path)).json(update).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:8000/", Duration::from_secs(1));
        assert!(matches!(
            client,
            Ok(ref c) if c.base_url() == "http://localhost:8000"
                && c.url("/internal/queue/pop") == "http://localhost:8000/internal/queue/pop"
        ));
    }
}
