//! The tick loop: from queued narrative to applied damage.
//!
//! Each tick:
//! 1. Drain the backend's action queue
//! 2. Add one generated action per QUICK match (when auto-play is on)
//! 3. For every action, fetch its match, ask the judge for damage, and post
//!    the new hit points, turn and battle-log line
//!
//! Actions are judged one at a time. A failure in one action is logged and
//! the rest of the batch still runs. Ticks are paced to the configured
//! interval; a tick that overruns starts the next one immediately.

use std::future::Future;
use std::pin::pin;
use std::time::{Duration, Instant};

use arena_judge::{ActionContext, Judge};
use arena_types::{MatchUpdate, QueuedAction};
use tracing::{debug, error, info, warn};

use crate::autoplay::auto_actions;
use crate::backend::BackendClient;
use crate::error::{TickFailure, WorkerError};

/// Per-batch outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Actions judged and written back.
    pub judged: usize,
    /// Actions dropped because their match or agent was not found.
    pub skipped: usize,
    /// Actions that errored.
    pub failed: usize,
}

impl BatchSummary {
    /// Number of actions seen.
    pub const fn total(&self) -> usize {
        self.judged
            .saturating_add(self.skipped)
            .saturating_add(self.failed)
    }
}

/// What became of a single action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Judged; the update was accepted by the backend.
    Judged(MatchUpdate),
    /// The backend does not know the match.
    MatchNotFound,
    /// The acting agent is not part of the match.
    NotAParticipant,
}

/// The tick worker.
pub struct TickWorker {
    backend: BackendClient,
    judge: Judge,
    tick_interval: Duration,
    auto_play: bool,
}

impl TickWorker {
    /// Create a worker from its parts.
    pub const fn new(
        backend: BackendClient,
        judge: Judge,
        tick_interval: Duration,
        auto_play: bool,
    ) -> Self {
        Self {
            backend,
            judge,
            tick_interval,
            auto_play,
        }
    }

    /// The judge, for cost reporting.
    pub const fn judge(&self) -> &Judge {
        &self.judge
    }

    /// Run ticks until `shutdown` resolves.
    ///
    /// A tick in progress always completes; shutdown is observed while
    /// waiting for the next one.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = pin!(shutdown);
        info!(
            backend_url = self.backend.base_url(),
            tick_interval_ms = self.tick_interval.as_millis(),
            auto_play = self.auto_play,
            judge_model = self.judge.backend().model(),
            "tick worker started"
        );

        loop {
            let started = Instant::now();

            match self.run_tick().await {
                Ok(summary) if summary.total() > 0 => info!(
                    judged = summary.judged,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "tick complete"
                ),
                Ok(_) => {}
                Err(e) => self.report_tick_error(&e),
            }

            let sleep_for = self.tick_interval.saturating_sub(started.elapsed());
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested, tick worker stopping");
                    return;
                }
                () = tokio::time::sleep(sleep_for) => {}
            }
        }
    }

    /// Run one tick: collect this tick's actions and judge them.
    ///
    /// Only a failed queue pop fails the tick. Once actions are off the
    /// queue they are always processed; queue entries that did not decode
    /// count as failed.
    pub async fn run_tick(&self) -> Result<BatchSummary, WorkerError> {
        let drained = self.backend.pop_queue().await?;
        let mut actions = drained.actions;

        if self.auto_play {
            match self.backend.active_matches().await {
                Ok(matches) => {
                    let generated = auto_actions(&matches, &mut rand::rng());
                    if !generated.is_empty() {
                        debug!(count = generated.len(), "auto-play actions generated");
                    }
                    actions.extend(generated);
                }
                Err(e) => warn!(error = %e, "active match poll failed, no auto-play this tick"),
            }
        }

        let mut summary = if actions.is_empty() {
            debug!("tick: no actions");
            BatchSummary::default()
        } else {
            self.process_batch(&actions).await
        };
        summary.failed = summary.failed.saturating_add(drained.malformed);
        Ok(summary)
    }

    /// Judge `actions` in order. Never fails as a whole.
    pub async fn process_batch(&self, actions: &[QueuedAction]) -> BatchSummary {
        info!(
            count = actions.len(),
            model = self.judge.backend().model(),
            "processing actions"
        );

        let mut summary = BatchSummary::default();
        for action in actions {
            match self.resolve_action(action).await {
                Ok(Resolution::Judged(_)) => {
                    summary.judged = summary.judged.saturating_add(1);
                }
                Ok(Resolution::MatchNotFound) => {
                    debug!(match_id = %action.match_id, "match not found, action skipped");
                    summary.skipped = summary.skipped.saturating_add(1);
                }
                Ok(Resolution::NotAParticipant) => {
                    warn!(
                        match_id = %action.match_id,
                        agent_id = %action.agent_id,
                        "agent is not in this match, action skipped"
                    );
                    summary.skipped = summary.skipped.saturating_add(1);
                }
                Err(e) => {
                    warn!(
                        match_id = %action.match_id,
                        agent_id = %action.agent_id,
                        error = %e,
                        "error processing action"
                    );
                    summary.failed = summary.failed.saturating_add(1);
                }
            }
        }
        summary
    }

    /// Judge one action against the current state of its match and write
    /// the result back.
    pub async fn resolve_action(&self, action: &QueuedAction) -> Result<Resolution, WorkerError> {
        let Some(state) = self.backend.fetch_match(&action.match_id).await? else {
            return Ok(Resolution::MatchNotFound);
        };
        let Some(attacker) = state.side_of(&action.agent_id) else {
            return Ok(Resolution::NotAParticipant);
        };

        let ctx = ActionContext::new(
            attacker.label(),
            attacker.opponent().label(),
            action.narrative.as_str(),
        );
        let verdict = self.judge.judge_action(&ctx).await?;

        let (hp_a, hp_b) = state.after_hit(attacker, verdict.damage);
        let update = MatchUpdate {
            match_id: action.match_id.clone(),
            hp_a,
            hp_b,
            turn: state.turn.saturating_add(1),
            log: format!(
                "{} used {}: {} (DMG: {})",
                attacker.label(),
                action.keyword_or_default(),
                verdict.description,
                verdict.damage
            ),
        };
        self.backend.update_match(&update).await?;

        info!(
            match_id = action.match_id.short(),
            damage = verdict.damage,
            hp_a,
            hp_b,
            "match judged"
        );
        Ok(Resolution::Judged(update))
    }

    fn report_tick_error(&self, err: &WorkerError) {
        match err.tick_failure() {
            TickFailure::BackendTimeout => {
                warn!(error = %err, "backend timeout, retrying next tick");
            }
            TickFailure::BackendUnreachable => {
                error!(
                    backend_url = self.backend.base_url(),
                    error = %err,
                    "backend connection failed, is it running?"
                );
            }
            TickFailure::Other => error!(error = %err, "tick failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_total() {
        let summary = BatchSummary {
            judged: 3,
            skipped: 1,
            failed: 2,
        };
        assert_eq!(summary.total(), 6);
        assert_eq!(BatchSummary::default().total(), 0);
    }
}
