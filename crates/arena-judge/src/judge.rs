//! The judge: prompt in, verdict out.
//!
//! A [`Judge`] ties one LLM backend to the prompt templates and a cost
//! tracker. Every call is bounded by a deadline; a slow backend surfaces as
//! [`JudgeError::Timeout`] so the caller's tick keeps moving.

use std::time::{Duration, Instant};

use arena_types::{ClashVerdict, Verdict};
use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cost::{CostSummary, CostTracker, Pricing};
use crate::error::JudgeError;
use crate::llm::{Completion, LlmBackend};
use crate::parse::{parse_clash_verdict, parse_verdict};
use crate::prompt::{ActionContext, ClashContext, PromptEngine, RenderedPrompt};

/// Timing, token and cost figures for one judge call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallMeta {
    /// Wall-clock time spent waiting on the backend.
    pub duration: Duration,
    /// Prompt plus completion tokens.
    pub tokens: u64,
    /// Estimated cost in dollars.
    pub cost: Decimal,
}

/// A clash verdict together with its call metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgedClash {
    /// The parsed verdict.
    pub verdict: ClashVerdict,
    /// Timing and cost of the call that produced it.
    pub meta: CallMeta,
}

/// LLM-backed battle judge.
pub struct Judge {
    backend: LlmBackend,
    prompts: PromptEngine,
    costs: CostTracker,
    timeout: Duration,
}

impl Judge {
    /// Create a judge from its parts.
    pub const fn new(
        backend: LlmBackend,
        prompts: PromptEngine,
        pricing: Pricing,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            prompts,
            costs: CostTracker::new(pricing),
            timeout,
        }
    }

    /// The backend this judge calls.
    pub const fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    /// Running cost totals.
    pub fn cost_summary(&self) -> CostSummary {
        self.costs.summary()
    }

    /// Judge one queued action.
    pub async fn judge_action(&self, ctx: &ActionContext) -> Result<Verdict, JudgeError> {
        let prompt = self.prompts.render_action(ctx)?;
        let (completion, meta) = self.call(&prompt).await?;
        let verdict = parse_verdict(&completion.text).inspect_err(|e| {
            warn!(
                error = %e,
                raw_response = completion.text,
                "judge response could not be parsed"
            );
        })?;

        debug!(
            attacker = ctx.attacker,
            damage = verdict.damage,
            latency_ms = meta.duration.as_millis(),
            tokens = meta.tokens,
            "action judged"
        );
        Ok(verdict)
    }

    /// Judge two simultaneous actions.
    pub async fn judge_clash(&self, ctx: &ClashContext) -> Result<JudgedClash, JudgeError> {
        let prompt = self.prompts.render_clash(ctx)?;
        let (completion, meta) = self.call(&prompt).await?;
        let verdict = parse_clash_verdict(&completion.text).inspect_err(|e| {
            warn!(
                error = %e,
                raw_response = completion.text,
                "clash response could not be parsed"
            );
        })?;

        debug!(
            turn = ctx.turn,
            damage_to_a = verdict.damage_to_a,
            damage_to_b = verdict.damage_to_b,
            latency_ms = meta.duration.as_millis(),
            "clash judged"
        );
        Ok(JudgedClash { verdict, meta })
    }

    /// Send a rendered prompt under the deadline and account for its cost.
    async fn call(&self, prompt: &RenderedPrompt) -> Result<(Completion, CallMeta), JudgeError> {
        let start = Instant::now();
        let completion = timeout(self.timeout, self.backend.complete(prompt))
            .await
            .map_err(|_elapsed| JudgeError::Timeout(self.timeout.as_millis()))??;
        let duration = start.elapsed();

        let cost = self.costs.record_call(&completion.usage);
        let meta = CallMeta {
            duration,
            tokens: completion.usage.total(),
            cost,
        };
        Ok((completion, meta))
    }
}
