//! LLM cost tracking for the judge.
//!
//! Provides a thread-safe [`CostTracker`] that records token usage per
//! judge call and computes estimated costs using per-million-token rates.
//!
//! All monetary calculations use [`rust_decimal::Decimal`] for financial
//! precision -- no floating-point arithmetic.

use std::fmt;
use std::sync::Mutex;

use rust_decimal::Decimal;

use crate::llm::TokenUsage;

/// One million, used as the denominator for per-million-token pricing.
const ONE_MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Per-million-token pricing of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Dollars per million prompt tokens.
    pub input_rate: Decimal,
    /// Dollars per million completion tokens.
    pub output_rate: Decimal,
}

impl Pricing {
    /// `gpt-4o-mini` list price: $0.15 in, $0.60 out per million tokens.
    pub const GPT_4O_MINI: Self = Self {
        input_rate: Decimal::from_parts(15, 0, 0, false, 2),
        output_rate: Decimal::from_parts(60, 0, 0, false, 2),
    };

    /// Estimated cost of one call.
    ///
    /// Division and multiplication on `Decimal` do not overflow for token
    /// counts that fit in a `u64`; a failed checked op yields zero.
    pub fn cost_of(&self, usage: &TokenUsage) -> Decimal {
        let input_cost = Decimal::from(usage.prompt_tokens)
            .checked_div(ONE_MILLION)
            .and_then(|d| d.checked_mul(self.input_rate))
            .unwrap_or(Decimal::ZERO);
        let output_cost = Decimal::from(usage.completion_tokens)
            .checked_div(ONE_MILLION)
            .and_then(|d| d.checked_mul(self.output_rate))
            .unwrap_or(Decimal::ZERO);
        input_cost.checked_add(output_cost).unwrap_or(Decimal::ZERO)
    }
}

/// Thread-safe judge cost tracker.
///
/// Accumulates token counts and estimated costs across all recorded calls.
/// Safe to share via `Arc<CostTracker>`.
pub struct CostTracker {
    pricing: Pricing,
    inner: Mutex<CostSummary>,
}

/// Snapshot of cost tracking state returned by [`CostTracker::summary`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostSummary {
    /// Total number of judge calls recorded.
    pub total_calls: u64,
    /// Total prompt tokens across all calls.
    pub total_input_tokens: u64,
    /// Total completion tokens across all calls.
    pub total_output_tokens: u64,
    /// Running estimated cost in dollars.
    pub total_estimated_cost: Decimal,
}

impl CostTracker {
    /// Create a new tracker with the given pricing.
    pub const fn new(pricing: Pricing) -> Self {
        Self {
            pricing,
            inner: Mutex::new(CostSummary {
                total_calls: 0,
                total_input_tokens: 0,
                total_output_tokens: 0,
                total_estimated_cost: Decimal::ZERO,
            }),
        }
    }

    /// Record a completed call and return its estimated cost.
    ///
    /// Token counts that would overflow the running totals are clamped
    /// via saturating addition.
    pub fn record_call(&self, usage: &TokenUsage) -> Decimal {
        let call_cost = self.pricing.cost_of(usage);

        // A poisoned mutex skips the update rather than panicking.
        let Ok(mut inner) = self.inner.lock() else {
            return call_cost;
        };

        inner.total_calls = inner.total_calls.saturating_add(1);
        inner.total_input_tokens = inner.total_input_tokens.saturating_add(usage.prompt_tokens);
        inner.total_output_tokens = inner
            .total_output_tokens
            .saturating_add(usage.completion_tokens);
        inner.total_estimated_cost = inner
            .total_estimated_cost
            .checked_add(call_cost)
            .unwrap_or(inner.total_estimated_cost);

        call_cost
    }

    /// Return a snapshot of the current totals.
    ///
    /// Returns a zeroed summary if the mutex is poisoned.
    pub fn summary(&self) -> CostSummary {
        self.inner
            .lock()
            .map(|inner| inner.clone())
            .unwrap_or_default()
    }
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Judge cost: {} calls | {} input tokens, {} output tokens | estimated cost: ${}",
            self.total_calls,
            self.total_input_tokens,
            self.total_output_tokens,
            self.total_estimated_cost.normalize(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn usage(prompt_tokens: u64, completion_tokens: u64) -> TokenUsage {
        TokenUsage {
            prompt_tokens,
            completion_tokens,
        }
    }

    #[test]
    fn gpt_4o_mini_rates() {
        assert_eq!(Pricing::GPT_4O_MINI.input_rate, Decimal::new(15, 2));
        assert_eq!(Pricing::GPT_4O_MINI.output_rate, Decimal::new(60, 2));
    }

    #[test]
    fn record_single_call() {
        let tracker = CostTracker::new(Pricing::GPT_4O_MINI);
        let cost = tracker.record_call(&usage(1_000_000, 1_000_000));

        // (1M / 1M) * $0.15 + (1M / 1M) * $0.60 = $0.75
        assert_eq!(cost, Decimal::new(75, 2));

        let summary = tracker.summary();
        assert_eq!(summary.total_calls, 1);
        assert_eq!(summary.total_input_tokens, 1_000_000);
        assert_eq!(summary.total_output_tokens, 1_000_000);
        assert_eq!(summary.total_estimated_cost, Decimal::new(75, 2));
    }

    #[test]
    fn small_call_cost_is_exact() {
        let tracker = CostTracker::new(Pricing::GPT_4O_MINI);
        // 400 * 0.15 / 1M + 60 * 0.60 / 1M = 0.00006 + 0.000036 = 0.000096
        let cost = tracker.record_call(&usage(400, 60));
        assert_eq!(cost, Decimal::new(96, 6));
    }

    #[test]
    fn record_multiple_calls_accumulates() {
        let tracker = CostTracker::new(Pricing::GPT_4O_MINI);
        tracker.record_call(&usage(1000, 200));
        tracker.record_call(&usage(1000, 200));
        tracker.record_call(&usage(500, 100));
        let summary = tracker.summary();

        assert_eq!(summary.total_calls, 3);
        assert_eq!(summary.total_input_tokens, 2500);
        assert_eq!(summary.total_output_tokens, 500);
    }

    #[test]
    fn zero_tokens_records_zero_cost() {
        let tracker = CostTracker::new(Pricing::GPT_4O_MINI);
        assert_eq!(tracker.record_call(&usage(0, 0)), Decimal::ZERO);
        assert_eq!(tracker.summary().total_calls, 1);
    }

    #[test]
    fn summary_display_format() {
        let tracker = CostTracker::new(Pricing::GPT_4O_MINI);
        tracker.record_call(&usage(1000, 200));
        let display = format!("{}", tracker.summary());

        assert!(display.contains("1 calls"));
        assert!(display.contains("1000 input tokens"));
        assert!(display.contains("200 output tokens"));
        assert!(display.contains("estimated cost: $"));
    }

    #[test]
    fn thread_safety_concurrent_recording() {
        use std::sync::Arc;
        use std::thread;

        let tracker = Arc::new(CostTracker::new(Pricing::GPT_4O_MINI));
        let mut handles = Vec::new();

        for _ in 0..10 {
            let t = Arc::clone(&tracker);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    t.record_call(&usage(1000, 200));
                }
            }));
        }

        for handle in handles {
            handle.join().ok();
        }

        let summary = tracker.summary();
        assert_eq!(summary.total_calls, 1000);
        assert_eq!(summary.total_input_tokens, 1_000_000);
        assert_eq!(summary.total_output_tokens, 200_000);
    }
}
