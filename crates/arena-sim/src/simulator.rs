//! The simulated match: generate, judge, apply, repeat.
//!
//! Both combatants act every turn and the judge rules on the clash as a
//! whole, assigning damage to each side. A match ends after the turn limit
//! or as soon as either side reaches zero hit points. A turn whose judge
//! call fails is logged and leaves no record; the match moves on.

use std::fmt;
use std::time::Duration;

use arena_judge::prompt::MAX_DAMAGE;
use arena_judge::{CallMeta, ClashContext, ClashSide, Judge};
use arena_types::ClashVerdict;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::SimSettings;
use crate::generator::{GeneratedAction, generate_action};
use crate::roster::Combatant;

/// One judged turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Seat A's action.
    pub action_a: GeneratedAction,
    /// Seat B's action.
    pub action_b: GeneratedAction,
    /// The judge's ruling.
    pub verdict: ClashVerdict,
    /// Latency, tokens and cost of the ruling.
    pub meta: CallMeta,
    /// Seat A's hit points after the turn.
    pub hp_a: u32,
    /// Seat B's hit points after the turn.
    pub hp_b: u32,
}

/// Outcome of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    /// The named combatant finished with more hit points.
    Agent(String),
    /// Equal hit points.
    Draw,
}

impl Winner {
    /// Decide the winner by remaining hit points.
    pub fn decide(a: &Combatant, b: &Combatant) -> Self {
        match a.hp.cmp(&b.hp) {
            std::cmp::Ordering::Greater => Self::Agent(a.name.clone()),
            std::cmp::Ordering::Less => Self::Agent(b.name.clone()),
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(name) => f.write_str(name),
            Self::Draw => f.write_str("Draw"),
        }
    }
}

/// Summary of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// When the match started.
    pub started_at: DateTime<Utc>,
    /// Turns that received a ruling.
    pub turns_judged: usize,
    /// Sum of the per-turn cost estimates.
    pub total_cost: Decimal,
    /// Mean judge latency over judged turns; zero when none were judged.
    pub average_latency: Duration,
    /// Who won.
    pub winner: Winner,
    /// Seat A at the end of the match.
    pub agent_a: Combatant,
    /// Seat B at the end of the match.
    pub agent_b: Combatant,
    /// Every judged turn, in order.
    pub history: Vec<TurnRecord>,
    /// Whether the match ended by knockout.
    pub ended_by_ko: bool,
}

impl SimulationReport {
    fn new(
        started_at: DateTime<Utc>,
        agent_a: Combatant,
        agent_b: Combatant,
        history: Vec<TurnRecord>,
        ended_by_ko: bool,
    ) -> Self {
        let total_cost = history.iter().fold(Decimal::ZERO, |acc, t| {
            acc.checked_add(t.meta.cost).unwrap_or(acc)
        });
        let total_latency = history
            .iter()
            .fold(Duration::ZERO, |acc, t| acc.saturating_add(t.meta.duration));
        let average_latency = u32::try_from(history.len())
            .ok()
            .and_then(|n| total_latency.checked_div(n))
            .unwrap_or(Duration::ZERO);

        Self {
            started_at,
            turns_judged: history.len(),
            total_cost,
            average_latency,
            winner: Winner::decide(&agent_a, &agent_b),
            agent_a,
            agent_b,
            history,
            ended_by_ko,
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Report")?;
        writeln!(f, "   Started: {}", self.started_at.to_rfc3339())?;
        writeln!(f, "   Total Turns: {}", self.turns_judged)?;
        writeln!(f, "   Total Cost: ${}", self.total_cost.round_dp(5).normalize())?;
        writeln!(
            f,
            "   Avg Latency: {:.3}s",
            self.average_latency.as_secs_f64()
        )?;
        writeln!(
            f,
            "   Final HP: {} {} | {} {}",
            self.agent_a.name, self.agent_a.hp, self.agent_b.name, self.agent_b.hp
        )?;
        if self.ended_by_ko {
            writeln!(f, "   Ended by KO")?;
        }
        write!(f, "   Winner: {}", self.winner)
    }
}

/// Runs simulated matches against a judge.
pub struct Simulator {
    judge: Judge,
    settings: SimSettings,
}

impl Simulator {
    /// Create a simulator.
    pub const fn new(judge: Judge, settings: SimSettings) -> Self {
        Self { judge, settings }
    }

    /// The judge, for cost reporting.
    pub const fn judge(&self) -> &Judge {
        &self.judge
    }

    /// Play a full match between `agent_a` and `agent_b`.
    pub async fn run<R>(
        &self,
        mut agent_a: Combatant,
        mut agent_b: Combatant,
        rng: &mut R,
    ) -> SimulationReport
    where
        R: Rng + Send + ?Sized,
    {
        let started_at = Utc::now();
        let max_turns = self.settings.max_turns;
        info!(
            agent_a = agent_a.name,
            agent_b = agent_b.name,
            model = self.judge.backend().model(),
            max_turns,
            "simulation starting"
        );

        let mut history = Vec::new();
        let mut ended_by_ko = false;

        for turn in 1..=max_turns {
            let action_a = generate_action(&agent_a, rng);
            let action_b = generate_action(&agent_b, rng);
            info!(turn, kind = %action_a.kind, narrative = action_a.narrative, "agent A acts");
            info!(turn, kind = %action_b.kind, narrative = action_b.narrative, "agent B acts");

            let ctx = ClashContext {
                turn,
                context: self.settings.arena_context.clone(),
                agent_a: clash_side(&action_a),
                agent_b: clash_side(&action_b),
                max_damage: MAX_DAMAGE,
            };

            match self.judge.judge_clash(&ctx).await {
                Ok(judged) => {
                    let verdict = judged.verdict;
                    agent_a.take_damage(verdict.damage_to_a);
                    agent_b.take_damage(verdict.damage_to_b);
                    info!(
                        turn,
                        summary = verdict.summary,
                        damage_to_a = verdict.damage_to_a,
                        damage_to_b = verdict.damage_to_b,
                        hp_a = agent_a.hp,
                        hp_b = agent_b.hp,
                        cost = %judged.meta.cost,
                        latency_ms = judged.meta.duration.as_millis(),
                        "turn judged"
                    );
                    history.push(TurnRecord {
                        turn,
                        action_a,
                        action_b,
                        verdict,
                        meta: judged.meta,
                        hp_a: agent_a.hp,
                        hp_b: agent_b.hp,
                    });

                    if agent_a.is_down() || agent_b.is_down() {
                        info!(turn, "match ended by KO");
                        ended_by_ko = true;
                        break;
                    }
                }
                Err(e) => warn!(turn, error = %e, "judge call failed, turn skipped"),
            }

            if turn < max_turns {
                tokio::time::sleep(self.settings.tick_interval).await;
            }
        }

        SimulationReport::new(started_at, agent_a, agent_b, history, ended_by_ko)
    }
}

fn clash_side(action: &GeneratedAction) -> ClashSide {
    ClashSide {
        name: action.agent_name.clone(),
        kind: action.kind.as_str().to_owned(),
        narrative: action.narrative.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::default_pair;

    #[test]
    fn winner_by_remaining_hp() {
        let (mut a, mut b) = default_pair();
        assert_eq!(Winner::decide(&a, &b), Winner::Draw);

        b.take_damage(10);
        assert_eq!(Winner::decide(&a, &b), Winner::Agent("Zero-K (Hacker)".to_owned()));

        a.take_damage(20);
        assert_eq!(Winner::decide(&a, &b).to_string(), "Eldric (Mage)");
    }

    #[test]
    fn empty_report_has_zero_latency_and_cost() {
        let (a, b) = default_pair();
        let report = SimulationReport::new(Utc::now(), a, b, Vec::new(), false);
        assert_eq!(report.turns_judged, 0);
        assert_eq!(report.average_latency, Duration::ZERO);
        assert_eq!(report.total_cost, Decimal::ZERO);
        assert_eq!(report.winner, Winner::Draw);

        let rendered = report.to_string();
        assert!(rendered.contains("Total Turns: 0"));
        assert!(rendered.contains("Avg Latency: 0.000s"));
        assert!(rendered.ends_with("Winner: Draw"));
    }
}
