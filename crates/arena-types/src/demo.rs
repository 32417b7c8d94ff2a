//! Payloads of the strategy-mode (v2) backend API used by the demo agent.
//!
//! These mirror what the backend returns; every field the demo only
//! displays is optional so a sparse response still deserializes.

use serde::{Deserialize, Serialize};

use crate::ids::{AgentId, MatchId};

/// Response to agent registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAgent {
    /// Identifier assigned by the backend.
    pub agent_id: AgentId,
    /// Display name echoed back.
    #[serde(default)]
    pub name: Option<String>,
}

/// Generated battlefield description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaInfo {
    /// Arena name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text environment description.
    #[serde(default)]
    pub description: Option<String>,
    /// Environmental hazards.
    #[serde(default)]
    pub hazards: Vec<String>,
    /// Special rule in effect for this battle.
    #[serde(default)]
    pub special_condition: Option<String>,
}

/// Response to starting a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStarted {
    /// Identifier of the new battle.
    pub battle_id: MatchId,
    /// Battlefield generated for it.
    #[serde(default)]
    pub arena: ArenaInfo,
}

/// An agent's equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Item words the agent may reference in its strategy.
    #[serde(default)]
    pub deck_words: Vec<String>,
}

/// One round of the backend's battle narrative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundNarrative {
    /// Round number.
    #[serde(default)]
    pub round: Option<u32>,
    /// What agent A did.
    #[serde(default)]
    pub action_a: Option<String>,
    /// What agent B did.
    #[serde(default)]
    pub action_b: Option<String>,
    /// How the round resolved.
    #[serde(default)]
    pub result: Option<String>,
}

/// Final result of a strategy battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    /// Winning agent's name, or a draw marker.
    #[serde(default)]
    pub winner: Option<String>,
    /// Hit points left to agent A.
    #[serde(default)]
    pub final_hp_a: Option<u32>,
    /// Hit points left to agent B.
    #[serde(default)]
    pub final_hp_b: Option<u32>,
    /// Number of rounds fought.
    #[serde(default)]
    pub total_rounds: Option<u32>,
    /// Overall summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Round-by-round narrative.
    #[serde(default)]
    pub narrative: Vec<RoundNarrative>,
    /// Notable moments.
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Response to submitting a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyReceipt {
    /// Battle status after the submission (`WAITING`, `COMPLETED`, ...).
    pub status: String,
    /// Present once both strategies are in and the battle has been run.
    #[serde(default)]
    pub result: Option<BattleResult>,
}

impl StrategyReceipt {
    /// Whether the battle finished with this submission.
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn completed_receipt_with_sparse_result() {
        let receipt: StrategyReceipt = serde_json::from_value(serde_json::json!({
            "status": "COMPLETED",
            "result": {"winner": "DemoBot_A_1234", "final_hp_a": 40}
        }))
        .unwrap();
        assert!(receipt.is_completed());
        let result = receipt.result.unwrap();
        assert_eq!(result.final_hp_a, Some(40));
        assert_eq!(result.final_hp_b, None);
        assert!(result.narrative.is_empty());
    }

    #[test]
    fn battle_started_without_arena() {
        let started: BattleStarted =
            serde_json::from_str(r#"{"battle_id": "b-1"}"#).unwrap();
        assert_eq!(started.battle_id.as_str(), "b-1");
        assert!(started.arena.hazards.is_empty());
    }
}
