//! Match state and the action/update payloads exchanged with the backend.
//!
//! The backend owns persistence. The worker only ever sees a [`MatchState`]
//! snapshot, computes the next hit points, and posts a [`MatchUpdate`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{AgentId, MatchId};

/// Keyword recorded in the battle log when an action carries none.
pub const DEFAULT_KEYWORD: &str = "Attack";

/// Which seat an agent occupies in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The first agent (`agent1_id`, `hp_a`).
    A,
    /// The second agent (`agent2_id`, `hp_b`).
    B,
}

impl Side {
    /// The other seat.
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Display label used in judge prompts and battle logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Agent A",
            Self::B => "Agent B",
        }
    }
}

/// Battle mode as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleType {
    /// Auto-played: the worker generates both agents' actions.
    Quick,
    /// Any other mode; actions arrive through the queue.
    #[serde(other)]
    Other,
}

/// Snapshot of a match as served by `/api/v1/battles/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Match identifier. Absent from some single-match responses.
    #[serde(default)]
    pub id: MatchId,
    /// Agent in seat A.
    pub agent1_id: AgentId,
    /// Agent in seat B.
    pub agent2_id: AgentId,
    /// Remaining hit points of seat A.
    pub hp_a: u32,
    /// Remaining hit points of seat B.
    pub hp_b: u32,
    /// Current turn, starting at 1.
    pub turn: u32,
}

impl MatchState {
    /// Seat of `agent` in this match, or `None` if it is not a participant.
    pub fn side_of(&self, agent: &AgentId) -> Option<Side> {
        if *agent == self.agent1_id {
            Some(Side::A)
        } else if *agent == self.agent2_id {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Hit points `(hp_a, hp_b)` after `attacker` lands `damage` on the
    /// opposite seat. The defender bottoms out at zero.
    pub const fn after_hit(&self, attacker: Side, damage: u32) -> (u32, u32) {
        match attacker {
            Side::A => (self.hp_a, self.hp_b.saturating_sub(damage)),
            Side::B => (self.hp_a.saturating_sub(damage), self.hp_b),
        }
    }

}

/// Entry of `/internal/matches/active`. Only the fields auto-play needs;
/// hit points are not required here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMatch {
    /// Match identifier.
    pub id: MatchId,
    /// Agent in seat A.
    pub agent1_id: AgentId,
    /// Agent in seat B.
    pub agent2_id: AgentId,
    /// Current turn, starting at 1.
    #[serde(default = "first_turn")]
    pub turn: u32,
    /// Battle mode, when the backend reports one.
    #[serde(default)]
    pub battle_type: Option<BattleType>,
}

const fn first_turn() -> u32 {
    1
}

impl ActiveMatch {
    /// The agent expected to act on the current turn: odd turns belong to
    /// seat A, even turns to seat B.
    pub fn actor_for_turn(&self) -> (Side, &AgentId) {
        if self.turn % 2 == 1 {
            (Side::A, &self.agent1_id)
        } else {
            (Side::B, &self.agent2_id)
        }
    }

    /// Whether the worker auto-plays this match.
    pub fn is_quick(&self) -> bool {
        self.battle_type == Some(BattleType::Quick)
    }
}

/// A narrative action waiting to be judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAction {
    /// Match the action belongs to.
    pub match_id: MatchId,
    /// Acting agent.
    pub agent_id: AgentId,
    /// Free-form description of what the agent does.
    pub narrative: String,
    /// Short move name shown in the battle log.
    #[serde(default)]
    pub keyword: Option<String>,
}

impl QueuedAction {
    /// The action keyword, or `"Attack"` when none was supplied.
    pub fn keyword_or_default(&self) -> &str {
        self.keyword.as_deref().unwrap_or(DEFAULT_KEYWORD)
    }
}

/// Body of `GET /internal/queue/pop`.
///
/// Entries stay raw so one malformed action cannot sink the rest of the
/// batch; [`QueuePop::into_actions`] decodes them one by one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePop {
    /// Actions drained from the queue; missing means none.
    #[serde(default)]
    pub actions: Vec<Value>,
}

impl QueuePop {
    /// Decode each queued entry on its own.
    pub fn into_actions(self) -> impl Iterator<Item = Result<QueuedAction, serde_json::Error>> {
        self.actions.into_iter().map(serde_json::from_value)
    }
}

/// Body of `POST /internal/match/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchUpdate {
    /// Match being updated.
    pub match_id: MatchId,
    /// New hit points of seat A.
    pub hp_a: u32,
    /// New hit points of seat B.
    pub hp_b: u32,
    /// Turn number after this resolution.
    pub turn: u32,
    /// Human-readable battle log line.
    pub log: String,
}
