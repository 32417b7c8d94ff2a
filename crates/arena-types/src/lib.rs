//! Shared type definitions for the Agent Arena battle judge.
//!
//! Every crate in the workspace speaks these types: the worker reads them
//! off the backend, the judge fills them from LLM output, and the
//! simulator and demo build them locally.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque string identifiers for agents and matches
//! - [`battle`] -- Match state, queued actions, and match updates
//! - [`verdict`] -- Parsed judge results with lenient field defaults
//! - [`demo`] -- Payloads of the strategy-mode (v2) backend API

pub mod battle;
pub mod demo;
pub mod ids;
pub mod verdict;

pub use battle::{
    ActiveMatch, BattleType, MatchState, MatchUpdate, QueuePop, QueuedAction, Side,
};
pub use demo::{
    ArenaInfo, BattleResult, BattleStarted, Inventory, RegisteredAgent, RoundNarrative,
    StrategyReceipt,
};
pub use ids::{AgentId, MatchId};
pub use verdict::{ActionScore, ClashVerdict, Verdict};
