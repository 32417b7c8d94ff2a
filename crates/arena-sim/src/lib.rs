//! Standalone battle simulator for Agent Arena.
//!
//! Pits two mock combatants against each other for a fixed number of
//! turns. Each turn both sides get a randomly generated narrative action,
//! the LLM judge rules on the clash, and damage is applied to both. The
//! result is a report with the winner, total cost and judge latency.
//!
//! No backend is involved: this exercises the judge on its own.
//!
//! # Modules
//!
//! - [`config`] -- [`SimConfig`] from environment variables
//! - [`error`] -- [`SimError`]
//! - [`generator`] -- Random attack and defend narratives
//! - [`roster`] -- [`Combatant`] and the default matchup
//! - [`simulator`] -- [`Simulator`] and [`SimulationReport`]

pub mod config;
pub mod error;
pub mod generator;
pub mod roster;
pub mod simulator;

pub use config::{SimConfig, SimSettings};
pub use error::SimError;
pub use generator::{ActionKind, GeneratedAction, generate_action};
pub use roster::{Combatant, default_pair};
pub use simulator::{SimulationReport, Simulator, TurnRecord, Winner};
