//! Tick worker for Agent Arena.
//!
//! Polls the arena backend on a fixed interval, turns every queued
//! narrative action into damage via the LLM judge, and writes the new hit
//! points and battle-log line back.
//!
//! # Architecture
//!
//! ```text
//! backend queue + active QUICK matches --> TickWorker --> Judge --> backend update
//! ```
//!
//! # Modules
//!
//! - [`autoplay`] -- Generated actions for QUICK matches
//! - [`backend`] -- HTTP client for the backend's internal API
//! - [`config`] -- [`WorkerConfig`] from environment variables
//! - [`error`] -- [`BackendError`] and [`WorkerError`]
//! - [`tick`] -- [`TickWorker`] and the tick loop

pub mod autoplay;
pub mod backend;
pub mod config;
pub mod error;
pub mod tick;

pub use autoplay::auto_actions;
pub use backend::{BackendClient, Drained};
pub use config::WorkerConfig;
pub use error::{BackendError, TickFailure, WorkerError};
pub use tick::{BatchSummary, Resolution, TickWorker};
