//! LLM battle judge for Agent Arena.
//!
//! Turns narrative combat actions into damage and an outcome description
//! by asking an LLM. The judge renders a prompt from templates, calls an
//! OpenAI-compatible or Anthropic endpoint, recovers a JSON verdict from
//! whatever text comes back, and keeps a running cost estimate.
//!
//! # Architecture
//!
//! ```text
//! ActionContext / ClashContext --> PromptEngine --> LlmBackend --> parse --> Verdict
//!                                                        |
//!                                                   CostTracker
//! ```
//!
//! # Modules
//!
//! - [`config`] -- Backend configuration from prefixed environment variables
//! - [`cost`] -- Token pricing and running cost totals
//! - [`error`] -- [`JudgeError`]
//! - [`judge`] -- [`Judge`], the public entry point
//! - [`llm`] -- HTTP backends
//! - [`parse`] -- Lenient verdict parsing
//! - [`prompt`] -- Prompt templates

pub mod config;
pub mod cost;
pub mod error;
pub mod judge;
pub mod llm;
pub mod parse;
pub mod prompt;

pub use config::{BackendDefaults, BackendType, LlmBackendConfig};
pub use cost::{CostSummary, CostTracker, Pricing};
pub use error::JudgeError;
pub use judge::{CallMeta, Judge, JudgedClash};
pub use llm::{LlmBackend, TokenUsage, create_backend};
pub use prompt::{ActionContext, ClashContext, ClashSide, PromptEngine, RenderedPrompt};
