//! Configuration for the tick worker.
//!
//! All configuration is loaded from environment variables. The worker needs
//! to know where the arena backend lives, how often to tick, and which LLM
//! backend judges the actions.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use arena_judge::{BackendDefaults, LlmBackendConfig, Pricing};
use rust_decimal::Decimal;

use crate::error::WorkerError;

/// Environment prefix of the judge backend variables (`GLM_API_KEY`, ...).
pub const JUDGE_ENV_PREFIX: &str = "GLM";

/// Complete worker configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base URL of the arena backend (e.g. `http://localhost:8000`).
    pub backend_url: String,
    /// Target period of one tick.
    pub tick_interval: Duration,
    /// Timeout applied to every backend request.
    pub backend_timeout: Duration,
    /// Deadline for a single judge call.
    pub judge_timeout: Duration,
    /// Whether QUICK matches get generated actions each tick.
    pub auto_play: bool,
    /// Judge LLM backend.
    pub judge_backend: LlmBackendConfig,
    /// Per-million-token rates used for the judge cost estimate.
    pub judge_pricing: Pricing,
    /// Directory with prompt template overrides.
    pub templates_dir: Option<String>,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `BACKEND_URL` -- arena backend base URL (default `http://localhost:8000`)
    /// - `TICK_INTERVAL_MS` -- tick period (default 10000)
    /// - `BACKEND_TIMEOUT_MS` -- backend request timeout (default 30000)
    /// - `JUDGE_TIMEOUT_MS` -- judge call deadline (default 30000)
    /// - `AUTO_PLAY_ENABLED` -- auto-play QUICK matches (default `true`)
    /// - `GLM_BACKEND`, `GLM_API_URL`, `GLM_API_KEY`, `GLM_MODEL`,
    ///   `GLM_TEMPERATURE`, `GLM_MAX_TOKENS` -- judge backend
    /// - `JUDGE_INPUT_RATE`, `JUDGE_OUTPUT_RATE` -- USD per million tokens (default 0)
    /// - `TEMPLATES_DIR` -- prompt template overrides
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WorkerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .unwrap_or_else(|| "http://localhost:8000".to_owned())
            .trim_end_matches('/')
            .to_owned();

        let tick_interval_ms: u64 = parse_or(&lookup, "TICK_INTERVAL_MS", 10_000)?;
        let backend_timeout_ms: u64 = parse_or(&lookup, "BACKEND_TIMEOUT_MS", 30_000)?;
        let judge_timeout_ms: u64 = parse_or(&lookup, "JUDGE_TIMEOUT_MS", 30_000)?;
        let auto_play: bool = parse_or(&lookup, "AUTO_PLAY_ENABLED", true)?;

        let judge_backend =
            LlmBackendConfig::from_lookup(JUDGE_ENV_PREFIX, &BackendDefaults::GLM, &lookup)?;

        let judge_pricing = Pricing {
            input_rate: parse_or(&lookup, "JUDGE_INPUT_RATE", Decimal::ZERO)?,
            output_rate: parse_or(&lookup, "JUDGE_OUTPUT_RATE", Decimal::ZERO)?,
        };

        let templates_dir = lookup("TEMPLATES_DIR").filter(|dir| !dir.trim().is_empty());

        Ok(Self {
            backend_url,
            tick_interval: Duration::from_millis(tick_interval_ms),
            backend_timeout: Duration::from_millis(backend_timeout_ms),
            judge_timeout: Duration::from_millis(judge_timeout_ms),
            auto_play,
            judge_backend,
            judge_pricing,
            templates_dir,
        })
    }
}

/// Parse `name` when set, otherwise return `default`.
fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, WorkerError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| WorkerError::Config(format!("invalid {name}: {e}")))
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use arena_judge::BackendType;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let Ok(config) = WorkerConfig::from_lookup(lookup_from(&[])) else {
            panic!("defaults should load");
        };
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.tick_interval, Duration::from_secs(10));
        assert_eq!(config.backend_timeout, Duration::from_secs(30));
        assert_eq!(config.judge_timeout, Duration::from_secs(30));
        assert!(config.auto_play);
        assert_eq!(config.judge_backend.backend_type, BackendType::OpenAi);
        assert_eq!(config.judge_backend.model, "glm-4-flash");
        assert!(!config.judge_backend.has_api_key());
        assert_eq!(config.judge_pricing.input_rate, Decimal::ZERO);
        assert!(config.templates_dir.is_none());
    }

    #[test]
    fn overrides() {
        let lookup = lookup_from(&[
            ("BACKEND_URL", "http://arena:9000/"),
            ("TICK_INTERVAL_MS", "2500"),
            ("AUTO_PLAY_ENABLED", "false"),
            ("GLM_API_KEY", "secret"),
            ("GLM_MODEL", "glm-4-plus"),
            ("JUDGE_INPUT_RATE", "0.15"),
            ("TEMPLATES_DIR", "/etc/arena/templates"),
        ]);
        let Ok(config) = WorkerConfig::from_lookup(lookup) else {
            panic!("overrides should load");
        };
        assert_eq!(config.backend_url, "http://arena:9000");
        assert_eq!(config.tick_interval, Duration::from_millis(2500));
        assert!(!config.auto_play);
        assert!(config.judge_backend.has_api_key());
        assert_eq!(config.judge_backend.model, "glm-4-plus");
        assert_eq!(config.judge_pricing.input_rate, Decimal::new(15, 2));
        assert_eq!(config.templates_dir.as_deref(), Some("/etc/arena/templates"));
    }

    #[test]
    fn invalid_interval_is_a_config_error() {
        let result = WorkerConfig::from_lookup(lookup_from(&[("TICK_INTERVAL_MS", "soon")]));
        assert!(matches!(result, Err(WorkerError::Config(ref msg)) if msg.contains("TICK_INTERVAL_MS")));
    }

    #[test]
    fn invalid_backend_type_is_a_judge_error() {
        let result = WorkerConfig::from_lookup(lookup_from(&[("GLM_BACKEND", "carrier-pigeon")]));
        assert!(matches!(result, Err(WorkerError::Judge(_))));
    }
}
