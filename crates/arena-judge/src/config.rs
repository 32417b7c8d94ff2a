//! Configuration types for the judge's LLM backend.
//!
//! Configuration is loaded from prefixed environment variables. Each binary
//! picks its own prefix and defaults: the worker talks to a GLM endpoint,
//! the simulator to `OpenAI`.

use crate::error::JudgeError;

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, GLM, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as written in the environment.
    pub fn parse(name: &str) -> Result<Self, JudgeError> {
        match name.to_lowercase().as_str() {
            "openai" | "glm" | "zhipu" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(JudgeError::Config(format!("unknown backend type: {other}"))),
        }
    }
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`), without trailing slash.
    pub api_url: String,
    /// API key for authentication. May be empty; calls will then fail.
    pub api_key: String,
    /// Model identifier (e.g. `glm-4-flash`).
    pub model: String,
    /// Sampling temperature, if the caller wants one sent.
    pub temperature: Option<f32>,
    /// Completion token cap.
    pub max_tokens: u32,
}

/// Fallback values used when a prefixed variable is unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendDefaults {
    /// Backend type when `{PREFIX}_BACKEND` is unset.
    pub backend_type: BackendType,
    /// Base URL when `{PREFIX}_API_URL` is unset.
    pub api_url: &'static str,
    /// Model when `{PREFIX}_MODEL` is unset.
    pub model: &'static str,
    /// Temperature when `{PREFIX}_TEMPERATURE` is unset.
    pub temperature: Option<f32>,
    /// Token cap when `{PREFIX}_MAX_TOKENS` is unset.
    pub max_tokens: u32,
}

impl BackendDefaults {
    /// Zhipu GLM through its `OpenAI`-compatible endpoint (tick worker).
    pub const GLM: Self = Self {
        backend_type: BackendType::OpenAi,
        api_url: "https://open.bigmodel.cn/api/paas/v4",
        model: "glm-4-flash",
        temperature: None,
        max_tokens: 512,
    };

    /// `OpenAI` chat completions with a cheap model (standalone simulator).
    pub const OPENAI: Self = Self {
        backend_type: BackendType::OpenAi,
        api_url: "https://api.openai.com/v1",
        model: "gpt-4o-mini",
        temperature: Some(0.7),
        max_tokens: 512,
    };
}

impl LlmBackendConfig {
    /// Load a backend config from prefixed environment variables.
    ///
    /// Reads (all optional, falling back to `defaults`):
    /// - `{prefix}_BACKEND` -- backend type (`openai`, `glm`, `anthropic`, ...)
    /// - `{prefix}_API_URL` -- base API URL
    /// - `{prefix}_API_KEY` -- API key (empty when unset)
    /// - `{prefix}_MODEL` -- model name
    /// - `{prefix}_TEMPERATURE` -- sampling temperature
    /// - `{prefix}_MAX_TOKENS` -- completion token cap
    pub fn from_env(prefix: &str, defaults: &BackendDefaults) -> Result<Self, JudgeError> {
        Self::from_lookup(prefix, defaults, |name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading variables through
    /// `lookup`, so callers can supply values without touching the process
    /// environment.
    pub fn from_lookup<F>(
        prefix: &str,
        defaults: &BackendDefaults,
        lookup: F,
    ) -> Result<Self, JudgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{prefix}_{suffix}"));

        let backend_type = match var("BACKEND") {
            Some(name) => BackendType::parse(&name)?,
            None => defaults.backend_type,
        };

        let api_url = var("API_URL")
            .unwrap_or_else(|| defaults.api_url.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let api_key = var("API_KEY").unwrap_or_default();
        let model = var("MODEL").unwrap_or_else(|| defaults.model.to_owned());

        let temperature = match var("TEMPERATURE") {
            Some(raw) => Some(raw.parse::<f32>().map_err(|e| {
                JudgeError::Config(format!("invalid {prefix}_TEMPERATURE: {e}"))
            })?),
            None => defaults.temperature,
        };

        let max_tokens = match var("MAX_TOKENS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                JudgeError::Config(format!("invalid {prefix}_MAX_TOKENS: {e}"))
            })?,
            None => defaults.max_tokens,
        };

        Ok(Self {
            backend_type,
            api_url,
            api_key,
            model,
            temperature,
            max_tokens,
        })
    }

    /// Whether an API key was provided.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
