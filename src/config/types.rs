//! Struct definitions and serde defaults for superman configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for superman, deserialized from `config.toml`.
///
/// Every field is optional so superman runs with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Model identifier, optionally as `provider/model` shorthand.
    #[serde(default)]
    pub model: Option<String>,
    /// Default provider name (`"ollama"` or `"openai"`).
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Wall-clock budget for one streamed model response, in seconds.
    #[serde(default)]
    pub response_timeout_secs: Option<u64>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Command gatekeeper settings.
    #[serde(default)]
    pub gate: GateConfig,
    /// Recent-history source settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Provider-specific configuration map.
///
/// Only providers the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the local Ollama provider.
    pub ollama: Option<ProviderEntry>,
    /// Configuration for the OpenAI API provider.
    pub openai: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API.
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// How confirmation challenges are generated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeMode {
    /// The same token every time (`challenge_token`, default `"Allow"`).
    #[default]
    Fixed,
    /// A fresh random token per confirmation.
    Random,
}

/// Settings for the command gatekeeper.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GateConfig {
    /// Kill commands that run longer than this. Unset means no limit.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub challenge: Option<ChallengeMode>,
    /// Token for [`ChallengeMode::Fixed`].
    #[serde(default)]
    pub challenge_token: Option<String>,
    /// Shell used to run commands.
    #[serde(default)]
    pub shell: Option<String>,
}

impl GateConfig {
    pub fn challenge(&self) -> ChallengeMode {
        self.challenge.unwrap_or_default()
    }

    pub fn challenge_token(&self) -> String {
        self.challenge_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| crate::constants::DEFAULT_CHALLENGE_TOKEN.to_string())
    }

    pub fn shell(&self) -> String {
        self.shell
            .clone()
            .unwrap_or_else(|| crate::constants::DEFAULT_SHELL.to_string())
    }
}

/// Where recent shell history is read from.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HistoryConfig {
    /// History file written by the shell integration.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Entries analyzed by `--trouble` when no count is given.
    #[serde(default)]
    pub default_count: Option<usize>,
}

impl HistoryConfig {
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::constants::DEFAULT_HISTORY_FILE))
    }

    pub fn default_count(&self) -> usize {
        self.default_count
            .unwrap_or(crate::constants::DEFAULT_TROUBLE_COUNT)
    }
}
