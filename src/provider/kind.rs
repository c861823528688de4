//! Provider kind enumeration and default model mapping.

use anyhow::{anyhow, Result};

/// Identifies which LLM backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Ollama (local models via OpenAI-compatible API).
    Ollama,
    /// OpenAI (GPT models).
    OpenAI,
}

impl ProviderKind {
    /// Parses a provider name string into a [`ProviderKind`].
    ///
    /// Matching is case-insensitive. Returns an error for unknown providers.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            other => Err(anyhow!("Unknown provider: {other}. Supported: ollama, openai")),
        }
    }

    /// Config and environment name of the provider.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
        }
    }
}

/// Returns the default model identifier for a given provider.
pub fn default_model_for(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Ollama => crate::constants::OLLAMA_DEFAULT_MODEL,
        ProviderKind::OpenAI => crate::constants::DEFAULT_OPENAI_MODEL,
    }
}
