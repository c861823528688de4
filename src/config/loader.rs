//! File loading and merging for superman configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::{Config, GateConfig, HistoryConfig, ProviderConfig, ProviderEntry};

/// Written to `~/.config/superman/config.toml` on first run.
pub(super) const DEFAULT_CONFIG_TOML: &str = r#"default_provider = "ollama"
model = "llama3.1:8b-instruct-q4_0"

[provider.ollama]
base_url = "http://localhost:11434"

[provider.openai]
api_key = "{env:OPENAI_API_KEY}"

[gate]
# timeout_secs = 30
challenge = "fixed"
challenge_token = "Allow"

[history]
path = "/tmp/superman_current_history"
default_count = 10
"#;

impl Config {
    /// Loads the global config from `~/.config/superman/config.toml`.
    ///
    /// If no config file exists, creates one with defaults and returns it.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, DEFAULT_CONFIG_TOML)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            info!(path = %path.display(), "wrote default config");
            return Self::parse(DEFAULT_CONFIG_TOML)
                .with_context(|| "Failed to parse default config".to_string());
        }

        Self::load_file(&path)
    }

    /// Look for superman.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                debug!(path = %candidate.display(), "found project config");
                return Self::load_file(&candidate).map(Some);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub(super) fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config at {:?}", path))
    }

    pub(super) fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: project.model.or(global.model),
            default_provider: project.default_provider.or(global.default_provider),
            response_timeout_secs: project
                .response_timeout_secs
                .or(global.response_timeout_secs),
            provider: ProviderConfig {
                ollama: merge_entry(global.provider.ollama, project.provider.ollama),
                openai: merge_entry(global.provider.openai, project.provider.openai),
            },
            gate: GateConfig {
                timeout_secs: project.gate.timeout_secs.or(global.gate.timeout_secs),
                challenge: project.gate.challenge.or(global.gate.challenge),
                challenge_token: project.gate.challenge_token.or(global.gate.challenge_token),
                shell: project.gate.shell.or(global.gate.shell),
            },
            history: HistoryConfig {
                path: project.history.path.or(global.history.path),
                default_count: project.history.default_count.or(global.history.default_count),
            },
        }
    }
}

fn merge_entry(global: Option<ProviderEntry>, project: Option<ProviderEntry>) -> Option<ProviderEntry> {
    match (global, project) {
        (Some(g), Some(p)) => Some(ProviderEntry {
            api_key: p.api_key.or(g.api_key),
            base_url: p.base_url.or(g.base_url),
            model: p.model.or(g.model),
        }),
        (g, p) => p.or(g),
    }
}
