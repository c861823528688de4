//! Configuration types and path resolution for superman.
//!
//! Settings are stored as TOML at the platform's XDG config path
//! (e.g. `~/.config/superman/config.toml` on Linux), optionally overlaid by
//! a `superman.toml` in the current project.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::{ChallengeMode, Config, GateConfig};

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates default config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}
