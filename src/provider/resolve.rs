//! Model resolution logic for superman.
//!
//! Resolves which provider and model to use based on CLI flags, config file,
//! and hardcoded defaults. Supports `provider/model` shorthand syntax.

use anyhow::Result;

use super::kind::{default_model_for, ProviderKind};
use crate::config::Config;
use crate::constants::DEFAULT_PROVIDER;

/// Resolved provider + model pair.
#[derive(Debug)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Split `provider/model` shorthand. Only a known provider prefix counts, so
/// Ollama names like `hf.co/org/model` pass through untouched.
fn split_shorthand(model: &str) -> Option<(ProviderKind, &str)> {
    let (prov, rest) = model.split_once('/')?;
    ProviderKind::from_str(prov).ok().map(|kind| (kind, rest))
}

/// Resolve which provider and model to use.
/// Priority: CLI flags > config.toml > defaults.
///
/// Accepts these formats:
///   --model openai/gpt-4.1  (shorthand, only when --provider is omitted)
///   --provider ollama --model mistral-nemo
///   --provider openai  (uses the provider entry's model, then the provider default)
///   (nothing)  (uses config.toml, then hardcoded default)
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    if cli_provider.is_none() {
        if let Some((provider, model)) = cli_model.and_then(split_shorthand) {
            return Ok(ModelSelection {
                provider,
                model: model.to_string(),
            });
        }
    }

    let provider_str = cli_provider
        .or(config.provider_name())
        .unwrap_or(DEFAULT_PROVIDER);
    let provider = ProviderKind::from_str(provider_str)?;

    let config_model = config.model.as_deref().map(|m| match split_shorthand(m) {
        Some((_, model)) => model,
        None => m,
    });

    let model = cli_model
        .or_else(|| {
            config
                .provider_entry(provider.name())
                .and_then(|e| e.model.as_deref())
        })
        .or(config_model)
        .unwrap_or_else(|| default_model_for(provider))
        .to_string();

    Ok(ModelSelection { provider, model })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_defaults_to_local_ollama() {
        let selection = resolve_model(None, None, &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::Ollama);
        assert_eq!(selection.model, "llama3.1:8b-instruct-q4_0");
    }

    #[test]
    fn test_shorthand_selects_provider() {
        let selection = resolve_model(None, Some("openai/gpt-4.1"), &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::OpenAI);
        assert_eq!(selection.model, "gpt-4.1");
    }

    #[test]
    fn test_slashed_ollama_model_is_not_shorthand() {
        let selection =
            resolve_model(None, Some("hf.co/org/model:F16"), &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::Ollama);
        assert_eq!(selection.model, "hf.co/org/model:F16");
    }

    #[test]
    fn test_cli_beats_config() {
        let config = Config {
            model: Some("mistral-nemo".to_string()),
            ..Default::default()
        };
        let selection = resolve_model(None, Some("llama3"), &config).unwrap();
        assert_eq!(selection.model, "llama3");

        let selection = resolve_model(None, None, &config).unwrap();
        assert_eq!(selection.model, "mistral-nemo");
    }

    #[test]
    fn test_provider_without_model_uses_its_default() {
        let selection = resolve_model(Some("openai"), None, &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::OpenAI);
        assert_eq!(selection.model, crate::constants::DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        assert!(resolve_model(Some("nope"), None, &Config::default()).is_err());
    }
}
