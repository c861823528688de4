//! Model listing for the local Ollama server.

use anyhow::{Context, Result};
use colored::Colorize;

use super::resolve::resolve_model;
use crate::config::Config;

/// Print the models the local Ollama server has pulled, marking the one in use.
pub async fn list_models(config: &Config) -> Result<()> {
    let selection = resolve_model(None, None, config)?;
    let current = &selection.model;

    println!("{}", "ollama models:".bold());
    match list_ollama_models(config).await {
        Ok(models) if models.is_empty() => {
            println!("  (no models found -- run `ollama pull {}`)", current);
        }
        Ok(models) => {
            for model in &models {
                let marker = if model == current { " (default)" } else { "" };
                println!("  {model}{marker}");
            }
        }
        Err(err) => {
            tracing::warn!(%err, "could not query ollama");
            println!("  (ollama not running)");
        }
    }

    Ok(())
}

/// Query Ollama's local API for available models.
async fn list_ollama_models(config: &Config) -> Result<Vec<String>> {
    let base_url = config
        .provider_entry("ollama")
        .and_then(|o| o.base_url.as_deref())
        .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);

    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));

    let resp: serde_json::Value = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {url}"))?
        .json()
        .await?;

    Ok(model_names(&resp))
}

fn model_names(resp: &serde_json::Value) -> Vec<String> {
    resp["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_names_from_tags_response() {
        let resp = json!({
            "models": [
                {"name": "llama3.1:8b-instruct-q4_0", "size": 1},
                {"name": "mistral-nemo:latest"},
                {"size": 3}
            ]
        });
        assert_eq!(
            model_names(&resp),
            vec!["llama3.1:8b-instruct-q4_0", "mistral-nemo:latest"]
        );
    }

    #[test]
    fn test_model_names_tolerates_unexpected_shape() {
        assert!(model_names(&json!({"error": "nope"})).is_empty());
    }
}
