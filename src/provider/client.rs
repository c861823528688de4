//! LLM provider client and streaming implementation.
//!
//! Contains the [`Provider`] struct which wraps a rig-core client and the
//! target model. Ollama is reached through its OpenAI-compatible endpoint,
//! so both backends share the same client type.

use anyhow::{Context, Result};
use futures::StreamExt;
use rig::agent::MultiTurnStreamItem;
use rig::client::CompletionClient;
use rig::message::Text;
use rig::providers::openai;
use rig::streaming::{StreamedAssistantContent, StreamingPrompt};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::kind::ProviderKind;
use super::resolve::ModelSelection;
use crate::config::Config;
use crate::output::Renderer;

/// A configured LLM provider ready to handle chat requests.
///
/// Agents are constructed on each call since they are cheap to create and
/// every mode uses a different system prompt.
pub struct Provider {
    client: openai::Client,
    kind: ProviderKind,
    model: String,
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for OpenAI or if client
    /// construction fails.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let client = match selection.provider {
            ProviderKind::Ollama => {
                let base_url = config
                    .provider_entry("ollama")
                    .and_then(|o| o.base_url.as_deref())
                    .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
                openai::Client::builder()
                    .api_key("ollama")
                    .base_url(format!("{}/v1", base_url.trim_end_matches('/')))
                    .build()
                    .context("Failed to create Ollama client")?
            }
            ProviderKind::OpenAI => {
                let api_key = config.resolve_api_key("openai").context(
                    "No API key found for OpenAI. Set OPENAI_API_KEY or configure it in config.toml",
                )?;
                match config
                    .provider_entry("openai")
                    .and_then(|o| o.base_url.as_deref())
                {
                    Some(base_url) => openai::Client::builder()
                        .api_key(&api_key)
                        .base_url(base_url)
                        .build()
                        .context("Failed to create OpenAI client")?,
                    None => {
                        openai::Client::new(&api_key).context("Failed to create OpenAI client")?
                    }
                }
            }
        };

        debug!(provider = selection.provider.name(), model = %selection.model, "provider ready");
        Ok(Self {
            client,
            kind: selection.provider,
            model: selection.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Streams a response to `prompt` under `system_prompt`, rendering tokens
    /// as they arrive. Returns the full text.
    ///
    /// Stops early, keeping what arrived so far, once `budget` has elapsed.
    pub async fn stream(
        &self,
        system_prompt: &str,
        prompt: &str,
        budget: Duration,
        renderer: &mut dyn Renderer,
    ) -> Result<String> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system_prompt)
            .max_tokens(crate::constants::MAX_TOKENS)
            .build();

        let deadline = Instant::now() + budget;
        let mut stream = agent.stream_prompt(prompt).await;
        let mut full_response = String::new();

        loop {
            let chunk = match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(_) => {
                    warn!(provider = self.kind.name(), secs = budget.as_secs(), "model response timed out");
                    renderer.render_token(&format!(
                        "\n[Response timed out after {} seconds]",
                        budget.as_secs()
                    ));
                    break;
                }
            };

            match chunk {
                Ok(MultiTurnStreamItem::StreamAssistantItem(StreamedAssistantContent::Text(
                    Text { text },
                ))) => {
                    renderer.render_token(&text);
                    full_response.push_str(&text);
                }
                Ok(MultiTurnStreamItem::FinalResponse(_)) => {
                    // Stream complete
                }
                Err(err) => {
                    renderer.render_error(&err.to_string());
                    anyhow::bail!("Streaming error: {}", err);
                }
                _ => {
                    // Reasoning and tool deltas are not used
                }
            }
        }

        renderer.render_done();
        Ok(full_response)
    }
}
