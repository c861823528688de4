//! LLM provider abstraction for superman.
//!
//! Wraps rig-core's OpenAI-compatible client behind a [`Provider`] struct,
//! keeping provider details out of the CLI layer. Supports a local Ollama
//! server (the default) and OpenAI via [`kind::ProviderKind`].

mod client;
mod kind;
mod listing;
mod resolve;

pub use client::Provider;
pub use listing::list_models;
pub use resolve::resolve_model;
