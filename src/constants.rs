//! Centralized constants for superman.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output, directory paths and history filtering.
pub const APP_NAME: &str = "superman";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "superman.toml";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "ollama";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.1:8b-instruct-q4_0";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Wall-clock budget for one streamed model response.
pub const RESPONSE_TIMEOUT_SECS: u64 = 120;

// --- Gatekeeper ---

/// Token the user types back when the fixed challenge is in use.
pub const DEFAULT_CHALLENGE_TOKEN: &str = "Allow";

/// Length of a randomly generated challenge.
pub const RANDOM_CHALLENGE_LEN: usize = 5;

/// Shell that gated commands are handed to as `<shell> -c <command>`.
pub const DEFAULT_SHELL: &str = "sh";

// --- History ---

/// File the shell integration writes recent history to.
pub const DEFAULT_HISTORY_FILE: &str = "/tmp/superman_current_history";

/// Number of history entries `--trouble` looks at by default.
pub const DEFAULT_TROUBLE_COUNT: usize = 10;

/// History entries containing this word are never sent to the model.
pub const HISTORY_EXCLUDED_WORD: &str = "test";

// --- Logging ---

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info";
