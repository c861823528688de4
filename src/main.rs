//! Entry point for superman, a manual-entry assistant for shell commands.
//!
//! This binary loads environment variables, starts file logging, parses CLI
//! arguments via [`cli`], and dispatches to the selected mode.

mod cli;
mod config;
mod constants;
mod extract;
mod gate;
mod history;
mod logging;
mod mode;
mod output;
mod provider;

use anyhow::Result;

/// Runs the superman CLI.
///
/// Loads `.env` files (silently ignored if absent), installs the log
/// subscriber, parses command-line arguments into a [`cli::Cli`] struct,
/// and dispatches via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _guard = logging::init_logging();
    let cli = cli::parse();
    cli::run(cli).await
}
