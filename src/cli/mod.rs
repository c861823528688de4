//! Command-line interface definition and dispatch for superman.
//!
//! Uses [`clap`] for argument parsing with derive macros. The flags pick an
//! assistant [`Mode`]; `--exec` hands the model's proposed command to the
//! gatekeeper in the [`exec`] submodule.

mod exec;

use crate::config::Config;
use crate::mode::Mode;
use crate::output::StdoutRenderer;
use crate::{history, provider};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

/// Top-level CLI structure for superman.
///
/// The `///` doc comments on fields double as `--help` text rendered by clap.
#[derive(Parser, Debug)]
#[command(
    name = "superman",
    about = "A manual-entry assistant for shell commands",
    after_help = "Put the command after `--` when it has flags of its own:\n  superman -s -- tar -xzf"
)]
pub struct Cli {
    /// The command you would like the assistant to process (use `--` before
    /// words that start with `-`)
    pub command: Vec<String>,
    /// Summarize the command's capabilities and use cases
    #[arg(short, long)]
    pub summarize: bool,
    /// One-sentence summary of the command
    #[arg(long)]
    pub shortsum: bool,
    /// Create a cheat sheet for the command
    #[arg(short, long)]
    pub cheat: bool,
    /// Ask the model anything; with other modes, adds a request
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    pub assistant: Option<String>,
    /// Find the right command for a problem
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    pub find: Option<String>,
    /// Analyze the last N shell commands for problems (default 10)
    #[arg(short, long, num_args = 0..=1, value_name = "N")]
    pub trouble: Option<Option<usize>>,
    /// Make a plan to accomplish a goal
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    pub plan: Option<String>,
    /// Generate a command for a task and run it after safety checks
    #[arg(short, long, value_name = "TASK")]
    pub exec: Option<String>,
    /// Model to use (overrides config; `provider/model` accepted)
    #[arg(short, long)]
    pub model: Option<String>,
    /// Provider to use (ollama, openai)
    #[arg(long)]
    pub provider: Option<String>,
    /// History file to read for --trouble
    #[arg(long, value_name = "PATH")]
    pub history_file: Option<PathBuf>,
    /// Kill --exec commands after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// List models available on the local Ollama server
    #[arg(long)]
    pub list_models: bool,
}

/// What a parsed command line asks for.
#[derive(Debug, PartialEq)]
enum Action {
    ListModels,
    Trouble { count: usize, focus: Option<String> },
    Exec(String),
    Ask { mode: Mode, prompt: String },
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Non-empty flag value, if any.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `command`, with the `-a` text appended as an extra request.
fn with_request(command: &str, request: Option<&str>) -> String {
    match request {
        Some(request) => format!("{command}. Additional request: {request}"),
        None => command.to_string(),
    }
}

fn trouble_prompt(commands: &[String], focus: Option<&str>) -> String {
    let listing = commands.join("\n");
    match focus {
        Some(focus) => format!(
            "Please analyze these recent commands with this specific focus: {focus}\n\nCommands:\n{listing}"
        ),
        None => format!("Please analyze these recent commands:\n{listing}"),
    }
}

/// Decide what to do. Trouble wins over exec, which wins over the
/// explain-style modes.
fn plan_action(cli: &Cli, default_trouble: usize) -> Action {
    if cli.list_models {
        return Action::ListModels;
    }

    let command = cli.command.join(" ");
    let request = given(&cli.assistant);

    if let Some(count) = cli.trouble {
        return Action::Trouble {
            count: count.unwrap_or(default_trouble),
            focus: request.map(String::from),
        };
    }
    if let Some(task) = given(&cli.exec) {
        return Action::Exec(task.to_string());
    }

    let (mode, prompt) = if cli.summarize {
        (Mode::Summarize, with_request(&command, request))
    } else if cli.shortsum {
        (Mode::ShortSum, with_request(&command, request))
    } else if cli.cheat {
        (Mode::CheatSheet, with_request(&command, request))
    } else if let Some(question) = request {
        (Mode::Assistant, question.to_string())
    } else if let Some(problem) = given(&cli.find) {
        (Mode::Find, problem.to_string())
    } else if let Some(goal) = given(&cli.plan) {
        (Mode::Plan, goal.to_string())
    } else {
        (Mode::Default, command)
    };

    Action::Ask { mode, prompt }
}

fn connect(config: &Config, cli: &Cli) -> Result<provider::Provider> {
    let selection = provider::resolve_model(cli.provider.as_deref(), cli.model.as_deref(), config)?;
    let provider = provider::Provider::from_config(config, &selection)?;
    eprintln!(
        "{} [model: {}]",
        "superman".bold().cyan(),
        selection.model.yellow(),
    );
    eprintln!();
    Ok(provider)
}

/// Dispatches the parsed command line to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let action = plan_action(&cli, config.history.default_count());
    info!(?action, "dispatching");

    match action {
        Action::ListModels => provider::list_models(&config).await,
        Action::Trouble { count, focus } => {
            let path = cli
                .history_file
                .clone()
                .unwrap_or_else(|| config.history.path());
            let commands = history::recent_commands(&path, count);
            if commands.is_empty() {
                println!("\nNo recent commands found to analyze.");
                return Ok(());
            }
            let prompt = trouble_prompt(&commands, focus.as_deref());
            let provider = connect(&config, &cli)?;
            provider
                .stream(
                    Mode::Trouble.system_prompt(),
                    &prompt,
                    config.response_timeout(),
                    &mut StdoutRenderer,
                )
                .await?;
            Ok(())
        }
        Action::Exec(task) => {
            let provider = connect(&config, &cli)?;
            exec::run_exec(&config, &provider, &task, cli.timeout).await
        }
        Action::Ask { mode, prompt } => {
            if prompt.trim().is_empty() {
                anyhow::bail!("Nothing to ask. Usage: superman <command> [--summarize | --cheat | ...]");
            }
            let provider = connect(&config, &cli)?;
            provider
                .stream(
                    mode.system_prompt(),
                    &prompt,
                    config.response_timeout(),
                    &mut StdoutRenderer,
                )
                .await?;
            println!();
            Ok(())
        }
    }
}
