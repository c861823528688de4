//! `--exec`: ask the model for a command, then run it through the gatekeeper.

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::config::{Config, GateConfig};
use crate::extract::extract_command;
use crate::gate::{ExecutionResult, GateError, Gatekeeper};
use crate::mode::Mode;
use crate::output::StdoutRenderer;
use crate::provider::Provider;

/// Gate settings with the `--timeout` flag applied on top.
fn gate_config(config: &Config, timeout: Option<u64>) -> GateConfig {
    let mut gate = config.gate.clone();
    if timeout.is_some() {
        gate.timeout_secs = timeout;
    }
    gate
}

/// Detail line printed under "Command execution failed:".
fn failure_detail(result: &ExecutionResult) -> String {
    match &result.failure {
        Some(GateError::RuntimeFailure { .. }) => {
            let output = result.output();
            let output = output.trim_end();
            if output.is_empty() {
                format!("Command failed: exit status {}", result.exit_status)
            } else {
                format!("Command failed: {output}")
            }
        }
        Some(other) => other.to_string(),
        None => format!("exit status {}", result.exit_status),
    }
}

pub(super) async fn run_exec(
    config: &Config,
    provider: &Provider,
    task: &str,
    timeout: Option<u64>,
) -> Result<()> {
    let mut renderer = StdoutRenderer;
    let prompt = format!("Create a command that would: {task}");
    let response = provider
        .stream(
            Mode::Exec.system_prompt(),
            &prompt,
            config.response_timeout(),
            &mut renderer,
        )
        .await?;

    let Some(command) = extract_command(&response) else {
        info!(model = provider.model(), "no command in model response");
        println!("\n{}\n", "Couldn't parse response as a command.".yellow());
        return Ok(());
    };

    println!("\n{} {}\n", "Running:".bold(), command.cyan());
    let mut gatekeeper = Gatekeeper::from_config(&gate_config(config, timeout));
    let result = gatekeeper.attempt(&command, &mut renderer).await;
    info!(
        succeeded = result.succeeded,
        exit_status = result.exit_status,
        ran = !result.failure.as_ref().is_some_and(GateError::is_pre_execution),
        "exec finished"
    );

    if result.succeeded {
        println!("\n{}", "Command executed successfully!".green().bold());
    } else {
        println!("\n{}", "Command execution failed:".red().bold());
        println!("{}", failure_detail(&result));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_flag_overrides_config() {
        let mut config = Config::default();
        config.gate.timeout_secs = Some(30);
        assert_eq!(gate_config(&config, None).timeout_secs, Some(30));
        assert_eq!(gate_config(&config, Some(5)).timeout_secs, Some(5));
    }

    #[test]
    fn test_runtime_failure_shows_output() {
        let result = ExecutionResult {
            succeeded: false,
            captured_output: vec!["ls: cannot access 'x'\n".to_string()],
            exit_status: 2,
            failure: Some(GateError::RuntimeFailure { exit_status: 2 }),
        };
        assert_eq!(failure_detail(&result), "Command failed: ls: cannot access 'x'");
    }

    #[test]
    fn test_silent_runtime_failure_shows_status() {
        let result = ExecutionResult {
            succeeded: false,
            captured_output: Vec::new(),
            exit_status: 1,
            failure: Some(GateError::RuntimeFailure { exit_status: 1 }),
        };
        assert_eq!(failure_detail(&result), "Command failed: exit status 1");
    }

    #[test]
    fn test_pre_execution_failures_show_reason() {
        let denied = ExecutionResult::failed(GateError::PolicyDenied("empty command"));
        assert_eq!(failure_detail(&denied), "empty command");

        let rejected = ExecutionResult::failed(GateError::ConfirmationRejected);
        assert_eq!(failure_detail(&rejected), "confirmation code incorrect");

        let missing = ExecutionResult::failed(GateError::SpawnFailure(
            "command not found: sh: 1: xyz: not found".to_string(),
        ));
        assert_eq!(
            failure_detail(&missing),
            "failed to start command: command not found: sh: 1: xyz: not found"
        );

        let timed_out = ExecutionResult::failed(GateError::TimedOut(Duration::from_secs(3)));
        assert_eq!(failure_detail(&timed_out), "timed out after 3s");
    }
}
