//! Command safety gatekeeper.
//!
//! Every command the assistant runs goes through [`Gatekeeper::attempt`]:
//! the static [`policy`] classifies it, the [`confirm`] broker challenges
//! the user when the verdict asks for it, and the [`runner`] executes it
//! with streamed output. Denials, rejections and failures all come back as
//! a failed [`ExecutionResult`] carrying a [`GateError`].

pub mod confirm;
pub mod error;
pub mod policy;
pub mod runner;

use std::time::Duration;

use tracing::{info, warn};

pub use confirm::{
    ChallengeGenerator, ConfirmationBroker, ConfirmationOutcome, FixedChallenge, Prompter,
    RandomChallenge, TerminalPrompter,
};
pub use error::GateError;
pub use policy::{classify, Verdict};
pub use runner::{ExecutionRunner, RunnerConfig};

use crate::config::{ChallengeMode, GateConfig};
use crate::output::Renderer;

/// Final outcome of one gated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    /// Stdout lines in arrival order, then the stderr block if any.
    pub captured_output: Vec<String>,
    /// Process exit code, or `-1` when there is none.
    pub exit_status: i32,
    pub failure: Option<GateError>,
}

impl ExecutionResult {
    /// A result for a command that never produced an exit code.
    pub fn failed(failure: GateError) -> Self {
        Self {
            succeeded: false,
            captured_output: Vec::new(),
            exit_status: -1,
            failure: Some(failure),
        }
    }

    /// All captured output joined into one string.
    pub fn output(&self) -> String {
        self.captured_output.concat()
    }

    /// Short user-facing reason for a failure.
    pub fn reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Pick the challenge strategy named in the config.
fn challenge_generator(config: &GateConfig) -> Box<dyn ChallengeGenerator> {
    match config.challenge() {
        ChallengeMode::Fixed => Box::new(FixedChallenge::new(config.challenge_token())),
        ChallengeMode::Random => Box::new(RandomChallenge::default()),
    }
}

/// Classifier, broker and runner wired together.
///
/// One command at a time: `attempt` takes `&mut self`.
pub struct Gatekeeper {
    broker: ConfirmationBroker,
    runner: ExecutionRunner,
    prompter: Box<dyn Prompter>,
}

impl Gatekeeper {
    pub fn new(
        broker: ConfirmationBroker,
        runner: ExecutionRunner,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            broker,
            runner,
            prompter,
        }
    }

    /// Build a terminal-facing gatekeeper from the `[gate]` config section.
    pub fn from_config(config: &GateConfig) -> Self {
        let runner = ExecutionRunner::new(RunnerConfig {
            shell: config.shell(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        });
        Self::new(
            ConfirmationBroker::new(challenge_generator(config)),
            runner,
            Box::new(TerminalPrompter),
        )
    }

    /// Classify, confirm if needed, then run `command`.
    pub async fn attempt(&mut self, command: &str, renderer: &mut dyn Renderer) -> ExecutionResult {
        let verdict = classify(command);
        info!(
            command,
            passes = verdict.passes_static_check,
            confirm = verdict.requires_confirmation,
            reason = verdict.reason,
            "classified command"
        );

        if verdict.is_terminal_deny() {
            warn!(command, reason = verdict.reason, "command denied by policy");
            return ExecutionResult::failed(GateError::PolicyDenied(verdict.reason));
        }

        if verdict.needs_confirmation() {
            if let ConfirmationOutcome::Abort(failure) =
                self.broker.confirm(&verdict, self.prompter.as_mut())
            {
                warn!(command, %failure, "command not confirmed");
                return ExecutionResult::failed(failure);
            }
        }

        self.runner.run(command, renderer).await
    }
}
