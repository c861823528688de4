//! Interactive confirmation for flagged commands.
//!
//! The broker asks a [`ChallengeGenerator`] for a fresh token on every
//! request, shows it through a [`Prompter`], and only lets the command
//! through if the (trimmed) answer matches exactly. One attempt per request.

use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use super::error::GateError;
use super::policy::Verdict;

/// Produces the token the user must type back.
pub trait ChallengeGenerator {
    fn generate(&self) -> String;
}

/// Always returns the same token.
pub struct FixedChallenge {
    token: String,
}

impl FixedChallenge {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Default for FixedChallenge {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_CHALLENGE_TOKEN)
    }
}

impl ChallengeGenerator for FixedChallenge {
    fn generate(&self) -> String {
        self.token.clone()
    }
}

/// Short random alphanumeric token, drawn from a v4 UUID.
pub struct RandomChallenge {
    len: usize,
}

impl RandomChallenge {
    pub fn new(len: usize) -> Self {
        // a simple-format UUID has 32 hex digits
        Self {
            len: len.clamp(1, 32),
        }
    }
}

impl Default for RandomChallenge {
    fn default() -> Self {
        Self::new(crate::constants::RANDOM_CHALLENGE_LEN)
    }
}

impl ChallengeGenerator for RandomChallenge {
    fn generate(&self) -> String {
        let mut token = uuid::Uuid::new_v4().simple().to_string();
        token.truncate(self.len);
        token
    }
}

/// Where the challenge is shown and the answer is read from.
pub trait Prompter {
    /// Display `reason` and `challenge`, then return one line of input.
    fn ask(&mut self, reason: &str, challenge: &str) -> io::Result<String>;

    /// Called after a correct answer, before the command runs.
    fn accepted(&mut self) {}
}

/// Prompts on stderr and reads the answer from stdin.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, reason: &str, challenge: &str) -> io::Result<String> {
        eprintln!();
        eprintln!(
            "{}",
            "WARNING: This command requires confirmation!".yellow().bold()
        );
        eprintln!("{} {}", "Reason:".bold(), reason);
        eprintln!();
        eprintln!(
            "To proceed, please type this confirmation code: {}",
            challenge.cyan().bold()
        );
        eprint!("Confirmation code: ");
        io::stderr().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        Ok(response)
    }

    fn accepted(&mut self) {
        eprintln!();
        eprintln!("{}", "Confirmation code correct. Executing command...".green());
    }
}

/// Result of one confirmation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Proceed,
    Abort(GateError),
}

/// Issues challenges and checks answers.
pub struct ConfirmationBroker {
    generator: Box<dyn ChallengeGenerator>,
}

impl ConfirmationBroker {
    pub fn new(generator: Box<dyn ChallengeGenerator>) -> Self {
        Self { generator }
    }

    /// Run one challenge round for `verdict`.
    ///
    /// A read failure (closed stdin, EOF) counts as a wrong answer.
    pub fn confirm(&self, verdict: &Verdict, prompter: &mut dyn Prompter) -> ConfirmationOutcome {
        let challenge = self.generator.generate();

        let answer = match prompter.ask(verdict.reason, &challenge) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(%err, "failed to read confirmation response");
                return ConfirmationOutcome::Abort(GateError::ConfirmationRejected);
            }
        };

        if answer.trim() == challenge {
            info!(reason = verdict.reason, "confirmation accepted");
            prompter.accepted();
            ConfirmationOutcome::Proceed
        } else {
            info!(reason = verdict.reason, "confirmation rejected");
            ConfirmationOutcome::Abort(GateError::ConfirmationRejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::policy::classify;

    /// Answers from a script and records what it was shown.
    struct Scripted {
        answer: io::Result<String>,
        shown: Vec<(String, String)>,
        accepted: bool,
    }

    impl Scripted {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                shown: Vec::new(),
                accepted: false,
            }
        }
    }

    impl Prompter for Scripted {
        fn ask(&mut self, reason: &str, challenge: &str) -> io::Result<String> {
            self.shown.push((reason.to_string(), challenge.to_string()));
            match &self.answer {
                Ok(a) => Ok(a.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }

        fn accepted(&mut self) {
            self.accepted = true;
        }
    }

    fn broker() -> ConfirmationBroker {
        ConfirmationBroker::new(Box::new(FixedChallenge::new("Allow")))
    }

    #[test]
    fn test_exact_answer_proceeds() {
        let mut prompter = Scripted::answering("Allow");
        let outcome = broker().confirm(&classify("rm foo"), &mut prompter);
        assert_eq!(outcome, ConfirmationOutcome::Proceed);
        assert!(prompter.accepted);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let mut prompter = Scripted::answering(" Allow \n");
        let outcome = broker().confirm(&classify("rm foo"), &mut prompter);
        assert_eq!(outcome, ConfirmationOutcome::Proceed);
    }

    #[test]
    fn test_case_mismatch_is_rejected() {
        let mut prompter = Scripted::answering("allow");
        let outcome = broker().confirm(&classify("rm foo"), &mut prompter);
        assert_eq!(
            outcome,
            ConfirmationOutcome::Abort(GateError::ConfirmationRejected)
        );
        assert!(!prompter.accepted);
        assert_eq!(
            GateError::ConfirmationRejected.to_string(),
            "confirmation code incorrect"
        );
    }

    #[test]
    fn test_prompter_sees_reason_and_challenge() {
        let mut prompter = Scripted::answering("nope");
        broker().confirm(&classify("sudo reboot"), &mut prompter);
        assert_eq!(
            prompter.shown,
            vec![(
                "Elevated privileges are not allowed".to_string(),
                "Allow".to_string()
            )]
        );
    }

    #[test]
    fn test_read_error_aborts() {
        let mut prompter = Scripted {
            answer: Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed")),
            shown: Vec::new(),
            accepted: false,
        };
        let outcome = broker().confirm(&classify("rm foo"), &mut prompter);
        assert_eq!(
            outcome,
            ConfirmationOutcome::Abort(GateError::ConfirmationRejected)
        );
    }

    #[test]
    fn test_random_challenge_is_fresh_each_time() {
        let generator = RandomChallenge::new(5);
        let a = generator.generate();
        let b = generator.generate();
        assert_eq!(a.len(), 5);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        // 16^5 possibilities; a collision here means the generator is stuck
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_challenge_must_be_echoed() {
        let broker = ConfirmationBroker::new(Box::new(RandomChallenge::default()));
        let mut prompter = Scripted::answering("Allow");
        let outcome = broker.confirm(&classify("rm foo"), &mut prompter);
        assert!(matches!(outcome, ConfirmationOutcome::Abort(_)));
    }
}
