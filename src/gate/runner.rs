//! Child process execution with streamed output.
//!
//! Stdout is forwarded line by line as it arrives. Stderr is drained
//! concurrently so the child never blocks on a full pipe, and is shown as a
//! single block once stdout has closed.
//!
//! With a timeout configured the shell leads its own process group, so a
//! timeout kills everything it started and not just the shell itself. Such
//! a command is not in the terminal's foreground group and cannot read from
//! the terminal.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{ChildStdout, Command};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::GateError;
use super::ExecutionResult;
use crate::output::Renderer;

/// Runner settings.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Shell used as `<shell> -c <command>`.
    pub shell: String,
    /// Hard limit on the child's lifetime. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: crate::constants::DEFAULT_SHELL.to_string(),
            timeout: None,
        }
    }
}

/// Spawns vetted commands and collects their output.
pub struct ExecutionRunner {
    config: RunnerConfig,
}

impl ExecutionRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run `command` through the shell, streaming output to `renderer`.
    ///
    /// Never returns an error: spawn problems, non-zero exits and timeouts
    /// all come back as a failed [`ExecutionResult`].
    pub async fn run(&self, command: &str, renderer: &mut dyn Renderer) -> ExecutionResult {
        let mut cmd = Command::new(&self.config.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        if self.config.timeout.is_some() {
            cmd.process_group(0);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(%err, command, "failed to spawn command");
                return ExecutionResult::failed(GateError::SpawnFailure(err.to_string()));
            }
        };

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return ExecutionResult::failed(GateError::SpawnFailure(
                "child output pipes unavailable".to_string(),
            ));
        };

        let pid = child.id();
        debug!(pid, command, "spawned command");

        let mut captured = Vec::new();
        let work = async {
            let (streamed, drained) = tokio::join!(
                stream_lines(stdout, &mut *renderer, &mut captured),
                drain(stderr)
            );
            streamed?;
            let stderr_bytes = drained?;
            let status = child.wait().await?;
            Ok::<_, io::Error>((stderr_bytes, status))
        };

        let outcome = match self.config.timeout {
            Some(limit) => tokio::time::timeout_at(Instant::now() + limit, work)
                .await
                .map_err(|_| limit),
            None => Ok(work.await),
        };

        let (stderr_bytes, status) = match outcome {
            Ok(Ok(done)) => done,
            Ok(Err(err)) => {
                warn!(%err, command, "lost contact with child process");
                if let Err(kill_err) = child.kill().await {
                    debug!(%kill_err, "kill after pipe error failed");
                }
                return ExecutionResult {
                    succeeded: false,
                    captured_output: captured,
                    exit_status: -1,
                    failure: Some(GateError::RuntimeFailure { exit_status: -1 }),
                };
            }
            Err(limit) => {
                warn!(command, ?limit, "command timed out, killing");
                #[cfg(unix)]
                if let Some(pgid) = pid {
                    kill_process_group(pgid);
                }
                if let Err(err) = child.kill().await {
                    warn!(%err, "failed to kill timed out command");
                }
                return ExecutionResult {
                    succeeded: false,
                    captured_output: captured,
                    exit_status: -1,
                    failure: Some(GateError::TimedOut(limit)),
                };
            }
        };

        let stderr_text = String::from_utf8_lossy(&stderr_bytes).into_owned();
        if !stderr_text.is_empty() {
            renderer.render_token(&stderr_text);
            captured.push(stderr_text.clone());
        }

        // signalled processes have no exit code
        let exit_status = status.code().unwrap_or(-1);
        info!(command, exit_status, "command finished");

        if status.success() {
            return ExecutionResult {
                succeeded: true,
                captured_output: captured,
                exit_status,
                failure: None,
            };
        }

        let failure = match exit_status {
            SHELL_NOT_FOUND => GateError::SpawnFailure(format!(
                "command not found: {}",
                shell_complaint(&stderr_text, command)
            )),
            SHELL_NOT_EXECUTABLE => GateError::SpawnFailure(format!(
                "permission denied: {}",
                shell_complaint(&stderr_text, command)
            )),
            _ => GateError::RuntimeFailure { exit_status },
        };
        ExecutionResult {
            succeeded: false,
            captured_output: captured,
            exit_status,
            failure: Some(failure),
        }
    }
}

/// POSIX shell exit status when the command could not be found.
const SHELL_NOT_FOUND: i32 = 127;
/// POSIX shell exit status when the command was found but not executable.
const SHELL_NOT_EXECUTABLE: i32 = 126;

/// The shell's own message, or the command when it printed nothing.
fn shell_complaint<'a>(stderr: &'a str, command: &'a str) -> &'a str {
    match stderr.trim() {
        "" => command,
        message => message,
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Err(err) = killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL) {
        debug!(%err, pgid, "failed to kill process group");
    }
}

/// Forward stdout to the renderer one line at a time, newline kept.
async fn stream_lines(
    stdout: ChildStdout,
    renderer: &mut dyn Renderer,
    captured: &mut Vec<String>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        renderer.render_token(&line);
        captured.push(line);
    }
}

async fn drain(mut pipe: impl AsyncRead + Unpin) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf).await?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferRenderer;

    fn runner() -> ExecutionRunner {
        ExecutionRunner::new(RunnerConfig::default())
    }

    #[tokio::test]
    async fn test_multiline_stdout_is_captured_in_order() {
        let mut renderer = BufferRenderer::new();
        let result = runner()
            .run("printf 'one\\ntwo\\nthree\\n'", &mut renderer)
            .await;

        assert!(result.succeeded);
        assert_eq!(result.exit_status, 0);
        assert_eq!(result.captured_output, vec!["one\n", "two\n", "three\n"]);
        assert_eq!(renderer.text(), "one\ntwo\nthree\n");
        assert!(result.failure.is_none());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let mut renderer = BufferRenderer::new();
        let result = runner().run("exit 2", &mut renderer).await;

        assert!(!result.succeeded);
        assert_eq!(result.exit_status, 2);
        assert_eq!(
            result.failure,
            Some(GateError::RuntimeFailure { exit_status: 2 })
        );
    }

    #[tokio::test]
    async fn test_stderr_follows_stdout_as_one_block() {
        let mut renderer = BufferRenderer::new();
        let result = runner()
            .run("echo oops >&2; echo a; echo b; echo again >&2", &mut renderer)
            .await;

        assert!(result.succeeded);
        assert_eq!(
            result.captured_output,
            vec!["a\n", "b\n", "oops\nagain\n"]
        );
    }

    #[tokio::test]
    async fn test_large_stderr_does_not_deadlock() {
        let mut renderer = BufferRenderer::new();
        let config = RunnerConfig {
            timeout: Some(Duration::from_secs(20)),
            ..RunnerConfig::default()
        };
        // 200k of stderr overflows any pipe buffer before stdout closes
        let result = ExecutionRunner::new(config)
            .run(
                "head -c 200000 /dev/zero | tr '\\0' 'x' >&2; echo done",
                &mut renderer,
            )
            .await;

        assert!(result.succeeded, "{:?}", result.failure);
        assert_eq!(result.captured_output[0], "done\n");
        assert_eq!(result.captured_output[1].len(), 200_000);
    }

    #[tokio::test]
    async fn test_missing_binary_inside_shell_is_spawn_failure() {
        let mut renderer = BufferRenderer::new();
        let result = runner()
            .run("definitely_not_a_real_binary_xyz --flag", &mut renderer)
            .await;

        assert!(!result.succeeded);
        assert_eq!(result.exit_status, 127);
        match &result.failure {
            Some(GateError::SpawnFailure(reason)) => {
                assert!(reason.starts_with("command not found: "), "{}", reason);
                assert!(reason.contains("definitely_not_a_real_binary_xyz"), "{}", reason);
            }
            other => panic!("expected SpawnFailure, got {:?}", other),
        }
        assert!(result.output().contains("not found"));
    }

    #[tokio::test]
    async fn test_non_executable_file_is_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.sh");
        std::fs::write(&script, "echo hi\n").unwrap();

        let mut renderer = BufferRenderer::new();
        let result = runner()
            .run(&script.display().to_string(), &mut renderer)
            .await;

        assert_eq!(result.exit_status, 126);
        match &result.failure {
            Some(GateError::SpawnFailure(reason)) => {
                assert!(reason.starts_with("permission denied: "), "{}", reason);
            }
            other => panic!("expected SpawnFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_shell_complaint_falls_back_to_command() {
        assert_eq!(shell_complaint("  \n", "foo"), "foo");
        assert_eq!(shell_complaint("sh: foo: not found\n", "foo"), "sh: foo: not found");
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_failure() {
        let mut renderer = BufferRenderer::new();
        let config = RunnerConfig {
            shell: "/nonexistent/shell/xyz".to_string(),
            timeout: None,
        };
        let result = ExecutionRunner::new(config).run("ls", &mut renderer).await;

        assert!(!result.succeeded);
        assert_eq!(result.exit_status, -1);
        match result.failure {
            Some(GateError::SpawnFailure(reason)) => assert!(!reason.is_empty()),
            other => panic!("expected SpawnFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child_and_keeps_partial_output() {
        let mut renderer = BufferRenderer::new();
        let config = RunnerConfig {
            timeout: Some(Duration::from_millis(300)),
            ..RunnerConfig::default()
        };
        let started = std::time::Instant::now();
        let result = ExecutionRunner::new(config)
            .run("echo early; sleep 10; echo late", &mut renderer)
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!result.succeeded);
        assert_eq!(
            result.failure,
            Some(GateError::TimedOut(Duration::from_millis(300)))
        );
        assert_eq!(result.captured_output, vec!["early\n"]);
    }

    /// True once `pid` is gone or only a zombie awaiting its reaper.
    #[cfg(target_os = "linux")]
    fn is_dead(pid: i32) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Err(_) => true,
            Ok(stat) => stat
                .rsplit_once(')')
                .is_some_and(|(_, rest)| rest.trim_start().starts_with('Z')),
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_background_children() {
        let mut renderer = BufferRenderer::new();
        let config = RunnerConfig {
            timeout: Some(Duration::from_millis(300)),
            ..RunnerConfig::default()
        };
        let result = ExecutionRunner::new(config)
            .run("sleep 30 & echo $!; wait", &mut renderer)
            .await;

        assert!(matches!(result.failure, Some(GateError::TimedOut(_))));
        let sleeper: i32 = result.captured_output[0].trim().parse().unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !is_dead(sleeper) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(is_dead(sleeper), "background child {} outlived the timeout", sleeper);
    }
}
