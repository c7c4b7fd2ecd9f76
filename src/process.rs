//! Blocking execution of external programs with captured output
//!
//! Every external step (git, the test suite) goes through [ProcessCommand],
//! which takes structured arguments instead of a shell string and returns a
//! structured [CommandOutput]. An optional timeout kills the child once it
//! elapses.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{GitBumpError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit code and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Convert a non-zero exit into [GitBumpError::ExternalCommandFailed]
    pub fn into_result(self, step: &str) -> Result<CommandOutput> {
        if self.success() {
            return Ok(self);
        }
        Err(GitBumpError::ExternalCommandFailed {
            step: step.to_string(),
            code: self.code.unwrap_or(-1),
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

/// Builder for an external program invocation
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        ProcessCommand {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Human readable command line, for logs and operation listings
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion and capture stdout and stderr.
    ///
    /// A non-zero exit is not an error here; see [CommandOutput::into_result].
    /// Failing to spawn, or exceeding the timeout, is.
    pub fn output(&self) -> Result<CommandOutput> {
        let shown = self.display();
        tracing::debug!(command = %shown, cwd = ?self.cwd, "running");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            None => child.wait()?,
            Some(timeout) => match wait_with_deadline(&mut child, timeout)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::debug!(command = %shown, ?timeout, "timed out");
                    return Err(GitBumpError::CommandTimedOut {
                        step: shown,
                        timeout,
                    });
                }
            },
        };

        let output = CommandOutput {
            code: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        tracing::debug!(command = %shown, code = ?output.code, "finished");
        Ok(output)
    }
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

// Pipes are drained on their own threads so a child filling one pipe buffer
// cannot block while we wait on it.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_and_exit_code() {
        let out = ProcessCommand::new("sh")
            .args(["-c", "echo hello; echo oops >&2; exit 3"])
            .output()
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.stderr.trim(), "oops");
        assert!(!out.success());
    }

    #[test]
    fn test_into_result_maps_failure() {
        let out = ProcessCommand::new("sh")
            .args(["-c", "echo denied >&2; exit 1"])
            .output()
            .unwrap();
        match out.into_result("git push") {
            Err(GitBumpError::ExternalCommandFailed { step, code, stderr, .. }) => {
                assert_eq!(step, "git push");
                assert_eq!(code, 1);
                assert_eq!(stderr.trim(), "denied");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = ProcessCommand::new("sleep")
            .args(["5"])
            .timeout(Some(Duration::from_millis(200)))
            .output()
            .unwrap_err();
        match err {
            GitBumpError::CommandTimedOut { step, timeout } => {
                assert_eq!(step, "sleep 5");
                assert_eq!(timeout, Duration::from_millis(200));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let err = ProcessCommand::new("definitely-not-a-real-program-xyz")
            .output()
            .unwrap_err();
        assert!(matches!(err, GitBumpError::Io(_)));
    }

    #[test]
    fn test_display_joins_arguments() {
        let cmd = ProcessCommand::new("git").args(["tag", "-a", "v1.0.0"]);
        assert_eq!(cmd.display(), "git tag -a v1.0.0");
    }

    #[test]
    fn test_current_dir_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        let out = ProcessCommand::new("pwd").current_dir(dir.path()).output().unwrap();
        let reported = std::fs::canonicalize(out.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }
}
