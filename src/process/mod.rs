//! External process abstraction
//!
//! Every external tool (git, the build tool, the integrity checker, the
//! upload tool) is invoked through the [ProcessRunner] trait with an argument
//! vector, never through a shell string. The concrete implementations are:
//!
//! - [system::SystemRunner]: spawns real processes with `std::process::Command`
//! - [mock::ScriptedRunner]: records invocations and replays scripted outputs

pub mod mock;
pub mod system;

pub use mock::{RecordedCall, ScriptedRunner};
pub use system::SystemRunner;

use crate::error::{ReleaseError, Result};
use std::path::Path;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands on behalf of the release pipelines
pub trait ProcessRunner {
    /// Run `argv` in `cwd` and capture its output.
    ///
    /// A non-zero exit is *not* an error here; only a failure to start the
    /// process is. Used directly for prerequisite probing and integrity
    /// checks, where the caller interprets the exit status itself.
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput>;

    /// Run `argv` in `cwd`, treating a non-zero exit as
    /// [ReleaseError::ExternalCommandFailed].
    fn run(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput> {
        let output = self.execute(argv, cwd)?;
        if !output.success() {
            return Err(ReleaseError::ExternalCommandFailed {
                command: display_command(argv),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

/// Build an owned argument vector from string-like parts
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

/// Human-readable rendering of an argument vector for logs and errors
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command_quotes_spaces() {
        let cmd = argv(["git", "commit", "-m", "bump: version 1.1.0"]);
        assert_eq!(
            display_command(&cmd),
            "git commit -m \"bump: version 1.1.0\""
        );
    }

    #[test]
    fn test_run_maps_non_zero_exit_to_error() {
        let runner = ScriptedRunner::new().fail(&["git", "push"], 1, "rejected");
        let err = runner
            .run(&argv(["git", "push", "origin", "main"]), Path::new("."))
            .unwrap_err();

        match err {
            ReleaseError::ExternalCommandFailed {
                command,
                exit_code,
                stderr,
                ..
            } => {
                assert_eq!(command, "git push origin main");
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "rejected");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_execute_keeps_non_zero_exit() {
        let runner = ScriptedRunner::new().fail(&["twine", "check"], 1, "bad metadata");
        let output = runner
            .execute(&argv(["twine", "check", "dist/a.whl"]), Path::new("."))
            .unwrap();
        assert!(!output.success());
    }
}
