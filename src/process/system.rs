use crate::error::{ReleaseError, Result};
use crate::process::{display_command, CommandOutput, ProcessRunner};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Spawns real processes and captures their output
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ReleaseError::config("cannot run an empty command"))?;

        let command = display_command(argv);
        debug!(command = %command, cwd = %cwd.display(), "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| ReleaseError::CommandNotRunnable {
                command: command.clone(),
                source,
            })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %command, exit_code = ?result.exit_code, "finished");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::argv;

    #[test]
    fn test_empty_command_fails() {
        let result = SystemRunner.execute(&[], Path::new("."));
        assert!(matches!(result, Err(ReleaseError::Config(_))));
    }

    #[test]
    fn test_nonexistent_program_fails_to_spawn() {
        let result = SystemRunner.execute(
            &argv(["release-gate-definitely-not-a-real-tool"]),
            Path::new("."),
        );
        assert!(matches!(
            result,
            Err(ReleaseError::CommandNotRunnable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_exit_code_and_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let output = SystemRunner
            .execute(&argv(["sh", "-c", "echo hello; exit 3"]), dir.path())
            .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let output = SystemRunner.run(&argv(["ls"]), dir.path()).unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }
}
