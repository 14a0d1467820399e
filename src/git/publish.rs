use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use crate::process::{argv, ProcessRunner};
use std::path::Path;
use tracing::info;

/// What [CommitTagPublisher::commit_and_tag] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    pub commit_message: String,
    pub tag: String,
    /// Branch pushed to the remote, `None` when pushing was skipped
    pub pushed_branch: Option<String>,
}

/// Records a version bump in git history: stage, commit, annotated tag and
/// optionally push.
///
/// Each step runs the `git` binary and aborts the sequence on failure. Nothing
/// is rolled back: a commit or tag created before a failing step stays in
/// place for the operator to push or delete by hand.
pub struct CommitTagPublisher<'a> {
    runner: &'a dyn ProcessRunner,
    root: &'a Path,
    remote: &'a str,
}

impl<'a> CommitTagPublisher<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, root: &'a Path, remote: &'a str) -> Self {
        CommitTagPublisher {
            runner,
            root,
            remote,
        }
    }

    pub fn commit_and_tag(
        &self,
        version: &SemanticVersion,
        manifest_path: &Path,
        push: bool,
    ) -> Result<TagReport> {
        let manifest = manifest_path.display().to_string();
        self.git(["add", manifest.as_str()])?;

        let commit_message = format!("bump: version {}", version);
        self.git(["commit", "-m", commit_message.as_str()])?;
        info!(message = %commit_message, "created commit");

        let tag = version.tag_name();
        let tag_message = format!("Release {}", version);
        self.git(["tag", "-a", tag.as_str(), "-m", tag_message.as_str()])?;
        info!(tag = %tag, "created annotated tag");

        let pushed_branch = if push {
            let branch = self.current_branch()?;
            self.git(["push", self.remote, branch.as_str()])?;
            self.git(["push", self.remote, tag.as_str()])?;
            info!(remote = self.remote, branch = %branch, tag = %tag, "pushed");
            Some(branch)
        } else {
            None
        };

        Ok(TagReport {
            commit_message,
            tag,
            pushed_branch,
        })
    }

    fn current_branch(&self) -> Result<String> {
        let output = self.git(["branch", "--show-current"])?;
        let branch = output.trim();
        if branch.is_empty() {
            return Err(ReleaseError::DetachedHead);
        }
        Ok(branch.to_string())
    }

    fn git<const N: usize>(&self, args: [&str; N]) -> Result<String> {
        let command = argv(std::iter::once("git").chain(args));
        Ok(self.runner.run(&command, self.root)?.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ScriptedRunner;

    fn git(args: &[&str]) -> Vec<String> {
        argv(std::iter::once("git").chain(args.iter().copied()))
    }

    #[test]
    fn test_commit_and_tag_without_push() {
        let runner = ScriptedRunner::new();
        let root = Path::new("/work/project");
        let publisher = CommitTagPublisher::new(&runner, root, "origin");

        let report = publisher
            .commit_and_tag(
                &SemanticVersion::new(1, 1, 0),
                Path::new("pyproject.toml"),
                false,
            )
            .unwrap();

        assert_eq!(report.commit_message, "bump: version 1.1.0");
        assert_eq!(report.tag, "v1.1.0");
        assert_eq!(report.pushed_branch, None);
        assert_eq!(
            runner.commands(),
            vec![
                git(&["add", "pyproject.toml"]),
                git(&["commit", "-m", "bump: version 1.1.0"]),
                git(&["tag", "-a", "v1.1.0", "-m", "Release 1.1.0"]),
            ]
        );
        assert!(runner.calls().iter().all(|c| c.cwd == root));
    }

    #[test]
    fn test_push_branch_then_tag() {
        let runner = ScriptedRunner::new().respond(&["git", "branch", "--show-current"], "main\n");
        let publisher = CommitTagPublisher::new(&runner, Path::new("."), "upstream");

        let report = publisher
            .commit_and_tag(
                &SemanticVersion::new(2, 0, 0),
                Path::new("pyproject.toml"),
                true,
            )
            .unwrap();

        assert_eq!(report.pushed_branch.as_deref(), Some("main"));
        let commands = runner.commands();
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[4], git(&["push", "upstream", "main"]));
        assert_eq!(commands[5], git(&["push", "upstream", "v2.0.0"]));
    }

    #[test]
    fn test_failed_commit_aborts_before_tag() {
        let runner = ScriptedRunner::new().fail(&["git", "commit"], 1, "nothing to commit");
        let publisher = CommitTagPublisher::new(&runner, Path::new("."), "origin");

        let err = publisher
            .commit_and_tag(
                &SemanticVersion::new(1, 0, 1),
                Path::new("pyproject.toml"),
                true,
            )
            .unwrap_err();

        assert!(matches!(err, ReleaseError::ExternalCommandFailed { .. }));
        assert!(!runner.was_called(&["git", "tag"]));
        assert!(!runner.was_called(&["git", "push"]));
    }

    #[test]
    fn test_failed_branch_push_skips_tag_push() {
        let runner = ScriptedRunner::new()
            .respond(&["git", "branch", "--show-current"], "main\n")
            .fail(&["git", "push", "origin", "main"], 1, "rejected");
        let publisher = CommitTagPublisher::new(&runner, Path::new("."), "origin");

        let result = publisher.commit_and_tag(
            &SemanticVersion::new(1, 0, 1),
            Path::new("pyproject.toml"),
            true,
        );

        assert!(result.is_err());
        assert!(runner.was_called(&["git", "tag", "-a", "v1.0.1"]));
        assert!(!runner.was_called(&["git", "push", "origin", "v1.0.1"]));
    }

    #[test]
    fn test_detached_head_cannot_push() {
        let runner = ScriptedRunner::new().respond(&["git", "branch", "--show-current"], "\n");
        let publisher = CommitTagPublisher::new(&runner, Path::new("."), "origin");

        let err = publisher
            .commit_and_tag(
                &SemanticVersion::new(1, 0, 1),
                Path::new("pyproject.toml"),
                true,
            )
            .unwrap_err();

        assert!(matches!(err, ReleaseError::DetachedHead));
        assert!(!runner.was_called(&["git", "push"]));
    }
}
