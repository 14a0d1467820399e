//! Staged upload of verified artifacts.
//!
//! A normal rollout uploads to the staging repository, then asks before
//! uploading the same artifacts to production. Declining at that point is a
//! successful partial release, not a failure.

use crate::artifacts::ReleaseArtifact;
use crate::domain::PublishTarget;
use crate::error::{ReleaseError, Result};
use crate::process::ProcessRunner;
use crate::ui::{self, Confirmer};
use crate::warning::SafetyWarning;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    NotStarted,
    StagingUploaded,
    /// The operator stopped after staging
    Stopped,
    ProductionUploaded,
}

/// Which targets a run uploads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// Staging, then production after confirmation
    Staged,
    /// Staging and nothing else
    StagingOnly,
    /// Production without staging; asks first unless `force` is set
    ProductionOnly { force: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Finished(UploadState),
    /// The operator declined a production-only upload before anything ran
    Cancelled,
}

pub struct StagedUploadOrchestrator<'a> {
    runner: &'a dyn ProcessRunner,
    root: &'a Path,
    command: &'a [String],
    confirmer: &'a dyn Confirmer,
    package_name: &'a str,
    state: UploadState,
}

impl<'a> StagedUploadOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        root: &'a Path,
        command: &'a [String],
        confirmer: &'a dyn Confirmer,
        package_name: &'a str,
    ) -> Self {
        StagedUploadOrchestrator {
            runner,
            root,
            command,
            confirmer,
            package_name,
            state: UploadState::NotStarted,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Drive the upload state machine to a terminal state.
    ///
    /// Any failing upload aborts the run with its error.
    pub fn run(&mut self, mode: UploadMode, artifacts: &[ReleaseArtifact]) -> Result<UploadOutcome> {
        if self.state != UploadState::NotStarted {
            return Err(ReleaseError::PipelineOrder {
                expected: "not started",
                actual: "finished",
            });
        }

        match mode {
            UploadMode::ProductionOnly { force } => {
                if !force {
                    let warning = SafetyWarning::ProductionOnlyUpload;
                    ui::display_safety_warning(&warning);
                    if !self.confirmer.ask(warning.question())? {
                        info!("production-only upload declined");
                        return Ok(UploadOutcome::Cancelled);
                    }
                }
                self.upload(PublishTarget::Production, artifacts)?;
                self.state = UploadState::ProductionUploaded;
            }
            UploadMode::StagingOnly => {
                self.upload(PublishTarget::Staging, artifacts)?;
                self.state = UploadState::StagingUploaded;
            }
            UploadMode::Staged => {
                self.upload(PublishTarget::Staging, artifacts)?;
                self.state = UploadState::StagingUploaded;

                if self.confirmer.ask(SafetyWarning::ProductionUpload.question())? {
                    self.upload(PublishTarget::Production, artifacts)?;
                    self.state = UploadState::ProductionUploaded;
                } else {
                    info!("stopping after staging upload");
                    self.state = UploadState::Stopped;
                }
            }
        }

        Ok(UploadOutcome::Finished(self.state))
    }

    fn upload(&self, target: PublishTarget, artifacts: &[ReleaseArtifact]) -> Result<()> {
        ui::display_status(&format!("Uploading to {}...", target));

        let mut command = self.command.to_vec();
        command.push("--repository".to_string());
        command.push(target.repository().to_string());
        command.extend(artifacts.iter().map(|a| a.path.display().to_string()));

        self.runner.run(&command, self.root)?;
        info!(repository = target.repository(), endpoint = target.endpoint(), "uploaded");

        ui::display_success(&format!("Uploaded to {}", target));
        ui::display_install_hint("Install with:", &target.install_hint(self.package_name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{argv, ScriptedRunner};
    use crate::ui::ScriptedConfirmer;
    use std::path::PathBuf;

    fn artifacts() -> Vec<ReleaseArtifact> {
        vec![ReleaseArtifact {
            file_name: "pkg-1.0.0.tar.gz".to_string(),
            path: PathBuf::from("dist/pkg-1.0.0.tar.gz"),
        }]
    }

    fn upload_command() -> Vec<String> {
        argv(["twine", "upload"])
    }

    #[test]
    fn test_staged_confirmed_reaches_production() {
        let runner = ScriptedRunner::new();
        let confirmer = ScriptedConfirmer::new([true]);
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        let outcome = orchestrator.run(UploadMode::Staged, &artifacts()).unwrap();

        assert_eq!(outcome, UploadOutcome::Finished(UploadState::ProductionUploaded));
        assert_eq!(
            runner.commands(),
            vec![
                argv(["twine", "upload", "--repository", "testpypi", "dist/pkg-1.0.0.tar.gz"]),
                argv(["twine", "upload", "--repository", "pypi", "dist/pkg-1.0.0.tar.gz"]),
            ]
        );
        assert_eq!(confirmer.questions(), vec!["Upload to production PyPI?"]);
    }

    #[test]
    fn test_staged_declined_stops_without_production() {
        let runner = ScriptedRunner::new();
        let confirmer = ScriptedConfirmer::new([false]);
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        let outcome = orchestrator.run(UploadMode::Staged, &artifacts()).unwrap();

        assert_eq!(outcome, UploadOutcome::Finished(UploadState::Stopped));
        assert!(!runner.was_called(&["twine", "upload", "--repository", "pypi"]));
        assert_eq!(
            confirmer.questions(),
            vec![SafetyWarning::ProductionUpload.question()]
        );
    }

    #[test]
    fn test_staging_failure_aborts() {
        let runner = ScriptedRunner::new().fail(&["twine", "upload"], 1, "403 Forbidden");
        let confirmer = ScriptedConfirmer::new([true]);
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        assert!(orchestrator.run(UploadMode::Staged, &artifacts()).is_err());
        assert_eq!(orchestrator.state(), UploadState::NotStarted);
        assert!(confirmer.questions().is_empty());
    }

    #[test]
    fn test_staging_only_never_asks() {
        let runner = ScriptedRunner::new();
        let confirmer = ScriptedConfirmer::new([true]);
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        let outcome = orchestrator.run(UploadMode::StagingOnly, &artifacts()).unwrap();

        assert_eq!(outcome, UploadOutcome::Finished(UploadState::StagingUploaded));
        assert_eq!(runner.commands().len(), 1);
        assert!(confirmer.questions().is_empty());
    }

    #[test]
    fn test_production_only_declined_is_cancelled() {
        let runner = ScriptedRunner::new();
        let confirmer = ScriptedConfirmer::new([false]);
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        let outcome = orchestrator
            .run(UploadMode::ProductionOnly { force: false }, &artifacts())
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Cancelled);
        assert!(runner.commands().is_empty());
        assert_eq!(confirmer.questions(), vec!["Are you sure?"]);
    }

    #[test]
    fn test_production_only_forced_skips_prompt_and_staging() {
        let runner = ScriptedRunner::new();
        let confirmer = ScriptedConfirmer::new(Vec::<bool>::new());
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        let outcome = orchestrator
            .run(UploadMode::ProductionOnly { force: true }, &artifacts())
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Finished(UploadState::ProductionUploaded));
        assert!(!runner.was_called(&["twine", "upload", "--repository", "testpypi"]));
        assert!(confirmer.questions().is_empty());
    }

    #[test]
    fn test_orchestrator_runs_once() {
        let runner = ScriptedRunner::new();
        let confirmer = ScriptedConfirmer::new(Vec::<bool>::new());
        let command = upload_command();
        let mut orchestrator =
            StagedUploadOrchestrator::new(&runner, Path::new("."), &command, &confirmer, "pkg");

        orchestrator.run(UploadMode::StagingOnly, &artifacts()).unwrap();
        assert!(matches!(
            orchestrator.run(UploadMode::StagingOnly, &artifacts()),
            Err(ReleaseError::PipelineOrder { .. })
        ));
    }
}
