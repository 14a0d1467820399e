use std::path::Path;

use tracing::{debug, info};

use crate::artifacts::ArtifactPipeline;
use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::git::{GateDecision, Repository, StateChecker};
use crate::manifest::Manifest;
use crate::process::{argv, ProcessRunner};
use crate::ui::{self, Confirmer};
use crate::upload::{StagedUploadOrchestrator, UploadMode, UploadOutcome, UploadState};

/// Arguments for the deploy workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeployWorkflowArgs {
    /// Upload to staging only
    pub test_only: bool,

    /// Skip staging and upload straight to production
    pub skip_test: bool,

    /// Reuse artifacts already in the output directory
    pub skip_build: bool,

    /// Skip the working-copy checks and the production-only prompt
    pub force: bool,
}

impl DeployWorkflowArgs {
    pub fn upload_mode(&self) -> Result<UploadMode> {
        match (self.test_only, self.skip_test) {
            (true, true) => Err(ReleaseError::InvalidDeployOptions(
                "--test-only and --skip-test cannot be used together".to_string(),
            )),
            (true, false) => Ok(UploadMode::StagingOnly),
            (false, true) => Ok(UploadMode::ProductionOnly { force: self.force }),
            (false, false) => Ok(UploadMode::Staged),
        }
    }
}

/// Result of a deploy workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Uploads ran and ended in this state
    Completed(UploadState),
    /// The operator declined a confirmation before anything was uploaded
    Cancelled,
}

/// Probe every tool with `<tool> --version`.
///
/// A tool that cannot be started or exits non-zero is reported as
/// [ReleaseError::MissingPrerequisite].
pub fn check_prerequisites(
    runner: &dyn ProcessRunner,
    project_root: &Path,
    tools: &[String],
) -> Result<()> {
    for tool in tools {
        let probe = argv([tool.as_str(), "--version"]);
        match runner.execute(&probe, project_root) {
            Ok(output) if output.success() => {
                debug!(tool = %tool, version = output.stdout.trim(), "found prerequisite");
            }
            Ok(_) | Err(ReleaseError::CommandNotRunnable { .. }) => {
                return Err(ReleaseError::MissingPrerequisite(tool.clone()));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Main deploy workflow
///
/// 1. Show the package being deployed
/// 2. Check that the configured tools are installed
/// 3. Unless forced, warn about uncommitted or unpushed work
/// 4. Clean, build and verify, or reuse a prior build
/// 5. Upload according to the selected mode
pub fn run_deploy_workflow(
    args: &DeployWorkflowArgs,
    config: &ReleaseConfig,
    project_root: &Path,
    repo: &dyn Repository,
    runner: &dyn ProcessRunner,
    confirmer: &dyn Confirmer,
) -> Result<DeployOutcome> {
    let mode = args.upload_mode()?;

    let record = Manifest::new(config.manifest_path(project_root)).read_record()?;
    ui::display_status("Starting deployment process...");
    ui::display_package_info(&record);

    check_prerequisites(runner, project_root, &config.prerequisites)?;

    if !args.force {
        let decision = StateChecker::new(repo).warn_if_dirty_or_ahead(confirmer)?;
        if decision == GateDecision::Declined {
            return Ok(DeployOutcome::Cancelled);
        }
    }

    let mut pipeline = ArtifactPipeline::new(runner, project_root, &config.build);
    if args.skip_build {
        ui::display_status(&format!(
            "Skipping build (using existing {})",
            config.build.output_dir.display()
        ));
        pipeline.reuse_prior_build()?;
    } else {
        ui::display_status("Cleaning build artifacts...");
        pipeline.clean();

        ui::display_status("Building package...");
        pipeline.build()?;
        ui::display_success("Package built");

        ui::display_status("Checking package...");
        pipeline.verify()?;
        ui::display_success("Package check passed");
    }
    ui::display_artifacts(pipeline.artifacts());

    let mut orchestrator = StagedUploadOrchestrator::new(
        runner,
        project_root,
        &config.upload.command,
        confirmer,
        &record.name,
    );

    let outcome = match orchestrator.run(mode, pipeline.artifacts())? {
        UploadOutcome::Finished(state) => DeployOutcome::Completed(state),
        UploadOutcome::Cancelled => DeployOutcome::Cancelled,
    };

    info!(package = %record.name, version = %record.version, ?outcome, "deploy finished");
    Ok(outcome)
}
