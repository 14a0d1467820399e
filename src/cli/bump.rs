use std::path::Path;

use tracing::info;

use crate::config::ReleaseConfig;
use crate::domain::{BumpRequest, SemanticVersion};
use crate::error::Result;
use crate::git::{CommitTagPublisher, Repository, StateChecker, TagReport};
use crate::manifest::Manifest;
use crate::process::ProcessRunner;
use crate::ui;

/// Arguments for the bump workflow
///
/// Mirrors the CLI flags without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    pub request: BumpRequest,

    /// Print the version change and stop before any check or mutation
    pub dry_run: bool,

    /// Push the branch and tag after tagging
    pub push: bool,
}

/// Result of a bump workflow run
#[derive(Debug, Clone, PartialEq)]
pub enum BumpOutcome {
    DryRun {
        current: String,
        new: SemanticVersion,
    },
    Released {
        current: String,
        new: SemanticVersion,
        report: TagReport,
    },
}

impl BumpOutcome {
    pub fn new_version(&self) -> &SemanticVersion {
        match self {
            BumpOutcome::DryRun { new, .. } | BumpOutcome::Released { new, .. } => new,
        }
    }
}

/// Version currently recorded in the manifest
pub fn read_current_version(config: &ReleaseConfig, project_root: &Path) -> Result<String> {
    Manifest::new(config.manifest_path(project_root)).read_version()
}

/// Main bump workflow
///
/// 1. Read the current version and resolve the new one
/// 2. Stop here on a dry run
/// 3. Refuse to continue on a dirty working tree
/// 4. Rewrite the manifest
/// 5. Commit, tag and optionally push
pub fn run_bump_workflow(
    args: &BumpWorkflowArgs,
    config: &ReleaseConfig,
    project_root: &Path,
    repo: &dyn Repository,
    runner: &dyn ProcessRunner,
) -> Result<BumpOutcome> {
    let manifest = Manifest::new(config.manifest_path(project_root));
    let current = manifest.read_version()?;
    let new = args.request.resolve(&current)?;

    ui::display_version_change(&current, &new.to_string());

    if args.dry_run {
        ui::display_status("Dry run - no changes made");
        return Ok(BumpOutcome::DryRun { current, new });
    }

    StateChecker::new(repo).require_clean()?;

    manifest.write_version(&new.to_string())?;
    ui::display_success(&format!("Updated {}", config.manifest.display()));

    let publisher = CommitTagPublisher::new(runner, project_root, &config.remote);
    let report = publisher.commit_and_tag(&new, &config.manifest, args.push)?;

    ui::display_success(&format!("Created commit and tag {}", report.tag));
    match &report.pushed_branch {
        Some(branch) => ui::display_success(&format!(
            "Pushed {} and {} to {}",
            branch, report.tag, config.remote
        )),
        None => ui::display_status("Skipping push"),
    }

    info!(from = %current, to = %new, "version bumped");
    Ok(BumpOutcome::Released {
        current,
        new,
        report,
    })
}
