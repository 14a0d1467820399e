//! Build artifact pipeline: clean, build, verify.
//!
//! Stages run strictly in order. `Clean -> Built -> Verified`; the only way
//! to reach `Built` without building is [ArtifactPipeline::reuse_prior_build],
//! which re-checks that artifacts exist and nothing else.

use crate::config::BuildConfig;
use crate::error::{ReleaseError, Result};
use crate::process::{display_command, ProcessRunner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file produced by the build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArtifact {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Clean,
    Built,
    Verified,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Clean => "clean",
            PipelineState::Built => "built",
            PipelineState::Verified => "verified",
        }
    }
}

pub struct ArtifactPipeline<'a> {
    runner: &'a dyn ProcessRunner,
    root: &'a Path,
    config: &'a BuildConfig,
    state: PipelineState,
    artifacts: Vec<ReleaseArtifact>,
}

impl<'a> ArtifactPipeline<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, root: &'a Path, config: &'a BuildConfig) -> Self {
        ArtifactPipeline {
            runner,
            root,
            config,
            state: PipelineState::Clean,
            artifacts: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Artifacts found by the last build or reuse
    pub fn artifacts(&self) -> &[ReleaseArtifact] {
        &self.artifacts
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    /// Remove previous build outputs.
    ///
    /// The output directory is always removed, then every configured clean
    /// pattern. Best effort: each location is removed independently and a
    /// location that does not exist is skipped. Returns the number of paths
    /// removed.
    pub fn clean(&mut self) -> usize {
        let mut removed = usize::from(remove_path(&self.output_dir()));

        let base = glob::Pattern::escape(&self.root.to_string_lossy());
        for pattern in &self.config.clean {
            let full = format!("{}/{}", base.trim_end_matches('/'), pattern);
            let paths = match glob::glob(&full) {
                Ok(paths) => paths,
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "invalid clean pattern");
                    continue;
                }
            };

            for entry in paths {
                match entry {
                    Ok(path) => removed += usize::from(remove_path(&path)),
                    Err(e) => warn!(error = %e, "cannot read clean candidate"),
                }
            }
        }

        self.state = PipelineState::Clean;
        self.artifacts.clear();
        info!(removed, "cleaned build outputs");
        removed
    }

    /// Run the build tool and collect what it wrote to the output directory.
    ///
    /// Fails with [ReleaseError::BuildProducedNoArtifacts] when the output
    /// directory is missing or holds no files after a successful build.
    pub fn build(&mut self) -> Result<&[ReleaseArtifact]> {
        self.expect_state(PipelineState::Clean)?;

        info!(command = %display_command(&self.config.command), "building");
        self.runner.run(&self.config.command, self.root)?;

        self.artifacts = self.collect_artifacts()?;
        self.state = PipelineState::Built;
        Ok(self.artifacts.as_slice())
    }

    /// Run the integrity checker over every artifact.
    ///
    /// A non-zero exit becomes [ReleaseError::ArtifactIntegrityFailed]
    /// carrying the checker's output.
    pub fn verify(&mut self) -> Result<()> {
        self.expect_state(PipelineState::Built)?;

        let mut command = self.config.check_command.clone();
        command.extend(
            self.artifacts
                .iter()
                .map(|artifact| artifact.path.display().to_string()),
        );

        let output = self.runner.execute(&command, self.root)?;
        if !output.success() {
            let diagnostics = [output.stdout.trim(), output.stderr.trim()]
                .into_iter()
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ReleaseError::ArtifactIntegrityFailed(diagnostics));
        }

        self.state = PipelineState::Verified;
        info!(count = self.artifacts.len(), "artifacts verified");
        Ok(())
    }

    /// Skip the build and use what is already in the output directory
    pub fn reuse_prior_build(&mut self) -> Result<&[ReleaseArtifact]> {
        self.artifacts = self.collect_artifacts()?;
        self.state = PipelineState::Built;
        info!(count = self.artifacts.len(), "reusing prior build");
        Ok(self.artifacts.as_slice())
    }

    fn expect_state(&self, expected: PipelineState) -> Result<()> {
        if self.state != expected {
            return Err(ReleaseError::PipelineOrder {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    fn collect_artifacts(&self) -> Result<Vec<ReleaseArtifact>> {
        let dir = self.output_dir();
        if !dir.is_dir() {
            return Err(ReleaseError::BuildProducedNoArtifacts(dir));
        }

        let mut artifacts = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            artifacts.push(ReleaseArtifact {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }

        if artifacts.is_empty() {
            return Err(ReleaseError::BuildProducedNoArtifacts(dir));
        }

        artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(artifacts)
    }
}

/// Remove a file or directory tree, returning whether anything was removed
fn remove_path(path: &Path) -> bool {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            true
        }
        // Already gone, e.g. a .pyc inside a removed __pycache__
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot remove");
            false
        }
    }
}
