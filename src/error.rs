use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-gate operations
///
/// Every variant is fatal to the pipeline run that produced it. Operator
/// cancellation is not represented here: workflows report it through their
/// outcome enums instead.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: '{0}' - expected MAJOR.MINOR.PATCH[-suffix]")]
    InvalidVersionFormat(String),

    #[error("Cannot apply a {kind} bump to {version}: component is at its maximum")]
    VersionOverflow {
        version: String,
        kind: crate::domain::BumpKind,
    },

    #[error("Invalid bump request: {0}")]
    InvalidBumpRequest(String),

    #[error("Git working directory is not clean ({} uncommitted change(s)); commit or stash them first", .changes.len())]
    DirtyWorkingTree { changes: Vec<String> },

    #[error("HEAD is detached; check out a branch before pushing")]
    DetachedHead,

    #[error("Manifest not found at {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Manifest {} is missing required field '{field}'", .path.display())]
    ManifestMalformed { path: PathBuf, field: String },

    #[error("Failed to update version in {}: no version assignment matched", .0.display())]
    VersionFieldNotReplaced(PathBuf),

    #[error("Manifest {} reads back version '{actual}', expected '{expected}'", .path.display())]
    ManifestVerificationFailed {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Command failed: {command} (exit code {})\nstdout: {stdout}\nstderr: {stderr}", .exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ExternalCommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Could not run '{command}': {source}")]
    CommandNotRunnable {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} not found. Please install it first.")]
    MissingPrerequisite(String),

    #[error("Build produced no artifacts in {}", .0.display())]
    BuildProducedNoArtifacts(PathBuf),

    #[error("Artifact integrity check failed:\n{0}")]
    ArtifactIntegrityFailed(String),

    #[error("Pipeline step out of order: state is {actual}, expected {expected}")]
    PipelineOrder {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid deploy options: {0}")]
    InvalidDeployOptions(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-gate
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a bump request error with context
    pub fn bump_request(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidBumpRequest(msg.into())
    }

    /// Create a malformed-manifest error for a missing field
    pub fn malformed(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        ReleaseError::ManifestMalformed {
            path: path.into(),
            field: field.into(),
        }
    }
}
