use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "release.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILE: &str = "release-gate.toml";

/// Represents the complete configuration for release-gate.
///
/// Names the manifest, the remote to push to, the tools that must be
/// installed, and the commands used to build, check and upload artifacts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_prerequisites")]
    pub prerequisites: Vec<String>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_prerequisites() -> Vec<String> {
    vec!["python".to_string(), "twine".to_string()]
}

/// Returns the default build command.
fn default_build_command() -> Vec<String> {
    vec!["python".to_string(), "-m".to_string(), "build".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Returns the default clean globs, relative to the project root.
fn default_clean() -> Vec<String> {
    vec![
        "dist".to_string(),
        "build".to_string(),
        "*.egg-info".to_string(),
        "**/*.pyc".to_string(),
        "**/__pycache__".to_string(),
    ]
}

fn default_check_command() -> Vec<String> {
    vec!["twine".to_string(), "check".to_string()]
}

fn default_upload_command() -> Vec<String> {
    vec!["twine".to_string(), "upload".to_string()]
}

/// Configuration for the artifact pipeline.
///
/// `check_command` receives the artifact paths as trailing arguments.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    #[serde(default = "default_build_command")]
    pub command: Vec<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_clean")]
    pub clean: Vec<String>,

    #[serde(default = "default_check_command")]
    pub check_command: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            command: default_build_command(),
            output_dir: default_output_dir(),
            clean: default_clean(),
            check_command: default_check_command(),
        }
    }
}

/// Configuration for uploads.
///
/// The command is extended with `--repository <id>` and the artifact paths.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UploadConfig {
    #[serde(default = "default_upload_command")]
    pub command: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            command: default_upload_command(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            manifest: default_manifest(),
            remote: default_remote(),
            prerequisites: default_prerequisites(),
            build: BuildConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Reject settings no pipeline could run with
    pub fn validate(&self) -> Result<()> {
        if self.build.command.is_empty() {
            return Err(ReleaseError::config("build.command must not be empty"));
        }
        if self.build.check_command.is_empty() {
            return Err(ReleaseError::config("build.check_command must not be empty"));
        }
        if self.upload.command.is_empty() {
            return Err(ReleaseError::config("upload.command must not be empty"));
        }
        if self.remote.trim().is_empty() {
            return Err(ReleaseError::config("remote must not be empty"));
        }
        Ok(())
    }

    /// Manifest path resolved against the project root
    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.manifest)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the project root
/// 3. `release-gate.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// A file that exists but cannot be read, parsed or validated is an error.
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<ReleaseConfig> {
    let source = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if project_root.join(PROJECT_CONFIG_FILE).exists() {
        Some(project_root.join(PROJECT_CONFIG_FILE))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(USER_CONFIG_FILE))
            .filter(|path| path.exists())
    };

    let Some(path) = source else {
        debug!("no configuration file found, using defaults");
        return Ok(ReleaseConfig::default());
    };

    debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: ReleaseConfig = toml::from_str(&content)
        .map_err(|e| ReleaseError::config(format!("invalid {}: {}", path.display(), e)))?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReleaseConfig::default();
        assert_eq!(config.manifest, PathBuf::from("pyproject.toml"));
        assert_eq!(config.remote, "origin");
        assert_eq!(config.build.command, vec!["python", "-m", "build"]);
        assert_eq!(config.build.output_dir, PathBuf::from("dist"));
        assert_eq!(config.build.check_command, vec!["twine", "check"]);
        assert_eq!(config.upload.command, vec!["twine", "upload"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config: ReleaseConfig = toml::from_str("[build]\noutput_dir = \"out\"\n").unwrap();
        assert_eq!(config.build.output_dir, PathBuf::from("out"));
        assert_eq!(config.build.command, default_build_command());
        assert_eq!(config.upload, UploadConfig::default());
    }

    #[test]
    fn test_empty_command_rejected() {
        let config: ReleaseConfig = toml::from_str("[upload]\ncommand = []\n").unwrap();
        assert!(matches!(config.validate(), Err(ReleaseError::Config(_))));
    }

    #[test]
    fn test_manifest_path_is_relative_to_root() {
        let config = ReleaseConfig::default();
        assert_eq!(
            config.manifest_path(Path::new("/work/pkg")),
            PathBuf::from("/work/pkg/pyproject.toml")
        );
    }
}
