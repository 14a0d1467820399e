//! Package manifest access.
//!
//! The manifest is read with a structured TOML parser and written back by
//! replacing the single `version = ...` line of its `[project]` table, so
//! comments and formatting elsewhere in the file survive untouched.

use crate::error::{ReleaseError, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;
use tracing::{debug, info};

static PROJECT_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\[project\][ \t]*(?:#.*)?\r?$").expect("valid regex"));
static TABLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\[").expect("valid regex"));

/// Version assignment syntaxes, in the order they are attempted
static VERSION_PATTERNS: LazyLock<[(VersionSyntax, Regex); 3]> = LazyLock::new(|| {
    [
        (
            VersionSyntax::DoubleQuoted,
            Regex::new(r#"(?m)^version[ \t]*=[ \t]*"[^"\n]*""#).expect("valid regex"),
        ),
        (
            VersionSyntax::SingleQuoted,
            Regex::new(r"(?m)^version[ \t]*=[ \t]*'[^'\n]*'").expect("valid regex"),
        ),
        (
            VersionSyntax::Unquoted,
            Regex::new(r#"(?m)^version[ \t]*=[ \t]*[^\s#"']+"#).expect("valid regex"),
        ),
    ]
});

/// Surface syntax of the version assignment that was rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSyntax {
    DoubleQuoted,
    SingleQuoted,
    Unquoted,
}

/// Package metadata the release workflows care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[derive(Deserialize)]
struct ManifestDocument {
    project: Option<ProjectTable>,
}

#[derive(Deserialize)]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
}

/// A manifest file on disk
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Manifest { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read name, version and description.
    ///
    /// `project.name` and `project.version` are required; a missing
    /// description reads as empty.
    pub fn read_record(&self) -> Result<ManifestRecord> {
        let content = self.read_content()?;
        parse_record(&self.path, &content)
    }

    /// Read the current `project.version` string
    pub fn read_version(&self) -> Result<String> {
        Ok(self.read_record()?.version)
    }

    /// Rewrite the version assignment of the `[project]` table.
    ///
    /// The rewritten text must differ from the original and must read back
    /// as `new_version` before anything touches the disk. The file is then
    /// replaced through a temp file in the same directory.
    pub fn write_version(&self, new_version: &str) -> Result<VersionSyntax> {
        let content = self.read_content()?;

        let (updated, syntax) = replace_version(&content, new_version)
            .filter(|(updated, _)| *updated != content)
            .ok_or_else(|| {
                let candidates: Vec<&str> = content
                    .lines()
                    .filter(|line| line.contains("version") && line.contains('='))
                    .collect();
                debug!(?candidates, "no version assignment pattern matched");
                ReleaseError::VersionFieldNotReplaced(self.path.clone())
            })?;

        let actual = parse_record(&self.path, &updated)?.version;
        if actual != new_version {
            return Err(ReleaseError::ManifestVerificationFailed {
                path: self.path.clone(),
                expected: new_version.to_string(),
                actual,
            });
        }

        write_atomically(&self.path, &updated)?;
        info!(path = %self.path.display(), version = new_version, ?syntax, "updated manifest version");

        Ok(syntax)
    }

    fn read_content(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(ReleaseError::ManifestNotFound(self.path.clone()));
        }
        Ok(fs::read_to_string(&self.path)?)
    }
}

fn parse_record(path: &Path, content: &str) -> Result<ManifestRecord> {
    let document: ManifestDocument = toml::from_str(content)?;
    let project = document
        .project
        .ok_or_else(|| ReleaseError::malformed(path, "project"))?;

    Ok(ManifestRecord {
        name: project
            .name
            .ok_or_else(|| ReleaseError::malformed(path, "project.name"))?,
        version: project
            .version
            .ok_or_else(|| ReleaseError::malformed(path, "project.version"))?,
        description: project.description.unwrap_or_default(),
    })
}

/// Replace the first version assignment line, trying each supported syntax
/// in priority order and stopping at the first that matches.
///
/// The search is confined to the `[project]` table when the text has one.
/// Returns `None` when no pattern matches.
pub fn replace_version(content: &str, new_version: &str) -> Option<(String, VersionSyntax)> {
    let (start, end) = project_section(content);
    let section = &content[start..end];
    let replacement = format!("version = \"{}\"", new_version);

    VERSION_PATTERNS.iter().find_map(|(syntax, pattern)| {
        pattern.find(section).map(|found| {
            let mut updated = String::with_capacity(content.len() + replacement.len());
            updated.push_str(&content[..start + found.start()]);
            updated.push_str(&replacement);
            updated.push_str(&content[start + found.end()..]);
            (updated, *syntax)
        })
    })
}

/// Byte range of the `[project]` table body, or the whole text if absent
fn project_section(content: &str) -> (usize, usize) {
    let Some(header) = PROJECT_HEADER_RE.find(content) else {
        return (0, content.len());
    };

    let start = header.end();
    let end = TABLE_HEADER_RE
        .find_at(content, start)
        .map_or(content.len(), |next| next.start());

    (start, end)
}

fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
