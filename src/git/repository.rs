use crate::error::Result;
use crate::git::RepositoryState;
use git2::{BranchType, ErrorCode, Repository as Git2Repo, Status, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn uncommitted_changes(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .map(|entry| {
                format!(
                    "{} {}",
                    status_code(entry.status()),
                    entry.path().unwrap_or("<non-utf8 path>")
                )
            })
            .collect())
    }

    fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
            Ok(_) => Ok("HEAD".to_string()),
            // No commits yet: HEAD is a symbolic ref to a branch that does not exist
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                let branch = head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .unwrap_or("HEAD");
                Ok(branch.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_ahead_of_upstream(&self) -> Result<bool> {
        let head = match self.repo.head() {
            Ok(head) if head.is_branch() => head,
            _ => return Ok(false),
        };
        let Some(name) = head.shorthand() else {
            return Ok(false);
        };

        let branch = self.repo.find_branch(name, BranchType::Local)?;
        let upstream = match branch.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let (Some(local), Some(remote)) = (branch.get().target(), upstream.get().target()) else {
            return Ok(false);
        };

        let (ahead, _behind) = self.repo.graph_ahead_behind(local, remote)?;
        Ok(ahead > 0)
    }
}

impl super::Repository for Git2Repository {
    fn current_state(&self) -> Result<RepositoryState> {
        Ok(RepositoryState::new(
            self.current_branch()?,
            self.uncommitted_changes()?,
            self.is_ahead_of_upstream()?,
        ))
    }
}

/// Repository discovered from a path at query time.
///
/// Nothing is opened until the first query, so workflows that stop before
/// inspecting the working copy also run outside a repository.
#[derive(Debug, Clone)]
pub struct DiscoveredRepository {
    path: PathBuf,
}

impl DiscoveredRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DiscoveredRepository { path: path.into() }
    }
}

impl super::Repository for DiscoveredRepository {
    fn current_state(&self) -> Result<RepositoryState> {
        Git2Repository::open(&self.path)?.current_state()
    }
}

/// Two-column status code in the style of `git status --porcelain`
fn status_code(status: Status) -> String {
    if status.is_conflicted() {
        return "UU".to_string();
    }
    if status.is_wt_new() && !status.intersects(Status::INDEX_NEW) {
        return "??".to_string();
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };

    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };

    format!("{}{}", index, worktree)
}
