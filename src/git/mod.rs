//! Git operations
//!
//! Read-only inspection of the working copy goes through the [Repository]
//! trait so the safety gates can be driven by a mock in tests. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [repository::DiscoveredRepository]: opens the repository on every query
//! - [mock::MockRepository]: a fixed state for testing
//!
//! History mutations (add, commit, tag, push) run the `git` binary through a
//! [crate::process::ProcessRunner], see [publish::CommitTagPublisher].

pub mod mock;
pub mod publish;
pub mod repository;
pub mod state;

pub use mock::MockRepository;
pub use publish::{CommitTagPublisher, TagReport};
pub use repository::{DiscoveredRepository, Git2Repository};
pub use state::{GateDecision, StateChecker};

use crate::error::Result;

/// Snapshot of the working copy, derived fresh on every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    /// No staged, unstaged or untracked changes
    pub is_clean: bool,
    /// Porcelain-style status lines (`XY path`), in the order git reports them
    pub uncommitted_changes: Vec<String>,
    /// Local branch has commits its upstream does not
    pub is_ahead_of_remote: bool,
    /// Checked-out branch name, `HEAD` when detached
    pub current_branch: String,
}

impl RepositoryState {
    pub fn new(
        current_branch: impl Into<String>,
        uncommitted_changes: Vec<String>,
        is_ahead_of_remote: bool,
    ) -> Self {
        RepositoryState {
            is_clean: uncommitted_changes.is_empty(),
            uncommitted_changes,
            is_ahead_of_remote,
            current_branch: current_branch.into(),
        }
    }
}

/// Read-only view of a working copy
pub trait Repository {
    /// Query the working copy's cleanliness and upstream sync state.
    ///
    /// Implementations must not cache: every call reflects the repository as
    /// it is at that moment.
    fn current_state(&self) -> Result<RepositoryState>;
}
