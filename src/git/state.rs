use crate::error::{ReleaseError, Result};
use crate::git::{Repository, RepositoryState};
use crate::ui::{self, Confirmer};
use crate::warning::SafetyWarning;
use tracing::{info, warn};

/// Result of a soft safety gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Declined,
}

/// Safety gates over the working copy.
///
/// The bump workflow uses the hard gate ([StateChecker::require_clean]); the
/// deploy workflow uses the soft gate ([StateChecker::warn_if_dirty_or_ahead])
/// which leaves the decision to the operator.
pub struct StateChecker<'a> {
    repo: &'a dyn Repository,
}

impl<'a> StateChecker<'a> {
    pub fn new(repo: &'a dyn Repository) -> Self {
        StateChecker { repo }
    }

    /// Fresh snapshot of the working copy
    pub fn current_state(&self) -> Result<RepositoryState> {
        self.repo.current_state()
    }

    /// Fail with [ReleaseError::DirtyWorkingTree] unless the tree is clean.
    /// There is no override.
    pub fn require_clean(&self) -> Result<RepositoryState> {
        let state = self.current_state()?;

        if !state.is_clean {
            warn!(
                changes = state.uncommitted_changes.len(),
                "refusing to run on a dirty working tree"
            );
            return Err(ReleaseError::DirtyWorkingTree {
                changes: state.uncommitted_changes,
            });
        }

        Ok(state)
    }

    /// Surface uncommitted changes and unpushed commits, asking the operator
    /// whether to continue after each one.
    pub fn warn_if_dirty_or_ahead(&self, confirmer: &dyn Confirmer) -> Result<GateDecision> {
        let state = self.current_state()?;

        if !state.is_clean {
            let warning = SafetyWarning::UncommittedChanges {
                count: state.uncommitted_changes.len(),
            };
            ui::display_safety_warning(&warning);
            ui::display_uncommitted_changes(&state.uncommitted_changes);

            if !confirmer.ask(warning.question())? {
                info!("operator declined to continue with uncommitted changes");
                return Ok(GateDecision::Declined);
            }
        }

        if state.is_ahead_of_remote {
            let warning = SafetyWarning::AheadOfRemote {
                branch: state.current_branch.clone(),
            };
            ui::display_safety_warning(&warning);

            if !confirmer.ask(warning.question())? {
                info!("operator declined to continue with unpushed commits");
                return Ok(GateDecision::Declined);
            }
        }

        Ok(GateDecision::Proceed)
    }
}
