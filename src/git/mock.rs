use crate::error::Result;
use crate::git::{Repository, RepositoryState};
use std::cell::{Cell, RefCell};

/// Mock repository for testing without an actual working copy
pub struct MockRepository {
    state: RefCell<RepositoryState>,
    queries: Cell<usize>,
}

impl MockRepository {
    /// A clean working copy on `branch`, in sync with its upstream
    pub fn clean(branch: impl Into<String>) -> Self {
        MockRepository {
            state: RefCell::new(RepositoryState::new(branch, Vec::new(), false)),
            queries: Cell::new(0),
        }
    }

    /// Report these porcelain lines as uncommitted changes
    pub fn with_changes<I, S>(self, changes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_changes(changes.into_iter().map(Into::into).collect());
        self
    }

    /// Report the branch as ahead of its upstream
    pub fn ahead(self) -> Self {
        self.state.borrow_mut().is_ahead_of_remote = true;
        self
    }

    /// Replace the reported changes between queries
    pub fn set_changes(&self, changes: Vec<String>) {
        let mut state = self.state.borrow_mut();
        state.is_clean = changes.is_empty();
        state.uncommitted_changes = changes;
    }

    /// Number of times the state has been queried
    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl Repository for MockRepository {
    fn current_state(&self) -> Result<RepositoryState> {
        self.queries.set(self.queries.get() + 1);
        Ok(self.state.borrow().clone())
    }
}
