use std::fmt;

/// Non-fatal conditions surfaced by the soft safety gates of the deploy
/// workflow. Each one is shown to the operator before asking whether to go on.
#[derive(Debug, Clone, PartialEq)]
pub enum SafetyWarning {
    /// The working tree has uncommitted changes
    UncommittedChanges { count: usize },
    /// The local branch has commits its upstream does not
    AheadOfRemote { branch: String },
    /// Staging is being skipped and the upload goes straight to production
    ProductionOnlyUpload,
    /// Staging upload finished and the next step publishes to production
    ProductionUpload,
}

impl SafetyWarning {
    /// Question put to the operator after this warning is displayed
    pub fn question(&self) -> &'static str {
        match self {
            SafetyWarning::UncommittedChanges { .. } => "Continue anyway?",
            SafetyWarning::AheadOfRemote { .. } => "Continue without pushing?",
            SafetyWarning::ProductionOnlyUpload => "Are you sure?",
            SafetyWarning::ProductionUpload => "Upload to production PyPI?",
        }
    }
}

impl fmt::Display for SafetyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyWarning::UncommittedChanges { count } => {
                write!(
                    f,
                    "Git working directory has {} uncommitted change(s)",
                    count
                )
            }
            SafetyWarning::AheadOfRemote { branch } => {
                write!(f, "Local branch '{}' is ahead of remote", branch)
            }
            SafetyWarning::ProductionOnlyUpload => {
                write!(f, "Uploading directly to the production repository!")
            }
            SafetyWarning::ProductionUpload => {
                write!(f, "Staging upload complete; next step publishes to production")
            }
        }
    }
}
