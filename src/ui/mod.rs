//! User interface module - confirmation prompts and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The [Confirmer] decision provider and its interactive and
//!   automatic implementations
//! - `mock` - Scripted answers for tests

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::error::Result;

pub mod formatter;
pub mod mock;

pub use formatter::{
    display_artifacts, display_error, display_install_hint, display_package_info,
    display_safety_warning, display_status, display_success, display_uncommitted_changes,
    display_version_change,
};
pub use mock::ScriptedConfirmer;

/// Decides whether a gated step may proceed.
///
/// Pipelines never read the terminal themselves; they ask a `Confirmer`, so
/// tests and `--yes` runs can answer deterministically.
pub trait Confirmer {
    /// Ask a yes/no question. Only an explicit affirmative returns `true`.
    fn ask(&self, question: &str) -> Result<bool>;
}

/// Prompts on stdout and reads the answer from stdin.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation. Default is "no"
/// if the user presses Enter or stdin is closed.
#[derive(Debug, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn ask(&self, question: &str) -> Result<bool> {
        print!("\n{} (y/N): ", question);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        Ok(is_affirmative(&input))
    }
}

/// Answers every question the same way without prompting
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn ask(&self, question: &str) -> Result<bool> {
        info!(question, answer = self.0, "answered automatically");
        Ok(self.0)
    }
}

/// Whether a typed response counts as "yes"
pub fn is_affirmative(response: &str) -> bool {
    let response = response.trim().to_lowercase();
    response == "y" || response == "yes"
}
