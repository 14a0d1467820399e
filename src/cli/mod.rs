//! Workflow orchestration for the `bump` and `deploy` subcommands.
//!
//! Kept apart from argument parsing in `main.rs` so the workflows can be
//! driven programmatically, with the repository, process runner and
//! confirmer injected.

pub mod bump;
pub mod deploy;

pub use bump::{read_current_version, run_bump_workflow, BumpOutcome, BumpWorkflowArgs};
pub use deploy::{check_prerequisites, run_deploy_workflow, DeployOutcome, DeployWorkflowArgs};
