//! Domain logic - pure release rules independent of git and external tools

pub mod target;
pub mod version;

pub use target::PublishTarget;
pub use version::{BumpKind, BumpRequest, SemanticVersion};
