pub mod artifacts;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod manifest;
pub mod process;
pub mod ui;
pub mod upload;
pub mod warning;

pub use error::{ReleaseError, Result};
