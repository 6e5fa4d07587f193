//! Per-contributor line statistics for every git repository under a folder.
//!
//! The pipeline is strictly sequential: [`traversal`] locates repositories,
//! [`analyzer`] asks [`vcs`] for authors and their numeric diff-stats, and
//! every git invocation goes through a [`runner::CommandRunner`] that turns
//! failures and timeouts into empty output.

pub mod analyzer;
pub mod cli;
pub mod formatters;
pub mod runner;
pub mod traversal;
pub mod types;
pub mod vcs;
