//! Rebuild a subset of a directory tree from a manifest of relative paths.

pub mod cli;
pub mod core;
pub mod error;
pub mod fs;
pub mod models;

pub use crate::core::{CloneSummary, Manifest, ManifestWalker, Progress, Replicator, open_manifest};
pub use crate::error::{CloneError, FsOp};
