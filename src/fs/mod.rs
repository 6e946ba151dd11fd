mod real;

#[cfg(test)]
mod mock;

pub use real::RealFileSystem;

#[cfg(test)]
pub use mock::{MockFileSystem, Node as MockNode};

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::EntryKind;

/// Filesystem primitives the replicator is built from.
///
/// None of the operations follow a final symlink except `copy_file`, which
/// reads through the source and writes through the destination like `cp`.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Kind of the entry at `path`, or `None` when nothing is there.
    async fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create `dir` and its missing ancestors. An existing directory is success.
    async fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Create `link` pointing at `target`. Fails with `AlreadyExists` if
    /// anything is at `link`.
    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Remove whatever is at `path`; a directory is removed with its contents.
    async fn remove(&self, path: &Path) -> io::Result<()>;

    async fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;
}
