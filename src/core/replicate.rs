use std::collections::HashSet;
use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::paths::{is_within, normalize};
use crate::error::{CloneError, FsOp, Result};
use crate::fs::FileSystem;
use crate::models::EntryKind;

/// Longest relative symlink chain followed from one entry (Linux `MAXSYMLINKS`).
pub const MAX_SYMLINK_HOPS: usize = 40;

/// What one call to [`Replicator::replicate`] produced.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Replicated {
    pub files: usize,
    pub symlinks: usize,
    /// Entries or symlink hops left alone because they resolve outside a root.
    pub refused: usize,
}

impl AddAssign for Replicated {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.symlinks += other.symlinks;
        self.refused += other.refused;
    }
}

/// Reproduces single source entries under the destination root.
pub struct Replicator<'a, F: FileSystem> {
    fs: &'a F,
    source_root: PathBuf,
    dest_root: PathBuf,
}

impl<'a, F: FileSystem> Replicator<'a, F> {
    pub fn new(fs: &'a F, source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            source_root: source_root.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Copy the file or symlink at `source` to `dest`.
    ///
    /// A symlink is recreated with its exact target. When that target is
    /// relative, the entry it names is replicated next, relative to each
    /// link's own directory, until the chain reaches something that is not a
    /// relative symlink. Anything other than a file or symlink is skipped.
    pub async fn replicate(&self, source: &Path, dest: &Path) -> Result<Replicated> {
        let mut tally = Replicated::default();
        let mut source = source.to_path_buf();
        let mut dest = normalize(dest);
        let mut visited = HashSet::new();

        loop {
            if !is_within(&source, &self.source_root) || !is_within(&dest, &self.dest_root) {
                warn!(
                    source = %source.display(),
                    dest = %dest.display(),
                    "refusing entry outside the source or destination root"
                );
                tally.refused += 1;
                return Ok(tally);
            }

            let kind = self
                .fs
                .entry_kind(&source)
                .await
                .map_err(|err| CloneError::io(FsOp::Stat, &source, err))?;

            match kind {
                Some(EntryKind::File) => {
                    if self.crosses_symlink(&dest).await? {
                        tally.refused += 1;
                        return Ok(tally);
                    }
                    self.ensure_parent(&dest).await?;
                    self.copy_file(&source, &dest).await?;
                    debug!(source = %source.display(), dest = %dest.display(), "copied file");
                    tally.files += 1;
                    return Ok(tally);
                }
                Some(EntryKind::Symlink) => {
                    if !visited.insert(normalize(&source)) || visited.len() > MAX_SYMLINK_HOPS {
                        return Err(CloneError::SymlinkCycle {
                            path: source,
                            hops: visited.len(),
                        });
                    }

                    if self.crosses_symlink(&dest).await? {
                        tally.refused += 1;
                        return Ok(tally);
                    }
                    self.ensure_parent(&dest).await?;
                    let target = self
                        .fs
                        .read_link(&source)
                        .await
                        .map_err(|err| CloneError::io(FsOp::ReadLink, &source, err))?;
                    self.force_symlink(&target, &dest).await?;
                    debug!(
                        link = %dest.display(),
                        target = %target.display(),
                        "created symlink"
                    );
                    tally.symlinks += 1;

                    if target.has_root() {
                        return Ok(tally);
                    }
                    source = parent_of(&source).join(&target);
                    dest = normalize(&parent_of(&dest).join(&target));
                }
                Some(EntryKind::Directory) | Some(EntryKind::Other) | None => return Ok(tally),
            }
        }
    }

    /// Whether an existing directory between the destination root and `dest`
    /// is a symlink, which the kernel would follow when writing beneath it.
    /// The final component is not checked: it is replaced, never followed.
    async fn crosses_symlink(&self, dest: &Path) -> Result<bool> {
        let root = normalize(&self.dest_root);
        let Ok(below) = dest.strip_prefix(&root) else {
            return Ok(true);
        };

        let mut parents: Vec<_> = below.components().collect();
        parents.pop();

        let mut current = root;
        for component in parents {
            current.push(component);
            let kind = self
                .fs
                .entry_kind(&current)
                .await
                .map_err(|err| CloneError::io(FsOp::Stat, &current, err))?;
            match kind {
                Some(EntryKind::Symlink) => {
                    warn!(
                        dest = %dest.display(),
                        link = %current.display(),
                        "refusing to write beneath a destination symlink"
                    );
                    return Ok(true);
                }
                None => break,
                Some(_) => {}
            }
        }
        Ok(false)
    }

    async fn ensure_parent(&self, dest: &Path) -> Result<()> {
        match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self
                .fs
                .create_dir_all(parent)
                .await
                .map_err(|err| CloneError::io(FsOp::CreateDir, parent, err)),
            _ => Ok(()),
        }
    }

    /// Point `link` at `target`, replacing anything already at `link`.
    async fn force_symlink(&self, target: &Path, link: &Path) -> Result<()> {
        match self.fs.symlink(target, link).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                self.fs
                    .remove(link)
                    .await
                    .map_err(|err| CloneError::io(FsOp::Remove, link, err))?;
                self.fs
                    .symlink(target, link)
                    .await
                    .map_err(|err| CloneError::io(FsOp::Symlink, link, err))
            }
            Err(err) => Err(CloneError::io(FsOp::Symlink, link, err)),
        }
    }

    async fn copy_file(&self, source: &Path, dest: &Path) -> Result<()> {
        // A stale link at the destination would redirect the write.
        let existing = self
            .fs
            .entry_kind(dest)
            .await
            .map_err(|err| CloneError::io(FsOp::Stat, dest, err))?;
        if existing == Some(EntryKind::Symlink) {
            self.fs
                .remove(dest)
                .await
                .map_err(|err| CloneError::io(FsOp::Remove, dest, err))?;
        }

        self.fs
            .copy_file(source, dest)
            .await
            .map_err(|err| CloneError::io(FsOp::Copy, dest, err))?;
        Ok(())
    }
}

fn parent_of(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}
