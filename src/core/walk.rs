use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::core::manifest::Manifest;
use crate::core::paths::join_under;
use crate::core::progress::Progress;
use crate::core::replicate::{Replicated, Replicator};
use crate::error::{CloneError, Result};
use crate::fs::FileSystem;
use crate::models::relative_path_of;

/// Totals for one pass over a manifest.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CloneSummary {
    pub lines: usize,
    pub bytes_read: u64,
    pub replicated: Replicated,
}

/// Replays a manifest against a source root, rebuilding each entry under the
/// destination root and reporting progress as it goes.
pub struct ManifestWalker<'a, F: FileSystem, W: Write> {
    replicator: Replicator<'a, F>,
    source_root: PathBuf,
    dest_root: PathBuf,
    progress: Progress<W>,
}

impl<'a, F: FileSystem, W: Write> ManifestWalker<'a, F, W> {
    pub fn new(fs: &'a F, source_root: &Path, dest_root: &Path, progress: Progress<W>) -> Self {
        Self {
            replicator: Replicator::new(fs, source_root, dest_root),
            source_root: source_root.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            progress,
        }
    }

    /// Process every line of `manifest` in order.
    ///
    /// The first error aborts the run; entries already written stay in place.
    pub async fn run<R: AsyncBufRead + Unpin>(
        &mut self,
        mut manifest: Manifest<R>,
    ) -> Result<CloneSummary> {
        let total = manifest.total_size;
        debug!(manifest = %manifest.name, total = ?total, "reading manifest");
        let mut summary = CloneSummary::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = manifest
                .reader
                .read_until(b'\n', &mut line)
                .await
                .map_err(|source| CloneError::ManifestUnreadable {
                    path: manifest.name.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            summary.bytes_read += read as u64;

            let relative = relative_path_of(&line);
            let source = join_under(&self.source_root, relative);
            let dest = join_under(&self.dest_root, relative);
            debug!(path = %relative.display(), "replicating manifest entry");

            summary.replicated += self.replicator.replicate(&source, &dest).await?;
            summary.lines += 1;

            self.progress
                .tick(summary.lines, summary.bytes_read, total)
                .map_err(CloneError::Progress)?;
        }

        self.progress
            .finish(summary.lines)
            .map_err(CloneError::Progress)?;

        info!(
            lines = summary.lines,
            files = summary.replicated.files,
            symlinks = summary.replicated.symlinks,
            refused = summary.replicated.refused,
            "manifest replayed"
        );
        Ok(summary)
    }

    pub fn into_progress(self) -> Progress<W> {
        self.progress
    }
}
