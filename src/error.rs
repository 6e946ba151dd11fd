use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Filesystem operation that failed, carried by [`CloneError::Io`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FsOp {
    Stat,
    CreateDir,
    ReadLink,
    Symlink,
    Remove,
    Copy,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsOp::Stat => "stat",
            FsOp::CreateDir => "create directory",
            FsOp::ReadLink => "read symlink",
            FsOp::Symlink => "create symlink",
            FsOp::Remove => "remove",
            FsOp::Copy => "copy file",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("cannot read manifest {path}")]
    ManifestUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to {op} {}", path.display())]
    Io {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("symlink cycle at {} after {hops} hops", path.display())]
    SymlinkCycle { path: PathBuf, hops: usize },
    #[error("failed to write progress")]
    Progress(#[source] io::Error),
}

impl CloneError {
    pub(crate) fn io(op: FsOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CloneError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloneError>;
