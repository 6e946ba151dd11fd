pub mod manifest;
pub mod paths;
pub mod progress;
pub mod replicate;
pub mod walk;

pub use manifest::{Manifest, open_manifest};
pub use progress::Progress;
pub use replicate::{MAX_SYMLINK_HOPS, Replicated, Replicator};
pub use walk::{CloneSummary, ManifestWalker};
