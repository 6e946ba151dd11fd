mod entry;
mod manifest;

pub use entry::EntryKind;
pub use manifest::relative_path_of;
