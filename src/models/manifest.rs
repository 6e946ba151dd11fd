use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Recover the relative path carried by one raw manifest line.
///
/// Trailing whitespace (including the newline) is removed first, then the
/// single leading marker byte. The marker is opaque and never inspected. A line
/// holding only the marker, or nothing at all, yields the empty path.
pub fn relative_path_of(line: &[u8]) -> &Path {
    let trimmed = line.trim_ascii_end();
    let rest = trimmed.get(1..).unwrap_or_default();
    Path::new(OsStr::from_bytes(rest))
}
