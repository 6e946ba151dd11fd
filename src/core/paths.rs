use std::path::{Component, Path, PathBuf};

/// Join a manifest path under `root`.
///
/// Root and prefix components of `relative` are dropped so an entry written
/// as `/a/b` still lands at `root/a/b`. The empty path yields `root` itself.
pub fn join_under(root: &Path, relative: &Path) -> PathBuf {
    let mut joined = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {}
            other => joined.push(other),
        }
    }
    joined
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
///
/// `..` at the root of an absolute path stays at the root; leading `..` of a
/// relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Whether `path` stays under `root` once both are normalised.
pub fn is_within(path: &Path, root: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}
