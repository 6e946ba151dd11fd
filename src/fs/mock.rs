use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::paths::normalize;
use crate::models::EntryKind;

use super::FileSystem;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
    Symlink(PathBuf),
}

/// In-memory filesystem. Paths are normalised lexically, so a `..` never walks
/// through a symlinked directory the way the kernel would.
#[derive(Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    nodes: HashMap<PathBuf, Node>,
    errors: HashMap<PathBuf, String>,
    calls: Vec<(&'static str, PathBuf)>,
}

impl Inner {
    fn enter(&mut self, op: &'static str, path: &Path) -> io::Result<PathBuf> {
        let path = normalize(path);
        self.calls.push((op, path.clone()));
        match self.errors.get(&path) {
            Some(message) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                message.clone(),
            )),
            None => Ok(path),
        }
    }

    fn insert_with_ancestors(&mut self, path: PathBuf, node: Node) {
        for ancestor in path.ancestors().skip(1) {
            self.nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
        self.nodes.insert(path, node);
    }

    fn parent_is_dir(&self, path: &Path) -> bool {
        match path.parent() {
            None => true,
            Some(parent) if parent.as_os_str().is_empty() || parent == Path::new("/") => true,
            Some(parent) => self.nodes.get(parent) == Some(&Node::Dir),
        }
    }
}

impl MockFileSystem {
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.insert_with_ancestors(normalize(path.as_ref()), Node::File(contents.into()));
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl Into<PathBuf>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.insert_with_ancestors(normalize(path.as_ref()), Node::Symlink(target.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.insert_with_ancestors(normalize(path.as_ref()), Node::Dir);
    }

    pub fn set_error(&self, path: impl AsRef<Path>, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.errors.insert(normalize(path.as_ref()), message.into());
    }

    pub fn node(&self, path: impl AsRef<Path>) -> Option<Node> {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.nodes.get(&normalize(path.as_ref())).cloned()
    }

    pub fn calls(&self) -> Vec<(&'static str, PathBuf)> {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.calls.clone()
    }

    /// Calls of a single kind, in order.
    pub fn calls_of(&self, op: &str) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| *name == op)
            .map(|(_, path)| path)
            .collect()
    }
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let path = inner.enter("stat", path)?;
        Ok(inner.nodes.get(&path).map(|node| match node {
            Node::Dir => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
            Node::Symlink(_) => EntryKind::Symlink,
        }))
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let path = inner.enter("read_link", path)?;
        match inner.nodes.get(&path) {
            Some(Node::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(io::Error::new(io::ErrorKind::InvalidInput, "not a symlink")),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    async fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let dir = inner.enter("create_dir_all", dir)?;
        let mut chain: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
        chain.reverse();
        for ancestor in chain {
            match inner.nodes.get(&ancestor) {
                Some(Node::Dir) => {}
                Some(_) => return Err(io::ErrorKind::NotADirectory.into()),
                None => {
                    inner.nodes.insert(ancestor, Node::Dir);
                }
            }
        }
        Ok(())
    }

    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let link = inner.enter("symlink", link)?;
        if inner.nodes.contains_key(&link) {
            return Err(io::ErrorKind::AlreadyExists.into());
        }
        if !inner.parent_is_dir(&link) {
            return Err(io::ErrorKind::NotFound.into());
        }
        inner.nodes.insert(link, Node::Symlink(target.to_path_buf()));
        Ok(())
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let path = inner.enter("remove", path)?;
        match inner.nodes.get(&path) {
            Some(Node::Dir) => {
                inner.nodes.retain(|key, _| !key.starts_with(&path));
                Ok(())
            }
            Some(_) => {
                inner.nodes.remove(&path);
                Ok(())
            }
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let from = inner.enter("copy_file", from)?;
        let mut to = normalize(to);
        let contents = match inner.nodes.get(&from) {
            Some(Node::File(contents)) => contents.clone(),
            _ => return Err(io::ErrorKind::NotFound.into()),
        };
        // Writes land on the symlink's referent, as they would with open(2).
        if let Some(Node::Symlink(target)) = inner.nodes.get(&to) {
            let base = to.parent().unwrap_or(Path::new("/")).to_path_buf();
            to = normalize(&base.join(target));
        }
        match inner.nodes.get(&to) {
            Some(Node::Dir) => return Err(io::ErrorKind::IsADirectory.into()),
            Some(Node::Symlink(_)) => return Err(io::ErrorKind::Other.into()),
            _ => {}
        }
        if !inner.parent_is_dir(&to) {
            return Err(io::ErrorKind::NotFound.into());
        }
        let len = contents.len() as u64;
        inner.nodes.insert(to, Node::File(contents));
        Ok(len)
    }
}
