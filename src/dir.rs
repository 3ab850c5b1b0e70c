//! Scratch directories: a `ScopedPath` around an exclusively created
//! directory. Dropping the handle removes the whole tree, contents
//! included.

use std::env;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::fs_ops;
use crate::handle::ScopedPath;

/// A uniquely named scratch directory, deleted recursively on drop.
#[derive(Debug)]
pub struct TempDir {
    scoped: ScopedPath,
}

impl TempDir {
    /// Create an exclusively owned directory under the OS scratch root,
    /// grouped under `label` (see [`validate_label`](crate::validate_label)).
    pub fn new(label: impl AsRef<Path>) -> Result<Self> {
        Self::new_in(env::temp_dir(), label)
    }

    /// Like [`new`](Self::new), but under an explicit root.
    pub fn new_in(root: impl AsRef<Path>, label: impl AsRef<Path>) -> Result<Self> {
        let path = fs_ops::create_dir(root.as_ref(), label.as_ref())?;
        Ok(Self {
            scoped: ScopedPath::acquire(path),
        })
    }

    /// Adopt an existing directory at `path`. Never touches the disk; the
    /// returned handle owns the path and will delete it on drop.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            scoped: ScopedPath::acquire(path),
        }
    }

    /// The owned path, or `None` once vacated.
    pub fn path(&self) -> Option<&Path> {
        self.scoped.path()
    }

    /// A path inside the directory, with the usual `Path::join` semantics.
    /// `None` once vacated.
    pub fn join(&self, rel: impl AsRef<Path>) -> Option<PathBuf> {
        self.scoped.path().map(|p| p.join(rel))
    }

    /// Relinquish ownership without deleting; see [`ScopedPath::release`].
    pub fn release(&mut self) -> Option<PathBuf> {
        self.scoped.release()
    }

    /// Move the whole tree to `dest` and vacate the handle; see
    /// [`ScopedPath::persist_to`].
    pub fn persist_to(&mut self, dest: impl AsRef<Path>) -> Result<()> {
        self.scoped.persist_to(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn new_in_creates_empty_directory() {
        let td = tempdir().unwrap();
        let d = TempDir::new_in(td.path(), "org.example").unwrap();

        let path = d.path().unwrap();
        assert!(path.is_dir());
        assert_eq!(path.parent(), Some(td.path().join("org.example").as_path()));
        assert_eq!(fs::read_dir(path).unwrap().count(), 0);
    }

    #[test]
    fn join_composes_until_vacated() {
        let td = tempdir().unwrap();
        let mut d = TempDir::new_in(td.path(), "").unwrap();
        let root = d.path().unwrap().to_path_buf();

        assert_eq!(d.join("a/b.txt"), Some(root.join("a/b.txt")));

        let released = d.release().unwrap();
        assert_eq!(d.join("a/b.txt"), None);
        fs::remove_dir_all(released).unwrap();
    }

    #[test]
    fn drop_removes_populated_tree() {
        let td = tempdir().unwrap();
        let d = TempDir::new_in(td.path(), "").unwrap();
        let root = d.path().unwrap().to_path_buf();

        fs::create_dir_all(root.join("deep/deeper")).unwrap();
        fs::write(root.join("deep/deeper/f.txt"), b"x").unwrap();

        drop(d);
        assert!(!root.exists());
    }

    #[test]
    fn persist_moves_tree_and_vacates() {
        let td = tempdir().unwrap();
        let dest = td.path().join("kept");

        let mut d = TempDir::new_in(td.path(), "").unwrap();
        fs::write(d.join("note.txt").unwrap(), b"kept").unwrap();
        d.persist_to(&dest).unwrap();

        assert!(d.path().is_none());
        drop(d);

        assert_eq!(fs::read(dest.join("note.txt")).unwrap(), b"kept");
    }

    #[test]
    fn from_path_adopts_and_deletes_on_drop() {
        let td = tempdir().unwrap();
        let p = td.path().join("adopted");
        fs::create_dir(&p).unwrap();

        drop(TempDir::from_path(&p));
        assert!(!p.exists());
    }
}
