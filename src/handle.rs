//! The owning path handle every typed wrapper builds on.
//! - owns at most one on-disk object; `Drop` deletes it recursively,
//!   swallowing failures (cleanup is best-effort by design of the OS
//!   temp root).
//! - ownership moves with the value; reassigning over a live handle drops
//!   (and so deletes) the previous object first.
//! - `release` hands the path back to the caller, `persist_to` relocates
//!   the object out of the scratch space; both leave the handle vacated.
//! - deliberately neither `Clone` nor `Copy`: two handles must never both
//!   claim the same path.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::fs_ops;

/// Owns a filesystem path and deletes whatever lives there when dropped.
#[derive(Debug)]
pub struct ScopedPath {
    /// `None` once vacated by `release` or a successful `persist_to`.
    path: Option<PathBuf>,
}

impl ScopedPath {
    /// Take ownership of an already-created object. Never touches the disk.
    pub fn acquire(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The owned path, or `None` once vacated.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Relinquish ownership without deleting. Returns the path the caller
    /// is now responsible for, or `None` when already vacated.
    pub fn release(&mut self) -> Option<PathBuf> {
        self.path.take()
    }

    /// Move the owned object to `dest` and vacate the handle.
    ///
    /// Uses an atomic rename when source and destination share a
    /// filesystem, and a recursive copy followed by source deletion when
    /// they do not. An existing same-kind destination is replaced. On any
    /// failure the handle keeps ownership and the object stays where it
    /// was.
    ///
    /// Moving to the exact current path is a no-op that keeps ownership.
    pub fn persist_to(&mut self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        let src = self.path.as_deref().ok_or(Error::Vacated)?;
        if src == dest {
            return Ok(());
        }
        fs_ops::relocate(src, dest)?;
        self.path = None;
        Ok(())
    }
}

impl Drop for ScopedPath {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            fs_ops::best_effort(&path);
        }
    }
}
