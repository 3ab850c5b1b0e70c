//! Typed error definitions for scratchpath.
//! One variant per failure mode so callers can branch without string
//! matching, plus an accessor for the raw OS error code.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of temporary object an operation was acting on.
/// Carried in creation errors so messages name the object, not the syscall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
    Socket,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::File => f.write_str("file"),
            ResourceKind::Directory => f.write_str("directory"),
            ResourceKind::Socket => f.write_str("socket"),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The label failed validation; nothing was touched on disk.
    #[error("invalid label '{}': {reason}", label.display())]
    InvalidLabel { label: PathBuf, reason: &'static str },

    /// Creating `root/label` (or an ancestor of it) failed.
    #[error("create parent directory '{}': {source}", path.display())]
    CreateParent {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The exclusive-create (or bind) of the object itself failed.
    #[error("create {kind} '{}': {source}", path.display())]
    Create {
        kind: ResourceKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The generated socket path does not fit the OS socket address buffer.
    #[error("socket path '{}' exceeds the {limit}-byte address limit", path.display())]
    SocketPathTooLong { path: PathBuf, limit: usize },

    /// Move rejected: destination is a directory but the source is not.
    #[error("cannot move '{}' onto directory '{}'", src.display(), dest.display())]
    DestinationIsDirectory { src: PathBuf, dest: PathBuf },

    /// Move rejected: source is a directory but the destination is not.
    #[error("cannot move directory '{}' onto non-directory '{}'", src.display(), dest.display())]
    DestinationNotDirectory { src: PathBuf, dest: PathBuf },

    /// Rename or copy+delete failed; ownership stays with the handle.
    #[error("move '{}' -> '{}': {source}", src.display(), dest.display())]
    Move {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The handle no longer owns anything (released or moved to a destination).
    #[error("handle is vacated (released or already moved)")]
    Vacated,

    /// Plain I/O failure from a content helper (read/write/append).
    #[error("{op} '{}': {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Raw OS error code of the underlying failure, if there is one.
    /// Validation and kind-mismatch errors carry none.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::CreateParent { source, .. }
            | Error::Create { source, .. }
            | Error::Move { source, .. }
            | Error::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// True for errors produced before any syscall (bad caller input).
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidLabel { .. })
    }
}
