//! Scoped temporary files, directories and local sockets.
//!
//! Every object this crate creates gets a unique, freshly claimed path
//! under a scratch root (the OS temp dir unless told otherwise), grouped
//! by an optional caller label, and is owned by exactly one handle that
//! deletes it on drop. A handle can `release` the object to the caller,
//! or `persist_to` it out of the scratch space: an atomic rename on the
//! same filesystem, copy+delete across filesystems.
//!
//! Keep the library small and ergonomic: one ownership core
//! ([`ScopedPath`]), typed wrappers per object kind ([`TempFile`],
//! [`TempDir`], [`TempSocket`] on Unix), and a typed [`Error`] for
//! everything that can go wrong.

mod dir;
mod errors;
mod file;
mod fs_ops;
mod handle;
mod label;
mod platform;
#[cfg(unix)]
mod socket;

pub use dir::TempDir;
pub use errors::{Error, ResourceKind, Result};
pub use file::TempFile;
pub use handle::ScopedPath;
pub use label::validate_label;
#[cfg(unix)]
pub use socket::TempSocket;
