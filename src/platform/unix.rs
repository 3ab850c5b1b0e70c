//! Unix implementations of platform helpers.

use std::fs::{self, File};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Longest socket path this crate will bind, in bytes.
///
/// `sockaddr_un.sun_path` is 108 bytes on Linux and 104 on macOS/BSD,
/// including the trailing NUL; 103 is the usable floor across the Unixes we
/// target. Binding a longer path would fail with an opaque EINVAL from some
/// libcs, so the length is checked up front and reported as its own error.
pub(crate) const MAX_SOCKET_PATH_LEN: usize = 103;

/// Whether `path` fits in a `sockaddr_un` address buffer on every target Unix.
pub(crate) fn socket_path_fits(path: &Path) -> bool {
    path.as_os_str().as_bytes().len() <= MAX_SOCKET_PATH_LEN
}

/// True when a rename failed because source and destination are on
/// different filesystems (EXDEV), the condition that triggers the
/// copy+delete fallback.
pub(crate) fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

/// Nothing to do before a rename on Unix: rename(2) replaces an existing
/// destination of the same kind atomically.
pub(crate) fn prepare_replace(_dest: &Path) -> io::Result<()> {
    Ok(())
}

/// Fsync a directory so a rename performed inside it survives a crash.
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

/// POSIX chmod 0700 for label directories.
pub(crate) fn set_private_dir_mode(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}
