//! Windows implementations of platform helpers.
//!
//! Notes:
//! - MoveFile does not overwrite, so `prepare_replace` clears a same-kind
//!   destination before the rename.
//! - Directory fsync is not generally available via std on Windows; it is a
//!   no-op here.

use std::fs;
use std::io;
use std::path::Path;

use windows_sys::Win32::Foundation::ERROR_NOT_SAME_DEVICE;

/// True when a rename failed because source and destination are on
/// different volumes, the condition that triggers the copy+delete fallback.
pub(crate) fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(ERROR_NOT_SAME_DEVICE as i32)
}

/// Remove an existing file at `dest` so the following rename can land.
/// Missing destination is fine; directories are left for rename to handle.
pub(crate) fn prepare_replace(dest: &Path) -> io::Result<()> {
    match fs::symlink_metadata(dest) {
        Ok(meta) if !meta.is_dir() => fs::remove_file(dest),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// No directory fsync on Windows.
pub(crate) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// No-op on Windows; POSIX-style directory modes are not applicable.
pub(crate) fn set_private_dir_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
