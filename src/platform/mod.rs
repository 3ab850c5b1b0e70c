//! Platform-specific helpers.
//! Hides OS differences (Unix/Windows) behind a uniform API so the rename
//! and create code can be written once: cross-device detection, rename
//! preparation, directory fsync, and default modes for created objects.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub(crate) use unix::{fsync_dir, is_cross_device, prepare_replace, set_private_dir_mode};

#[cfg(unix)]
pub(crate) use unix::{socket_path_fits, MAX_SOCKET_PATH_LEN};

#[cfg(not(unix))]
pub(crate) use windows::{fsync_dir, is_cross_device, prepare_replace, set_private_dir_mode};
