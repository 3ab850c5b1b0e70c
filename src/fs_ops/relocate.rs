//! Move-or-copy relocation.
//! Fast path is one atomic rename. When the OS reports the cross-device
//! condition, fall back to remove-destination, copy, delete-source. Any
//! other failure surfaces untouched: the caller keeps ownership of the
//! source and nothing is half-moved.
//!
//! The rename primitive sits behind the `Renamer` seam so the fallback
//! branch is testable without mounting a second filesystem.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{copy, remove};
use crate::errors::{Error, Result};
use crate::platform;

/// The one OS capability the relocation algorithm needs injected.
pub(crate) trait Renamer {
    fn rename(&self, src: &Path, dest: &Path) -> io::Result<()>;
}

/// Production implementation: plain rename(2) / MoveFileEx.
pub(crate) struct OsRenamer;

impl Renamer for OsRenamer {
    fn rename(&self, src: &Path, dest: &Path) -> io::Result<()> {
        fs::rename(src, dest)
    }
}

/// Relocate `src` to `dest` with move-or-copy semantics.
pub(crate) fn relocate(src: &Path, dest: &Path) -> Result<()> {
    relocate_with(&OsRenamer, src, dest)
}

pub(crate) fn relocate_with<R: Renamer>(renamer: &R, src: &Path, dest: &Path) -> Result<()> {
    // The self-move no-op belongs to the handle layer; by the time we are
    // here the two paths differ.
    debug_assert_ne!(src, dest);

    let moving = |source: io::Error| Error::Move {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    };

    let src_meta = fs::symlink_metadata(src).map_err(&moving)?;

    // Kind check against an existing destination; same-kind overwrite is
    // allowed and proceeds to the rename.
    if let Ok(dest_meta) = fs::symlink_metadata(dest) {
        if dest_meta.is_dir() && !src_meta.is_dir() {
            return Err(Error::DestinationIsDirectory {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        }
        if !dest_meta.is_dir() && src_meta.is_dir() {
            return Err(Error::DestinationNotDirectory {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
            });
        }
        platform::prepare_replace(dest).map_err(&moving)?;
    }

    match renamer.rename(src, dest) {
        Ok(()) => {
            // Persist the rename itself (Unix; no-op elsewhere).
            if let Some(parent) = dest.parent() {
                let _ = platform::fsync_dir(parent);
            }
            info!(src = %src.display(), dest = %dest.display(), "Renamed into place atomically");
            Ok(())
        }
        Err(e) if platform::is_cross_device(&e) => {
            warn!(
                src = %src.display(),
                dest = %dest.display(),
                error = %e,
                "Rename crossed filesystems, falling back to copy+delete"
            );
            copy_then_delete(src, dest)
        }
        Err(e) => Err(moving(e)),
    }
}

/// The cross-device branch: clear the destination, copy everything over,
/// then delete the original tree. Each step's failure carries both paths.
fn copy_then_delete(src: &Path, dest: &Path) -> Result<()> {
    let moving = |source: io::Error| Error::Move {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    };

    remove::remove_all(dest).map_err(&moving)?;
    copy::copy_any(src, dest).map_err(&moving)?;
    remove::remove_all(src).map_err(&moving)?;

    debug!(src = %src.display(), dest = %dest.display(), "Copied across filesystems and removed source");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Always reports the platform's cross-device code, forcing the
    /// copy+delete branch on a single filesystem.
    struct CrossDeviceRenamer;

    impl Renamer for CrossDeviceRenamer {
        fn rename(&self, _src: &Path, _dest: &Path) -> io::Result<()> {
            Err(io::Error::from_raw_os_error(cross_device_code()))
        }
    }

    /// Always fails with a non-cross-device error.
    struct DeniedRenamer;

    impl Renamer for DeniedRenamer {
        fn rename(&self, _src: &Path, _dest: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[cfg(unix)]
    fn cross_device_code() -> i32 {
        libc::EXDEV
    }

    #[cfg(windows)]
    fn cross_device_code() -> i32 {
        windows_sys::Win32::Foundation::ERROR_NOT_SAME_DEVICE as i32
    }

    #[test]
    fn rename_path_moves_file() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, b"abc").unwrap();

        relocate(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"abc");
    }

    #[test]
    fn cross_device_fallback_moves_file() {
        let td = tempdir().unwrap();
        let src = td.path().join("src.txt");
        let dest = td.path().join("dst.txt");
        fs::write(&src, b"payload").unwrap();

        relocate_with(&CrossDeviceRenamer, &src, &dest).unwrap();

        assert!(!src.exists(), "source must be deleted after the copy");
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn cross_device_fallback_moves_tree_and_overwrites() {
        let td = tempdir().unwrap();
        let src = td.path().join("tree");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/f.txt"), b"deep").unwrap();

        // Existing same-kind destination with stale content.
        let dest = td.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.txt"), b"old").unwrap();

        relocate_with(&CrossDeviceRenamer, &src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dest.join("sub/f.txt")).unwrap(), b"deep");
        assert!(!dest.join("stale.txt").exists(), "overwrite must clear stale content");
    }

    #[test]
    fn non_cross_device_failure_leaves_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("keep.txt");
        let dest = td.path().join("never.txt");
        fs::write(&src, b"still here").unwrap();

        let err = relocate_with(&DeniedRenamer, &src, &dest).unwrap_err();

        assert!(matches!(err, Error::Move { .. }), "got {err:?}");
        assert_eq!(fs::read(&src).unwrap(), b"still here");
        assert!(!dest.exists());
    }

    #[test]
    fn file_onto_directory_is_rejected() {
        let td = tempdir().unwrap();
        let src = td.path().join("f.txt");
        let dest = td.path().join("d");
        fs::write(&src, b"x").unwrap();
        fs::create_dir(&dest).unwrap();

        let err = relocate(&src, &dest).unwrap_err();

        assert!(matches!(err, Error::DestinationIsDirectory { .. }), "got {err:?}");
        assert!(src.exists(), "rejection must not touch the source");
    }

    #[test]
    fn directory_onto_file_is_rejected() {
        let td = tempdir().unwrap();
        let src = td.path().join("d");
        let dest = td.path().join("f.txt");
        fs::create_dir(&src).unwrap();
        fs::write(&dest, b"occupied").unwrap();

        let err = relocate(&src, &dest).unwrap_err();

        assert!(matches!(err, Error::DestinationNotDirectory { .. }), "got {err:?}");
        assert!(src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"occupied");
    }

    #[test]
    fn same_kind_file_overwrite_succeeds() {
        let td = tempdir().unwrap();
        let src = td.path().join("new.txt");
        let dest = td.path().join("old.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        relocate(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn missing_source_is_a_move_error() {
        let td = tempdir().unwrap();
        let err = relocate(&td.path().join("ghost"), &td.path().join("dst")).unwrap_err();
        match err {
            Error::Move { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }
}
