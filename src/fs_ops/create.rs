//! Atomic creation of uniquely named objects under `root/label`.
//! Two separate steps with separate failure modes: ensure the parent label
//! directory exists, then create the object itself with the kind's
//! exclusive primitive, retrying with a fresh token on name collisions.

use std::fs::{self, File, OpenOptions};
use std::io;
#[cfg(unix)]
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::unique;
use crate::errors::{Error, ResourceKind, Result};
use crate::label::validate_label;
use crate::platform;

/// Collision retries before giving up. Tokens make collisions freak events;
/// the bound keeps a confused filesystem from spinning forever.
const RETRIES: u32 = 16;

/// Ensure `root/label` exists, creating missing ancestors.
/// Reported as `CreateParent` so callers can tell "could not make the label
/// directory" apart from "could not create the object inside it".
fn ensure_label_dir(root: &Path, label: &Path) -> Result<PathBuf> {
    let parent = root.join(label);
    fs::create_dir_all(&parent).map_err(|e| Error::CreateParent {
        path: parent.clone(),
        source: e,
    })?;
    if !label.as_os_str().is_empty() {
        // Label directories default to owner-only under shared roots like
        // /tmp. Chmod on a directory someone else owns fails; that is fine.
        let _ = platform::set_private_dir_mode(&parent);
    }
    Ok(parent)
}

/// Run `attempt` against fresh candidate names until one is created
/// exclusively. Only `AlreadyExists` earns a retry; everything else is the
/// caller's problem immediately.
fn create_with_retries<T>(
    parent: &Path,
    kind: ResourceKind,
    mut attempt: impl FnMut(&Path) -> io::Result<T>,
) -> Result<(PathBuf, T)> {
    let mut last: Option<(PathBuf, io::Error)> = None;

    for _ in 0..RETRIES {
        let candidate = unique::placeholder(parent);
        match attempt(&candidate) {
            Ok(v) => {
                debug!(path = %candidate.display(), %kind, "created");
                return Ok((candidate, v));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last = Some((candidate, e)),
            Err(e) => {
                return Err(Error::Create {
                    kind,
                    path: candidate,
                    source: e,
                });
            }
        }
    }

    // Every attempt collided; surface the last OS error.
    let (path, source) = match last {
        Some(pair) => pair,
        None => (
            parent.to_path_buf(),
            io::Error::new(io::ErrorKind::AlreadyExists, "collision retries exhausted"),
        ),
    };
    Err(Error::Create { kind, path, source })
}

/// Create and open a unique file under `root/label`, read+write,
/// mode 0600 on Unix. The open and the creation are one syscall; there is
/// no window where the path exists without a usable handle.
pub(crate) fn create_file(root: &Path, label: &Path) -> Result<(PathBuf, File)> {
    validate_label(label)?;
    let parent = ensure_label_dir(root, label)?;

    let mut opts = OpenOptions::new();
    opts.read(true).write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    create_with_retries(&parent, ResourceKind::File, |p| opts.open(p))
}

/// Create a unique directory under `root/label`, mode 0700 on Unix.
pub(crate) fn create_dir(root: &Path, label: &Path) -> Result<PathBuf> {
    validate_label(label)?;
    let parent = ensure_label_dir(root, label)?;

    let (path, ()) = create_with_retries(&parent, ResourceKind::Directory, |p| {
        fs::create_dir(p)?;
        let _ = platform::set_private_dir_mode(p);
        Ok(())
    })?;
    Ok(path)
}

/// Bind a Unix-domain socket at a unique path under `root/label`.
///
/// bind(2) has no exclusive-create mode, so a stale object occupying the
/// generated name is removed first. That re-opens a small race window the
/// file and directory kinds do not have; callers relying on exclusivity
/// should prefer those kinds.
#[cfg(unix)]
pub(crate) fn bind_socket(root: &Path, label: &Path) -> Result<(PathBuf, UnixListener)> {
    validate_label(label)?;
    let parent = ensure_label_dir(root, label)?;
    let candidate = unique::placeholder(&parent);

    if !platform::socket_path_fits(&candidate) {
        return Err(Error::SocketPathTooLong {
            path: candidate,
            limit: platform::MAX_SOCKET_PATH_LEN,
        });
    }

    match fs::remove_file(&candidate) {
        Ok(()) => debug!(path = %candidate.display(), "removed stale object at socket path"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Error::Create {
                kind: ResourceKind::Socket,
                path: candidate,
                source: e,
            });
        }
    }

    match UnixListener::bind(&candidate) {
        Ok(listener) => {
            debug!(path = %candidate.display(), "bound socket");
            Ok((candidate, listener))
        }
        Err(e) => Err(Error::Create {
            kind: ResourceKind::Socket,
            path: candidate,
            source: e,
        }),
    }
}
