//! Recursive deletion.
//! `remove_all` reports failures to callers that need them (the move
//! fallback); `best_effort` swallows them for drop paths, where cleanup must
//! never propagate an error.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Delete whatever sits at `path`, recursively for directories.
/// A missing path is success: the object this was tracking is already gone.
pub(crate) fn remove_all(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Drop-path deletion: failures are logged and discarded. The temp root is
/// cleaned by the OS/administrator eventually, so a leaked object is a
/// logged nuisance, not an error.
pub(crate) fn best_effort(path: &Path) {
    if let Err(e) = remove_all(path) {
        debug!(path = %path.display(), error = %e, "cleanup failed; leaving object behind");
    }
}
