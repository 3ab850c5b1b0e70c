//! Scratch files: a `ScopedPath` plus the open native handle.
//! - created exclusively (the open and the name claim are one syscall).
//! - whole-content `write`/`append`/`read` conveniences, with `io::Read`,
//!   `io::Write` and `io::Seek` forwarded to the native handle for
//!   streaming use.
//! - `persist_to` closes the native handle first on Windows, where an open
//!   file cannot be renamed; a self-move keeps it open and usable.

use std::env;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::fs_ops;
use crate::handle::ScopedPath;

/// A uniquely named scratch file, deleted on drop.
#[derive(Debug)]
pub struct TempFile {
    /// Closed (`None`) after `release`, or once ownership moved elsewhere.
    file: Option<File>,
    scoped: ScopedPath,
}

impl TempFile {
    /// Create an exclusively owned file under the OS scratch root,
    /// grouped under `label` (see [`validate_label`](crate::validate_label)).
    pub fn new(label: impl AsRef<Path>) -> Result<Self> {
        Self::new_in(env::temp_dir(), label)
    }

    /// Like [`new`](Self::new), but under an explicit root.
    pub fn new_in(root: impl AsRef<Path>, label: impl AsRef<Path>) -> Result<Self> {
        let (path, file) = fs_ops::create_file(root.as_ref(), label.as_ref())?;
        Ok(Self {
            file: Some(file),
            scoped: ScopedPath::acquire(path),
        })
    }

    /// Adopt an already-open file at `path`. Never touches the disk; the
    /// returned handle owns the path and will delete it on drop.
    pub fn from_parts(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file),
            scoped: ScopedPath::acquire(path),
        }
    }

    /// The owned path, or `None` once vacated.
    pub fn path(&self) -> Option<&Path> {
        self.scoped.path()
    }

    /// The native handle, while one is open.
    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    pub fn file_mut(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }

    fn parts(&mut self) -> Result<(&mut File, &Path)> {
        match (self.file.as_mut(), self.scoped.path()) {
            (Some(file), Some(path)) => Ok((file, path)),
            _ => Err(Error::Vacated),
        }
    }

    /// Replace the file's contents with `bytes`.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let (file, path) = self.parts()?;
        let wrap = |source: io::Error| Error::Io {
            op: "write",
            path: path.to_path_buf(),
            source,
        };
        file.rewind().map_err(&wrap)?;
        file.set_len(0).map_err(&wrap)?;
        file.write_all(bytes.as_ref()).map_err(&wrap)?;
        Ok(())
    }

    /// Append `bytes` at the end of the file.
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let (file, path) = self.parts()?;
        let wrap = |source: io::Error| Error::Io {
            op: "append",
            path: path.to_path_buf(),
            source,
        };
        file.seek(SeekFrom::End(0)).map_err(&wrap)?;
        file.write_all(bytes.as_ref()).map_err(&wrap)?;
        Ok(())
    }

    /// The file's full contents.
    pub fn read(&mut self) -> Result<Vec<u8>> {
        let (file, path) = self.parts()?;
        let wrap = |source: io::Error| Error::Io {
            op: "read",
            path: path.to_path_buf(),
            source,
        };
        file.rewind().map_err(&wrap)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(&wrap)?;
        Ok(buf)
    }

    /// Close the native handle and relinquish the path without deleting.
    pub fn release(&mut self) -> Option<PathBuf> {
        self.file = None;
        self.scoped.release()
    }

    /// Move the file to `dest` and vacate the handle; see
    /// [`ScopedPath::persist_to`]. A self-move keeps the handle owning and
    /// the native handle open.
    pub fn persist_to(&mut self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();

        if let Some(file) = self.file.as_mut() {
            let path = self.scoped.path().unwrap_or(dest).to_path_buf();
            file.flush()
                .map_err(|source| Error::Io { op: "flush", path, source })?;
        }

        #[cfg(windows)]
        {
            // An open file cannot be renamed here; close unless this is the
            // self-move no-op.
            let is_self = self.scoped.path().is_some_and(|p| p == dest);
            if !is_self {
                self.file = None;
            }
        }

        let result = self.scoped.persist_to(dest);
        match &result {
            Ok(()) => {
                if self.scoped.path().is_none() {
                    // Ownership transferred; the handle has no file to hold.
                    self.file = None;
                }
            }
            Err(_) => {
                #[cfg(windows)]
                if self.file.is_none() {
                    // Best-effort reopen so the still-owning handle stays
                    // usable after a failed move.
                    if let Some(p) = self.scoped.path() {
                        self.file = File::options().read(true).write(true).open(p).ok();
                    }
                }
            }
        }
        result
    }
}

fn no_open_handle() -> io::Error {
    io::Error::other("no open file handle")
}

impl io::Read for TempFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.read(buf),
            None => Err(no_open_handle()),
        }
    }
}

impl io::Write for TempFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(no_open_handle()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Err(no_open_handle()),
        }
    }
}

impl io::Seek for TempFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.file.as_mut() {
            Some(file) => file.seek(pos),
            None => Err(no_open_handle()),
        }
    }
}
