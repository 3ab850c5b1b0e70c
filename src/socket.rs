//! Scratch Unix-domain sockets: a `ScopedPath` around a bound listener.
//! - binding pre-removes a stale object at the chosen name, so the
//!   exclusivity guarantee is weaker than for files and directories.
//! - `serve` runs one background worker that handles connections
//!   serially: read a request (64 KiB cap, end signalled by the client's
//!   write-side shutdown), call the handler, write the response, close.
//!   A client that stalls mid-exchange is cut off after a fixed deadline,
//!   and a handler panic fails only that connection.
//! - dropping the handle raises the worker's stop flag, joins it, then
//!   unlinks the socket path.

use std::env;
use std::io::{self, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::{UnixListener, UnixStream};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::errors::{Error, Result};
use crate::fs_ops;
use crate::handle::ScopedPath;

/// Per-request read cap enforced by the serve worker.
const MAX_REQUEST_LEN: usize = 64 * 1024;

/// Read/write deadline on accepted streams; a client that stalls
/// mid-exchange is disconnected after this long.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// How often the idle worker re-checks the stop flag. Stopping the worker
/// waits at most this long, plus [`CLIENT_TIMEOUT`] for an in-flight
/// connection.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct Worker {
    stop: Arc<AtomicBool>,
    thread: thread::JoinHandle<()>,
}

/// A uniquely named Unix-domain listening socket, unlinked on drop.
#[derive(Debug)]
pub struct TempSocket {
    /// `None` after `release`, or while a serve worker owns the listener.
    listener: Option<UnixListener>,
    scoped: ScopedPath,
    worker: Option<Worker>,
}

impl TempSocket {
    /// Bind a listening socket under the OS scratch root, grouped under
    /// `label` (see [`validate_label`](crate::validate_label)).
    pub fn bind(label: impl AsRef<Path>) -> Result<Self> {
        Self::bind_in(env::temp_dir(), label)
    }

    /// Like [`bind`](Self::bind), but under an explicit root.
    pub fn bind_in(root: impl AsRef<Path>, label: impl AsRef<Path>) -> Result<Self> {
        let (path, listener) = fs_ops::bind_socket(root.as_ref(), label.as_ref())?;
        Ok(Self {
            listener: Some(listener),
            scoped: ScopedPath::acquire(path),
            worker: None,
        })
    }

    /// Adopt an already-bound listener at `path`. Never touches the disk;
    /// the returned handle owns the path and will unlink it on drop.
    pub fn from_parts(listener: UnixListener, path: impl Into<PathBuf>) -> Self {
        Self {
            listener: Some(listener),
            scoped: ScopedPath::acquire(path),
            worker: None,
        }
    }

    /// The owned path, or `None` once vacated.
    pub fn path(&self) -> Option<&Path> {
        self.scoped.path()
    }

    /// The listener, unless released or currently lent to a serve worker.
    pub fn listener(&self) -> Option<&UnixListener> {
        self.listener.as_ref()
    }

    /// Open a client connection to this socket.
    pub fn connect(&self) -> Result<UnixStream> {
        let path = self.scoped.path().ok_or(Error::Vacated)?;
        UnixStream::connect(path).map_err(|source| Error::Io {
            op: "connect",
            path: path.to_path_buf(),
            source,
        })
    }

    /// Start the background accept loop, handing each request to `handler`.
    ///
    /// Connections are handled one at a time. A failure on one connection
    /// is logged and the loop moves on. The worker keeps the listener until
    /// the handle is dropped or released.
    pub fn serve<H>(&mut self, mut handler: H) -> Result<()>
    where
        H: FnMut(Vec<u8>) -> Vec<u8> + Send + 'static,
    {
        let path = self.scoped.path().ok_or(Error::Vacated)?.to_path_buf();
        let wrap = |source: io::Error| Error::Io {
            op: "serve",
            path: path.clone(),
            source,
        };

        if self.worker.is_some() {
            return Err(wrap(io::Error::other("worker already running")));
        }
        let listener = self.listener.take().ok_or(Error::Vacated)?;
        if let Err(e) = listener.set_nonblocking(true) {
            self.listener = Some(listener);
            return Err(wrap(e));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let spawned = thread::Builder::new()
            .name("scratchpath-socket".into())
            .spawn(move || {
                while !flag.load(Ordering::Relaxed) {
                    match listener.accept() {
                        Ok((stream, _)) => {
                            if let Err(e) = handle_connection(stream, &mut handler) {
                                debug!(error = %e, "Socket connection failed");
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                            thread::sleep(POLL_INTERVAL);
                        }
                        Err(e) => {
                            debug!(error = %e, "Socket accept failed");
                            thread::sleep(POLL_INTERVAL);
                        }
                    }
                }
                debug!("Socket worker stopped");
            });

        match spawned {
            Ok(thread) => {
                self.worker = Some(Worker { stop, thread });
                Ok(())
            }
            Err(e) => Err(wrap(e)),
        }
    }

    /// Stop the serve worker, close the listener, and relinquish the path
    /// without unlinking it.
    pub fn release(&mut self) -> Option<PathBuf> {
        self.stop_worker();
        self.listener = None;
        self.scoped.release()
    }

    fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Relaxed);
            let _ = worker.thread.join();
        }
    }
}

impl Drop for TempSocket {
    fn drop(&mut self) {
        // Join the worker before the path is unlinked by the inner handle.
        self.stop_worker();
    }
}

/// One request/response exchange. The client marks end-of-request by
/// shutting down its write side. The connection fails without a response
/// on a request beyond the cap, a peer that stalls past
/// [`CLIENT_TIMEOUT`], or a panicking handler.
fn handle_connection<H>(mut stream: UnixStream, handler: &mut H) -> io::Result<()>
where
    H: FnMut(Vec<u8>) -> Vec<u8>,
{
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(CLIENT_TIMEOUT))?;
    stream.set_write_timeout(Some(CLIENT_TIMEOUT))?;

    let mut request = Vec::new();
    (&mut stream)
        .take(MAX_REQUEST_LEN as u64 + 1)
        .read_to_end(&mut request)?;
    if request.len() > MAX_REQUEST_LEN {
        return Err(io::Error::other("request exceeds the 64 KiB cap"));
    }

    let response = catch_unwind(AssertUnwindSafe(|| handler(request)))
        .map_err(|_| io::Error::other("handler panicked"))?;
    stream.write_all(&response)?;
    stream.shutdown(Shutdown::Write)?;
    Ok(())
}
