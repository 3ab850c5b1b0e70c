//! Recursive copy, the payload-moving half of the cross-device fallback.
//! - Destination files are created exclusively (never clobbered) and synced
//!   before success is reported; the caller only deletes the source after
//!   every payload is durable.
//! - Directory trees: skeleton first, then file payloads copied in parallel.
//! - Modification times are carried over best-effort.

use filetime::FileTime;
use rayon::prelude::*;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;

const BUF_SIZE: usize = 1024 * 1024; // 1 MiB buffers

/// Copy a file or a whole directory tree to `dest`.
/// `dest` itself must not exist; the fallback removes it beforehand.
pub(crate) fn copy_any(src: &Path, dest: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src)?;
    if meta.is_dir() {
        copy_tree(src, dest)
    } else {
        copy_file(src, dest)
    }
}

/// Streaming copy of a single file with durability sync and mtime carry-over.
fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    let src_f = File::open(src)?;
    let src_meta = src_f.metadata()?;

    let dest_f = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dest_f);
    io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;

    let mtime = FileTime::from_last_modification_time(&src_meta);
    let _ = filetime::set_file_mtime(dest, mtime);
    Ok(())
}

/// Copy a directory tree: replicate the directory skeleton serially, then
/// copy file payloads in parallel. Non-regular entries (sockets, symlinks)
/// are skipped; recreating them at the destination is not supported.
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;

    WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
        .try_for_each(|d| -> io::Result<()> {
            if let Ok(rel) = d.path().strip_prefix(src) {
                fs::create_dir_all(dest.join(rel))?;
            }
            Ok(())
        })?;

    let files: Vec<_> = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    files.par_iter().try_for_each(|path| -> io::Result<()> {
        let rel = path.strip_prefix(src).map_err(io::Error::other)?;
        let dst = dest.join(rel);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        copy_file(path, &dst)
    })
}
