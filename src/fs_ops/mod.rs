//! Filesystem operations behind the handle types: modularized.

mod copy;
mod create;
mod relocate;
mod remove;
mod unique;

pub(crate) use create::{create_dir, create_file};
#[cfg(unix)]
pub(crate) use create::bind_socket;
pub(crate) use relocate::relocate;
pub(crate) use remove::best_effort;
