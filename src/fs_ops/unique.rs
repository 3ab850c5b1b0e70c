//! Unique name generation for created objects.
//! Tokens mix the process id, wall-clock nanoseconds and a process-global
//! counter, rendered at fixed width. Uniqueness is backstopped by the
//! exclusive-create retry loop in `create`, not by this function alone.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fixed-width token: 16 hex digits.
/// The counter guarantees distinct tokens within the process; pid and clock
/// keep two processes generating under the same label apart.
pub(crate) fn unique_token() -> String {
    let pid = u64::from(std::process::id());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

    // Spread consecutive counter values across the whole word before folding
    // in the ambient entropy, so neighbouring tokens differ in every digit.
    let mixed = seq.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ nanos ^ pid.rotate_left(32);
    format!("{mixed:016x}")
}

/// Candidate object name inside the (already validated) parent directory.
/// Pattern: `<parent>/tmp.<token>`.
pub(crate) fn placeholder(parent: &Path) -> PathBuf {
    parent.join(format!("tmp.{}", unique_token()))
}
