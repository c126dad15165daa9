//! # safewrite: durable and atomic file writes
//!
//! Two single-shot, blocking helpers for putting bytes on disk:
//!
//! - [`write_file_to_disk`]: create or truncate a file opened for
//!   synchronous writes (`O_SYNC` on Unix), write the payload and close it.
//!   Durable, but not atomic: a failure can leave a partial file behind.
//! - [`atomic_write`]: write the payload to a temporary file next to the
//!   target, fsync it, then rename it over the target. Readers see either
//!   the old content or the new content, never anything in between.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │  write_file_to_disk  │   │       atomic_write       │
//! │  open(O_SYNC) ──┐    │   │  temp in same dir        │
//! │                 ▼    │   │  write + chmod + fsync   │
//! │          write_close │   │  rename ─► fsync(dir)    │
//! └──────────────────────┘   └──────────────────────────┘
//! ```
//!
//! Neither operation locks: callers must ensure a single writer per path.
//! Errors carry the underlying OS error unchanged (see [`WriteError`]).

mod atomic;
mod close;
mod durable;
mod error;
mod options;

pub use atomic::{atomic_write, atomic_write_with, atomic_write_with_options};
pub use close::{Close, write_close};
pub use durable::write_file_to_disk;
pub use error::WriteError;
pub use options::AtomicWriteOptions;

/// Conventional mode for world-readable files (`rw-r--r--`).
pub const FILE_MODE_DEFAULT: u32 = 0o644;

/// Mode for files only the owner may read or write (`rw-------`).
pub const FILE_MODE_PRIVATE: u32 = 0o600;
