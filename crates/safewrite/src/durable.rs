//! Durable write: synchronous-I/O open, write, close.
//!
//! The file is opened so that every write returns only once data and
//! metadata have reached storage (`O_SYNC` on Unix, write-through on
//! Windows). There is no staging: a failed write can leave a truncated or
//! partial file at the target path.

use std::fs::OpenOptions;
use std::path::Path;

use crate::WriteError;
use crate::close::write_close;

/// Creates or truncates `path`, writes `data` synchronously and closes it.
///
/// `mode` is applied when the file is created and is subject to the process
/// umask; an existing file keeps its mode. On success the file holds
/// exactly `data` and that content is durable.
pub fn write_file_to_disk(
    path: impl AsRef<Path>,
    data: &[u8],
    mode: u32,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    tracing::trace!(path = %path.display(), bytes = data.len(), mode, "durable write");

    let file = sync_open_options(mode).open(path)?;
    write_close(file, data)?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "durable write complete");
    Ok(())
}

/// Open options for a truncating, synchronous write.
fn sync_open_options(mode: u32) -> OpenOptions {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode).custom_flags(libc::O_SYNC);
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        use windows::Win32::Storage::FileSystem::FILE_FLAG_WRITE_THROUGH;
        opts.custom_flags(FILE_FLAG_WRITE_THROUGH.0);
    }

    #[cfg(not(unix))]
    let _ = mode;

    opts
}
