//! Atomic write: temp file in the target's directory, then rename.
//!
//! The temp file lives next to the target so the final rename stays on one
//! filesystem, where it is atomic. Every error path drops the
//! [`NamedTempFile`], which unlinks it, so a failed call leaves the target
//! untouched and no temp file behind. This includes a failed rename.
//!
//! The one exception is the directory fsync that follows a successful
//! rename: if it fails, the target already holds the new content and the
//! call returns [`WriteError::DirSync`].
//!
//! [`NamedTempFile`]: tempfile::NamedTempFile

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::{AtomicWriteOptions, WriteError};

/// Random characters in a temp-file name.
const TEMP_RAND_BYTES: usize = 6;

/// Atomically replaces the content of `path` with `data`.
///
/// The resulting file has exactly `mode` (the umask does not apply). On
/// failure the target keeps its previous content, or stays absent, except
/// for [`WriteError::DirSync`]: the rename has happened but may not yet be
/// durable.
pub fn atomic_write(path: impl AsRef<Path>, data: &[u8], mode: u32) -> Result<(), WriteError> {
    atomic_write_with_options(path, data, mode, &AtomicWriteOptions::default())
}

/// [`atomic_write`] with explicit [`AtomicWriteOptions`].
pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    data: &[u8],
    mode: u32,
    options: &AtomicWriteOptions,
) -> Result<(), WriteError> {
    atomic_write_with(path, mode, options, |file| file.write_all(data))
}

/// Atomically replaces `path` with whatever `write` produces.
///
/// `write` receives the open temp file. If it returns an error the temp
/// file is removed, the target is left alone and that error is returned.
/// A [`WriteError::DirSync`] means the target was replaced but the rename
/// may not survive a crash.
pub fn atomic_write_with<F>(
    path: impl AsRef<Path>,
    mode: u32,
    options: &AtomicWriteOptions,
    write: F,
) -> Result<(), WriteError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    let (dir, file_name) = split_target(path)?;
    tracing::trace!(path = %path.display(), mode, "atomic write");

    let prefix = options.temp_prefix_for(file_name);
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(&options.temp_suffix)
        .rand_bytes(TEMP_RAND_BYTES)
        .make_in(dir, open_temp)?;

    write(tmp.as_file_mut())?;
    tmp.as_file_mut().flush()?;
    set_mode(tmp.as_file(), mode)?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|err| {
        tracing::debug!(
            path = %path.display(),
            temp = %err.file.path().display(),
            error = %err.error,
            "rename failed, removing temp file"
        );
        // Dropping `err.file` unlinks the temp file.
        err.error
    })?;

    if options.sync_dir {
        sync_dir(dir).map_err(|source| WriteError::DirSync {
            dir: dir.to_path_buf(),
            source,
        })?;
    }

    tracing::debug!(path = %path.display(), "atomic write complete");
    Ok(())
}

/// Splits a target into the directory holding it and its file name.
///
/// A bare file name resolves to the current directory.
fn split_target(path: &Path) -> Result<(&Path, &OsStr), WriteError> {
    let file_name = path.file_name().ok_or_else(|| WriteError::InvalidPath {
        path: path.to_path_buf(),
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, file_name))
}

/// Creates a fresh temp file, owner-only until [`set_mode`] runs.
///
/// Errors come back exactly as the OS reported them; `tempfile_in` would
/// wrap them with the path and lose the raw OS code.
fn open_temp(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.read(true).write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    opts.open(path)
}

#[cfg(unix)]
fn set_mode(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Makes a completed rename in `dir` durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
