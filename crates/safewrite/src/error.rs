//! Write error types.

use std::io;
use std::path::PathBuf;

/// Errors from durable and atomic writes.
///
/// OS failures are carried unchanged in [`WriteError::Io`] so callers can
/// match on [`io::ErrorKind`] or the raw OS error code (e.g. `ENOSPC`).
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Underlying OS I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The target path has no file-name component.
    #[error("invalid target path: {path}")]
    InvalidPath { path: PathBuf },

    /// The rename succeeded but the directory holding it could not be
    /// fsynced. The target already has the new content; the replacement
    /// may not survive a crash.
    #[error("replaced target but failed to sync directory {}: {source}", .dir.display())]
    DirSync { dir: PathBuf, source: io::Error },
}

impl WriteError {
    /// Returns the underlying OS error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io(e) | Self::DirSync { source: e, .. } => Some(e),
            Self::InvalidPath { .. } => None,
        }
    }

    /// Returns the error kind, mapping path errors to `InvalidInput`.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io(e) | Self::DirSync { source: e, .. } => e.kind(),
            Self::InvalidPath { .. } => io::ErrorKind::InvalidInput,
        }
    }

    /// Returns true if the target was replaced despite the error.
    pub fn target_replaced(&self) -> bool {
        matches!(self, Self::DirSync { .. })
    }

    /// Returns the raw OS error code, if this wraps one.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().and_then(io::Error::raw_os_error)
    }
}

impl From<WriteError> for io::Error {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Io(e) | WriteError::DirSync { source: e, .. } => e,
            other @ WriteError::InvalidPath { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_is_transparent() {
        let err = WriteError::from(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn raw_os_error_survives_conversion() {
        let err = WriteError::from(io::Error::from_raw_os_error(28));
        assert_eq!(err.raw_os_error(), Some(28));

        let back: io::Error = err.into();
        assert_eq!(back.raw_os_error(), Some(28));
    }

    #[test]
    fn invalid_path_maps_to_invalid_input() {
        let err = WriteError::InvalidPath {
            path: PathBuf::from("/"),
        };
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.io_error().is_none());

        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn dir_sync_keeps_os_error_and_flags_replacement() {
        let err = WriteError::DirSync {
            dir: PathBuf::from("/data"),
            source: io::Error::from_raw_os_error(5),
        };
        assert!(err.target_replaced());
        assert_eq!(err.raw_os_error(), Some(5));
        assert!(err.to_string().starts_with("replaced target but failed to sync directory /data"));

        let back: io::Error = err.into();
        assert_eq!(back.raw_os_error(), Some(5));
    }

    #[test]
    fn other_errors_do_not_claim_replacement() {
        assert!(!WriteError::from(io::Error::from_raw_os_error(28)).target_replaced());
        assert!(
            !WriteError::InvalidPath {
                path: PathBuf::from("/"),
            }
            .target_replaced()
        );
    }
}
