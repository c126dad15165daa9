//! Write-then-close with error priority.
//!
//! `std::fs::File` discards errors from `close(2)` when dropped. [`Close`]
//! makes the release step explicit so its failure can be observed, and
//! [`write_close`] decides which of the two failures to report.

use std::fs::File;
use std::io::{self, Write};

/// A resource whose release step can fail.
pub trait Close {
    /// Releases the resource, reporting any error from the release itself.
    fn close(self) -> io::Result<()>;
}

impl Close for File {
    #[cfg(unix)]
    fn close(self) -> io::Result<()> {
        use std::os::fd::IntoRawFd;

        nix::unistd::close(self.into_raw_fd()).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

/// Writes all of `data` to `writer`, then closes it unconditionally.
///
/// If both steps fail, the write error is returned: it happened first and
/// is the root cause. A close error is only reported when the write
/// succeeded.
pub fn write_close<W: Write + Close>(mut writer: W, data: &[u8]) -> io::Result<()> {
    let written = writer.write_all(data);
    let closed = writer.close();

    match (written, closed) {
        (Err(write_err), Err(close_err)) => {
            tracing::warn!(
                error = %close_err,
                "close failed after write error, reporting the write error"
            );
            Err(write_err)
        }
        (Err(write_err), Ok(())) => Err(write_err),
        (Ok(()), closed) => closed,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// In-memory sink with injectable write and close failures.
    struct FlakySink {
        buf: Vec<u8>,
        write_err: Option<io::ErrorKind>,
        close_err: Option<io::ErrorKind>,
        closed: Rc<Cell<bool>>,
    }

    impl FlakySink {
        fn new(write_err: Option<io::ErrorKind>, close_err: Option<io::ErrorKind>) -> Self {
            Self {
                buf: Vec::new(),
                write_err,
                close_err,
                closed: Rc::new(Cell::new(false)),
            }
        }
    }

    impl Write for FlakySink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            match self.write_err {
                Some(kind) => Err(io::Error::new(kind, "write failed")),
                None => self.buf.write(data),
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Close for FlakySink {
        fn close(self) -> io::Result<()> {
            self.closed.set(true);
            match self.close_err {
                Some(kind) => Err(io::Error::new(kind, "close failed")),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn success_closes() {
        let sink = FlakySink::new(None, None);
        let closed = Rc::clone(&sink.closed);

        write_close(sink, b"payload").unwrap();
        assert!(closed.get());
    }

    #[test]
    fn write_error_still_closes() {
        let sink = FlakySink::new(Some(io::ErrorKind::StorageFull), None);
        let closed = Rc::clone(&sink.closed);

        let err = write_close(sink, b"payload").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
        assert!(closed.get());
    }

    #[test]
    fn close_error_reported_after_clean_write() {
        let sink = FlakySink::new(None, Some(io::ErrorKind::Interrupted));

        let err = write_close(sink, b"payload").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn write_error_wins_over_close_error() {
        let sink = FlakySink::new(
            Some(io::ErrorKind::StorageFull),
            Some(io::ErrorKind::Interrupted),
        );
        let closed = Rc::clone(&sink.closed);

        let err = write_close(sink, b"payload").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
        assert!(closed.get());
    }

    #[test]
    fn empty_payload_still_closes() {
        // write_all on an empty slice never calls write, so even a failing
        // writer succeeds.
        let sink = FlakySink::new(Some(io::ErrorKind::StorageFull), None);
        let closed = Rc::clone(&sink.closed);

        write_close(sink, b"").unwrap();
        assert!(closed.get());
    }

    #[test]
    fn closes_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("close.dat");
        let file = File::create(&path).unwrap();

        write_close(file, b"closed cleanly").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"closed cleanly");
    }
}
