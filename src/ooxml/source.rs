/// Input sources and the ownership policy applied when a document closes.
///
/// A document is loaded from a caller-supplied source. Whether closing the
/// document also closes that source is decided once, at construction, by an
/// [`Ownership`] token carried by the [`SourceGuard`]. The guard is a small
/// state machine (`Open -> Closed`); closing twice is a no-op.
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};

/// A readable source that may hold a resource worth closing explicitly.
///
/// Plain in-memory readers need nothing on close and use the default.
/// Sources backed by a handle (sockets, pipes, instrumented wrappers)
/// override [`InputSource::close`].
pub trait InputSource: Read {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl InputSource for File {}

impl<T: AsRef<[u8]>> InputSource for Cursor<T> {}

impl InputSource for &[u8] {}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Who is responsible for closing the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The document closes the source when it closes.
    Owned,
    /// The caller keeps the source; the document never closes it.
    Borrowed,
}

impl Ownership {
    /// Map a "close the source with the document" flag onto a token.
    #[inline]
    pub fn from_close_flag(close_source: bool) -> Self {
        if close_source {
            Ownership::Owned
        } else {
            Ownership::Borrowed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// Wraps an input source and applies its close policy exactly once.
///
/// An owned source is dropped as soon as it is closed, so handles such as
/// [`File`] are released by `close()` rather than when the guard goes away.
pub struct SourceGuard<'s> {
    source: Option<Box<dyn InputSource + 's>>,
    ownership: Ownership,
    state: State,
}

impl<'s> SourceGuard<'s> {
    pub fn new<S: InputSource + 's>(source: S, ownership: Ownership) -> Self {
        Self {
            source: Some(Box::new(source)),
            ownership,
            state: State::Open,
        }
    }

    /// Read the remaining content of the source.
    ///
    /// Only valid while the guard is open.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let source = match (self.state, self.source.as_mut()) {
            (State::Open, Some(source)) => source,
            _ => return Err(io::Error::other("input source already closed")),
        };
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        tracing::debug!(bytes = data.len(), "read input source");
        Ok(data)
    }

    /// Apply the close policy.
    ///
    /// The guard is `Closed` afterwards even if closing the source failed,
    /// so the source is never closed twice.
    pub fn close(&mut self) -> io::Result<()> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;

        match self.ownership {
            Ownership::Owned => {
                tracing::debug!("closing owned input source");
                match self.source.take() {
                    Some(mut source) => source.close(),
                    None => Ok(()),
                }
            },
            Ownership::Borrowed => {
                tracing::debug!("leaving borrowed input source open");
                Ok(())
            },
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    #[inline]
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }
}

impl Drop for SourceGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "failed to close input source");
        }
    }
}

impl fmt::Debug for SourceGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceGuard")
            .field("ownership", &self.ownership)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSource {
        data: Cursor<Vec<u8>>,
        closes: usize,
        fail_close: bool,
    }

    impl Read for CountingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl InputSource for CountingSource {
        fn close(&mut self) -> io::Result<()> {
            self.closes += 1;
            if self.fail_close {
                Err(io::Error::other("close failed"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_from_close_flag() {
        assert_eq!(Ownership::from_close_flag(true), Ownership::Owned);
        assert_eq!(Ownership::from_close_flag(false), Ownership::Borrowed);
    }

    #[test]
    fn test_owned_source_closed_exactly_once() {
        let mut source = CountingSource {
            data: Cursor::new(b"abc".to_vec()),
            ..Default::default()
        };
        {
            let mut guard = SourceGuard::new(&mut source, Ownership::Owned);
            assert_eq!(guard.read_all().unwrap(), b"abc");
            guard.close().unwrap();
            guard.close().unwrap();
            assert!(guard.is_closed());
        }
        assert_eq!(source.closes, 1);
    }

    #[test]
    fn test_borrowed_source_left_open() {
        let mut source = CountingSource::default();
        {
            let mut guard = SourceGuard::new(&mut source, Ownership::Borrowed);
            guard.close().unwrap();
            assert!(guard.is_closed());
        }
        assert_eq!(source.closes, 0);
    }

    #[test]
    fn test_drop_applies_policy() {
        let mut source = CountingSource::default();
        drop(SourceGuard::new(&mut source, Ownership::Owned));
        assert_eq!(source.closes, 1);
    }

    #[test]
    fn test_failed_close_is_not_retried() {
        let mut source = CountingSource {
            fail_close: true,
            ..Default::default()
        };
        {
            let mut guard = SourceGuard::new(&mut source, Ownership::Owned);
            assert!(guard.close().is_err());
            assert!(guard.is_closed());
            assert!(guard.close().is_ok());
        }
        assert_eq!(source.closes, 1);
    }

    struct DropFlag(std::rc::Rc<std::cell::Cell<bool>>);

    impl Read for DropFlag {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl InputSource for DropFlag {}

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn test_owned_source_released_on_close() {
        let dropped = std::rc::Rc::new(std::cell::Cell::new(false));
        let mut guard = SourceGuard::new(DropFlag(dropped.clone()), Ownership::Owned);
        guard.close().unwrap();
        assert!(dropped.get());
        drop(guard);

        let dropped = std::rc::Rc::new(std::cell::Cell::new(false));
        let mut guard = SourceGuard::new(DropFlag(dropped.clone()), Ownership::Borrowed);
        guard.close().unwrap();
        assert!(!dropped.get());
        drop(guard);
        assert!(dropped.get());
    }

    #[test]
    fn test_read_after_close_fails() {
        let mut guard = SourceGuard::new(Cursor::new(vec![1u8, 2, 3]), Ownership::Owned);
        guard.close().unwrap();
        assert!(guard.read_all().is_err());
    }
}
