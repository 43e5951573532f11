use std::io::{Read, Write};

use crate::error::Result;

/// A connected stub stream; implements Read + Write.
///
/// This is the fundamental I/O type returned by transport operations.
/// It wraps either a TCP stream to a forwarded stub port or a Unix
/// domain socket stream to a local bridge.
pub struct StubStream {
    inner: StubStreamInner,
}

enum StubStreamInner {
    Tcp(std::net::TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for StubStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            StubStreamInner::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            StubStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for StubStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            StubStreamInner::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            StubStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            StubStreamInner::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            StubStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl StubStream {
    pub(crate) fn from_tcp(stream: std::net::TcpStream) -> Self {
        Self {
            inner: StubStreamInner::Tcp(stream),
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: StubStreamInner::Unix(stream),
        }
    }

    /// Set read timeout on the underlying stream.
    ///
    /// A timed-out read surfaces as `WouldBlock`/`TimedOut`, which callers
    /// treat as a retry point rather than data loss.
    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            StubStreamInner::Tcp(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            StubStreamInner::Unix(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            StubStreamInner::Tcp(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            StubStreamInner::Unix(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
        }
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            StubStreamInner::Tcp(stream) => Ok(Self::from_tcp(stream.try_clone()?)),
            #[cfg(unix)]
            StubStreamInner::Unix(stream) => Ok(Self::from_unix(stream.try_clone()?)),
        }
    }
}

impl std::fmt::Debug for StubStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            StubStreamInner::Tcp(_) => f.debug_struct("StubStream").field("type", &"tcp").finish(),
            #[cfg(unix)]
            StubStreamInner::Unix(_) => {
                f.debug_struct("StubStream").field("type", &"unix").finish()
            }
        }
    }
}
