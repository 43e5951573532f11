//! The single-byte acknowledgment discipline and low-level wire helpers.
//!
//! Command frames are confirmed in lock-step: the stub sends `+`, then the
//! six-byte `$OK#9a` literal, and expects a `+` back. Any deviation is a
//! hard failure. No partial credit, no retry at this layer.

use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use stubrun_frame::{ACK, OK_RESPONSE};
use tracing::trace;

use crate::error::{Result, StubError};

/// Read exactly one byte and require the `+` acknowledgment.
pub fn read_ack<T: Read>(stream: &mut T, timeout: Duration) -> Result<()> {
    let mut byte = [0u8; 1];
    read_full(stream, &mut byte, timeout)?;
    if byte[0] != ACK {
        return Err(StubError::AckMismatch { got: byte[0] });
    }
    Ok(())
}

/// Full command acknowledgment: a single `+`, then the `$OK#9a` literal,
/// answered with our own `+`.
pub fn check_ok<T: Read + Write>(stream: &mut T, timeout: Duration) -> Result<()> {
    read_ack(stream, timeout)?;

    let mut buf = [0u8; OK_RESPONSE.len()];
    read_full(stream, &mut buf, timeout)?;
    if &buf != OK_RESPONSE {
        return Err(StubError::UnexpectedResponse {
            got: String::from_utf8_lossy(&buf).into_owned(),
        });
    }

    send_all(stream, &[ACK])
}

/// Write all bytes, retrying short and interrupted writes, then flush.
pub fn send_all<T: Write>(stream: &mut T, bytes: &[u8]) -> Result<()> {
    trace!(len = bytes.len(), "send");
    let mut offset = 0usize;
    while offset < bytes.len() {
        match stream.write(&bytes[offset..]) {
            Ok(0) => return Err(StubError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(stubrun_transport::TransportError::Io(err).into()),
        }
    }
    loop {
        match stream.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(stubrun_transport::TransportError::Io(err).into()),
        }
    }
}

/// Fill `buf` completely, bounded by a deadline.
///
/// Timed-out reads retry until the deadline expires; EOF is a connection
/// loss, never a partial result.
pub(crate) fn read_full<T: Read>(stream: &mut T, buf: &mut [u8], timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let mut filled = 0usize;
    while filled < buf.len() {
        if Instant::now() >= deadline {
            return Err(StubError::Timeout(timeout));
        }
        match stream.read(&mut buf[filled..]) {
            Ok(0) => return Err(StubError::ConnectionClosed),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut => {
                continue
            }
            Err(err) => return Err(stubrun_transport::TransportError::Io(err).into()),
        }
    }
    Ok(())
}
