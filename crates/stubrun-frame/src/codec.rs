use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};
use crate::hex;

/// Frame start marker.
pub const FRAME_START: u8 = b'$';
/// Payload terminator; two checksum digits follow it.
pub const FRAME_TERM: u8 = b'#';
/// Positive acknowledgment byte.
pub const ACK: u8 = b'+';
/// Negative acknowledgment byte.
pub const NAK: u8 = b'-';

/// Smallest complete frame: `$` + one payload byte + `#` + two checksum digits.
pub const MIN_FRAME_LEN: usize = 5;

/// Read cap for a single receive call while monitoring a run.
pub const RECV_CHUNK_SIZE: usize = 1000;

/// Success response literal (`OK` behind its fixed checksum).
pub const OK_RESPONSE: &[u8; 6] = b"$OK#9a";
/// Launch-success query sent after the argv upload is acknowledged.
pub const LAUNCH_SUCCESS_QUERY: &[u8] = b"$qLaunchSuccess#a5";
/// Continue/run command.
pub const CONTINUE: &[u8] = b"$c#63";
/// Combined frame-ack + stop-status query sent after consuming a frame.
pub const ACK_STOP_QUERY: &[u8] = b"+$?#3f";

/// Sum of payload bytes modulo 256.
pub fn checksum(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────┬──────────────────────┬──────┬──────────────────┐
/// │ `$`  │ Payload              │ `#`  │ Checksum         │
/// │      │ (first byte = kind)  │      │ (2 hex digits)   │
/// └──────┴──────────────────────┴──────┴──────────────────┘
/// ```
///
/// The checksum covers everything between `$` and `#`.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(payload.len() + 4);
    dst.put_u8(FRAME_START);
    dst.put_slice(payload);
    dst.put_u8(FRAME_TERM);
    let sum = checksum(payload);
    dst.put_u8(hex::digit(sum >> 4));
    dst.put_u8(hex::digit(sum & 0xf));
}

/// Build the argv-upload frame: `$A<hexlen>,<argc>,<hexpath>#<csum>`.
///
/// `hexlen` is the decimal count of hex characters in the encoded path.
/// `arg_count` is the number of trailing parameters the caller accepted on
/// its own command line. The parameters themselves are not encoded; only
/// argv[0] (the executable path) is ever uploaded.
pub fn argv_frame(path: &str, arg_count: usize, dst: &mut BytesMut) {
    let hex_path = hex::encode(path.as_bytes());
    let payload = format!("A{},{},{}", hex_path.len(), arg_count, hex_path);
    encode_frame(payload.as_bytes(), dst);
}

/// Extract one complete frame from the front of the receive buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet;
/// nothing is discarded in that case. On success, consumes exactly the
/// frame's bytes (`$` through the second checksum digit) and returns the
/// payload between `$` and `#`.
///
/// The scan takes the first `#` that already has both checksum digits
/// buffered behind it. The leading byte must be `$` and the checksum must
/// match; either violation is fatal.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Bytes>> {
    if src.len() < MIN_FRAME_LEN {
        return Ok(None); // Need more data
    }

    let mut term = None;
    for idx in 1..src.len() - 2 {
        if src[idx] == FRAME_TERM {
            term = Some(idx);
            break;
        }
    }
    let Some(term) = term else {
        return Ok(None); // Terminator or checksum digits not buffered yet
    };

    if src[0] != FRAME_START {
        return Err(FrameError::InvalidStart { found: src[0] });
    }

    let expected = checksum(&src[1..term]);
    let found = hex::parse_byte(src[term + 1], src[term + 2])?;
    if found != expected {
        return Err(FrameError::ChecksumMismatch { expected, found });
    }

    let frame = src.split_to(term + 3).freeze();
    trace!(frame_len = frame.len(), buffered = src.len(), "frame extracted");
    Ok(Some(frame.slice(1..term)))
}
