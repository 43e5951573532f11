use bytes::Bytes;

use crate::error::{FrameError, Result};
use crate::hex;

/// A classified inbound frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `W<xx>`: the monitored process exited normally with this code.
    Exited(u8),
    /// `X<xx>`: the monitored process was terminated by this signal.
    Signaled(u8),
    /// `O<hex>`: console output the monitored process wrote, decoded.
    Console(Vec<u8>),
    /// Any other frame; consumed and acknowledged without further handling.
    Other(Bytes),
}

impl Event {
    /// Classify a frame payload (the bytes between `$` and `#`).
    pub fn parse(payload: &Bytes) -> Result<Event> {
        match payload.first() {
            Some(&b'W') => Ok(Event::Exited(status_byte(payload)?)),
            Some(&b'X') => Ok(Event::Signaled(status_byte(payload)?)),
            Some(&b'O') => {
                // Console text is hex from offset 1 to the end of the
                // payload; a trailing odd character is ignored.
                let (text, _consumed) = hex::decode(&payload[1..])?;
                Ok(Event::Console(text))
            }
            _ => Ok(Event::Other(payload.clone())),
        }
    }
}

fn status_byte(payload: &Bytes) -> Result<u8> {
    if payload.len() < 3 {
        return Err(FrameError::TruncatedFrame {
            kind: payload[0] as char,
        });
    }
    hex::parse_byte(payload[1], payload[2])
}
