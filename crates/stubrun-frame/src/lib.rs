//! Checksummed text framing for the debug-stub wire protocol.
//!
//! Every message on the wire is a frame:
//! - A `$` start marker
//! - A text payload whose first byte selects the frame kind
//! - A `#` terminator followed by two lowercase hex checksum digits
//!
//! Frames are extracted incrementally from a growing receive buffer;
//! read boundaries never align with frame boundaries, and several frames
//! can arrive in a single read.

pub mod codec;
pub mod error;
pub mod event;
pub mod hex;

pub use codec::{
    argv_frame, checksum, decode_frame, encode_frame, ACK, ACK_STOP_QUERY, CONTINUE, FRAME_START,
    FRAME_TERM, LAUNCH_SUCCESS_QUERY, MIN_FRAME_LEN, NAK, OK_RESPONSE, RECV_CHUNK_SIZE,
};
pub use error::{FrameError, Result};
pub use event::Event;
