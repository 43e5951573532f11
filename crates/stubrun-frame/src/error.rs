/// Errors that can occur while encoding or decoding frames.
///
/// The reference stub clients left most of these conditions unchecked;
/// here every malformed frame is an explicit, fatal error.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffered data does not begin with the `$` start marker.
    #[error("frame does not start with '$' (found 0x{found:02x})")]
    InvalidStart { found: u8 },

    /// The checksum trailer does not match the payload.
    #[error("frame checksum mismatch (computed {expected:02x}, received {found:02x})")]
    ChecksumMismatch { expected: u8, found: u8 },

    /// A non-hex character appeared inside a complete hex pair.
    #[error("invalid hex digit {found:?}")]
    InvalidHex { found: char },

    /// A status frame is too short to carry its two-digit status byte.
    #[error("'{kind}' frame too short for its status byte")]
    TruncatedFrame { kind: char },
}

pub type Result<T> = std::result::Result<T, FrameError>;
