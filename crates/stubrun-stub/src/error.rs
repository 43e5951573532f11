use std::time::Duration;

/// Errors that can occur during a monitored run.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    /// Transport-level error; always fatal to the run.
    #[error("transport error: {0}")]
    Transport(#[from] stubrun_transport::TransportError),

    /// A malformed or corrupted frame; fatal, never skipped over.
    #[error("protocol violation: {0}")]
    Frame(#[from] stubrun_frame::FrameError),

    /// The stub answered something other than the `+` acknowledgment.
    #[error("expected ack '+', got 0x{got:02x}")]
    AckMismatch { got: u8 },

    /// The stub answered something other than the expected literal.
    #[error("unexpected stub response {got:?}")]
    UnexpectedResponse { got: String },

    /// A launch handshake step was rejected by the stub.
    #[error("{stage}: {source}")]
    LaunchRefused {
        stage: &'static str,
        source: Box<StubError>,
    },

    /// The stub closed the connection mid-run.
    #[error("connection closed by the stub")]
    ConnectionClosed,

    /// A lock-step exchange did not complete within its deadline.
    #[error("no response from the stub within {0:?}")]
    Timeout(Duration),

    /// The run was cancelled between reads.
    #[error("run cancelled")]
    Cancelled,

    /// Writing decoded console output failed.
    #[error("console write failed: {0}")]
    Console(std::io::Error),

    /// App path resolution failed before any connection was made.
    #[error(transparent)]
    Resolve(#[from] crate::resolver::ResolveError),
}

pub type Result<T> = std::result::Result<T, StubError>;
