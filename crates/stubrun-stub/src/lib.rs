//! Launch-and-monitor client for a remote debug stub.
//!
//! This is the orchestration layer: it connects to the stub service,
//! uploads the target's argument vector, launches it, and then drives a
//! lock-step run loop that demultiplexes console output from control
//! frames until the process terminates.
//!
//! The protocol is strictly synchronous: one connection, one logical
//! thread of control, blocking I/O with explicit deadlines and a
//! cancellation token checked between reads.

pub mod ack;
pub mod cancel;
pub mod connector;
pub mod error;
pub mod resolver;
pub mod session;

pub use cancel::CancelToken;
pub use connector::connect;
pub use error::{Result, StubError};
pub use resolver::{AppRecord, AppResolver, Catalog, ResolveError};
pub use session::{RunOutcome, RunState, Session, StubConfig};
