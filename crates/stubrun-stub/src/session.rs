//! One monitored run: the launch handshake and the frame-dispatch loop.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use stubrun_frame::codec::argv_frame;
use stubrun_frame::{
    decode_frame, Event, ACK_STOP_QUERY, CONTINUE, LAUNCH_SUCCESS_QUERY, RECV_CHUNK_SIZE,
};
use tracing::{debug, trace};

use crate::ack::{check_ok, read_ack, send_all};
use crate::cancel::CancelToken;
use crate::error::{Result, StubError};

/// Tunables for one monitored run.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Stream-level read timeout; bounds how quickly cancellation is seen.
    pub read_timeout: Option<Duration>,
    /// Stream-level write timeout.
    pub write_timeout: Option<Duration>,
    /// Deadline for each lock-step acknowledgment exchange.
    pub ack_timeout: Duration,
    /// Connection attempts against the monitoring service.
    pub connect_attempts: u32,
    /// Base pause between connection attempts; grows linearly.
    pub connect_backoff: Duration,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            read_timeout: Some(Duration::from_secs(1)),
            write_timeout: Some(Duration::from_secs(5)),
            ack_timeout: Duration::from_secs(10),
            connect_attempts: 3,
            connect_backoff: Duration::from_secs(1),
        }
    }
}

/// Where the run loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for bytes; the receive buffer holds no partial frame.
    AwaitingData,
    /// A partial frame is buffered; more bytes are needed to complete it.
    FramePending,
    /// Terminal: the process exited with this code.
    Exited(u8),
    /// Terminal: the process was terminated by this signal.
    Signaled(u8),
}

/// How a monitored run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Exited(u8),
    Signaled(u8),
}

impl RunOutcome {
    /// Map to a process exit status: exit codes pass through, signal
    /// terminations use the shell convention of 128 + signal number.
    pub fn exit_status(&self) -> i32 {
        match *self {
            RunOutcome::Exited(code) => i32::from(code),
            RunOutcome::Signaled(signal) => 128 + i32::from(signal),
        }
    }
}

/// One monitored run against a connected debug stub.
///
/// Owns the connection and the receive buffer for its whole lifetime.
/// All I/O is blocking and lock-step; nothing else may touch the stream
/// while the session is alive. Console frames are decoded and written to
/// the `console` sink (the CLI passes stdout; tests pass a `Vec<u8>`).
pub struct Session<T, W> {
    stream: T,
    console: W,
    buf: BytesMut,
    state: RunState,
    config: StubConfig,
    cancel: CancelToken,
}

impl<T: Read + Write, W: Write> Session<T, W> {
    pub fn new(stream: T, console: W, config: StubConfig, cancel: CancelToken) -> Self {
        Self {
            stream,
            console,
            buf: BytesMut::with_capacity(RECV_CHUNK_SIZE),
            state: RunState::AwaitingData,
            config,
            cancel,
        }
    }

    /// Current run loop state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Upload argv, launch the target, and monitor the run to completion.
    pub fn run(&mut self, path: &str, arg_count: usize) -> Result<RunOutcome> {
        self.launch(path, arg_count)?;
        self.monitor()
    }

    /// The launch handshake: argv upload, launch-success query, continue.
    ///
    /// Uploading argv implicitly loads the target; the continue command
    /// starts it running.
    pub fn launch(&mut self, path: &str, arg_count: usize) -> Result<()> {
        debug!(%path, arg_count, "uploading argv");
        let mut frame = BytesMut::new();
        argv_frame(path, arg_count, &mut frame);
        send_all(&mut self.stream, &frame)?;
        check_ok(&mut self.stream, self.config.ack_timeout)
            .map_err(|err| refused("argv upload rejected", err))?;

        debug!("querying launch success");
        send_all(&mut self.stream, LAUNCH_SUCCESS_QUERY)?;
        check_ok(&mut self.stream, self.config.ack_timeout)
            .map_err(|err| refused("launch did not succeed", err))?;

        debug!("resuming target process");
        send_all(&mut self.stream, CONTINUE)?;
        // The stub acks the continue; the reply is discarded best-effort
        // and a missing byte here is deliberately non-fatal.
        let mut ack = [0u8; 1];
        let _ = self.stream.read(&mut ack);

        Ok(())
    }

    /// Pull frames out of the byte stream until the target terminates.
    pub fn monitor(&mut self) -> Result<RunOutcome> {
        loop {
            // Drain every complete frame already buffered before blocking
            // on the transport again.
            while !self.finished() {
                match decode_frame(&mut self.buf)? {
                    Some(payload) => self.dispatch(&payload)?,
                    None => break,
                }
            }

            match self.state {
                RunState::Exited(code) => {
                    debug!(code, "process exited");
                    return Ok(RunOutcome::Exited(code));
                }
                RunState::Signaled(signal) => {
                    debug!(signal, "process terminated by signal");
                    return Ok(RunOutcome::Signaled(signal));
                }
                RunState::AwaitingData | RunState::FramePending => {}
            }

            self.state = if self.buf.is_empty() {
                RunState::AwaitingData
            } else {
                RunState::FramePending
            };
            self.fill()?;
        }
    }

    fn finished(&self) -> bool {
        matches!(self.state, RunState::Exited(_) | RunState::Signaled(_))
    }

    /// One chunked read into the receive buffer.
    ///
    /// A timed-out read is a "no progress, retry" point where cancellation
    /// is observed; EOF means the stub went away mid-run.
    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; RECV_CHUNK_SIZE];
        loop {
            if self.cancel.is_cancelled() {
                return Err(StubError::Cancelled);
            }
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(StubError::ConnectionClosed),
                Ok(n) => {
                    trace!(bytes = n, buffered = self.buf.len() + n, "received");
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::WouldBlock
                        || err.kind() == ErrorKind::TimedOut =>
                {
                    continue
                }
                Err(err) => return Err(stubrun_transport::TransportError::Io(err).into()),
            }
        }
    }

    fn dispatch(&mut self, payload: &Bytes) -> Result<()> {
        match Event::parse(payload)? {
            Event::Exited(code) => self.state = RunState::Exited(code),
            Event::Signaled(signal) => self.state = RunState::Signaled(signal),
            Event::Console(text) => {
                self.console.write_all(&text).map_err(StubError::Console)?;
                self.console.flush().map_err(StubError::Console)?;
                self.acknowledge()?;
            }
            Event::Other(other) => {
                trace!(payload = ?other, "unhandled frame consumed");
                self.acknowledge()?;
            }
        }
        Ok(())
    }

    /// Ack the consumed frame and ask for the next stop status in one
    /// write; the stub must answer with a single `+` or the run is over.
    fn acknowledge(&mut self) -> Result<()> {
        send_all(&mut self.stream, ACK_STOP_QUERY)?;
        read_ack(&mut self.stream, self.config.ack_timeout)
    }
}

fn refused(stage: &'static str, source: StubError) -> StubError {
    match source {
        err @ (StubError::AckMismatch { .. } | StubError::UnexpectedResponse { .. }) => {
            StubError::LaunchRefused {
                stage,
                source: Box::new(err),
            }
        }
        other => other,
    }
}
