use std::net::TcpStream;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::StubStream;

/// Connect to a forwarded stub port (blocking).
pub fn connect(addr: &str) -> Result<StubStream> {
    let stream = TcpStream::connect(addr).map_err(|e| TransportError::Connect {
        target: addr.to_string(),
        source: e,
    })?;

    // The protocol exchanges single-byte acks in lock-step; coalescing them
    // behind Nagle stalls every round trip.
    stream.set_nodelay(true)?;

    debug!(%addr, "connected to stub port");
    Ok(StubStream::from_tcp(stream))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connect_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let handle = std::thread::spawn(move || {
            let (mut server, _) = listener.accept().unwrap();
            let mut buf = [0u8; 5];
            server.read_exact(&mut buf).unwrap();
            assert_eq!(&buf, b"hello");
            server.write_all(b"+").unwrap();
        });

        let mut client = connect(&addr).unwrap();
        client.write_all(b"hello").unwrap();
        let mut ack = [0u8; 1];
        client.read_exact(&mut ack).unwrap();
        assert_eq!(ack[0], b'+');

        handle.join().unwrap();
    }

    #[test]
    fn connect_refused_reports_target() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = connect(&addr).unwrap_err();
        match err {
            TransportError::Connect { target, .. } => assert_eq!(target, addr),
            other => panic!("unexpected error: {other}"),
        }
    }
}
