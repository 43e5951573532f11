use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TransportError};
use crate::stream::StubStream;

/// A stub endpoint: a TCP address or a local Unix socket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `host:port`, typically a tethered-proxy port on localhost.
    Tcp(String),
    /// `unix:/path/to/socket`, a local bridge socket.
    #[cfg(unix)]
    Unix(PathBuf),
}

impl FromStr for Target {
    type Err = TransportError;

    fn from_str(input: &str) -> Result<Self> {
        if let Some(path) = input.strip_prefix("unix:") {
            #[cfg(unix)]
            {
                if path.is_empty() {
                    return Err(TransportError::InvalidTarget(input.to_string()));
                }
                return Ok(Target::Unix(PathBuf::from(path)));
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                return Err(TransportError::InvalidTarget(input.to_string()));
            }
        }

        // host:port, with the port non-empty and numeric
        match input.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Target::Tcp(input.to_string()))
            }
            _ => Err(TransportError::InvalidTarget(input.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Tcp(addr) => write!(f, "{addr}"),
            #[cfg(unix)]
            Target::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// Connect to a stub endpoint (blocking, single attempt).
pub fn connect(target: &Target) -> Result<StubStream> {
    match target {
        Target::Tcp(addr) => crate::tcp::connect(addr),
        #[cfg(unix)]
        Target::Unix(path) => crate::uds::connect(path),
    }
}
