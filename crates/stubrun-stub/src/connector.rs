use std::thread;

use stubrun_transport::{StubStream, Target};
use tracing::{debug, info};

use crate::error::Result;
use crate::session::StubConfig;

/// Connect to the monitoring service, retrying with linear backoff.
///
/// Up to `connect_attempts` tries with a linearly growing pause between
/// them (base, 2×base, …); the last error is reported if all attempts
/// fail. Read/write timeouts from the config are applied before the
/// stream is handed to the session.
pub fn connect(target: &Target, config: &StubConfig) -> Result<StubStream> {
    let mut attempt: u32 = 1;
    loop {
        match stubrun_transport::connect(target) {
            Ok(stream) => {
                stream.set_read_timeout(config.read_timeout)?;
                stream.set_write_timeout(config.write_timeout)?;
                info!(%target, attempt, "connected to monitoring service");
                return Ok(stream);
            }
            Err(err) if attempt < config.connect_attempts => {
                debug!(%target, attempt, %err, "connect attempt failed, retrying");
                thread::sleep(config.connect_backoff * attempt);
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
