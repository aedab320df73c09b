//! Sending side of the command socket.

use crate::command::Command;
use log::debug;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;

/// Errors produced while sending a command.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("cannot connect to {path} (is padstat running?): {source}")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `cmd` as one JSON line to the socket at `path`.
///
/// Fire-and-forget: the daemon sends no reply.
pub fn send_command(path: &Path, cmd: Command) -> Result<(), ClientError> {
    let mut stream = UnixStream::connect(path).map_err(|source| ClientError::Connect {
        path: path.display().to_string(),
        source,
    })?;
    let line = serde_json::to_string(&cmd)?;
    debug!("sending {} to {}", line, path.display());
    writeln!(stream, "{}", line)?;
    stream.shutdown(std::net::Shutdown::Write)?;
    Ok(())
}
