use std::io;

use thiserror::Error;

/// Failures the server surfaces to its caller. Everything that happens
/// inside a tick is handled locally and converted to a numeric reply on
/// the control channel instead.
#[derive(Error, Debug)]
pub enum FtpError {
    #[error("mount point is not a directory: {0}")]
    MountPoint(String),

    #[error("failed to create listening socket on port {port}: {source}")]
    Listen { port: u16, source: io::Error },

    #[error("send timed out after {0} ms")]
    SendTimeout(u64),

    #[error("socket error: {0}")]
    Socket(#[from] io::Error),
}
