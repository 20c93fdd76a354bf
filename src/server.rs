//! The server driver: owns the session, its lifecycle, and the public
//! polling contract. Callers invoke `run` once per scheduler tick with
//! the elapsed time since the previous call; the driver never blocks.

use std::path::Path;
use std::sync::Arc;

use log::warn;

use crate::config::Config;
use crate::core_error::FtpError;
use crate::core_storage::{Filesystem, MountFs};
use crate::session::{FtpState, FtpSubstate, Session};

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Keep ticking.
    Continue,
    /// The server was terminated; reconstruct it to restart.
    Stopped,
}

/// Composite introspection value: the distinguished `Connected` when a
/// control client is attached and the session is otherwise idle, the
/// raw state pair everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Connected,
    Idle {
        state: FtpState,
        substate: FtpSubstate,
    },
}

pub struct FtpServer {
    session: Session,
    stopped: bool,
}

impl FtpServer {
    /// Builds a disabled server over the configured mount point.
    /// Listening sockets are not created here — that is deferred to the
    /// first `run` tick after `enable`.
    pub fn new(config: Config) -> Result<Self, FtpError> {
        let mount = config.server.mount_point.clone();
        if !Path::new(&mount).is_dir() {
            return Err(FtpError::MountPoint(mount));
        }
        let fs = Box::new(MountFs::new(&mount));
        Ok(Self::with_filesystem(config, fs))
    }

    /// Same as `new` but over a caller-supplied filesystem.
    pub fn with_filesystem(config: Config, fs: Box<dyn Filesystem>) -> Self {
        let config = Arc::new(config);
        Self {
            session: Session::new(config, fs),
            stopped: false,
        }
    }

    /// Arms the session; the control listener appears on the next tick.
    pub fn enable(&mut self) -> bool {
        if self.session.state == FtpState::Disabled {
            self.session.enabled = true;
            return true;
        }
        false
    }

    pub fn is_enabled(&self) -> bool {
        self.session.enabled
    }

    /// Resets and disarms a ready session.
    pub fn disable(&mut self) -> bool {
        if self.session.state == FtpState::Ready {
            self.session.reset();
            self.session.enabled = false;
            self.session.state = FtpState::Disabled;
            return true;
        }
        false
    }

    /// Force-closes every socket and handle and re-listens.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Permanently stops the server. Subsequent `run` calls return
    /// `Stopped`; a full reconstruction is required to restart.
    pub fn terminate(&mut self) -> bool {
        if self.session.state == FtpState::Ready {
            warn!("ftp server terminating");
            self.stopped = true;
            self.session.reset();
            return true;
        }
        false
    }

    pub fn stop_requested(&self) -> bool {
        self.stopped
    }

    /// Advances the session state machine by one step. Must be called
    /// repeatedly for the server to make progress; performs no blocking
    /// waits.
    pub fn run(&mut self, elapsed_ms: u64) -> RunStatus {
        if self.stopped {
            return RunStatus::Stopped;
        }
        self.session.advance(elapsed_ms);
        RunStatus::Continue
    }

    pub fn status(&self) -> ServerStatus {
        if self.session.state == FtpState::Ready && self.session.control.is_some() {
            ServerStatus::Connected
        } else {
            ServerStatus::Idle {
                state: self.session.state,
                substate: self.session.substate,
            }
        }
    }

    /// Read-only view of the session, mainly for tests and status dumps.
    pub fn session(&self) -> &Session {
        &self.session
    }
}
