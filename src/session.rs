//! The FTP session: one control connection, one passive data channel,
//! and the state machine that advances both one step per tick.

use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::Config;
use crate::constants::{FTP_CMD_BUFFER_SIZE, FTP_LIST_BATCH_MAX, SEND_RETRY_WINDOW_MS};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{handlers, list, utils};
use crate::core_network::network::{self, RecvStatus};
use crate::core_storage::{DirHandle, FileHandle, Filesystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpState {
    Disabled,
    Start,
    Ready,
    ContinueListing,
    ContinueFileTx,
    ContinueFileRx,
    EndTransfer,
}

impl FtpState {
    /// True for every state a transfer can be in flight in.
    pub fn past_ready(&self) -> bool {
        matches!(
            self,
            FtpState::ContinueListing
                | FtpState::ContinueFileTx
                | FtpState::ContinueFileRx
                | FtpState::EndTransfer
        )
    }
}

/// Data-channel state, tracked independently of the command state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpSubstate {
    Disconnected,
    ListenForData,
    DataConnected,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Login {
    pub user_valid: bool,
    pub pass_valid: bool,
}

/// At most one file or directory is open at a time, and only while a
/// transfer state is active.
pub enum OpenHandle {
    None,
    File(Box<dyn FileHandle>),
    Dir(Box<dyn DirHandle>),
}

impl OpenHandle {
    pub fn is_none(&self) -> bool {
        matches!(self, OpenHandle::None)
    }
}

/// Two-phase rename: RNFR stashes the source, RNTO consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameState {
    None,
    Pending(String),
}

pub struct Session {
    pub config: Arc<Config>,
    pub fs: Box<dyn Filesystem>,

    pub control: Option<TcpStream>,
    pub data: Option<TcpStream>,
    pub listen_control: Option<TcpListener>,
    pub listen_data: Option<TcpListener>,

    pub state: FtpState,
    pub substate: FtpSubstate,
    pub login: Login,
    pub working_path: String,
    pub open_handle: OpenHandle,
    pub rename: RenameState,

    pub control_idle_ms: u64,
    pub data_idle_ms: u64,
    pub transfer_elapsed_ms: u64,
    pub bytes_transferred: u64,

    pub enabled: bool,
    /// Interface address the client reached, reported back in PASV replies.
    pub client_ip: Ipv4Addr,
    /// Name-only output for the listing in flight (NLST vs LIST).
    pub nlist: bool,

    buffer: Vec<u8>,
    cmd_buffer: Vec<u8>,
}

impl Session {
    pub fn new(config: Arc<Config>, fs: Box<dyn Filesystem>) -> Self {
        let buffer_size = config.buffer_size();
        Self {
            config,
            fs,
            control: None,
            data: None,
            listen_control: None,
            listen_data: None,
            state: FtpState::Disabled,
            substate: FtpSubstate::Disconnected,
            login: Login::default(),
            working_path: String::from("/"),
            open_handle: OpenHandle::None,
            rename: RenameState::None,
            control_idle_ms: 0,
            data_idle_ms: 0,
            transfer_elapsed_ms: 0,
            bytes_transferred: 0,
            enabled: false,
            client_ip: Ipv4Addr::UNSPECIFIED,
            nlist: false,
            buffer: vec![0u8; buffer_size],
            cmd_buffer: vec![0u8; FTP_CMD_BUFFER_SIZE],
        }
    }

    /// Resolves a command argument against the working path.
    pub fn vpath_of(&self, arg: &str) -> String {
        utils::join_child(&self.working_path, arg)
    }

    /// Closes every socket and handle and starts all over again.
    pub fn reset(&mut self) {
        warn!("ftp session reset");
        self.listen_control = None;
        self.listen_data = None;
        self.close_cmd_data();
        self.rename = RenameState::None;
        self.state = FtpState::Start;
        self.substate = FtpSubstate::Disconnected;
    }

    fn close_cmd_data(&mut self) {
        self.control = None;
        self.data = None;
        self.open_handle = OpenHandle::None;
    }

    pub fn close_handles(&mut self) {
        self.open_handle = OpenHandle::None;
    }

    /// Sends `<code> <message>\r\n` on the control channel. Codes with
    /// mandated teardown side effects trigger them only after the line
    /// actually went out; a persistent send failure resets the session.
    pub fn send_reply(&mut self, code: u32, message: &str) {
        let line = format!("{} {}\r\n", code, message);
        let sent = match self.control.as_mut() {
            Some(sock) => network::send_all(sock, line.as_bytes(), SEND_RETRY_WINDOW_MS).is_ok(),
            None => false,
        };
        if !sent {
            warn!("error sending command reply");
            self.reset();
            return;
        }
        debug!("reply: {}", line.trim_end());
        match code {
            221 => {
                self.data = None;
                self.listen_data = None;
                self.control = None;
                self.substate = FtpSubstate::Disconnected;
                self.close_handles();
            }
            426 | 451 | 550 => {
                self.data = None;
                self.close_handles();
            }
            _ => {}
        }
    }

    /// Sends transfer payload on the data channel; failure resets the
    /// whole session.
    fn send_over_data(&mut self, payload: &[u8]) {
        let sent = match self.data.as_mut() {
            Some(sock) => network::send_all(sock, payload, SEND_RETRY_WINDOW_MS).is_ok(),
            None => false,
        };
        if !sent {
            warn!("error sending transfer data");
            self.reset();
        }
    }

    /// Advances the session by one step. Never blocks.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.control_idle_ms += elapsed_ms;
        self.data_idle_ms += elapsed_ms;
        self.transfer_elapsed_ms += elapsed_ms;

        match self.state {
            FtpState::Disabled => {
                if self.enabled {
                    self.state = FtpState::Start;
                }
            }
            FtpState::Start => match network::create_listening_socket(self.config.server.listen_port) {
                Ok(listener) => {
                    info!("listening on port {}", self.config.server.listen_port);
                    self.listen_control = Some(listener);
                    self.state = FtpState::Ready;
                }
                // Stay in Start and retry next tick.
                Err(e) => debug!("control listener not ready: {}", e),
            },
            FtpState::Ready => self.tick_ready(),
            FtpState::ContinueListing => self.tick_listing(),
            FtpState::ContinueFileTx => self.tick_file_tx(),
            FtpState::ContinueFileRx => self.tick_file_rx(),
            FtpState::EndTransfer => {
                self.data = None;
            }
        }

        self.tick_substate();

        // The data channel vanished mid-transfer; release whatever was
        // open for it and fall back to Ready.
        if self.data.is_none() && self.state.past_ready() {
            debug!("data socket disconnected");
            self.close_handles();
            self.substate = FtpSubstate::Disconnected;
            self.state = FtpState::Ready;
        }
    }

    fn tick_ready(&mut self) {
        if self.control.is_none() && self.substate == FtpSubstate::Disconnected {
            let accepted = match self.listen_control.as_ref() {
                Some(listener) => network::poll_accept(listener),
                None => Ok(None),
            };
            match accepted {
                Ok(Some((stream, peer))) => {
                    if stream.set_nonblocking(true).is_err() {
                        self.reset();
                        return;
                    }
                    self.client_ip = match stream.local_addr() {
                        Ok(SocketAddr::V4(addr)) => *addr.ip(),
                        _ => Ipv4Addr::LOCALHOST,
                    };
                    self.control = Some(stream);
                    self.login = Login::default();
                    self.control_idle_ms = 0;
                    self.working_path = String::from("/");
                    info!("client connected from {}", peer);
                    self.send_reply(220, "tickftpd ready.");
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("accept error: {}", e);
                    self.reset();
                    return;
                }
            }
        }
        if self.control.is_some() && self.substate != FtpSubstate::ListenForData {
            self.process_command();
        }
    }

    /// Receives and dispatches at most one command.
    fn process_command(&mut self) {
        let status = match self.control.as_mut() {
            Some(sock) => network::recv_nonblocking(sock, &mut self.cmd_buffer),
            None => RecvStatus::Closed,
        };
        match status {
            RecvStatus::Data(len) => {
                let line = String::from_utf8_lossy(&self.cmd_buffer[..len]).into_owned();
                self.control_idle_ms = 0;
                self.dispatch_line(&line);
            }
            RecvStatus::WouldBlock => {
                if self.control_idle_ms > self.config.control_timeout_ms() {
                    warn!("control connection timeout");
                    self.send_reply(221, "Timeout.");
                }
            }
            RecvStatus::Closed => {
                info!("control connection closed by peer");
                self.close_cmd_data();
            }
        }
    }

    fn dispatch_line(&mut self, line: &str) {
        let mut rest = line;
        let cmd = FtpCommand::pop(&mut rest);

        let exempt = matches!(cmd, Some(c) if c.allowed_before_login());
        if !self.login.pass_valid && !exempt {
            self.send_reply(332, "Need account for login.");
            return;
        }
        match cmd {
            Some(cmd) => {
                info!("CMD: {}", cmd.as_str());
                handlers::dispatch(self, cmd, rest);
            }
            None => self.send_reply(502, "Command not implemented."),
        }
    }

    fn tick_listing(&mut self) {
        let mut out = String::new();
        let mut exhausted = false;
        if let OpenHandle::Dir(dir) = &mut self.open_handle {
            let mut count = 0;
            while count < FTP_LIST_BATCH_MAX {
                match dir.next_entry() {
                    Ok(Some(entry)) => {
                        list::format_list_entry(&entry, self.nlist, &mut out);
                        count += 1;
                    }
                    Ok(None) | Err(_) => {
                        exhausted = true;
                        break;
                    }
                }
            }
        } else {
            exhausted = true;
        }
        if !out.is_empty() {
            self.send_over_data(out.as_bytes());
            if self.state == FtpState::Start {
                return; // the send failed and reset the session
            }
        }
        if exhausted {
            self.close_handles();
            self.send_reply(226, "Transfer complete.");
            self.state = FtpState::EndTransfer;
        }
        self.control_idle_ms = 0;
    }

    fn tick_file_tx(&mut self) {
        self.control_idle_ms = 0;
        let capacity = self.buffer.len();
        let read = match &mut self.open_handle {
            OpenHandle::File(file) => file.read(&mut self.buffer),
            _ => Ok(0),
        };
        match read {
            Err(_) => {
                self.close_handles();
                self.send_reply(451, "Requested action aborted.");
                self.state = FtpState::EndTransfer;
            }
            Ok(n) => {
                if n > 0 {
                    let chunk = std::mem::take(&mut self.buffer);
                    self.send_over_data(&chunk[..n]);
                    self.buffer = chunk;
                    if self.state == FtpState::Start {
                        return;
                    }
                    self.bytes_transferred += n as u64;
                    debug!("sent {}, total: {}", n, self.bytes_transferred);
                }
                // A short read is end of file.
                if n < capacity {
                    self.close_handles();
                    self.send_reply(226, "Transfer complete.");
                    self.state = FtpState::EndTransfer;
                    info!(
                        "file sent ({} bytes in {} msec)",
                        self.bytes_transferred, self.transfer_elapsed_ms
                    );
                }
            }
        }
    }

    fn tick_file_rx(&mut self) {
        let status = match self.data.as_mut() {
            Some(sock) => network::recv_nonblocking(sock, &mut self.buffer),
            None => RecvStatus::Closed,
        };
        match status {
            RecvStatus::Data(n) => {
                self.data_idle_ms = 0;
                self.control_idle_ms = 0;
                let chunk = std::mem::take(&mut self.buffer);
                let written = match &mut self.open_handle {
                    OpenHandle::File(file) => file.write_all(&chunk[..n]),
                    _ => Err(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no open file",
                    )),
                };
                self.buffer = chunk;
                match written {
                    Ok(()) => {
                        self.bytes_transferred += n as u64;
                        debug!("received {}, total: {}", n, self.bytes_transferred);
                    }
                    Err(e) => {
                        warn!("error writing to file: {}", e);
                        self.close_handles();
                        self.send_reply(451, "Requested action aborted.");
                        self.state = FtpState::EndTransfer;
                    }
                }
            }
            RecvStatus::WouldBlock => {
                if self.data_idle_ms > self.config.data_timeout_ms() {
                    warn!("receiving to file timeout");
                    self.close_handles();
                    self.send_reply(426, "Connection closed; transfer aborted.");
                    self.state = FtpState::EndTransfer;
                }
            }
            RecvStatus::Closed => {
                self.close_handles();
                self.send_reply(226, "Transfer complete.");
                self.state = FtpState::EndTransfer;
                info!(
                    "file received ({} bytes in {} msec)",
                    self.bytes_transferred, self.transfer_elapsed_ms
                );
            }
        }
    }

    fn tick_substate(&mut self) {
        match self.substate {
            FtpSubstate::Disconnected => {}
            FtpSubstate::ListenForData => {
                let accepted = match self.listen_data.as_ref() {
                    Some(listener) => network::poll_accept(listener),
                    None => Ok(None),
                };
                match accepted {
                    Ok(Some((stream, _))) => {
                        let _ = stream.set_nonblocking(true);
                        self.data = Some(stream);
                        self.data_idle_ms = 0;
                        self.substate = FtpSubstate::DataConnected;
                        info!("data socket connected");
                    }
                    Ok(None) => {
                        if self.data_idle_ms > self.config.data_timeout_ms() {
                            warn!("waiting for data connection timeout");
                            self.data_idle_ms = 0;
                            self.listen_data = None;
                            self.substate = FtpSubstate::Disconnected;
                        }
                    }
                    Err(e) => {
                        warn!("data accept error: {}", e);
                        self.reset();
                    }
                }
            }
            FtpSubstate::DataConnected => {
                // Idle data connection with no transfer in progress.
                if self.state == FtpState::Ready
                    && self.data_idle_ms > self.config.data_timeout_ms()
                {
                    warn!("data connection timeout");
                    self.listen_data = None;
                    self.data = None;
                    self.close_handles();
                    self.substate = FtpSubstate::Disconnected;
                }
            }
        }
    }
}
