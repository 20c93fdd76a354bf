// src/constants.rs

/// Default control connection port.
pub const FTP_CMD_PORT: u16 = 21;
/// Fixed passive-mode data port. Active mode (port 20) is not wired up.
pub const FTP_PASV_PORT: u16 = 2024;

/// Longest command token, including the separating space.
pub const FTP_CMD_SIZE_MAX: usize = 6;
/// Longest accepted path argument.
pub const FTP_PATH_MAX: usize = 512;
/// Receive buffer for one inbound command line.
pub const FTP_CMD_BUFFER_SIZE: usize = FTP_PATH_MAX + FTP_CMD_SIZE_MAX + 1;

/// Default transfer buffer: one buffer's worth of data moves per tick.
pub const FTP_BUFFER_SIZE: usize = 1024;

/// Idle budget for the data channel, in milliseconds.
pub const FTP_DATA_TIMEOUT_MS: u64 = 10_000;
/// Idle budget for the control channel, in seconds.
pub const FTP_CMD_TIMEOUT_SECS: u64 = 300;

/// Directory entries read per listing tick.
pub const FTP_LIST_BATCH_MAX: usize = 8;
/// Listing timestamps older than this switch to the month/day/year form.
pub const SECONDS_180_DAYS: i64 = 15_552_000;

/// Bounded retry window for a single reply or data send.
pub const SEND_RETRY_WINDOW_MS: u64 = 200;
pub const SEND_RETRY_STEP_MS: u64 = 1;
