pub mod config;
pub mod constants;
pub mod core_cli;
pub mod core_error;
pub mod core_ftpcommand;
pub mod core_network;
pub mod core_storage;
pub mod helpers;
pub mod server;
pub mod session;

pub use config::Config;
pub use core_error::FtpError;
pub use server::{FtpServer, RunStatus, ServerStatus};
pub use session::{FtpState, FtpSubstate, Session};
