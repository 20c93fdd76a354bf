use log::warn;

use crate::core_ftpcommand::utils::pop_param;
use crate::core_storage::OpenMode;
use crate::session::{FtpState, OpenHandle, Session};

/// Handles the RETR (Retrieve) FTP command.
///
/// Opens the file and hands the session to the per-tick sender; one
/// buffer's worth of data moves per tick from here on. A path that
/// denotes a directory (trailing slash) never opens a handle.
pub fn handle_retr_command(session: &mut Session, arg: &str) {
    session.bytes_transferred = 0;
    session.transfer_elapsed_ms = 0;

    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);

    if path.len() > 1 && !path.ends_with('/') {
        match session.fs.open(&path, OpenMode::Read) {
            Ok(file) => {
                session.open_handle = OpenHandle::File(file);
                session.state = FtpState::ContinueFileTx;
                session.send_reply(150, "Opening BINARY mode data connection.");
            }
            Err(e) => {
                warn!("RETR open failed for {}: {}", path, e);
                session.state = FtpState::EndTransfer;
                session.send_reply(550, "Failed to open file.");
            }
        }
    } else {
        session.state = FtpState::EndTransfer;
        session.send_reply(550, "Not a plain file.");
    }
}
