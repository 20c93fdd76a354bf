use log::warn;

use crate::core_ftpcommand::utils::pop_param;
use crate::core_storage::OpenMode;
use crate::session::{FtpState, OpenHandle, Session};

/// Handles the STOR and APPE FTP commands.
///
/// Both receive into an open file one buffer's worth per tick; APPE
/// opens in append mode instead of truncating.
pub fn handle_stor_command(session: &mut Session, arg: &str, append: bool) {
    session.bytes_transferred = 0;
    session.transfer_elapsed_ms = 0;

    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);

    if path.len() > 1 && !path.ends_with('/') {
        let mode = if append { OpenMode::Append } else { OpenMode::Write };
        match session.fs.open(&path, mode) {
            Ok(file) => {
                session.open_handle = OpenHandle::File(file);
                session.state = FtpState::ContinueFileRx;
                session.send_reply(150, "Ok to send data.");
            }
            Err(e) => {
                warn!("{} open failed for {}: {}", if append { "APPE" } else { "STOR" }, path, e);
                session.state = FtpState::EndTransfer;
                session.send_reply(550, "Could not create file.");
            }
        }
    } else {
        session.state = FtpState::EndTransfer;
        session.send_reply(550, "Not a plain file.");
    }
}
