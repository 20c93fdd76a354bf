use log::info;

use crate::core_ftpcommand::utils::pop_param;
use crate::session::{RenameState, Session};

/// Handles the RNTO FTP command: second half of a rename. Without a
/// pending RNFR immediately before it, the command is out of sequence.
pub fn handle_rnto_command(session: &mut Session, arg: &str) {
    let source = match std::mem::replace(&mut session.rename, RenameState::None) {
        RenameState::Pending(source) => source,
        RenameState::None => {
            session.send_reply(503, "Bad sequence of commands.");
            return;
        }
    };
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let target = session.vpath_of(&param);
    match session.fs.rename(&source, &target) {
        Ok(()) => {
            info!("renamed {} -> {}", source, target);
            session.send_reply(250, "Rename successful.");
        }
        Err(_) => session.send_reply(550, "Rename failed."),
    }
}
