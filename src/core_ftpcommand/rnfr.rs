use log::info;

use crate::core_ftpcommand::utils::pop_param;
use crate::session::{RenameState, Session};

/// Handles the RNFR FTP command: first half of a rename. The source
/// must exist; it is stashed for the RNTO that follows.
pub fn handle_rnfr_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);
    match session.fs.stat(&path) {
        Ok(_) => {
            info!("rename source: {}", path);
            session.rename = RenameState::Pending(path);
            session.send_reply(350, "Ready for RNTO.");
        }
        Err(_) => session.send_reply(550, "File not found."),
    }
}
