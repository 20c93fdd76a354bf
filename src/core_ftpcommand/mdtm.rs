use chrono::{DateTime, Local};

use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the MDTM FTP command, reporting the modification time in
/// the YYYYMMDDHHMMSS form.
pub fn handle_mdtm_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);
    match session.fs.stat(&path) {
        Ok(info) => {
            let mtime: DateTime<Local> = info.mtime.into();
            let stamp = mtime.format("%Y%m%d%H%M%S").to_string();
            session.send_reply(213, &stamp);
        }
        Err(_) => session.send_reply(550, "Could not get file time."),
    }
}
