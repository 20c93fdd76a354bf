use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the RMD FTP command.
pub fn handle_rmd_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);
    if path.len() > 1 && !path.ends_with('/') {
        match session.fs.remove_dir(&path) {
            Ok(()) => session.send_reply(250, "Directory removed."),
            Err(_) => session.send_reply(550, "Could not remove directory."),
        }
    } else {
        session.send_reply(250, "Directory removed.");
    }
}
