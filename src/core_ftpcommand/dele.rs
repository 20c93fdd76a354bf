use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the DELE FTP command.
///
/// A resolved path ending in `/` names the working directory itself;
/// it is acknowledged but left untouched.
pub fn handle_dele_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);
    if path.len() > 1 && !path.ends_with('/') {
        match session.fs.remove_file(&path) {
            Ok(()) => session.send_reply(250, "Requested file action okay, completed."),
            Err(_) => session.send_reply(550, "Could not delete file."),
        }
    } else {
        session.send_reply(250, "Requested file action okay, completed.");
    }
}
