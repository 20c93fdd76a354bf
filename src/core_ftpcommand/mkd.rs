use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the MKD FTP command.
pub fn handle_mkd_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);
    if path.len() > 1 && !path.ends_with('/') {
        match session.fs.create_dir(&path) {
            Ok(()) => session.send_reply(250, "Directory created."),
            Err(_) => session.send_reply(550, "Could not create directory."),
        }
    } else {
        session.send_reply(250, "Directory created.");
    }
}
