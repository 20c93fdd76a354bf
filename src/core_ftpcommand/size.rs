use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the SIZE FTP command.
pub fn handle_size_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let param = pop_param(&mut rest, false, false);
    let path = session.vpath_of(&param);
    match session.fs.stat(&path) {
        Ok(info) => {
            let size = info.size.to_string();
            session.send_reply(213, &size);
        }
        Err(_) => session.send_reply(550, "Could not get file size."),
    }
}
