use crate::core_ftpcommand::utils::close_child;
use crate::session::Session;

/// Handles the CDUP FTP command: one segment up, clamped at the root.
pub fn handle_cdup_command(session: &mut Session) {
    close_child(&mut session.working_path);
    session.send_reply(250, "Directory successfully changed.");
}
