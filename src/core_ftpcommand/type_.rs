use crate::session::Session;

/// Handles the TYPE FTP command. Transfers are always binary; the
/// requested type is acknowledged and ignored.
pub fn handle_type_command(session: &mut Session, _arg: &str) {
    session.send_reply(200, "Type set.");
}
