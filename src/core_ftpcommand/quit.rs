use log::info;

use crate::session::Session;

/// Handles the QUIT FTP command. The reply encoder closes the data,
/// data-listener and control sockets once the 221 actually went out.
pub fn handle_quit_command(session: &mut Session) {
    info!("Received QUIT command. Closing connection.");
    session.send_reply(221, "Service closing control connection.");
}
