use log::info;

use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the USER FTP command.
///
/// The username is checked against the configured credentials; the
/// reply is 331 either way so the client cannot probe for valid names.
pub fn handle_user_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let name = pop_param(&mut rest, true, true);
    session.login.user_valid = name == session.config.server.ftp_user;
    info!("USER {} ({})", name, if session.login.user_valid { "known" } else { "unknown" });
    session.send_reply(331, "User name okay, need password.");
}
