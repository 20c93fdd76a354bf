use log::{info, warn};

use crate::core_ftpcommand::utils::pop_param;
use crate::session::Session;

/// Handles the PASS FTP command.
///
/// The password only counts when the preceding USER matched, so a
/// valid password can never be paired with a wrong username.
pub fn handle_pass_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let pass = pop_param(&mut rest, true, true);
    if session.login.user_valid && pass == session.config.server.ftp_pass {
        session.login.pass_valid = true;
        info!("login successful");
        session.send_reply(230, "User logged in, proceed.");
    } else {
        warn!("login failed");
        session.send_reply(530, "Not logged in.");
    }
}
