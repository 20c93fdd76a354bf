use crate::session::Session;

/// Handles the PWD and XPWD FTP commands. The reply carries the exact
/// working path, including the degenerate root case "/".
pub fn handle_pwd_command(session: &mut Session) {
    let path = session.working_path.clone();
    session.send_reply(257, &path);
}
