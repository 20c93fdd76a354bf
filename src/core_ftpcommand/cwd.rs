use log::info;

use crate::core_ftpcommand::utils::{close_child, open_child, pop_param};
use crate::session::Session;

/// Handles the CWD FTP command.
///
/// `.` is a no-op and `..` pops one segment. Anything else is appended
/// and then verified by opening the directory; a failed open rolls the
/// change back.
pub fn handle_cwd_command(session: &mut Session, arg: &str) {
    let mut rest = arg;
    let dir = pop_param(&mut rest, false, false);

    if !dir.is_empty() {
        if dir == "." {
            session.send_reply(250, "Directory successfully changed.");
            return;
        }
        if dir == ".." {
            close_child(&mut session.working_path);
            session.send_reply(250, "Directory successfully changed.");
            return;
        }
        open_child(&mut session.working_path, &dir);
    }

    if session.working_path == "/" {
        session.send_reply(250, "Directory successfully changed.");
        return;
    }
    match session.fs.open_dir(&session.working_path) {
        Ok(_) => {
            info!("new working path: {}", session.working_path);
            session.send_reply(250, "Directory successfully changed.");
        }
        Err(_) => {
            close_child(&mut session.working_path);
            session.send_reply(550, "Failed to change directory.");
        }
    }
}
