use crate::session::Session;

pub fn handle_noop_command(session: &mut Session) {
    session.send_reply(200, "NOOP ok.");
}
