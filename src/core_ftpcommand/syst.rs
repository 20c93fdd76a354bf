use crate::session::Session;

pub fn handle_syst_command(session: &mut Session) {
    session.send_reply(215, "UNIX Type: L8");
}
