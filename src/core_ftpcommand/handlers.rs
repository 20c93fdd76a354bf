use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cdup, cwd, dele, list, mdtm, mkd, noop, pass, pwd, quit, retr, rmd, rnfr, rnto, size, stor,
    syst, type_, user,
};
use crate::core_network::pasv;
use crate::session::{RenameState, Session};

/// Routes one parsed command to its handler. `arg` is the raw remainder
/// of the line; each handler extracts its own parameter.
pub fn dispatch(session: &mut Session, cmd: FtpCommand, arg: &str) {
    // A stashed rename source is only valid for the RNTO that
    // immediately follows the RNFR.
    if cmd != FtpCommand::RNTO {
        session.rename = RenameState::None;
    }

    match cmd {
        FtpCommand::FEAT => session.send_reply(502, "no-features"),
        FtpCommand::AUTH => session.send_reply(504, "not-supported"),
        FtpCommand::SYST => syst::handle_syst_command(session),
        FtpCommand::CDUP => cdup::handle_cdup_command(session),
        FtpCommand::CWD => cwd::handle_cwd_command(session, arg),
        FtpCommand::PWD | FtpCommand::XPWD => pwd::handle_pwd_command(session),
        FtpCommand::SIZE => size::handle_size_command(session, arg),
        FtpCommand::MDTM => mdtm::handle_mdtm_command(session, arg),
        FtpCommand::TYPE => type_::handle_type_command(session, arg),
        FtpCommand::USER => user::handle_user_command(session, arg),
        FtpCommand::PASS => pass::handle_pass_command(session, arg),
        FtpCommand::PASV => pasv::handle_pasv_command(session),
        FtpCommand::LIST => list::handle_list_command(session, arg, false),
        FtpCommand::NLST => list::handle_list_command(session, arg, true),
        FtpCommand::RETR => retr::handle_retr_command(session, arg),
        FtpCommand::STOR => stor::handle_stor_command(session, arg, false),
        FtpCommand::APPE => stor::handle_stor_command(session, arg, true),
        FtpCommand::DELE => dele::handle_dele_command(session, arg),
        FtpCommand::RMD => rmd::handle_rmd_command(session, arg),
        FtpCommand::MKD => mkd::handle_mkd_command(session, arg),
        FtpCommand::RNFR => rnfr::handle_rnfr_command(session, arg),
        FtpCommand::RNTO => rnto::handle_rnto_command(session, arg),
        FtpCommand::NOOP => noop::handle_noop_command(session),
        FtpCommand::QUIT => quit::handle_quit_command(session),
    }
}
