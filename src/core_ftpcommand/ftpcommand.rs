use crate::core_ftpcommand::utils::pop_param;

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    FEAT,
    SYST,
    CDUP,
    CWD,
    PWD,
    XPWD,
    SIZE,
    MDTM,
    TYPE,
    USER,
    PASS,
    PASV,
    LIST,
    RETR,
    STOR,
    DELE,
    RMD,
    MKD,
    RNFR,
    RNTO,
    NOOP,
    QUIT,
    APPE,
    NLST,
    AUTH,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "FEAT" => Some(FtpCommand::FEAT),
            "SYST" => Some(FtpCommand::SYST),
            "CDUP" => Some(FtpCommand::CDUP),
            "CWD" => Some(FtpCommand::CWD),
            "PWD" => Some(FtpCommand::PWD),
            "XPWD" => Some(FtpCommand::XPWD),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            "TYPE" => Some(FtpCommand::TYPE),
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "PASV" => Some(FtpCommand::PASV),
            "LIST" => Some(FtpCommand::LIST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "DELE" => Some(FtpCommand::DELE),
            "RMD" => Some(FtpCommand::RMD),
            "MKD" => Some(FtpCommand::MKD),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "NOOP" => Some(FtpCommand::NOOP),
            "QUIT" => Some(FtpCommand::QUIT),
            "APPE" => Some(FtpCommand::APPE),
            "NLST" => Some(FtpCommand::NLST),
            "AUTH" => Some(FtpCommand::AUTH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FtpCommand::FEAT => "FEAT",
            FtpCommand::SYST => "SYST",
            FtpCommand::CDUP => "CDUP",
            FtpCommand::CWD => "CWD",
            FtpCommand::PWD => "PWD",
            FtpCommand::XPWD => "XPWD",
            FtpCommand::SIZE => "SIZE",
            FtpCommand::MDTM => "MDTM",
            FtpCommand::TYPE => "TYPE",
            FtpCommand::USER => "USER",
            FtpCommand::PASS => "PASS",
            FtpCommand::PASV => "PASV",
            FtpCommand::LIST => "LIST",
            FtpCommand::RETR => "RETR",
            FtpCommand::STOR => "STOR",
            FtpCommand::DELE => "DELE",
            FtpCommand::RMD => "RMD",
            FtpCommand::MKD => "MKD",
            FtpCommand::RNFR => "RNFR",
            FtpCommand::RNTO => "RNTO",
            FtpCommand::NOOP => "NOOP",
            FtpCommand::QUIT => "QUIT",
            FtpCommand::APPE => "APPE",
            FtpCommand::NLST => "NLST",
            FtpCommand::AUTH => "AUTH",
        }
    }

    /// Commands accepted before the password has been validated.
    pub fn allowed_before_login(&self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::QUIT
                | FtpCommand::FEAT
                | FtpCommand::AUTH
        )
    }

    /// Pops the leading command token off `line`, case-folding it and
    /// advancing the cursor past the separating space so the remainder
    /// is the parameter string. Unknown tokens leave the cursor alone.
    pub fn pop(line: &mut &str) -> Option<FtpCommand> {
        let mut cursor = *line;
        let token = pop_param(&mut cursor, true, true);
        let cmd = FtpCommand::from_str(&token)?;
        *line = cursor.strip_prefix(' ').unwrap_or(cursor);
        Some(cmd)
    }
}
