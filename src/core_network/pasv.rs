//! Passive mode: the server opens the fixed data port and the client
//! connects to it. The only data transfer mode wired up.

use std::net::Ipv4Addr;

use log::{error, info};

use crate::core_network::network;
use crate::session::{FtpSubstate, Session};

/// Handles the PASV FTP command.
///
/// Any previous data socket is dropped first — some clients send PASV
/// several times in quick succession — and the data listener is created
/// once and reused across PASV commands, so the port is never bound
/// twice.
pub fn handle_pasv_command(session: &mut Session) {
    session.data = None;
    session.substate = FtpSubstate::Disconnected;

    if session.listen_data.is_none() {
        match network::create_listening_socket(session.config.server.pasv_port) {
            Ok(listener) => session.listen_data = Some(listener),
            Err(e) => {
                error!("error creating data socket: {}", e);
                session.send_reply(425, "Can't open data connection.");
                return;
            }
        }
    }

    session.data_idle_ms = 0;
    session.substate = FtpSubstate::ListenForData;
    info!("data socket listening on port {}", session.config.server.pasv_port);
    let encoded = encode_pasv_addr(session.client_ip, session.config.server.pasv_port);
    let reply = format!("Entering Passive Mode {}.", encoded);
    session.send_reply(227, &reply);
}

/// Encodes an address and port as the PASV `(a,b,c,d,p1,p2)` tuple.
pub fn encode_pasv_addr(ip: Ipv4Addr, port: u16) -> String {
    let o = ip.octets();
    format!(
        "({},{},{},{},{},{})",
        o[0],
        o[1],
        o[2],
        o[3],
        port >> 8,
        port & 0xff
    )
}
