//! Non-blocking socket primitives. Every operation here returns
//! immediately; "would block" is a normal outcome that defers work to
//! the next tick.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::SEND_RETRY_STEP_MS;
use crate::core_error::FtpError;

/// Outcome of a non-blocking receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvStatus {
    /// Some bytes arrived.
    Data(usize),
    /// Nothing pending; try again next tick.
    WouldBlock,
    /// Orderly close or a hard error; the peer is gone.
    Closed,
}

/// Creates a non-blocking listening socket bound to all interfaces.
pub fn create_listening_socket(port: u16) -> Result<TcpListener, FtpError> {
    let listener =
        TcpListener::bind(("0.0.0.0", port)).map_err(|source| FtpError::Listen { port, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| FtpError::Listen { port, source })?;
    Ok(listener)
}

/// Accepts one pending connection, if any.
pub fn poll_accept(listener: &TcpListener) -> io::Result<Option<(TcpStream, SocketAddr)>> {
    match listener.accept() {
        Ok(pair) => Ok(Some(pair)),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(e) => Err(e),
    }
}

/// Non-blocking receive into `buf`.
pub fn recv_nonblocking(stream: &mut TcpStream, buf: &mut [u8]) -> RecvStatus {
    match stream.read(buf) {
        Ok(0) => RecvStatus::Closed,
        Ok(n) => RecvStatus::Data(n),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => RecvStatus::WouldBlock,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => RecvStatus::WouldBlock,
        Err(_) => RecvStatus::Closed,
    }
}

/// Sends the whole of `data`, retrying transient "would block" results
/// within a bounded window. This is the only place the server waits at
/// all, and the wait is capped at `window_ms`.
pub fn send_all(stream: &mut TcpStream, data: &[u8], window_ms: u64) -> Result<(), FtpError> {
    let deadline = Instant::now() + Duration::from_millis(window_ms);
    let mut written = 0;
    while written < data.len() {
        match stream.write(&data[written..]) {
            Ok(0) => {
                return Err(FtpError::Socket(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "peer stopped accepting data",
                )))
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return Err(FtpError::SendTimeout(window_ms));
                }
                thread::sleep(Duration::from_millis(SEND_RETRY_STEP_MS));
            }
            Err(e) => return Err(FtpError::Socket(e)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_accept_reports_empty_backlog() {
        let listener = create_listening_socket(0).unwrap();
        assert!(poll_accept(&listener).unwrap().is_none());
    }

    #[test]
    fn send_and_recv_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (mut server_side, _) = listener.accept().unwrap();
        server_side.set_nonblocking(true).unwrap();

        send_all(&mut server_side, b"hello", 200).unwrap();
        let mut buf = [0u8; 16];
        let mut reader = client;
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");

        reader.set_nonblocking(true).unwrap();
        let mut empty = [0u8; 16];
        assert_eq!(
            recv_nonblocking(&mut reader, &mut empty),
            RecvStatus::WouldBlock
        );
        drop(server_side);
        // The peer closed; eventually the read reports it.
        loop {
            match recv_nonblocking(&mut reader, &mut empty) {
                RecvStatus::Closed => break,
                RecvStatus::WouldBlock => std::thread::sleep(Duration::from_millis(1)),
                RecvStatus::Data(_) => panic!("unexpected data"),
            }
        }
    }
}
