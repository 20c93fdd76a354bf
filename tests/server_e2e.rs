//! End-to-end scenarios over loopback sockets. The server is ticked
//! manually with synthetic elapsed times, so idle timeouts can be
//! exercised without real waiting.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use tickftpd::core_storage::MountFs;
use tickftpd::server::{FtpServer, RunStatus, ServerStatus};
use tickftpd::Config;

struct TestRig {
    server: FtpServer,
    mount: TempDir,
    port: u16,
    pasv_port: u16,
}

struct Client {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    pending: String,
}

fn rig(port: u16) -> TestRig {
    let mount = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.server.listen_port = port;
    config.server.pasv_port = port + 1;
    config.server.mount_point = mount.path().to_string_lossy().into_owned();
    config.server.ftp_user = String::from("test");
    config.server.ftp_pass = String::from("test");
    let fs = Box::new(MountFs::new(mount.path()));
    let mut server = FtpServer::with_filesystem(config, fs);
    assert!(server.enable());
    server.run(1); // Disabled -> Start
    server.run(1); // Start -> Ready
    TestRig {
        server,
        mount,
        port,
        pasv_port: port + 1,
    }
}

impl TestRig {
    fn tick(&mut self, times: usize) {
        for _ in 0..times {
            assert_eq!(self.server.run(1), RunStatus::Continue);
        }
    }

    fn tick_ms(&mut self, times: usize, elapsed_ms: u64) {
        for _ in 0..times {
            self.server.run(elapsed_ms);
        }
    }

    fn connect(&mut self) -> Client {
        let stream = TcpStream::connect(("127.0.0.1", self.port)).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(10)))
            .unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        let mut client = Client {
            stream,
            reader,
            pending: String::new(),
        };
        let greeting = self.wait_reply(&mut client);
        assert!(greeting.starts_with("220"), "greeting was {:?}", greeting);
        client
    }

    fn login(&mut self, client: &mut Client) {
        assert!(self.cmd(client, "USER test").starts_with("331"));
        assert!(self.cmd(client, "PASS test").starts_with("230"));
    }

    fn cmd(&mut self, client: &mut Client, line: &str) -> String {
        client.send(line);
        self.wait_reply(client)
    }

    fn wait_reply(&mut self, client: &mut Client) -> String {
        for _ in 0..500 {
            self.tick(1);
            if let Some(reply) = client.try_read_reply() {
                return reply;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("no reply from server");
    }

    fn open_data(&mut self) -> TcpStream {
        let stream = TcpStream::connect(("127.0.0.1", self.pasv_port)).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(10)))
            .unwrap();
        self.tick(3); // let the server accept the data connection
        stream
    }

    fn drain_data(&mut self, data: &mut TcpStream) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = [0u8; 2048];
        for _ in 0..500 {
            self.tick(1);
            match data.read(&mut buf) {
                Ok(0) => return out,
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(_) => thread::sleep(Duration::from_millis(1)),
            }
        }
        panic!("data channel never closed");
    }
}

impl Client {
    fn send(&mut self, line: &str) {
        self.stream
            .write_all(format!("{}\r\n", line).as_bytes())
            .unwrap();
    }

    fn try_read_reply(&mut self) -> Option<String> {
        match self.reader.read_line(&mut self.pending) {
            Ok(0) => None,
            Ok(_) => Some(std::mem::take(&mut self.pending)),
            // Timeout; a partial line stays buffered for the next try.
            Err(_) => None,
        }
    }
}

#[test]
fn login_gate_blocks_until_password_accepted() {
    let mut rig = rig(42110);
    let mut client = rig.connect();

    // Nothing but the exempt commands passes before login.
    assert!(rig.cmd(&mut client, "PWD").starts_with("332"));
    assert!(rig.cmd(&mut client, "USER test").starts_with("331"));
    assert!(rig.cmd(&mut client, "PASS wrong").starts_with("530"));
    // A failed password leaves the gate closed.
    assert!(rig.cmd(&mut client, "LIST").starts_with("332"));
    assert!(rig.cmd(&mut client, "PASS test").starts_with("230"));
    assert!(rig.cmd(&mut client, "NOOP").starts_with("200"));
}

#[test]
fn pwd_tracks_cwd_and_cdup_exactly() {
    let mut rig = rig(42120);
    fs::create_dir(rig.mount.path().join("logs")).unwrap();
    let mut client = rig.connect();
    rig.login(&mut client);

    assert_eq!(rig.cmd(&mut client, "PWD"), "257 /\r\n");
    assert!(rig.cmd(&mut client, "CWD logs").starts_with("250"));
    assert_eq!(rig.cmd(&mut client, "PWD"), "257 /logs\r\n");
    assert!(rig.cmd(&mut client, "CDUP").starts_with("250"));
    assert_eq!(rig.cmd(&mut client, "PWD"), "257 /\r\n");

    // A failed CWD rolls the path change back.
    assert!(rig.cmd(&mut client, "CWD nosuchdir").starts_with("550"));
    assert_eq!(rig.cmd(&mut client, "PWD"), "257 /\r\n");
}

#[test]
fn stor_end_to_end_creates_the_file() {
    let mut rig = rig(42130);
    let mut client = rig.connect();
    rig.login(&mut client);

    let reply = rig.cmd(&mut client, "PASV");
    assert!(reply.starts_with("227"), "PASV reply was {:?}", reply);
    let p1 = rig.pasv_port >> 8;
    let p2 = rig.pasv_port & 0xff;
    assert!(
        reply.contains(&format!("(127,0,0,1,{},{})", p1, p2)),
        "encoded address missing from {:?}",
        reply
    );

    let mut data = rig.open_data();
    assert!(rig.cmd(&mut client, "STOR f.bin").starts_with("150"));

    let payload: Vec<u8> = (0..500u32).map(|i| (i % 251) as u8).collect();
    data.write_all(&payload).unwrap();
    drop(data);

    let done = rig.wait_reply(&mut client);
    assert!(done.starts_with("226"), "expected 226, got {:?}", done);
    assert_eq!(fs::read(rig.mount.path().join("f.bin")).unwrap(), payload);
}

#[test]
fn retr_streams_the_file_back() {
    let mut rig = rig(42140);
    let payload: Vec<u8> = (0..3000u32).map(|i| (i % 253) as u8).collect();
    fs::write(rig.mount.path().join("fw.bin"), &payload).unwrap();
    let mut client = rig.connect();
    rig.login(&mut client);

    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    let mut data = rig.open_data();
    assert!(rig.cmd(&mut client, "RETR fw.bin").starts_with("150"));
    let received = rig.drain_data(&mut data);
    assert_eq!(received, payload);
    assert!(rig.wait_reply(&mut client).starts_with("226"));
}

#[test]
fn retr_on_a_directory_never_opens_a_handle() {
    let mut rig = rig(42150);
    fs::create_dir(rig.mount.path().join("d")).unwrap();
    let mut client = rig.connect();
    rig.login(&mut client);

    assert!(rig.cmd(&mut client, "RETR d/").starts_with("550"));
    assert!(rig.server.session().open_handle.is_none());
    // The session recovers to an idle connected state.
    rig.tick(3);
    assert_eq!(rig.server.status(), ServerStatus::Connected);
}

#[test]
fn repeated_pasv_reuses_the_data_listener() {
    let mut rig = rig(42160);
    let mut client = rig.connect();
    rig.login(&mut client);

    // Each accepted data connection is dropped by the PASV that follows
    // it; the listener itself stays bound throughout.
    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    let stale = rig.open_data();
    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    drop(stale);
    let stale = rig.open_data();
    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    drop(stale);

    // The port is still usable after the churn.
    let mut data = rig.open_data();
    assert!(rig.cmd(&mut client, "STOR x.bin").starts_with("150"));
    data.write_all(b"payload").unwrap();
    drop(data);
    assert!(rig.wait_reply(&mut client).starts_with("226"));
    assert_eq!(fs::read(rig.mount.path().join("x.bin")).unwrap(), b"payload");
}

#[test]
fn transfer_without_data_connection_releases_the_handle() {
    let mut rig = rig(42210);
    let mut client = rig.connect();
    rig.login(&mut client);

    // STOR with no data connection at all still opens the file and
    // replies 150; the very next tick notices the missing data socket.
    assert!(rig.cmd(&mut client, "STOR f.bin").starts_with("150"));
    rig.tick(3);
    assert!(rig.server.session().open_handle.is_none());
    assert_eq!(rig.server.status(), ServerStatus::Connected);

    // Same for a download that never got a channel to go out on.
    fs::write(rig.mount.path().join("g.bin"), b"payload").unwrap();
    assert!(rig.cmd(&mut client, "RETR g.bin").starts_with("150"));
    rig.tick(3);
    assert!(rig.server.session().open_handle.is_none());
    assert_eq!(rig.server.status(), ServerStatus::Connected);
}

#[test]
fn data_idle_timeout_aborts_the_receive() {
    let mut rig = rig(42170);
    let mut client = rig.connect();
    rig.login(&mut client);

    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    let _data = rig.open_data();
    assert!(rig.cmd(&mut client, "STOR slow.bin").starts_with("150"));

    // Feed zero-byte ticks past the 10 s data timeout.
    rig.tick_ms(25, 500);
    let reply = rig.wait_reply(&mut client);
    assert!(reply.starts_with("426"), "expected 426, got {:?}", reply);
    assert!(rig.server.session().open_handle.is_none());
    rig.tick(3);
    assert_eq!(rig.server.status(), ServerStatus::Connected);
}

#[test]
fn list_and_nlst_enumerate_every_entry() {
    let mut rig = rig(42180);
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(rig.mount.path().join(name), b"x").unwrap();
    }
    fs::create_dir(rig.mount.path().join("sub")).unwrap();
    let mut client = rig.connect();
    rig.login(&mut client);

    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    let mut data = rig.open_data();
    assert!(rig.cmd(&mut client, "LIST").starts_with("150"));
    let listing = String::from_utf8(rig.drain_data(&mut data)).unwrap();
    assert!(rig.wait_reply(&mut client).starts_with("226"));

    assert_eq!(listing.matches("\r\n").count(), 4);
    for name in ["a.txt", "b.txt", "c.txt", "sub"] {
        assert!(listing.contains(name), "{} missing from {:?}", name, listing);
    }
    assert!(listing.lines().any(|l| l.starts_with('d') && l.ends_with("sub")));

    // NLST over a fresh data connection: bare names only.
    assert!(rig.cmd(&mut client, "PASV").starts_with("227"));
    let mut data = rig.open_data();
    assert!(rig.cmd(&mut client, "NLST").starts_with("150"));
    let names = String::from_utf8(rig.drain_data(&mut data)).unwrap();
    assert!(rig.wait_reply(&mut client).starts_with("226"));
    let mut lines: Vec<&str> = names.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["a.txt", "b.txt", "c.txt", "sub"]);
}

#[test]
fn rename_requires_rnfr_immediately_before_rnto() {
    let mut rig = rig(42190);
    fs::write(rig.mount.path().join("old.txt"), b"contents").unwrap();
    let mut client = rig.connect();
    rig.login(&mut client);

    // RNTO out of sequence is refused.
    assert!(rig.cmd(&mut client, "RNTO new.txt").starts_with("503"));

    assert!(rig.cmd(&mut client, "RNFR old.txt").starts_with("350"));
    assert!(rig.cmd(&mut client, "RNTO new.txt").starts_with("250"));
    assert!(rig.mount.path().join("new.txt").exists());
    assert!(!rig.mount.path().join("old.txt").exists());

    // An intervening command invalidates the stashed source.
    fs::write(rig.mount.path().join("again.txt"), b"x").unwrap();
    assert!(rig.cmd(&mut client, "RNFR again.txt").starts_with("350"));
    assert!(rig.cmd(&mut client, "NOOP").starts_with("200"));
    assert!(rig.cmd(&mut client, "RNTO elsewhere.txt").starts_with("503"));
}

#[test]
fn quit_tears_the_session_down() {
    let mut rig = rig(42200);
    let mut client = rig.connect();
    rig.login(&mut client);

    fs::write(rig.mount.path().join("keep.txt"), b"x").unwrap();
    assert!(rig.cmd(&mut client, "SIZE keep.txt").starts_with("213"));
    assert!(rig.cmd(&mut client, "MDTM keep.txt").starts_with("213"));
    assert!(rig.cmd(&mut client, "DELE keep.txt").starts_with("250"));
    assert!(!rig.mount.path().join("keep.txt").exists());

    assert!(rig.cmd(&mut client, "QUIT").starts_with("221"));
    rig.tick(3);
    // The control socket is gone; a new client can connect.
    let mut second = rig.connect();
    assert!(rig.cmd(&mut second, "USER test").starts_with("331"));
}
