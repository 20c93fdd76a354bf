use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use tickftpd::core_cli::Cli;
use tickftpd::helpers::log_config;
use tickftpd::server::RunStatus;
use tickftpd::{Config, FtpServer};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Load configuration from the TOML file
    let mut config = if args.config.is_empty() {
        Config::default()
    } else {
        Config::load_from_file(&args.config)?
    };

    // CLI overrides
    if let Some(mount_point) = args.mount_point {
        config.server.mount_point = mount_point;
    }
    if let Some(user) = args.user {
        config.server.ftp_user = user;
    }
    if let Some(pass) = args.pass {
        config.server.ftp_pass = pass;
    }

    info!("Starting tickftpd:");
    log_config(&config);

    let mut server = FtpServer::new(config)?;
    server.enable();

    // Cooperative tick loop: the elapsed time between two run() calls
    // is fed back in so the session can account idle and transfer time.
    let mut last = Instant::now();
    loop {
        let elapsed = last.elapsed().as_millis() as u64;
        last = Instant::now();
        if server.run(elapsed) == RunStatus::Stopped {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }

    info!("tickftpd stopped");
    Ok(())
}
