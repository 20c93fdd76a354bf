use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tickftpd", about = "A tick-driven, passive-only FTP server.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Mount point served as the virtual root (overrides the config file)
    #[arg(short, long)]
    pub mount_point: Option<String>,

    /// FTP username (overrides the config file)
    #[arg(short, long)]
    pub user: Option<String>,

    /// FTP password (overrides the config file)
    #[arg(short, long)]
    pub pass: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
