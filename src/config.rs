use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{FTP_BUFFER_SIZE, FTP_CMD_PORT, FTP_CMD_TIMEOUT_SECS, FTP_DATA_TIMEOUT_MS, FTP_PASV_PORT};

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub pasv_port: u16,
    pub mount_point: String,
    pub ftp_user: String,
    pub ftp_pass: String,
    pub buffer_size: Option<usize>,          // Optional to allow default value
    pub control_timeout_secs: Option<u64>,   // Optional to allow default value
    pub data_timeout_ms: Option<u64>,        // Optional to allow default value
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: FTP_CMD_PORT,
            pasv_port: FTP_PASV_PORT,
            mount_point: String::from("/var/ftp"),
            ftp_user: String::from("test"),
            ftp_pass: String::from("test"),
            buffer_size: Some(FTP_BUFFER_SIZE),
            control_timeout_secs: Some(FTP_CMD_TIMEOUT_SECS),
            data_timeout_ms: Some(FTP_DATA_TIMEOUT_MS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;
        Ok(config)
    }

    pub fn buffer_size(&self) -> usize {
        self.server.buffer_size.unwrap_or(FTP_BUFFER_SIZE)
    }

    pub fn control_timeout_ms(&self) -> u64 {
        self.server
            .control_timeout_secs
            .unwrap_or(FTP_CMD_TIMEOUT_SECS)
            * 1000
    }

    pub fn data_timeout_ms(&self) -> u64 {
        self.server.data_timeout_ms.unwrap_or(FTP_DATA_TIMEOUT_MS)
    }
}
