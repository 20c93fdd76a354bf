use log::info;

use crate::config::Config;

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Port: {}", config.server.listen_port);
    info!("  Passive Port: {}", config.server.pasv_port);
    info!("  Mount Point: {}", config.server.mount_point);
    info!("  User: {}", config.server.ftp_user);
    info!("  Transfer Buffer: {} bytes", config.buffer_size());
    info!("  Control Timeout: {} ms", config.control_timeout_ms());
    info!("  Data Timeout: {} ms", config.data_timeout_ms());
}
