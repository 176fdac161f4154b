use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meet_ipc::{default_socket_path, IpcAddress};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Relay configuration, loadable from a TOML file with CLI overrides
/// applied on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Unix socket path of the controller. Ignored when `tcp_addr` is set.
    pub socket_path: PathBuf,
    /// Connect over loopback TCP instead of a Unix socket.
    pub tcp_addr: Option<SocketAddr>,
    /// Where to log. Stdout carries the native-messaging channel, so the
    /// relay always logs to a file.
    pub log_file: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            tcp_addr: None,
            log_file: std::env::temp_dir().join("meet-relay.log"),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from a file if it exists, otherwise returns the
    /// default config.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn controller_address(&self) -> IpcAddress {
        match self.tcp_addr {
            Some(addr) => IpcAddress::Tcp(addr),
            None => IpcAddress::Unix(self.socket_path.clone()),
        }
    }
}
