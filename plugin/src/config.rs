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

/// Controller-side configuration, loadable from a TOML file with CLI
/// overrides applied on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Unix socket path the relay connects to. Ignored when `tcp_addr` is
    /// set.
    pub socket_path: PathBuf,
    /// Bind a loopback TCP port instead of a Unix socket.
    pub tcp_addr: Option<SocketAddr>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            tcp_addr: None,
        }
    }
}

impl PluginConfig {
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

    pub fn bind_address(&self) -> IpcAddress {
        match self.tcp_addr {
            Some(addr) => IpcAddress::Tcp(addr),
            None => IpcAddress::Unix(self.socket_path.clone()),
        }
    }
}
