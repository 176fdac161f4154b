use std::net::SocketAddr;
use std::path::PathBuf;

/// Default port for deployments that use loopback TCP instead of a
/// Unix-domain socket.
pub const DEFAULT_TCP_PORT: u16 = 35677;

/// Where the controller-facing socket lives. Exactly one transport is
/// active per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcAddress {
    /// Filesystem path of a Unix-domain socket.
    Unix(PathBuf),
    /// Loopback TCP address, for hosts without Unix-domain sockets.
    Tcp(SocketAddr),
}

impl std::fmt::Display for IpcAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpcAddress::Unix(path) => write!(f, "{}", path.display()),
            IpcAddress::Tcp(addr) => write!(f, "{}", addr),
        }
    }
}

/// Default socket path under the user's runtime directory, namespaced per
/// application. Falls back to the platform temp directory when no runtime
/// directory is configured.
pub fn default_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("app/com.meetdeck.Controller/meet_plugin.sock")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_namespaced_per_application() {
        let path = default_socket_path();
        assert!(path.ends_with("app/com.meetdeck.Controller/meet_plugin.sock"));
    }

    #[test]
    fn addresses_render_for_logging() {
        let unix = IpcAddress::Unix(PathBuf::from("/run/user/1000/meet_plugin.sock"));
        assert_eq!(unix.to_string(), "/run/user/1000/meet_plugin.sock");

        let tcp = IpcAddress::Tcp(([127, 0, 0, 1], DEFAULT_TCP_PORT).into());
        assert_eq!(tcp.to_string(), "127.0.0.1:35677");
    }
}
