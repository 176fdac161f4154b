use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use tracing::{error, info};

use meet_ipc::IpcAddress;
use meet_relay::config::RelayConfig;
use meet_relay::NativeMessagingHost;

#[derive(Parser, Debug)]
#[command(
    name = "meet-relay",
    about = "Native messaging bridge between the browser extension and the controller"
)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unix socket path of the controller
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Connect over loopback TCP instead of a Unix socket
    #[arg(long)]
    tcp: Option<SocketAddr>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// The browser appends its extension origin (and more) when launching
    /// a native messaging host; accepted and ignored.
    #[arg(trailing_var_arg = true, hide = true)]
    browser_args: Vec<String>,
}

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// Connects the client half toward the controller. Refusal or absence is
/// fatal; the browser has to relaunch the relay once the controller is up.
async fn connect_controller(address: &IpcAddress) -> anyhow::Result<(BoxedRead, BoxedWrite)> {
    match address {
        IpcAddress::Unix(path) => {
            let stream = UnixStream::connect(path).await.with_context(|| {
                format!(
                    "connection to controller at {} refused or not found",
                    path.display()
                )
            })?;
            let (read, write) = stream.into_split();
            Ok((Box::new(read), Box::new(write)))
        }
        IpcAddress::Tcp(addr) => {
            let stream = TcpStream::connect(addr)
                .await
                .with_context(|| format!("connection to controller at {addr} refused"))?;
            let (read, write) = stream.into_split();
            Ok((Box::new(read), Box::new(write)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RelayConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => RelayConfig::default(),
    };
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }
    if let Some(tcp) = args.tcp {
        config.tcp_addr = Some(tcp);
    }
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }

    // Native messaging owns stdout, so logging goes to a file.
    let log_file = std::fs::File::create(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!("Meet relay started by the browser");

    let address = config.controller_address();
    let (controller_read, controller_write) = match connect_controller(&address).await {
        Ok(halves) => {
            info!(address = %address, "Connected to controller");
            halves
        }
        Err(e) => {
            error!(error = %e, "Startup failed");
            return Err(e);
        }
    };

    match meet_relay::run(
        NativeMessagingHost::from_stdio(),
        controller_read,
        controller_write,
    )
    .await
    {
        Ok(()) => {
            info!("Browser connection closed, relay shutting down");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Relay terminated");
            Err(e.into())
        }
    }
}
