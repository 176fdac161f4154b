use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use meet_plugin::actions::{IconSurface, CATALOG};
use meet_plugin::config::PluginConfig;
use meet_plugin::ipc_server::SocketIpcServer;
use meet_plugin::MeetPlugin;
use meet_ipc::MeetAction;

#[derive(Parser, Debug)]
#[command(
    name = "meet-plugind",
    about = "Controller-side daemon hosting the Meet action registry"
)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unix socket path the relay connects to
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Bind loopback TCP instead of a Unix socket
    #[arg(long)]
    tcp: Option<SocketAddr>,
}

/// Writes icon changes to the log, standing in for the controller's deck
/// rendering layer.
struct LoggingSurface {
    action: MeetAction,
}

impl IconSurface for LoggingSurface {
    fn set_icon(&self, icon: &str) {
        info!(action = %self.action, icon, "Icon updated");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PluginConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PluginConfig::default(),
    };
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }
    if let Some(tcp) = args.tcp {
        config.tcp_addr = Some(tcp);
    }

    let (plugin, mut commands) = MeetPlugin::new();
    for descriptor in &CATALOG {
        plugin.attach(
            "deck-0",
            descriptor,
            Box::new(LoggingSurface {
                action: descriptor.action,
            }),
        );
    }
    info!(actions = CATALOG.len(), "Registered action catalog");

    let server = Arc::new(
        SocketIpcServer::bind(config.bind_address())
            .await
            .context("failed to bind the plugin socket")?,
    );

    // Drain queued key-press commands into the socket endpoint.
    let sender = Arc::clone(&server);
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            sender.send(&command).await;
        }
    });

    if let Err(e) = server
        .serve(|message| plugin.handle_status_update(message))
        .await
    {
        error!(error = %e, "Socket endpoint failed");
        return Err(e.into());
    }

    info!("Relay session ended, shutting down");
    Ok(())
}
