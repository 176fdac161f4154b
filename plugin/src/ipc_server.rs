use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Mutex;
use tracing::{info, warn};

use meet_ipc::{ChannelError, FramedReader, FramedWriter, IpcAddress};

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not prepare socket file {path:?}: {source}")]
    PrepareSocket {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("could not accept a client: {0}")]
    Accept(#[source] io::Error),
}

enum Listener {
    Unix(UnixListener),
    Tcp(TcpListener),
}

impl Listener {
    async fn accept(&self) -> io::Result<(BoxedRead, BoxedWrite)> {
        match self {
            Listener::Unix(listener) => {
                let (stream, _addr) = listener.accept().await?;
                let (read, write) = stream.into_split();
                Ok((Box::new(read), Box::new(write)))
            }
            Listener::Tcp(listener) => {
                let (stream, _addr) = listener.accept().await?;
                let (read, write) = stream.into_split();
                Ok((Box::new(read), Box::new(write)))
            }
        }
    }
}

/// Socket endpoint on the controller side. Owns the listening resource for
/// the process lifetime and serves at most one client: the relay spawned
/// for the current browser session.
pub struct SocketIpcServer {
    address: IpcAddress,
    listener: Listener,
    client: Arc<Mutex<Option<FramedWriter<BoxedWrite>>>>,
}

impl SocketIpcServer {
    /// Binds the configured address. For Unix sockets the parent directory
    /// is created and a stale socket file from a previous run is removed
    /// before binding; either failing is fatal at startup.
    pub async fn bind(address: IpcAddress) -> Result<Self, ServerError> {
        let listener = match &address {
            IpcAddress::Unix(path) => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await.map_err(|source| {
                        ServerError::PrepareSocket {
                            path: path.clone(),
                            source,
                        }
                    })?;
                }
                if path.exists() {
                    warn!(path = %path.display(), "Removing stale socket file");
                    tokio::fs::remove_file(path).await.map_err(|source| {
                        ServerError::PrepareSocket {
                            path: path.clone(),
                            source,
                        }
                    })?;
                }
                Listener::Unix(UnixListener::bind(path).map_err(|source| ServerError::Bind {
                    address: address.to_string(),
                    source,
                })?)
            }
            IpcAddress::Tcp(addr) => {
                Listener::Tcp(TcpListener::bind(addr).await.map_err(|source| {
                    ServerError::Bind {
                        address: address.to_string(),
                        source,
                    }
                })?)
            }
        };

        info!(address = %address, "Socket endpoint listening");
        Ok(Self {
            address,
            listener,
            client: Arc::new(Mutex::new(None)),
        })
    }

    pub fn address(&self) -> &IpcAddress {
        &self.address
    }

    /// Accepts one client, then delivers each decoded frame to
    /// `on_message` in arrival order. Malformed frames are logged and
    /// skipped. Returns once that client disconnects; the endpoint does
    /// not accept a replacement.
    pub async fn serve<F>(&self, mut on_message: F) -> Result<(), ServerError>
    where
        F: FnMut(&Value) + Send,
    {
        let (read, write) = self
            .listener
            .accept()
            .await
            .map_err(ServerError::Accept)?;
        info!(address = %self.address, "Accepted relay connection");
        *self.client.lock().await = Some(FramedWriter::new(write));

        let mut reader = FramedReader::new(read);
        loop {
            match reader.read_valid().await {
                Ok(Some(message)) => on_message(&message),
                Ok(None) => {
                    info!("Relay disconnected");
                    break;
                }
                Err(ChannelError::Io(e)) => {
                    warn!(error = %e, "Socket connection with relay lost");
                    break;
                }
                Err(ChannelError::Framing(e)) => {
                    warn!(error = %e, "Unrecoverable framing error, dropping client");
                    break;
                }
            }
        }

        *self.client.lock().await = None;
        Ok(())
    }

    /// Sends one frame to the connected client. Silently does nothing when
    /// no client is connected; a failed send drops the client handle.
    pub async fn send<T: Serialize>(&self, message: &T) {
        let mut guard = self.client.lock().await;
        let Some(writer) = guard.as_mut() else {
            return;
        };
        if let Err(e) = writer.write(message).await {
            warn!(error = %e, "Could not send message, socket connection lost");
            *guard = None;
        }
    }
}
