use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// Upper bound on a single frame payload. Browsers cap native-messaging
/// payloads at 1 MiB, so a larger declared length means a corrupt header.
pub const MAX_FRAME_BYTES: u32 = 1024 * 1024;

/// One frame on the wire carried something other than a single well-formed
/// JSON object.
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("declared frame length {0} exceeds the {MAX_FRAME_BYTES} byte limit")]
    Oversized(u32),
    #[error("frame payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("frame payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FramingError {
    /// Whether the read loop can keep going after this error. UTF-8 and
    /// JSON failures consume the whole payload, leaving the stream at the
    /// next frame boundary; a corrupt length header does not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FramingError::Oversized(_))
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("I/O error on framed channel: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Framing(#[from] FramingError),
}

/// Read side of a framed channel: 4-byte length header in native byte
/// order, then exactly that many bytes of UTF-8 JSON.
///
/// Both peers run on the same host, so no byte-order negotiation happens.
pub struct FramedReader<R> {
    stream: R,
}

impl<R: AsyncRead + Unpin> FramedReader<R> {
    pub fn new(stream: R) -> Self {
        Self { stream }
    }

    /// Reads one frame. `Ok(None)` means the peer closed the stream at a
    /// frame boundary. Partial reads are retried until the full header and
    /// payload have arrived.
    pub async fn read(&mut self) -> Result<Option<Value>, ChannelError> {
        let mut header = [0u8; 4];
        match self.stream.read_exact(&mut header).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let length = u32::from_ne_bytes(header);
        if length > MAX_FRAME_BYTES {
            return Err(FramingError::Oversized(length).into());
        }

        let mut payload = vec![0u8; length as usize];
        self.stream.read_exact(&mut payload).await?;

        let text = String::from_utf8(payload).map_err(FramingError::from)?;
        let value = serde_json::from_str(&text).map_err(FramingError::from)?;
        Ok(Some(value))
    }

    /// Like [`read`](Self::read), but skips recoverable framing errors
    /// (logging each one) until a well-formed frame, end of stream, or a
    /// fatal error.
    pub async fn read_valid(&mut self) -> Result<Option<Value>, ChannelError> {
        loop {
            match self.read().await {
                Err(ChannelError::Framing(e)) if e.is_recoverable() => {
                    warn!(error = %e, "Skipping malformed frame");
                }
                other => return other,
            }
        }
    }
}

/// Write side of a framed channel.
pub struct FramedWriter<W> {
    stream: W,
}

impl<W: AsyncWrite + Unpin> FramedWriter<W> {
    pub fn new(stream: W) -> Self {
        Self { stream }
    }

    /// Serializes `message` and writes the length header and payload as one
    /// buffer, flushing immediately so the peer never sees a torn frame.
    pub async fn write<T: Serialize + ?Sized>(&mut self, message: &T) -> Result<(), ChannelError> {
        let payload = serde_json::to_vec(message).map_err(FramingError::from)?;
        if payload.len() > MAX_FRAME_BYTES as usize {
            return Err(FramingError::Oversized(payload.len() as u32).into());
        }

        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
        frame.extend_from_slice(&payload);
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;
        Ok(())
    }
}
