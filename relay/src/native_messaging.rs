use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, Stdin, Stdout};
use tracing::warn;

use meet_ipc::{ChannelError, FramedReader, FramedWriter};

/// The browser-facing endpoint: native-messaging framing over this
/// process's standard streams. Stdout is the wire, so nothing else in the
/// process may write to it.
pub struct NativeMessagingHost<R, W> {
    reader: FramedReader<R>,
    writer: FramedWriter<W>,
}

impl NativeMessagingHost<Stdin, Stdout> {
    /// Binds to the process's standard input and output.
    pub fn from_stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> NativeMessagingHost<R, W> {
    pub fn new(read: R, write: W) -> Self {
        Self {
            reader: FramedReader::new(read),
            writer: FramedWriter::new(write),
        }
    }

    /// Splits the endpoint so the two relay directions can own one half
    /// each.
    pub fn split(self) -> (FramedReader<R>, FramedWriter<W>) {
        (self.reader, self.writer)
    }

    /// Returns the next well-formed message from the browser, skipping
    /// malformed frames, or `None` once the browser closes the stream.
    pub async fn next_message(&mut self) -> Result<Option<Value>, ChannelError> {
        self.reader.read_valid().await
    }

    /// Writes one frame to the browser. Failures are logged, not retried;
    /// the browser requests state again on its next update.
    pub async fn send<T: Serialize>(&mut self, message: &T) {
        if let Err(e) = self.writer.write(message).await {
            warn!(error = %e, "Error sending message to browser");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meet_ipc::{ActionCommand, MeetAction};
    use serde_json::json;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn delivers_messages_in_order_until_the_stream_closes() {
        let (mut browser_in, host_in) = tokio::io::duplex(1024);
        let (host_out, _browser_out) = tokio::io::duplex(1024);
        let mut host = NativeMessagingHost::new(host_in, host_out);

        for payload in [br#"{"n":1}"#.as_slice(), br#"{"n":2}"#] {
            browser_in
                .write_all(&(payload.len() as u32).to_ne_bytes())
                .await
                .unwrap();
            browser_in.write_all(payload).await.unwrap();
        }
        drop(browser_in);

        assert_eq!(host.next_message().await.unwrap().unwrap(), json!({"n": 1}));
        assert_eq!(host.next_message().await.unwrap().unwrap(), json!({"n": 2}));
        assert!(host.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn send_frames_reach_the_browser_side() {
        let (_browser_in, host_in) = tokio::io::duplex(64);
        let (host_out, browser_out) = tokio::io::duplex(1024);
        let mut host = NativeMessagingHost::new(host_in, host_out);

        host.send(&ActionCommand {
            action: MeetAction::HangUp,
        })
        .await;

        let mut reader = FramedReader::new(browser_out);
        assert_eq!(
            reader.read().await.unwrap().unwrap(),
            json!({"action": "hang_up"})
        );
    }
}
