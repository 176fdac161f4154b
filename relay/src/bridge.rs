use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use meet_ipc::{validate_command, validate_status, ChannelError, FramedReader, FramedWriter};

use crate::native_messaging::NativeMessagingHost;

/// Why the relay stopped. Anything but a clean browser shutdown maps to a
/// nonzero exit status.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("connection to controller lost: {0}")]
    ControllerLost(#[source] ChannelError),
    #[error("controller closed the connection")]
    ControllerClosed,
    #[error("browser stream failed: {0}")]
    BrowserStream(#[source] ChannelError),
}

/// Browser → Controller. Each stdin frame is validated as a StatusUpdate;
/// invalid objects are logged and dropped, valid ones forwarded to the
/// controller socket. Returns `Ok` when the browser closes stdin.
pub async fn forward_status<R, W>(
    mut browser: FramedReader<R>,
    mut controller: FramedWriter<W>,
) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let message = match browser.read_valid().await {
            Ok(Some(message)) => message,
            Ok(None) => {
                info!("Browser closed stdin, shutting down");
                return Ok(());
            }
            Err(e) => return Err(RelayError::BrowserStream(e)),
        };

        let status = match validate_status(&message) {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Invalid message from browser, not forwarding");
                continue;
            }
        };

        controller
            .write(&status)
            .await
            .map_err(RelayError::ControllerLost)?;
        debug!(control = %status.control, state = %status.state, "Forwarded status to controller");
    }
}

/// Controller → Browser. Each socket frame is validated as a Command;
/// invalid objects are logged and dropped, valid ones forwarded to stdout.
/// Never returns `Ok`: the controller going away ends the session.
pub async fn forward_commands<R, W>(
    mut controller: FramedReader<R>,
    mut browser: FramedWriter<W>,
) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let message = match controller.read_valid().await {
            Ok(Some(message)) => message,
            Ok(None) => return Err(RelayError::ControllerClosed),
            Err(e) => return Err(RelayError::ControllerLost(e)),
        };

        let command = match validate_command(&message) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Invalid command from controller, not forwarding");
                continue;
            }
        };

        // Write failures toward the browser are logged, not retried.
        if let Err(e) = browser.write(&command).await {
            warn!(error = %e, "Error sending command to browser");
        } else {
            debug!(action = %command.action, "Forwarded command to browser");
        }
    }
}

/// Wires the two directions together and runs until one of them ends the
/// session. A clean browser shutdown returns `Ok`; the unfinished
/// controller direction is simply dropped. Controller loss is an error the
/// caller turns into a nonzero exit.
pub async fn run<BR, BW, CR, CW>(
    host: NativeMessagingHost<BR, BW>,
    controller_read: CR,
    controller_write: CW,
) -> Result<(), RelayError>
where
    BR: AsyncRead + Unpin,
    BW: AsyncWrite + Unpin,
    CR: AsyncRead + Unpin,
    CW: AsyncWrite + Unpin,
{
    let (browser_read, browser_write) = host.split();
    let status = forward_status(browser_read, FramedWriter::new(controller_write));
    let commands = forward_commands(FramedReader::new(controller_read), browser_write);

    tokio::select! {
        result = status => result,
        result = commands => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meet_ipc::MAX_FRAME_BYTES;
    use serde_json::json;
    use tokio::io::{AsyncWriteExt, DuplexStream};

    async fn write_frame(stream: &mut DuplexStream, payload: &[u8]) {
        stream
            .write_all(&(payload.len() as u32).to_ne_bytes())
            .await
            .unwrap();
        stream.write_all(payload).await.unwrap();
    }

    #[tokio::test]
    async fn forwards_valid_status_and_drops_the_rest() {
        let (mut browser, stdin) = tokio::io::duplex(4096);
        let (socket_write, controller_side) = tokio::io::duplex(4096);

        let pump = tokio::spawn(forward_status(
            FramedReader::new(stdin),
            FramedWriter::new(socket_write),
        ));

        write_frame(
            &mut browser,
            br#"{"status":"update","control":"camera","state":"on"}"#,
        )
        .await;
        // Wrong schema for this direction: dropped, not forwarded.
        write_frame(&mut browser, br#"{"action":"toggle_mute"}"#).await;
        write_frame(&mut browser, b"not json at all").await;
        write_frame(
            &mut browser,
            br#"{"status":"update","control":"hand","state":"off"}"#,
        )
        .await;
        drop(browser);

        pump.await.unwrap().unwrap();

        let mut controller = FramedReader::new(controller_side);
        assert_eq!(
            controller.read().await.unwrap().unwrap(),
            json!({"status": "update", "control": "camera", "state": "on"})
        );
        assert_eq!(
            controller.read().await.unwrap().unwrap(),
            json!({"status": "update", "control": "hand", "state": "off"})
        );
        assert!(controller.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn forwards_valid_commands_and_drops_the_rest() {
        let (mut controller, socket_read) = tokio::io::duplex(4096);
        let (stdout, browser_side) = tokio::io::duplex(4096);

        let pump = tokio::spawn(forward_commands(
            FramedReader::new(socket_read),
            FramedWriter::new(stdout),
        ));

        write_frame(&mut controller, br#"{"action":"toggle_camera"}"#).await;
        write_frame(&mut controller, br#"{"action":"self_destruct"}"#).await;
        write_frame(&mut controller, br#"{"action":"hang_up"}"#).await;
        drop(controller);

        match pump.await.unwrap() {
            Err(RelayError::ControllerClosed) => {}
            other => panic!("expected ControllerClosed, got {other:?}"),
        }

        let mut browser = FramedReader::new(browser_side);
        assert_eq!(
            browser.read().await.unwrap().unwrap(),
            json!({"action": "toggle_camera"})
        );
        assert_eq!(
            browser.read().await.unwrap().unwrap(),
            json!({"action": "hang_up"})
        );
    }

    #[tokio::test]
    async fn controller_reset_mid_forward_is_fatal() {
        let (mut browser, stdin) = tokio::io::duplex(4096);
        let (socket_write, controller_side) = tokio::io::duplex(4096);
        // The controller vanishes before the next forward.
        drop(controller_side);

        let pump = tokio::spawn(forward_status(
            FramedReader::new(stdin),
            FramedWriter::new(socket_write),
        ));

        write_frame(
            &mut browser,
            br#"{"status":"update","control":"camera","state":"on"}"#,
        )
        .await;

        match pump.await.unwrap() {
            Err(RelayError::ControllerLost(_)) => {}
            other => panic!("expected ControllerLost, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn clean_browser_shutdown_wins_the_select() {
        let (browser_in, stdin) = tokio::io::duplex(64);
        let (stdout, _browser_out) = tokio::io::duplex(64);
        let (_controller_in, socket_read) = tokio::io::duplex(64);
        let (socket_write, _controller_out) = tokio::io::duplex(64);

        drop(browser_in);

        run(
            NativeMessagingHost::new(stdin, stdout),
            socket_read,
            socket_write,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn corrupt_length_header_from_the_controller_is_fatal() {
        let (mut controller, socket_read) = tokio::io::duplex(4096);
        let (stdout, _browser_side) = tokio::io::duplex(4096);

        let pump = tokio::spawn(forward_commands(
            FramedReader::new(socket_read),
            FramedWriter::new(stdout),
        ));

        controller
            .write_all(&(MAX_FRAME_BYTES + 7).to_ne_bytes())
            .await
            .unwrap();

        match pump.await.unwrap() {
            Err(RelayError::ControllerLost(ChannelError::Framing(_))) => {}
            other => panic!("expected a framing failure, got {other:?}"),
        }
    }
}
