//! Mock device actor task
//!
//! This module provides an async task that owns a MockDevice and serves it
//! over any byte stream the way an ELM-style adapter talks on its serial
//! line. The task uses a select! loop to:
//! - Read carriage-return terminated commands from the stream and answer them
//! - Handle control commands from a channel
//! - Emit an event per answered command via a broadcast channel

use std::io;

use obd_protocol::NOT_SUPPORTED;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::{MockDevice, MockResult};

/// Longest command accepted; longer lines are dropped up to the next `\r`
const MAX_COMMAND_LEN: usize = 64;

/// Prompt sent after every reply
const PROMPT: &[u8] = b"\r>";

/// Commands that can be sent to a mock device actor
#[derive(Debug, Clone)]
pub enum MockDeviceCommand {
    /// Rewind the waveform to its power-on state
    ResetWaveform,
    /// Shutdown the mock device actor
    Shutdown,
}

/// Event emitted by the mock device actor
#[derive(Debug, Clone)]
pub enum MockDeviceEvent {
    /// A command was read from the stream and answered
    CommandServed(MockResult),
    /// The waveform was reset on request
    WaveformReset,
}

/// Run the mock device actor task
///
/// This task owns the MockDevice and processes:
/// 1. Commands read from the stream, one per `\r`; `\n` is ignored and
///    surrounding whitespace trimmed
/// 2. Control commands from the command channel
///
/// Each reply line is written followed by `\r`, then the `\r>` prompt.
/// Returns when the stream closes, on shutdown, or on a stream error.
pub async fn run_mock_device_task<S>(
    mut stream: S,
    mut device: MockDevice,
    mut cmd_rx: mpsc::Receiver<MockDeviceCommand>,
    event_tx: broadcast::Sender<MockDeviceEvent>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; 256];
    let mut line: Vec<u8> = Vec::with_capacity(MAX_COMMAND_LEN);
    let mut discarding = false;

    info!("Starting mock device task for {}", device.id());

    loop {
        tokio::select! {
            result = stream.read(&mut buf) => {
                match result {
                    Ok(0) => {
                        debug!("Mock device stream closed for {}", device.id());
                        break;
                    }
                    Ok(n) => {
                        for &byte in &buf[..n] {
                            match byte {
                                b'\r' if discarding => {
                                    discarding = false;
                                    stream.write_all(&encode_unsupported()).await?;
                                    stream.flush().await?;
                                }
                                b'\r' => {
                                    let command = String::from_utf8_lossy(&line).trim().to_string();
                                    line.clear();
                                    if command.is_empty() {
                                        continue;
                                    }
                                    let result = device.run(&command);
                                    stream.write_all(&encode_reply(&result)).await?;
                                    stream.flush().await?;
                                    // No subscribers is fine
                                    let _ = event_tx.send(MockDeviceEvent::CommandServed(result));
                                }
                                b'\n' => {}
                                _ if discarding => {}
                                _ if line.len() >= MAX_COMMAND_LEN => {
                                    warn!(
                                        "Mock device {} discarding overlong command",
                                        device.id()
                                    );
                                    line.clear();
                                    discarding = true;
                                }
                                _ => line.push(byte),
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Mock device {} stream error: {}", device.id(), e);
                        return Err(e);
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(MockDeviceCommand::ResetWaveform) => {
                        info!("Waveform reset requested for mock device {}", device.id());
                        device.reset();
                        let _ = event_tx.send(MockDeviceEvent::WaveformReset);
                    }
                    Some(MockDeviceCommand::Shutdown) => {
                        info!("Shutdown requested for mock device {}", device.id());
                        break;
                    }
                    None => {
                        debug!("Command channel closed for mock device {}", device.id());
                        break;
                    }
                }
            }
        }
    }

    info!("Mock device task ended for {}", device.id());
    Ok(())
}

/// Serialize a result the way the adapter prints it
fn encode_reply(result: &MockResult) -> Vec<u8> {
    let mut out = Vec::new();
    for line in result.outputs() {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\r');
    }
    if let Some(e) = result.error() {
        out.extend_from_slice(e.to_string().as_bytes());
        out.push(b'\r');
    }
    out.extend_from_slice(PROMPT);
    out
}

/// Reply to a line that was too long to be a command
fn encode_unsupported() -> Vec<u8> {
    let mut out = Vec::with_capacity(NOT_SUPPORTED.len() + 1 + PROMPT.len());
    out.extend_from_slice(NOT_SUPPORTED.as_bytes());
    out.push(b'\r');
    out.extend_from_slice(PROMPT);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::DuplexStream;

    /// Read from the stream until the prompt arrives
    async fn read_reply(stream: &mut DuplexStream) -> String {
        let mut reply = Vec::new();
        let mut byte = [0u8; 1];
        while !reply.ends_with(PROMPT) {
            let n = tokio::time::timeout(Duration::from_millis(500), stream.read(&mut byte))
                .await
                .unwrap()
                .unwrap();
            assert!(n > 0, "stream closed before prompt");
            reply.push(byte[0]);
        }
        String::from_utf8(reply).unwrap()
    }

    #[test]
    fn test_encode_reply() {
        let result = MockDevice::new().run("0105");
        assert_eq!(encode_reply(&result), b"41 05 4F\r\r>");
    }

    #[tokio::test]
    async fn test_mock_device_answers_commands() {
        let (mut client, device_stream) = tokio::io::duplex(1024);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, mut event_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_mock_device_task(
            device_stream,
            MockDevice::new(),
            cmd_rx,
            event_tx,
        ));

        client.write_all(b"ATSP0\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "OK\r\r>");

        client.write_all(b"010C\r\n").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 0C 13 40\r\r>");

        client.write_all(b"0199\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "NOT SUPPORTED\r\r>");

        let MockDeviceEvent::CommandServed(first) = event_rx.recv().await.unwrap() else {
            panic!("expected a served command");
        };
        assert_eq!(first.input(), "ATSP0");

        drop(cmd_tx);
        drop(client);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_mock_device_handles_split_writes() {
        let (mut client, device_stream) = tokio::io::duplex(1024);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, _event_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_mock_device_task(
            device_stream,
            MockDevice::new(),
            cmd_rx,
            event_tx,
        ));

        client.write_all(b" 01").await.unwrap();
        client.write_all(b"05 ").await.unwrap();
        client.write_all(b"\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 05 4F\r\r>");

        drop(cmd_tx);
        drop(client);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_mock_device_rejects_overlong_command() {
        let (mut client, device_stream) = tokio::io::duplex(1024);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, mut event_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_mock_device_task(
            device_stream,
            MockDevice::new(),
            cmd_rx,
            event_tx,
        ));

        // The tail after the limit must not be served as a command
        let overlong = format!("{}0105\r", "X".repeat(MAX_COMMAND_LEN));
        client.write_all(overlong.as_bytes()).await.unwrap();
        assert_eq!(read_reply(&mut client).await, "NOT SUPPORTED\r\r>");

        // Split across writes, still one discarded line
        client.write_all("0".repeat(MAX_COMMAND_LEN).as_bytes()).await.unwrap();
        client.write_all(b"010C\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "NOT SUPPORTED\r\r>");

        // The next line is served normally and the waveform was not touched
        client.write_all(b"0105\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 05 4F\r\r>");
        client.write_all(b"010C\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 0C 13 40\r\r>");

        // A command of exactly the maximum length is still accepted
        let longest = format!("0105{}\r", "0".repeat(MAX_COMMAND_LEN - 4));
        client.write_all(longest.as_bytes()).await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 05 4F\r\r>");

        let MockDeviceEvent::CommandServed(first) = event_rx.recv().await.unwrap() else {
            panic!("expected a served command");
        };
        assert_eq!(first.input(), "0105");

        drop(cmd_tx);
        drop(client);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_mock_device_reset_waveform() {
        let (mut client, device_stream) = tokio::io::duplex(1024);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, mut event_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_mock_device_task(
            device_stream,
            MockDevice::new(),
            cmd_rx,
            event_tx,
        ));

        client.write_all(b"010C\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 0C 13 40\r\r>");
        client.write_all(b"010C\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 0C 15 28\r\r>");

        cmd_tx.send(MockDeviceCommand::ResetWaveform).await.unwrap();
        loop {
            let event = tokio::time::timeout(Duration::from_millis(500), event_rx.recv())
                .await
                .unwrap()
                .unwrap();
            if matches!(event, MockDeviceEvent::WaveformReset) {
                break;
            }
        }

        client.write_all(b"010C\r").await.unwrap();
        assert_eq!(read_reply(&mut client).await, "41 0C 13 40\r\r>");

        drop(cmd_tx);
        drop(client);
        let _ = task_handle.await;
    }

    #[tokio::test]
    async fn test_mock_device_shutdown_command() {
        let (_client, device_stream) = tokio::io::duplex(1024);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, _event_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_mock_device_task(
            device_stream,
            MockDevice::new(),
            cmd_rx,
            event_tx,
        ));

        cmd_tx.send(MockDeviceCommand::Shutdown).await.unwrap();

        let result = tokio::time::timeout(Duration::from_millis(100), task_handle)
            .await
            .unwrap();

        assert!(result.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_mock_device_ends_when_stream_closes() {
        let (client, device_stream) = tokio::io::duplex(1024);
        let (_cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, _event_rx) = broadcast::channel(32);

        let task_handle = tokio::spawn(run_mock_device_task(
            device_stream,
            MockDevice::new(),
            cmd_rx,
            event_tx,
        ));

        drop(client);

        let result = tokio::time::timeout(Duration::from_millis(100), task_handle)
            .await
            .unwrap();

        assert!(result.unwrap().is_ok());
    }
}
