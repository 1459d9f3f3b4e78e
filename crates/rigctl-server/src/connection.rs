//! Per-client connection task
//!
//! Owns one client stream for its whole lifetime. Bytes are framed into
//! lines by [`LineCodec`]; every complete line is dispatched and answered
//! in order before the next read. When the stream ends or fails the task
//! returns and everything it buffered is dropped with it.

use std::io;
use std::net::SocketAddr;

use rigctl_protocol::{LineCodec, ProtocolCodec};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::dispatch::Dispatcher;
use crate::events::ServerEvent;

const READ_BUFFER_SIZE: usize = 1024;

/// Serve one client until it disconnects
///
/// A partial line left in the buffer at end of stream gets no reply.
pub async fn run_connection<S>(
    mut stream: S,
    peer: SocketAddr,
    dispatcher: Dispatcher,
    event_tx: broadcast::Sender<ServerEvent>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut codec = LineCodec::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => {
                if codec.buffered_len() > 0 {
                    debug!(
                        "rigctl client {} closed with {} unterminated bytes",
                        peer,
                        codec.buffered_len()
                    );
                }
                return Ok(());
            }
            Ok(n) => n,
            Err(e) => {
                warn!("rigctl client {} read error: {}", peer, e);
                return Err(e);
            }
        };

        codec.push_bytes(&buf[..n]);

        let mut wrote = false;
        while let Some(line) = codec.next_command() {
            let response = dispatcher.handle_line(&line);
            let encoded = response.encode();
            debug!(
                "rigctl {} <- {:?} -> {:?}",
                peer,
                line.raw(),
                String::from_utf8_lossy(&encoded)
            );

            stream.write_all(&encoded).await?;
            wrote = true;

            let _ = event_tx.send(ServerEvent::CommandHandled {
                peer,
                line: line.raw().to_string(),
                response: encoded,
            });
        }

        if wrote {
            stream.flush().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rigctl_protocol::{RadioBackend, Vfo};
    use rigctl_sim::VirtualRadio;
    use tokio::io::DuplexStream;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::dispatch::DispatchOptions;

    fn test_peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn spawn_connection(
        radio: Arc<VirtualRadio>,
    ) -> (
        DuplexStream,
        broadcast::Receiver<ServerEvent>,
        JoinHandle<io::Result<()>>,
    ) {
        let (client, server) = tokio::io::duplex(4096);
        let (event_tx, event_rx) = broadcast::channel(64);
        let dispatcher = Dispatcher::new(radio, DispatchOptions::default());
        let handle = tokio::spawn(run_connection(server, test_peer(), dispatcher, event_tx));
        (client, event_rx, handle)
    }

    async fn read_exactly(client: &mut DuplexStream, len: usize) -> String {
        let mut out = vec![0u8; len];
        tokio::time::timeout(Duration::from_secs(1), client.read_exact(&mut out))
            .await
            .unwrap()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_answers_each_line_in_order() {
        let radio = Arc::new(VirtualRadio::default());
        let (mut client, _events, handle) = spawn_connection(radio.clone());

        client.write_all(b"F 7100000\nf\n").await.unwrap();
        let expected = "RPRT 0\n7100000\n";
        assert_eq!(read_exactly(&mut client, expected.len()).await, expected);

        client.write_all(b"V VFOB\r\nv\r\n").await.unwrap();
        let expected = "RPRT 0\nVFOB\n";
        assert_eq!(read_exactly(&mut client, expected.len()).await, expected);
        assert_eq!(radio.vfo(), Vfo::B);

        drop(client);
        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fragmented_line_waits_for_terminator() {
        let radio = Arc::new(VirtualRadio::default());
        let (mut client, mut events, _handle) = spawn_connection(radio.clone());

        client.write_all(b"F 1407").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(radio.frequency_hz(), 434_500_000);
        assert!(events.try_recv().is_err());

        client.write_all(b"4000\r\n").await.unwrap();
        assert_eq!(read_exactly(&mut client, 7).await, "RPRT 0\n");
        assert_eq!(radio.frequency_hz(), 14_074_000);
    }

    #[tokio::test]
    async fn test_empty_line_is_unknown() {
        let radio = Arc::new(VirtualRadio::default());
        let (mut client, _events, _handle) = spawn_connection(radio);

        client.write_all(b"\r\n").await.unwrap();
        assert_eq!(read_exactly(&mut client, 9).await, "RPRT -11\n");
    }

    #[tokio::test]
    async fn test_emits_command_events() {
        let radio = Arc::new(VirtualRadio::default());
        let (mut client, mut events, _handle) = spawn_connection(radio);

        client.write_all(b"  f  \n").await.unwrap();
        read_exactly(&mut client, 10).await;

        let event = tokio::time::timeout(Duration::from_millis(100), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            ServerEvent::CommandHandled {
                peer: test_peer(),
                line: "f".to_string(),
                response: b"434500000\n".to_vec(),
            }
        );
    }

    #[tokio::test]
    async fn test_overlong_line_gets_one_reply_when_fragmented() {
        let mut overlong = b"F 7100000".to_vec();
        overlong.extend(std::iter::repeat(b' ').take(1100));

        for fragmented in [false, true] {
            let radio = Arc::new(VirtualRadio::default());
            let (mut client, _events, _handle) = spawn_connection(radio.clone());

            if fragmented {
                client.write_all(&overlong).await.unwrap();
                tokio::time::sleep(Duration::from_millis(50)).await;
                client.write_all(b"\nv\n").await.unwrap();
            } else {
                let mut bytes = overlong.clone();
                bytes.extend_from_slice(b"\nv\n");
                client.write_all(&bytes).await.unwrap();
            }

            let expected = "RPRT -11\nVFOA\n";
            assert_eq!(read_exactly(&mut client, expected.len()).await, expected);
            assert_eq!(radio.frequency_hz(), 434_500_000);
        }
    }

    #[tokio::test]
    async fn test_partial_line_at_close_gets_no_reply() {
        let radio = Arc::new(VirtualRadio::default());
        let (client, server) = tokio::io::duplex(1024);
        let (event_tx, mut events) = broadcast::channel(8);
        let dispatcher = Dispatcher::new(radio.clone(), DispatchOptions::default());
        let handle = tokio::spawn(run_connection(server, test_peer(), dispatcher, event_tx));

        let (mut reader, mut writer) = tokio::io::split(client);
        writer.write_all(b"F 7000000").await.unwrap();
        writer.shutdown().await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(radio.frequency_hz(), 434_500_000);
        assert!(events.try_recv().is_err());

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
