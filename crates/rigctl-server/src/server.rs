//! TCP listener actor
//!
//! Binds the listening socket, then runs a select loop that:
//! - Accepts clients and spawns one connection task per client
//! - Reaps finished connection tasks
//! - Handles shutdown commands from a channel

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rigctl_protocol::RadioBackend;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::connection::run_connection;
use crate::dispatch::{DispatchOptions, Dispatcher};
use crate::error::ServerError;
use crate::events::ServerEvent;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Pause after a failed accept (e.g. descriptor exhaustion)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Commands that can be sent to a running server
#[derive(Debug, Clone)]
pub enum ServerCommand {
    /// Stop accepting and drop all client connections
    Shutdown,
}

/// A bound rigctl responder
pub struct RigctlServer {
    listener: TcpListener,
    dispatcher: Dispatcher,
    event_tx: broadcast::Sender<ServerEvent>,
}

impl RigctlServer {
    /// Bind the listening socket
    ///
    /// Failure to bind is fatal; there is no retry. The caller reports it.
    pub async fn bind(addr: SocketAddr, dispatcher: Dispatcher) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            listener,
            dispatcher,
            event_tx,
        })
    }

    /// Bind using a server configuration and a radio backend
    pub async fn from_config(
        config: &ServerConfig,
        backend: Arc<dyn RadioBackend>,
    ) -> Result<Self, ServerError> {
        let options = DispatchOptions {
            strict_arguments: config.strict_arguments,
        };
        Self::bind(config.socket_addr(), Dispatcher::new(backend, options)).await
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Subscribe to connection and traffic events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Accept clients until shutdown is requested or the command channel closes
    pub async fn run(self, mut cmd_rx: mpsc::Receiver<ServerCommand>) -> Result<(), ServerError> {
        let local_addr = self.local_addr()?;
        info!("rigctl: Listening on {}", local_addr);
        let _ = self.event_tx.send(ServerEvent::Listening { addr: local_addr });

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            info!("rigctl client connected: {}", peer);
                            if let Err(e) = stream.set_nodelay(true) {
                                debug!("rigctl client {}: set_nodelay failed: {}", peer, e);
                            }

                            let dispatcher = self.dispatcher.clone();
                            let event_tx = self.event_tx.clone();
                            connections.spawn(async move {
                                let _ = event_tx.send(ServerEvent::ClientConnected { peer });
                                if let Err(e) = run_connection(stream, peer, dispatcher, event_tx.clone()).await {
                                    warn!("rigctl client {} error: {}", peer, e);
                                }
                                info!("rigctl client disconnected: {}", peer);
                                let _ = event_tx.send(ServerEvent::ClientDisconnected { peer });
                            });
                        }
                        Err(e) => {
                            // Per-connection failures (e.g. reset before accept) are not fatal
                            warn!("rigctl: accept failed: {}", e);
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        }
                    }
                }

                Some(_) = connections.join_next(), if !connections.is_empty() => {}

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ServerCommand::Shutdown) => {
                            info!("rigctl: shutdown requested");
                            break;
                        }
                        None => {
                            debug!("rigctl: command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        let open = connections.len();
        connections.shutdown().await;
        info!("rigctl: server stopped ({} connections closed)", open);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rigctl_sim::VirtualRadio;

    use super::*;

    fn loopback_config() -> ServerConfig {
        ServerConfig {
            listen_addr: "127.0.0.1".parse().unwrap(),
            port: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let radio = Arc::new(VirtualRadio::default());
        let first = RigctlServer::from_config(&loopback_config(), radio.clone())
            .await
            .unwrap();
        let taken = first.local_addr().unwrap();

        let config = ServerConfig {
            listen_addr: taken.ip(),
            port: taken.port(),
            ..Default::default()
        };
        let err = RigctlServer::from_config(&config, radio).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { addr, .. } if addr == taken));
    }

    #[tokio::test]
    async fn test_shutdown_command_stops_server() {
        let radio = Arc::new(VirtualRadio::default());
        let server = RigctlServer::from_config(&loopback_config(), radio)
            .await
            .unwrap();
        let mut events = server.subscribe();
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let handle = tokio::spawn(server.run(cmd_rx));

        let event = events.recv().await.unwrap();
        assert!(matches!(event, ServerEvent::Listening { .. }));

        cmd_tx.send(ServerCommand::Shutdown).await.unwrap();
        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_closed_command_channel_stops_server() {
        let radio = Arc::new(VirtualRadio::default());
        let server = RigctlServer::from_config(&loopback_config(), radio)
            .await
            .unwrap();
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        drop(cmd_tx);

        let result = tokio::time::timeout(Duration::from_secs(1), server.run(cmd_rx))
            .await
            .unwrap();
        assert!(result.is_ok());
    }
}
