//! rigctl Responder
//!
//! This crate answers hamlib `rigctl` clients over TCP from a shared
//! [`RadioBackend`](rigctl_protocol::RadioBackend).
//!
//! # Architecture
//!
//! ```text
//! RigctlServer (accept loop)
//!   └─ run_connection (one task per client)
//!        └─ LineCodec → RigctlCommand → Dispatcher → RadioBackend
//! ```
//!
//! - [`RigctlServer`] binds the listener and spawns a connection task per client
//! - [`run_connection`] frames the byte stream into lines and writes replies
//! - [`Dispatcher`] executes each command synchronously against the backend
//! - All connection and traffic activity is published as [`ServerEvent`]s
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rigctl_server::{RigctlServer, ServerCommand, ServerConfig};
//! use rigctl_sim::VirtualRadio;
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), rigctl_server::ServerError> {
//! let config = ServerConfig::default();
//! let radio = Arc::new(VirtualRadio::from_config(config.radio.clone()));
//! let server = RigctlServer::from_config(&config, radio).await?;
//!
//! let (cmd_tx, cmd_rx) = mpsc::channel::<ServerCommand>(4);
//! server.run(cmd_rx).await?;
//! # drop(cmd_tx);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod server;

pub use config::{ServerConfig, CONFIG_ENV, DEFAULT_PORT, PORT_ENV};
pub use connection::run_connection;
pub use dispatch::{DispatchOptions, Dispatcher};
pub use error::{ConfigError, ServerError};
pub use events::ServerEvent;
pub use server::{RigctlServer, ServerCommand};
