//! Error types for the responder

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Listening socket could not be bound
    #[error("failed to bind rigctl listener on {addr}: {source}")]
    Bind {
        /// Address we tried to bind
        addr: SocketAddr,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File we tried to read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`ServerConfig`](crate::ServerConfig)
    #[error("invalid config {}: {source}", path.display())]
    Json {
        /// File we tried to parse
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Port override is not a valid port number
    #[error("invalid port override: {0:?}")]
    InvalidPort(String),
}
