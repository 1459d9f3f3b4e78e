//! Server event stream
//!
//! Connection lifecycle and per-line traffic are published on a broadcast
//! channel so observers (a traffic monitor, tests) can follow what clients
//! are doing. Publishing with no subscribers is not an error.

use std::net::SocketAddr;

/// Event emitted by the responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The listener is accepting connections
    Listening {
        /// Bound address
        addr: SocketAddr,
    },

    /// A client connected
    ClientConnected {
        /// Client address
        peer: SocketAddr,
    },

    /// A client connection was torn down
    ClientDisconnected {
        /// Client address
        peer: SocketAddr,
    },

    /// One command line was answered
    CommandHandled {
        /// Client address
        peer: SocketAddr,
        /// Simplified command line
        line: String,
        /// Encoded reply
        response: Vec<u8>,
    },
}

impl ServerEvent {
    /// Client address, if the event concerns one client
    pub fn peer(&self) -> Option<SocketAddr> {
        match self {
            Self::Listening { .. } => None,
            Self::ClientConnected { peer }
            | Self::ClientDisconnected { peer }
            | Self::CommandHandled { peer, .. } => Some(*peer),
        }
    }
}
