//! Error types for server startup
//!
//! Request-level failures never reach this type: they are mapped to HTTP
//! statuses inside the handler. Only conditions that prevent the server from
//! starting (or from being torn down cleanly) are represented here.

use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum ServerError {
    /// The OS reported address-in-use while binding
    #[error("port {port} is already in use")]
    AddrInUse { port: u16 },

    /// Any other bind failure
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// `--bind` value that does not form a socket address
    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    /// Served root does not exist or cannot be resolved
    #[error("cannot serve directory '{path}': {source}")]
    Root {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration layering or deserialization failed
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Runtime construction or signal registration failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Classify a bind error, singling out address-in-use
    pub fn from_bind(addr: SocketAddr, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            Self::AddrInUse { port: addr.port() }
        } else {
            Self::Bind { addr, source }
        }
    }
}
