//! Error types for relay transports.

use thiserror::Error;

/// Result type alias for transport operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that can occur while exchanging frames with the host.
#[derive(Debug, Error)]
pub enum RelayError {
    /// I/O failure on the underlying pipe or socket.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The host closed the channel while a frame was expected.
    #[error("relay closed")]
    Closed,

    /// The peer sent bytes that do not form a valid frame.
    #[error("protocol error: {0}")]
    Protocol(String),
}
