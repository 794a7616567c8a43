//! Error types for the HTTP bridge.

use hostbridge_relay::RelayError;
use thiserror::Error;

/// Result type alias for bridge operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors surfaced by the HTTP bridge.
///
/// Decode-time structural errors are fatal for the exchange but not for
/// the process. Mid-stream producer failures and host-initiated stream
/// stops are absorbed inside the response emitter and never reach the
/// caller; the transport is always left in a consistent terminated
/// state for the exchange.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Inbound header bytes could not be parsed under the active codec.
    #[error("malformed request payload: {0}")]
    MalformedPayload(String),

    /// Informational (1xx) status codes cannot carry a response body.
    #[error("unable to send a body with informational status code {0}")]
    InvalidStatusBody(u16),

    /// Failure on the underlying transport.
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),
}
