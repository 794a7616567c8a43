//! hostbridge-http — the worker-side HTTP protocol bridge.
//!
//! Decodes inbound frames from the host into a canonical [`Request`],
//! encodes status/headers/body back into frames, and drives streamed
//! response bodies that the host can stop mid-flight. The header bytes
//! on the wire use one of two encodings, JSON text or protobuf binary,
//! chosen on the first inbound frame and kept for the worker's life.
//!
//! # Architecture
//!
//! ```text
//! HttpWorker
//!   ├── wait_request()
//!   │     ├── codec::detect (first frame only)
//!   │     └── HeaderCodec::decode_request
//!   │           ├── headers::sanitize_headers
//!   │           ├── query::parse_query
//!   │           └── request::Request
//!   ├── respond()          single frame, or ChunkedBody above the
//!   │                      configured threshold
//!   └── respond_stream()   BodyProducer pulled chunk by chunk,
//!                          StreamStop polled at each boundary
//! ```
//!
//! The transport itself (pipes, sockets, framing) is not implemented
//! here; see `hostbridge-relay` for the contract this crate consumes.

pub mod body;
pub mod codec;
pub mod error;
pub mod headers;
pub mod proto;
pub mod query;
pub mod request;
pub mod worker;

pub use body::{BodyProducer, ChunkedBody, IterBody, ProducerError};
pub use codec::{HeaderCodec, JsonCodec, ProtoCodec, detect, header_codec};
pub use error::{HttpError, HttpResult};
pub use headers::{Headers, sanitize_headers};
pub use query::parse_query;
pub use request::{FileUpload, Request, UploadEntry};
pub use worker::{HttpWorker, WorkerOptions};

pub use hostbridge_relay::{
    Codec, Command, CommandKind, Frame, InboundFrame, MemoryTransport, RelayError, Transport,
};
