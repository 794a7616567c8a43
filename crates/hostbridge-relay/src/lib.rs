//! hostbridge-relay — the frame transport contract between a worker and
//! its host process.
//!
//! The host delivers requests as framed payloads (header bytes, body
//! bytes, end-of-stream flag) and accepts framed responses back. This
//! crate defines the wire-level vocabulary shared by every Hostbridge
//! worker: the [`Frame`] types, the [`Codec`] hint attached to outbound
//! frames, out-of-band control [`Command`]s, and the [`Transport`] trait
//! that concrete pipe/socket relays implement.
//!
//! # Architecture
//!
//! ```text
//! Host process
//!   │  inbound frame {header, body, eos}
//!   ▼
//! Transport::wait_frame ──► worker decodes, runs application logic
//!   │                            │
//!   │  control frame (StreamStop)│ outbound frames
//!   ▼                            ▼
//! CommandQueue ◄── poll_command  Transport::send_frame ──► Host
//! ```
//!
//! The actual socket/pipe framing lives outside this repository; the
//! in-memory [`MemoryTransport`] here exists so worker logic can be
//! exercised without a live host.

pub mod command;
pub mod error;
pub mod frame;
pub mod transport;

pub use command::{Command, CommandKind, CommandQueue};
pub use error::{RelayError, RelayResult};
pub use frame::{Codec, Frame, InboundFrame};
pub use transport::{MemoryTransport, SentFrame, Transport};
