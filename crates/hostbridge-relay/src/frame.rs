//! Frame and codec-hint types.
//!
//! A frame is the unit the transport moves in either direction: header
//! bytes, body bytes, and an end-of-stream flag. Outbound frames carry
//! the header at most once per exchange; the [`Codec`] hint tells the
//! transport which encoding the header bytes use so the host can route
//! them without sniffing.

use bytes::Bytes;

/// Wire encoding of header bytes within one worker lifetime.
///
/// Negotiated once, on the first inbound frame, and then used for both
/// decoding inbound headers and encoding outbound ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Text encoding: header bytes are a JSON document.
    Json,
    /// Binary encoding: header bytes are a protobuf message.
    Proto,
}

/// One inbound unit from the host.
///
/// A frame with an empty header and an empty body is a termination
/// request, equivalent to the channel closing.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundFrame {
    /// Request context bytes, encoded per the negotiated [`Codec`].
    pub header: Bytes,
    /// Raw request body bytes.
    pub body: Bytes,
    /// Whether the host considers this the final frame of its stream.
    pub end_of_stream: bool,
}

impl InboundFrame {
    pub fn new(header: impl Into<Bytes>, body: impl Into<Bytes>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
            end_of_stream: true,
        }
    }
}

/// One outbound unit sent to the host.
///
/// `header` is `Some` exactly once per response stream, on its first
/// frame. `end_of_stream = true` marks the terminal frame; nothing may
/// be sent for the exchange after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Body chunk bytes; may be empty.
    pub body: Bytes,
    /// Encoded response head, attached to the first frame only.
    pub header: Option<Bytes>,
    /// Whether this is the terminal frame of the exchange.
    pub end_of_stream: bool,
}

impl Frame {
    pub fn new(body: impl Into<Bytes>, header: Option<Bytes>, end_of_stream: bool) -> Self {
        Self {
            body: body.into(),
            header,
            end_of_stream,
        }
    }

    /// An empty terminal frame: no body, no header, end-of-stream set.
    ///
    /// This is the acknowledgement shape used to close an exchange after
    /// a stream stop or a producer failure.
    pub fn empty() -> Self {
        Self {
            body: Bytes::new(),
            header: None,
            end_of_stream: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_terminal() {
        let frame = Frame::empty();
        assert!(frame.body.is_empty());
        assert!(frame.header.is_none());
        assert!(frame.end_of_stream);
    }

    #[test]
    fn inbound_frame_defaults_to_end_of_stream() {
        let frame = InboundFrame::new("head", "body");
        assert_eq!(frame.header, Bytes::from("head"));
        assert_eq!(frame.body, Bytes::from("body"));
        assert!(frame.end_of_stream);
    }
}
