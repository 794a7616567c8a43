//! Worker entry points: receive requests, send plain or streamed
//! responses.
//!
//! # Architecture
//!
//! ```text
//! Transport::wait_frame ──► detect codec (first frame only)
//!                             │
//!                             ▼
//!                        HeaderCodec::decode_request ──► Request
//!
//! respond / respond_stream
//!   │  HeaderCodec::encode_head (once per exchange)
//!   ▼
//! frame per chunk ──► Transport::send_frame
//!        ▲                   │
//!        └── poll StreamStop ┘  (checked at each chunk boundary)
//! ```
//!
//! One exchange at a time: a request is decoded, its response fully
//! emitted, and only then is the next frame awaited. The negotiated
//! codec is written once and read for the rest of the worker's life.

use bytes::Bytes;
use hostbridge_relay::{Codec, CommandKind, Frame, Transport};

use crate::body::{BodyProducer, ChunkedBody};
use crate::codec::{detect, header_codec};
use crate::error::{HttpError, HttpResult};
use crate::headers::Headers;
use crate::request::Request;

/// Tunables for response emission.
#[derive(Debug, Clone, Default)]
pub struct WorkerOptions {
    /// When set, a fixed response body larger than this many bytes is
    /// sent as a chunked stream instead of one frame.
    pub chunk_size: Option<usize>,
}

impl WorkerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream fixed bodies larger than `size` bytes in `size`-byte chunks.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }
}

/// Worker-side half of the request/response bridge.
///
/// Owns the transport and the codec negotiated for this worker's
/// lifetime. Exercising both codecs in one process is a matter of
/// constructing two workers.
pub struct HttpWorker<T: Transport> {
    transport: T,
    codec: Option<Codec>,
    options: WorkerOptions,
}

impl<T: Transport> HttpWorker<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, WorkerOptions::default())
    }

    pub fn with_options(transport: T, options: WorkerOptions) -> Self {
        Self {
            transport,
            codec: None,
            options,
        }
    }

    /// Construct with a pre-selected codec, skipping negotiation.
    /// Intended for tests that exercise the outbound path in isolation.
    pub fn with_codec(transport: T, codec: Codec) -> Self {
        Self {
            transport,
            codec: Some(codec),
            options: WorkerOptions::default(),
        }
    }

    /// The codec negotiated so far, if any.
    pub fn codec(&self) -> Option<Codec> {
        self.codec
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Wait for the next request.
    ///
    /// Returns `Ok(None)` when the host asks the worker to terminate,
    /// signalled either by the channel closing or by a frame with empty
    /// header and empty body. The first real frame fixes the codec for
    /// the rest of the worker's life.
    pub fn wait_request(&mut self) -> HttpResult<Option<Request>> {
        let Some(frame) = self.transport.wait_frame()? else {
            tracing::debug!("channel closed, terminating");
            return Ok(None);
        };

        if frame.header.is_empty() && frame.body.is_empty() {
            tracing::debug!("termination request received");
            return Ok(None);
        }

        let codec = match self.codec {
            Some(codec) => codec,
            None => {
                let codec = detect(&frame.header);
                tracing::debug!(codec = ?codec, "negotiated header codec");
                self.codec = Some(codec);
                codec
            }
        };

        header_codec(codec)
            .decode_request(&frame.header, frame.body)
            .map(Some)
    }

    /// Send a complete response in a single frame.
    ///
    /// With [`WorkerOptions::chunk_size`] configured, a body larger than
    /// the threshold is streamed in chunks instead. `end_of_stream`
    /// normally stays `true`; passing `false` leaves the exchange open
    /// for frames the caller will send by other means.
    pub fn respond(
        &mut self,
        status: u16,
        body: impl Into<Bytes>,
        headers: &Headers,
        end_of_stream: bool,
    ) -> HttpResult<()> {
        let body = body.into();
        if is_informational(status) && !body.is_empty() {
            return Err(HttpError::InvalidStatusBody(status));
        }

        if let Some(chunk_size) = self.options.chunk_size {
            if body.len() > chunk_size {
                let mut producer = ChunkedBody::new(body, chunk_size);
                return self.respond_stream(status, &mut producer, headers, end_of_stream);
            }
        }

        let codec = self.active_codec();
        let head = header_codec(codec).encode_head(status, headers)?;
        self.transport
            .send_frame(Frame::new(body, Some(head.into()), end_of_stream), codec)?;
        Ok(())
    }

    /// Send a streamed response, pulling chunks from `body` until it is
    /// exhausted, fails, or the host stops the stream.
    ///
    /// The response head rides the first frame only. A host-initiated
    /// stop is observed at chunk boundaries: the producer is told to
    /// clean up and the stop is acknowledged with an empty terminal
    /// frame. A producer failure likewise closes the exchange with an
    /// empty terminal frame; neither is surfaced as an error because the
    /// exchange is already over from the host's point of view.
    pub fn respond_stream(
        &mut self,
        status: u16,
        body: &mut dyn BodyProducer,
        headers: &Headers,
        end_of_stream: bool,
    ) -> HttpResult<()> {
        if is_informational(status) {
            return Err(HttpError::InvalidStatusBody(status));
        }

        let codec = self.active_codec();
        let mut head = Some(Bytes::from(header_codec(codec).encode_head(status, headers)?));

        loop {
            match body.pull() {
                Ok(Some(chunk)) => {
                    if self.transport.poll_command(CommandKind::StreamStop).is_some() {
                        tracing::debug!("host stopped the stream, acknowledging");
                        body.on_cancel();
                        // The host waits for this frame before reusing
                        // the worker; skipping it would hang the channel.
                        self.transport.send_frame(Frame::empty(), codec)?;
                        return Ok(());
                    }
                    self.transport
                        .send_frame(Frame::new(chunk, head.take(), false), codec)?;
                }
                Ok(None) => {
                    let tail = body.finish();
                    if tail.is_empty() && !end_of_stream {
                        // Nothing left to say and the stream stays open:
                        // an empty frame here would be read as content.
                        return Ok(());
                    }
                    self.transport
                        .send_frame(Frame::new(tail, head.take(), end_of_stream), codec)?;
                    return Ok(());
                }
                Err(error) => {
                    tracing::warn!(%error, "body producer failed, closing exchange");
                    self.transport.send_frame(Frame::empty(), codec)?;
                    return Ok(());
                }
            }
        }
    }

    /// The negotiated codec, defaulting to JSON when a response is sent
    /// before any request has been decoded.
    fn active_codec(&self) -> Codec {
        self.codec.unwrap_or_else(|| {
            tracing::debug!("no codec negotiated yet, defaulting to JSON");
            Codec::Json
        })
    }
}

fn is_informational(status: u16) -> bool {
    (100..200).contains(&status)
}
