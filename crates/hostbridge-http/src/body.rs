//! Pull-based response body producers.
//!
//! A streamed response body is a lazy, non-restartable sequence of
//! chunks. The emitter pulls one chunk at a time, so a producer only
//! runs between frames; there is no background execution. Producers can
//! carry a terminal value to be sent as the final frame, and are told
//! about host-initiated cancellation so they can release resources.

use bytes::Bytes;
use thiserror::Error;

/// Failure raised by a producer while generating its next chunk.
///
/// The emitter absorbs this: it closes the exchange with an empty
/// terminal frame and logs the failure, because from the host's point
/// of view the stream has simply ended.
#[derive(Debug, Error)]
#[error("body producer failed: {0}")]
pub struct ProducerError(pub String);

impl ProducerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Lazy source of response body chunks.
pub trait BodyProducer {
    /// Produce the next chunk, or `Ok(None)` once exhausted.
    ///
    /// May block (reading a file, an upstream socket); the bridge adds
    /// no scheduling around it.
    fn pull(&mut self) -> Result<Option<Bytes>, ProducerError>;

    /// Terminal value, taken exactly once after [`pull`] returns
    /// `Ok(None)`. Sent as the content of the final frame.
    ///
    /// [`pull`]: BodyProducer::pull
    fn finish(&mut self) -> Bytes {
        Bytes::new()
    }

    /// The host cancelled the stream. Runs cleanup; no further chunks
    /// will be pulled.
    fn on_cancel(&mut self) {}
}

/// Adapter turning any iterator of chunk-convertible items into a
/// producer with an empty terminal value.
pub struct IterBody<I> {
    iter: I,
}

impl<I> IterBody<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I, B> BodyProducer for IterBody<I>
where
    I: Iterator<Item = B>,
    B: Into<Bytes>,
{
    fn pull(&mut self) -> Result<Option<Bytes>, ProducerError> {
        Ok(self.iter.next().map(Into::into))
    }
}

/// Splits a fixed body into fixed-size chunks, keeping the remainder as
/// the terminal value so the last frame carries content instead of an
/// empty tail.
pub struct ChunkedBody {
    data: Bytes,
    chunk_size: usize,
}

impl ChunkedBody {
    /// `chunk_size` must be non-zero.
    pub fn new(data: impl Into<Bytes>, chunk_size: usize) -> Self {
        Self {
            data: data.into(),
            chunk_size: chunk_size.max(1),
        }
    }
}

impl BodyProducer for ChunkedBody {
    fn pull(&mut self) -> Result<Option<Bytes>, ProducerError> {
        if self.data.len() <= self.chunk_size {
            return Ok(None);
        }
        Ok(Some(self.data.split_to(self.chunk_size)))
    }

    fn finish(&mut self) -> Bytes {
        std::mem::take(&mut self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(producer: &mut impl BodyProducer) -> (Vec<Bytes>, Bytes) {
        let mut chunks = Vec::new();
        while let Ok(Some(chunk)) = producer.pull() {
            chunks.push(chunk);
        }
        let tail = producer.finish();
        (chunks, tail)
    }

    #[test]
    fn iter_body_yields_all_items() {
        let mut body = IterBody::new(["Hel", "lo,", " Wo", "rld", "!"]);
        let (chunks, tail) = drain(&mut body);

        assert_eq!(chunks.len(), 5);
        assert!(tail.is_empty());
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(joined, b"Hello, World!");
    }

    #[test]
    fn iter_body_empty() {
        let mut body = IterBody::new(Vec::<&'static str>::new());
        let (chunks, tail) = drain(&mut body);

        assert!(chunks.is_empty());
        assert!(tail.is_empty());
    }

    #[test]
    fn chunked_body_keeps_remainder_as_terminal_value() {
        let mut body = ChunkedBody::new("abcdefgh", 3);
        let (chunks, tail) = drain(&mut body);

        assert_eq!(chunks, vec![Bytes::from("abc"), Bytes::from("def")]);
        assert_eq!(tail, Bytes::from("gh"));
    }

    #[test]
    fn chunked_body_exact_multiple() {
        let mut body = ChunkedBody::new("abcdef", 3);
        let (chunks, tail) = drain(&mut body);

        // The final full chunk travels as the terminal value.
        assert_eq!(chunks, vec![Bytes::from("abc")]);
        assert_eq!(tail, Bytes::from("def"));
    }

    #[test]
    fn chunked_body_smaller_than_chunk() {
        let mut body = ChunkedBody::new("ab", 16);
        let (chunks, tail) = drain(&mut body);

        assert!(chunks.is_empty());
        assert_eq!(tail, Bytes::from("ab"));
    }
}
