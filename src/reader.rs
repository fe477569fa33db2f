//! Bounded capture of an input stream into a fixed-size buffer.

use std::io::{self, Read};

/// Default capture capacity in bytes.
pub(crate) const DEFAULT_MAX_BYTES: usize = 16384;

const CHUNK_SIZE: usize = 4096;

/// Text captured from a stream, decoded from only the bytes actually stored.
#[derive(Debug, Clone)]
pub(crate) struct Capture {
    pub(crate) text: String,
    pub(crate) bytes: usize,
    pub(crate) capacity: usize,
    pub(crate) truncated: bool,
}

impl Capture {
    /// Capacity the input was cut at, if any bytes were dropped.
    pub(crate) fn truncated_at(&self) -> Option<usize> {
        self.truncated.then_some(self.capacity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Filling,
    // Exactly at capacity with nothing dropped yet.
    Full,
    Done,
}

/// Chunk-driven accumulator that completes exactly once.
///
/// `push` and `finish` each return the capture when their event completes the
/// read; every event after completion is ignored.
pub(crate) struct BoundedBuffer {
    buf: Vec<u8>,
    filled: usize,
    state: State,
}

impl BoundedBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            filled: 0,
            state: State::Filling,
        }
    }

    /// Copy as much of `chunk` as fits. Completes with `truncated = true` once
    /// a byte has to be dropped.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Option<Capture> {
        match self.state {
            State::Done => None,
            State::Full => {
                if chunk.is_empty() {
                    return None;
                }
                Some(self.complete(true))
            }
            State::Filling => {
                let room = self.buf.len() - self.filled;
                let take = room.min(chunk.len());
                self.buf[self.filled..self.filled + take].copy_from_slice(&chunk[..take]);
                self.filled += take;
                if take < chunk.len() {
                    return Some(self.complete(true));
                }
                if self.filled == self.buf.len() {
                    self.state = State::Full;
                }
                None
            }
        }
    }

    /// Signal end of stream. Completes with `truncated = false` unless the
    /// read already completed.
    pub(crate) fn finish(&mut self) -> Option<Capture> {
        if self.state == State::Done {
            return None;
        }
        Some(self.complete(false))
    }

    fn complete(&mut self, truncated: bool) -> Capture {
        self.state = State::Done;
        let bytes = &self.buf[..self.filled];
        Capture {
            // A cut inside a multi-byte sequence decodes to U+FFFD.
            text: String::from_utf8_lossy(bytes).into_owned(),
            bytes: self.filled,
            capacity: self.buf.len(),
            truncated,
        }
    }
}

/// Drain `reader` into a buffer of `capacity` bytes.
///
/// Stops reading as soon as the capture completes, so an oversized stream is
/// never buffered past `capacity` plus one chunk. After an exact fill one more
/// read decides truncation, so a terminal needs an extra end-of-input.
pub(crate) fn read_bounded(mut reader: impl Read, capacity: usize) -> io::Result<Capture> {
    let mut buffer = BoundedBuffer::new(capacity);
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        let completed = if read == 0 {
            buffer.finish()
        } else {
            buffer.push(&chunk[..read])
        };
        if let Some(capture) = completed {
            return Ok(capture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that hands out data in fixed-size pieces.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn short_input_is_not_truncated() {
        let capture = read_bounded(&b"abc"[..], 16).expect("read");
        assert_eq!(capture.text, "abc");
        assert_eq!(capture.bytes, 3);
        assert!(!capture.truncated);
        assert_eq!(capture.truncated_at(), None);
    }

    #[test]
    fn exactly_capacity_is_not_truncated() {
        let data = vec![b'a'; DEFAULT_MAX_BYTES];
        let capture = read_bounded(&data[..], DEFAULT_MAX_BYTES).expect("read");
        assert!(!capture.truncated);
        assert_eq!(capture.text.len(), DEFAULT_MAX_BYTES);
    }

    #[test]
    fn one_byte_over_capacity_is_truncated() {
        let data = vec![b'a'; DEFAULT_MAX_BYTES + 1];
        let capture = read_bounded(&data[..], DEFAULT_MAX_BYTES).expect("read");
        assert!(capture.truncated);
        assert_eq!(capture.text.len(), DEFAULT_MAX_BYTES);
        assert_eq!(capture.truncated_at(), Some(DEFAULT_MAX_BYTES));
    }

    #[test]
    fn small_chunks_accumulate_in_order() {
        let reader = Trickle {
            data: b"HTTP/1.1 200 OK\nContent-MD5: x\n",
            step: 3,
        };
        let capture = read_bounded(reader, 64).expect("read");
        assert_eq!(capture.text, "HTTP/1.1 200 OK\nContent-MD5: x\n");
        assert!(!capture.truncated);
    }

    #[test]
    fn trickled_overflow_is_truncated() {
        let reader = Trickle {
            data: b"0123456789",
            step: 1,
        };
        let capture = read_bounded(reader, 4).expect("read");
        assert_eq!(capture.text, "0123");
        assert!(capture.truncated);
    }

    #[test]
    fn chunks_after_completion_are_ignored() {
        let mut buffer = BoundedBuffer::new(4);
        let capture = buffer.push(b"abcdef").expect("overflow completes");
        assert_eq!(capture.text, "abcd");
        assert!(capture.truncated);
        assert!(buffer.push(b"ghij").is_none());
        assert!(buffer.push(&[0u8; 1024]).is_none());
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn exact_fill_waits_for_next_event() {
        let mut buffer = BoundedBuffer::new(4);
        assert!(buffer.push(b"ab").is_none());
        assert!(buffer.push(b"cd").is_none());
        assert!(buffer.push(b"").is_none());
        let capture = buffer.finish().expect("end completes");
        assert!(!capture.truncated);
        assert_eq!(capture.text, "abcd");
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn data_after_exact_fill_marks_truncation() {
        let mut buffer = BoundedBuffer::new(4);
        assert!(buffer.push(b"abcd").is_none());
        let capture = buffer.push(b"e").expect("extra byte completes");
        assert!(capture.truncated);
        assert_eq!(capture.text, "abcd");
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn split_multibyte_sequence_is_replaced() {
        // "é" is 0xC3 0xA9; the cap lands between the two bytes.
        let capture = read_bounded("aé".as_bytes(), 2).expect("read");
        assert!(capture.truncated);
        assert_eq!(capture.bytes, 2);
        assert_eq!(capture.text, "a\u{FFFD}");
    }

    #[test]
    fn empty_stream_yields_empty_text() {
        let capture = read_bounded(io::empty(), 8).expect("read");
        assert_eq!(capture.text, "");
        assert!(!capture.truncated);
    }
}
