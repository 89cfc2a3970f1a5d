//! Session input abstraction
//!
//! This module provides the blocking, line-oriented input source the
//! parser reads from, abstracting over the underlying transport the same
//! way the rest of the crate stays transport-agnostic.
//!
//! `BufferedInput` is the default implementation over any blocking
//! [`Read`]. It never consumes a partial line from its internal buffer:
//! if the underlying read is interrupted mid-line, the bytes read so far
//! stay buffered and the next `read_line` call delivers the complete line.
//! That property is what makes an interrupted header-block parse
//! resumable without duplication or loss.

use crate::buffer::LineBuffer;
use crate::Result;
use std::io::Read;

/// Blocking line-oriented input source
///
/// Implementations must strip the line terminator (LF or CRLF) before
/// handing the line over, and must report a transient interruption as an
/// I/O error with `ErrorKind::Interrupted` rather than swallowing it.
pub trait SessionInput {
    /// Append one physical line into `buf`, terminator stripped
    ///
    /// Returns the number of bytes appended, or `None` at end of stream.
    /// A blank line appends zero bytes and returns `Some(0)`.
    fn read_line(&mut self, buf: &mut LineBuffer) -> Result<Option<usize>>;

    /// Read raw bytes, for entity decoding after the header block
    ///
    /// Returns the number of bytes read; zero means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

const FILL_CHUNK: usize = 4096;

/// Buffered `SessionInput` over any blocking reader
pub struct BufferedInput<R: Read> {
    inner: R,
    buffer: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R: Read> BufferedInput<R> {
    /// Create a buffered input over a blocking reader
    pub fn new(inner: R) -> Self {
        BufferedInput {
            inner,
            buffer: Vec::with_capacity(FILL_CHUNK),
            pos: 0,
            eof: false,
        }
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the input and return the underlying reader
    ///
    /// Bytes already buffered but not yet consumed are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read more bytes from the underlying reader into the buffer
    ///
    /// An `Interrupted` error propagates to the caller with the buffer
    /// contents untouched, so a retried read continues where it left off.
    fn fill(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.buffer.drain(..self.pos);
            self.pos = 0;
        }

        let mut chunk = [0u8; FILL_CHUNK];
        let n = self.inner.read(&mut chunk)?;
        if n == 0 {
            self.eof = true;
        } else {
            self.buffer.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }
}

impl<R: Read> SessionInput for BufferedInput<R> {
    fn read_line(&mut self, buf: &mut LineBuffer) -> Result<Option<usize>> {
        loop {
            if let Some(nl) = self.buffer[self.pos..].iter().position(|b| *b == b'\n') {
                let end = self.pos + nl;
                let line_end = if end > self.pos && self.buffer[end - 1] == b'\r' {
                    end - 1
                } else {
                    end
                };
                let text = String::from_utf8_lossy(&self.buffer[self.pos..line_end]);
                let appended = text.len();
                buf.push_str(&text);
                self.pos = end + 1;
                return Ok(Some(appended));
            }

            if self.eof {
                if self.pos < self.buffer.len() {
                    // a trailing line without terminator still counts
                    let text = String::from_utf8_lossy(&self.buffer[self.pos..]);
                    let appended = text.len();
                    buf.push_str(&text);
                    self.pos = self.buffer.len();
                    return Ok(Some(appended));
                }
                return Ok(None);
            }

            self.fill()?;
        }
    }

    fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.pos < self.buffer.len() {
            let available = &self.buffer[self.pos..];
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            self.pos += n;
            return Ok(n);
        }
        if self.eof {
            return Ok(0);
        }
        Ok(self.inner.read(out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn read_one(input: &mut impl SessionInput) -> Option<String> {
        let mut buf = LineBuffer::new();
        input.read_line(&mut buf).unwrap().map(|_| buf.as_str().to_string())
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let mut input = BufferedInput::new(&b"Host: localhost\r\nAccept: */*\nlast"[..]);

        assert_eq!(read_one(&mut input).as_deref(), Some("Host: localhost"));
        assert_eq!(read_one(&mut input).as_deref(), Some("Accept: */*"));
        // unterminated trailing data is still a line
        assert_eq!(read_one(&mut input).as_deref(), Some("last"));
        assert_eq!(read_one(&mut input), None);
    }

    #[test]
    fn test_blank_line_is_zero_length() {
        let mut input = BufferedInput::new(&b"\r\nnext\r\n"[..]);

        let mut buf = LineBuffer::new();
        assert_eq!(input.read_line(&mut buf).unwrap(), Some(0));
        assert!(buf.is_empty());

        assert_eq!(read_one(&mut input).as_deref(), Some("next"));
    }

    #[test]
    fn test_read_line_appends_to_existing_content() {
        let mut input = BufferedInput::new(&b"tail\r\n"[..]);

        let mut buf = LineBuffer::from("head ");
        assert_eq!(input.read_line(&mut buf).unwrap(), Some(4));
        assert_eq!(buf.as_str(), "head tail");
    }

    #[test]
    fn test_read_after_read_line() {
        let mut input = BufferedInput::new(&b"Content-Length: 5\r\n\r\nHello"[..]);

        assert_eq!(read_one(&mut input).as_deref(), Some("Content-Length: 5"));
        assert_eq!(read_one(&mut input).as_deref(), Some(""));

        let mut body = [0u8; 16];
        let n = input.read(&mut body).unwrap();
        assert_eq!(&body[..n], b"Hello");
        assert_eq!(input.read(&mut body).unwrap(), 0);
    }

    /// Reader that yields its segments one per call, with injected errors
    struct StutterReader {
        segments: Vec<io::Result<Vec<u8>>>,
        next: usize,
    }

    impl StutterReader {
        fn new(segments: Vec<io::Result<Vec<u8>>>) -> Self {
            StutterReader { segments, next: 0 }
        }
    }

    impl Read for StutterReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.next >= self.segments.len() {
                return Ok(0);
            }
            let segment = std::mem::replace(&mut self.segments[self.next], Ok(Vec::new()));
            self.next += 1;
            match segment {
                Ok(data) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Err(e) => Err(e),
            }
        }
    }

    #[test]
    fn test_partial_line_survives_interruption() {
        let reader = StutterReader::new(vec![
            Ok(b"Host: lo".to_vec()),
            Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
            Ok(b"calhost\r\n".to_vec()),
        ]);
        let mut input = BufferedInput::new(reader);

        let mut buf = LineBuffer::new();
        let err = input.read_line(&mut buf).unwrap_err();
        assert!(err.is_transient());
        assert!(buf.is_empty());

        // the partial "Host: lo" stayed buffered; retry gets the whole line
        assert_eq!(input.read_line(&mut buf).unwrap(), Some(15));
        assert_eq!(buf.as_str(), "Host: localhost");
    }
}
