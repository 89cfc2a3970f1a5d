//! Entity body decoding
//!
//! Decodes the entity body that follows a header-complete message head.
//! The strategy is chosen from the headers, per RFC 7230 section 3.3:
//! chunked transfer coding, exact `Content-Length`, or read-to-EOF for
//! legacy responses that signal neither.

use crate::buffer::LineBuffer;
use crate::headers::Headers;
use crate::input::SessionInput;
use crate::{Error, Result};
use bytes::Bytes;

/// Decoder for the entity body of a header-complete message
///
/// Consulted by the orchestrator only for message variants that may
/// enclose a body; the headers tell the decoder how the body is framed.
pub trait EntityDecoder {
    /// Decode the entity body from the input source
    fn decode(&self, input: &mut dyn SessionInput, headers: &Headers) -> Result<Bytes>;
}

/// Default entity decoder
///
/// Framing rules:
/// - `Transfer-Encoding` and `Content-Length` both present is a protocol
///   violation
/// - chunked (as the final transfer coding) decodes chunk-by-chunk,
///   ignoring chunk extensions and skipping trailer lines
/// - `Content-Length` reads exactly that many bytes
/// - neither reads until end of stream
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEntityDecoder;

impl EntityDecoder for DefaultEntityDecoder {
    fn decode(&self, input: &mut dyn SessionInput, headers: &Headers) -> Result<Bytes> {
        let transfer_encoding = headers.get("Transfer-Encoding");
        let content_length = headers.get("Content-Length");

        match (transfer_encoding, content_length) {
            (Some(_), Some(_)) => Err(Error::Protocol(
                "both Transfer-Encoding and Content-Length present".to_string(),
            )),

            (Some(encoding), None) => {
                if is_chunked(encoding) {
                    decode_chunked(input)
                } else {
                    read_to_end(input)
                }
            }

            (None, Some(value)) => {
                let length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| Error::Parse(format!("Invalid Content-Length: {}", value)))?;
                let mut body = vec![0u8; length];
                read_fully(input, &mut body)?;
                Ok(Bytes::from(body))
            }

            (None, None) => read_to_end(input),
        }
    }
}

/// Check whether chunked is the final transfer coding
///
/// Chunked must be last if present; `gzip, chunked` is chunked framing,
/// `chunked, gzip` is not.
fn is_chunked(value: &str) -> bool {
    value
        .rsplit(',')
        .next()
        .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}

/// Read exactly `buf.len()` bytes
fn read_fully(input: &mut dyn SessionInput, buf: &mut [u8]) -> Result<()> {
    let mut total = 0;
    while total < buf.len() {
        let n = input.read(&mut buf[total..])?;
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }
        total += n;
    }
    Ok(())
}

/// Read until end of stream
fn read_to_end(input: &mut dyn SessionInput) -> Result<Bytes> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = input.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Ok(Bytes::from(body))
}

/// Decode a chunked body
///
/// Each chunk is a hex size line (extensions after `;` ignored), the
/// data, and a terminating CRLF. The zero-size chunk ends the body;
/// trailer lines after it are skipped up to the final blank line.
fn decode_chunked(input: &mut dyn SessionInput) -> Result<Bytes> {
    let mut body = Vec::new();
    let mut line = LineBuffer::with_capacity(16);

    loop {
        line.clear();
        if input.read_line(&mut line)?.is_none() {
            return Err(Error::Incomplete);
        }

        let size_text = line.as_str().split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_text, 16)
            .map_err(|_| Error::InvalidChunkSize(size_text.to_string()))?;

        if size == 0 {
            break;
        }

        let start = body.len();
        body.resize(start + size, 0);
        read_fully(input, &mut body[start..])?;

        line.clear();
        match input.read_line(&mut line)? {
            Some(_) if line.is_empty() => {}
            Some(_) => {
                return Err(Error::Protocol("Expected CRLF after chunk data".to_string()))
            }
            None => return Err(Error::Incomplete),
        }
    }

    // trailer lines, skipped up to the terminating blank line
    loop {
        line.clear();
        match input.read_line(&mut line)? {
            None => break,
            Some(_) if line.is_empty() => break,
            Some(_) => {}
        }
    }

    Ok(Bytes::from(body))
}
