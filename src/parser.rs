//! HTTP message parsing
//!
//! This module contains the header-block parser and the orchestrator that
//! drives a complete message parse: start line, header block, then entity
//! decoding for variants that carry one.
//!
//! Headers are parsed according to the generic format of RFC 822 section
//! 3.1 and RFC 2616 sections 4 and 19.3: a continuation line beginning
//! with a space or tab is obsolete folding and belongs to the previous
//! header. The block parser accumulates raw logical lines first and runs
//! the structured name/value parse in a second pass, so the structured
//! parse happens exactly once per logical header, and so the accumulated
//! lines can survive an interrupted read for a resumed call.

use crate::buffer::LineBuffer;
use crate::entity::{DefaultEntityDecoder, EntityDecoder};
use crate::headers::{DefaultLineParser, Header, HeaderLineParser};
use crate::input::SessionInput;
use crate::limits::ParseLimits;
use crate::message::{HttpMessage, HttpRequest, HttpResponse, Method, Status, Version};
use crate::{Error, Result};
use std::mem;
use tracing::trace;

/// Initial capacity for a physical line buffer
const INITIAL_LINE_CAPACITY: usize = 64;

/// Parse HTTP request line
///
/// Format: METHOD URI VERSION
/// Example: GET /index.html HTTP/1.1
pub fn parse_request_line(line: &str) -> Result<(Method, String, Version)> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.len() != 3 {
        return Err(Error::Parse(format!(
            "Invalid request line: expected 3 parts, got {}",
            parts.len()
        )));
    }

    let method = parts[0].parse::<Method>()?;
    let uri = parts[1].to_string();
    let version = parts[2].parse::<Version>()?;

    Ok((method, uri, version))
}

/// Parse HTTP response status line
///
/// Format: VERSION STATUS REASON
/// Example: HTTP/1.1 200 OK
pub fn parse_status_line(line: &str) -> Result<(Version, Status, String)> {
    let parts: Vec<&str> = line.splitn(3, ' ').collect();

    if parts.len() < 2 {
        return Err(Error::Parse(format!(
            "Invalid status line: expected at least 2 parts, got {}",
            parts.len()
        )));
    }

    let version = parts[0].parse::<Version>()?;
    let status_code = parts[1]
        .parse::<u16>()
        .map_err(|_| Error::Parse(format!("Invalid status code: {}", parts[1])))?;
    let status = Status::new(status_code)?;
    let reason = if parts.len() == 3 {
        parts[2].to_string()
    } else {
        status.reason_phrase().to_string()
    };

    Ok((version, status, reason))
}

/// Parse a header block from the input source
///
/// Physical lines are read until the blank line (or end of stream) that
/// terminates the block. Folded continuations are merged into the owning
/// logical header with a single space per fold point, however much
/// whitespace the wire carried. Each accumulated logical line is then
/// handed to `line_parser` to produce a structured [`Header`].
///
/// `header_lines` is caller-supplied scratch holding the logical lines
/// accumulated so far; if a read fails transiently the lines already
/// accumulated stay in it, and a repeated call resumes the block instead
/// of restarting. The list is not cleared on success; the caller owns
/// its lifecycle.
///
/// Limits come from `limits`: the header count check runs when a new
/// logical header is added (a fold merge never triggers it), and the
/// length check bounds the *merged* length of a folded header, evaluated
/// at each fold point. A zero threshold disables the corresponding check.
pub fn parse_headers<I, P>(
    input: &mut I,
    limits: &ParseLimits,
    line_parser: &P,
    header_lines: &mut Vec<LineBuffer>,
) -> Result<Vec<Header>>
where
    I: SessionInput + ?Sized,
    P: HeaderLineParser + ?Sized,
{
    let mut current: Option<LineBuffer> = None;

    loop {
        let mut line = match current.take() {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => LineBuffer::with_capacity(INITIAL_LINE_CAPACITY),
        };

        let n = input.read_line(&mut line)?;
        if n.is_none() || line.is_empty() {
            break;
        }

        // degenerate blank-with-space line terminates the block
        if line.len() == 1 && line.byte_at(0) == Some(b' ') {
            break;
        }

        let fold_ws = matches!(line.byte_at(0), Some(b' ') | Some(b'\t'));
        match header_lines.last_mut() {
            Some(previous) if fold_ws => {
                // continuation of a folded header, append to the owner
                let i = line.skip_leading_ws();
                let merged_len = previous.len() + 1 + (line.len() - i);
                if limits.max_line_length() > 0 && merged_len > limits.max_line_length() {
                    return Err(Error::LineTooLong(limits.max_line_length()));
                }
                previous.push(' ');
                previous.append_tail(&line, i);
                current = Some(line);
            }
            _ => {
                header_lines.push(line);
                if limits.max_header_count() > 0 && header_lines.len() > limits.max_header_count()
                {
                    return Err(Error::TooManyHeaders(limits.max_header_count()));
                }
            }
        }
    }

    let mut headers = Vec::with_capacity(header_lines.len());
    for line in header_lines.iter() {
        let header = line_parser
            .parse_header(line)
            .map_err(|e| Error::Protocol(e.to_string()))?;
        headers.push(header);
    }

    trace!(count = headers.len(), "header block parsed");
    Ok(headers)
}

/// Variant-specific start-line parser
///
/// Reads and parses the first line of a message, producing the message
/// head the orchestrator then completes with headers and body.
pub trait StartLineParser {
    type Message: HttpMessage;

    /// Parse the start line from the input source
    fn parse_start_line(&self, input: &mut dyn SessionInput) -> Result<Self::Message>;
}

/// Request-line parser (`METHOD URI VERSION`)
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestHead;

impl StartLineParser for RequestHead {
    type Message = HttpRequest;

    fn parse_start_line(&self, input: &mut dyn SessionInput) -> Result<HttpRequest> {
        let mut line = LineBuffer::with_capacity(INITIAL_LINE_CAPACITY);
        if input.read_line(&mut line)?.is_none() {
            return Err(Error::ConnectionClosed);
        }

        let (method, uri, version) = parse_request_line(line.as_str())?;
        Ok(HttpRequest::new(method, uri, version))
    }
}

/// Status-line parser (`VERSION STATUS REASON`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHead;

impl StartLineParser for ResponseHead {
    type Message = HttpResponse;

    fn parse_start_line(&self, input: &mut dyn SessionInput) -> Result<HttpResponse> {
        let mut line = LineBuffer::with_capacity(INITIAL_LINE_CAPACITY);
        if input.read_line(&mut line)?.is_none() {
            return Err(Error::ConnectionClosed);
        }

        let (version, status, reason) = parse_status_line(line.as_str())?;
        Ok(HttpResponse::new(version, status, reason))
    }
}

/// In-progress parse state
///
/// The partially-built message lives inside the state, never outside the
/// parser, so a failed parse cannot leak a half-constructed message.
enum ParseState<M> {
    StartLine,
    Headers(M),
    Entity(M),
}

/// Orchestrates a complete message parse over a session input
///
/// One instance owns one connection's worth of mutable parse state and is
/// not safe for concurrent use. It can parse consecutive messages on a
/// persistent connection; per-message state is cleared when a parse
/// completes or fails.
///
/// If a read fails transiently (an I/O error of kind `Interrupted`), the
/// in-progress state (the message head and the header lines accumulated
/// so far) is retained, and calling [`parse`](MessageParser::parse)
/// again resumes where the interruption happened. Any other failure
/// discards the in-progress state so the next call starts fresh.
pub struct MessageParser<I, S>
where
    I: SessionInput,
    S: StartLineParser,
{
    input: I,
    start_line: S,
    limits: ParseLimits,
    line_parser: Box<dyn HeaderLineParser>,
    entity_decoder: Box<dyn EntityDecoder>,
    header_lines: Vec<LineBuffer>,
    state: ParseState<S::Message>,
}

/// Parser for HTTP requests
pub type RequestParser<I> = MessageParser<I, RequestHead>;

/// Parser for HTTP responses
pub type ResponseParser<I> = MessageParser<I, ResponseHead>;

impl<I, S> MessageParser<I, S>
where
    I: SessionInput,
    S: StartLineParser,
{
    /// Create a parser with default limits and default collaborators
    pub fn new(input: I, start_line: S) -> Self {
        Self::with_limits(input, start_line, ParseLimits::default())
    }

    /// Create a parser with explicit limits
    pub fn with_limits(input: I, start_line: S, limits: ParseLimits) -> Self {
        MessageParser {
            input,
            start_line,
            limits,
            line_parser: Box::new(DefaultLineParser),
            entity_decoder: Box::new(DefaultEntityDecoder),
            header_lines: Vec::new(),
            state: ParseState::StartLine,
        }
    }

    /// Replace the header-line parser
    pub fn set_line_parser(&mut self, parser: Box<dyn HeaderLineParser>) {
        self.line_parser = parser;
    }

    /// Replace the entity decoder
    pub fn set_entity_decoder(&mut self, decoder: Box<dyn EntityDecoder>) {
        self.entity_decoder = decoder;
    }

    /// Get a reference to the underlying input
    pub fn get_ref(&self) -> &I {
        &self.input
    }

    /// Get a mutable reference to the underlying input
    pub fn get_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Consume the parser and return the underlying input
    pub fn into_inner(self) -> I {
        self.input
    }

    /// Discard any in-progress parse state
    ///
    /// Clears the retained header-line list and drops a partially-built
    /// message, so the next [`parse`](MessageParser::parse) starts a
    /// fresh message.
    pub fn reset(&mut self) {
        self.state = ParseState::StartLine;
        self.header_lines.clear();
    }

    /// Parse one complete message from the input
    ///
    /// On success the per-message state is cleared and the instance is
    /// ready for the next message on the same connection. On a transient
    /// interruption the in-progress state is retained for a resumed
    /// call; on any other error the state is reset.
    pub fn parse(&mut self) -> Result<S::Message> {
        let result = self.run();
        if let Err(err) = &result {
            if !err.is_transient() {
                self.reset();
            }
        }
        result
    }

    fn run(&mut self) -> Result<S::Message> {
        loop {
            match mem::replace(&mut self.state, ParseState::StartLine) {
                ParseState::StartLine => {
                    let head = match self.start_line.parse_start_line(&mut self.input) {
                        Ok(head) => head,
                        Err(err @ (Error::Io(_) | Error::ConnectionClosed)) => return Err(err),
                        Err(err) => return Err(Error::Protocol(err.to_string())),
                    };
                    trace!("start line parsed");
                    self.state = ParseState::Headers(head);
                }

                ParseState::Headers(mut message) => {
                    let headers = match parse_headers(
                        &mut self.input,
                        &self.limits,
                        self.line_parser.as_ref(),
                        &mut self.header_lines,
                    ) {
                        Ok(headers) => headers,
                        Err(err) => {
                            if err.is_transient() {
                                self.state = ParseState::Headers(message);
                            }
                            return Err(err);
                        }
                    };
                    // headers become visible as a single set, never incrementally
                    message.set_headers(headers.into_iter().collect());
                    self.header_lines.clear();
                    self.state = ParseState::Entity(message);
                }

                ParseState::Entity(mut message) => {
                    if message.encloses_entity() {
                        let body = match self
                            .entity_decoder
                            .decode(&mut self.input, message.headers())
                        {
                            Ok(body) => body,
                            Err(err) => {
                                if err.is_transient() {
                                    self.state = ParseState::Entity(message);
                                }
                                return Err(err);
                            }
                        };
                        trace!(len = body.len(), "entity decoded");
                        message.set_body(body);
                    }
                    return Ok(message);
                }
            }
        }
    }
}
