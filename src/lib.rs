//! h1parse - Incremental HTTP/1.x message parsing
//!
//! This crate parses the head of an HTTP/1.x message (request or response)
//! from a blocking, line-oriented input source. It handles the obsolete
//! RFC 2616/822 line folding (continuation lines starting with a space or
//! tab), enforces configurable limits on header count and folded line
//! length, and can resume a header block after a transient read
//! interruption without losing already-parsed state.
//!
//! # Architecture
//!
//! The parser is built around a small set of collaborator traits so the
//! same driving logic serves requests and responses over any transport:
//!
//! - `SessionInput` supplies physical lines (and raw bytes for entity
//!   decoding); `BufferedInput` implements it over any blocking reader
//! - `StartLineParser` parses the variant-specific first line
//! - `HeaderLineParser` splits one fully-folded header line into name
//!   and value
//! - `EntityDecoder` decodes the body for message variants that carry one
//!
//! `parse_headers` reads the header block itself; `MessageParser` drives
//! the whole message parse and owns the resumable in-progress state.
//!
//! # Examples
//!
//! ```
//! use h1parse::{BufferedInput, MessageParser, RequestHead};
//!
//! let wire: &[u8] =
//!     b"GET /index.html HTTP/1.1\r\nHost: localhost\r\nX-Note: first\r\n\t and second\r\n\r\n";
//!
//! let mut parser = MessageParser::new(BufferedInput::new(wire), RequestHead);
//! let request = parser.parse().unwrap();
//!
//! assert_eq!(request.uri(), "/index.html");
//! assert_eq!(request.headers().get("Host"), Some("localhost"));
//! assert_eq!(request.headers().get("X-Note"), Some("first and second"));
//! ```

pub mod buffer;
pub mod entity;
pub mod headers;
pub mod input;
pub mod limits;
pub mod message;
pub mod parser;

pub use buffer::LineBuffer;
pub use entity::{DefaultEntityDecoder, EntityDecoder};
pub use headers::{DefaultLineParser, Header, HeaderLineParser, Headers};
pub use input::{BufferedInput, SessionInput};
pub use limits::ParseLimits;
pub use message::{HttpMessage, HttpRequest, HttpResponse, Method, Status, Version};
pub use parser::{
    parse_headers, MessageParser, RequestHead, RequestParser, ResponseHead, ResponseParser,
};

/// Result type for parse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Parse operation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Maximum header count exceeded ({0})")]
    TooManyHeaders(usize),

    #[error("Maximum line length exceeded ({0})")]
    LineTooLong(usize),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    #[error("Invalid HTTP status: {0}")]
    InvalidStatus(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(String),

    #[error("Incomplete message")]
    Incomplete,

    #[error("Connection closed")]
    ConnectionClosed,
}

impl Error {
    /// Check if this error is a resource-limit violation
    ///
    /// Constraint violations are fatal to the current parse attempt and
    /// are never retried.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::TooManyHeaders(_) | Error::LineTooLong(_))
    }

    /// Check if this error is a transient read interruption
    ///
    /// After a transient interruption the caller may invoke
    /// [`MessageParser::parse`](parser::MessageParser::parse) again on the
    /// same instance and parsing resumes from the retained state instead
    /// of restarting.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::Interrupted)
    }
}
