//! HTTP message types
//!
//! This module defines the request and response types the parser builds,
//! and the `HttpMessage` trait through which the orchestrator attaches
//! headers and an optional entity body to either variant.

use crate::headers::Headers;
use crate::{Error, Result};
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    /// Convert method to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "CONNECT" => Ok(Method::Connect),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            "PATCH" => Ok(Method::Patch),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    Http10,
    #[default]
    Http11,
}

impl Version {
    /// Convert version to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HTTP/1.0" => Ok(Version::Http10),
            "HTTP/1.1" => Ok(Version::Http11),
            _ => Err(Error::InvalidVersion(s.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    code: u16,
}

impl Status {
    /// Create a new status code
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Status { code })
        } else {
            Err(Error::InvalidStatus(format!("Invalid status code: {}", code)))
        }
    }

    /// Get the status code
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Get the canonical reason phrase for this status code
    pub fn reason_phrase(&self) -> &'static str {
        match self.code {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            206 => "Partial Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            411 => "Length Required",
            413 => "Payload Too Large",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            505 => "HTTP Version Not Supported",
            _ => "Unknown",
        }
    }

    /// Check if this is an informational status (1xx)
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.code)
    }

    /// Check if this is a success status (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason_phrase())
    }
}

/// A message under construction by the parser
///
/// The orchestrator attaches the header block exactly once, as a whole,
/// after the full block has been read; headers are never visible
/// incrementally. The entity body is attached only for variants that
/// report they can enclose one.
pub trait HttpMessage {
    /// Attach the complete, parsed header block. Called once per message.
    fn set_headers(&mut self, headers: Headers);

    /// Get the attached headers
    fn headers(&self) -> &Headers;

    /// Whether this message variant may enclose an entity body
    ///
    /// Consulted after headers are attached, since the decision depends
    /// on them.
    fn encloses_entity(&self) -> bool;

    /// Attach the decoded entity body
    fn set_body(&mut self, body: Bytes);
}

/// HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    uri: String,
    version: Version,
    headers: Headers,
    body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new request head with no headers attached yet
    pub fn new(method: Method, uri: impl Into<String>, version: Version) -> Self {
        HttpRequest {
            method,
            uri: uri.into(),
            version,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Get the request method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Get the request URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the HTTP version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get the headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the entity body, if one was attached
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

impl HttpMessage for HttpRequest {
    fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    /// A request encloses an entity iff it announces one
    fn encloses_entity(&self) -> bool {
        self.headers.contains("Content-Length") || self.headers.contains("Transfer-Encoding")
    }

    fn set_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    version: Version,
    status: Status,
    reason: String,
    headers: Headers,
    body: Option<Bytes>,
}

impl HttpResponse {
    /// Create a new response head with no headers attached yet
    pub fn new(version: Version, status: Status, reason: impl Into<String>) -> Self {
        HttpResponse {
            version,
            status,
            reason: reason.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Get the HTTP version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get the status code
    pub fn status(&self) -> Status {
        self.status
    }

    /// Get the reason phrase
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Get the headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the entity body, if one was attached
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

impl HttpMessage for HttpResponse {
    fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    /// All responses may enclose an entity except 1xx, 204 and 304
    fn encloses_entity(&self) -> bool {
        !(self.status.is_informational() || self.status.code == 204 || self.status.code == 304)
    }

    fn set_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }
}
