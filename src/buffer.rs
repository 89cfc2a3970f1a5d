//! Reusable line buffers
//!
//! This module provides the growable text buffer that physical input lines
//! are read into. One buffer is reused across read iterations to avoid
//! per-line allocation, and index-based accessors allow fold handling to
//! inspect and append sub-ranges without copying.

use std::fmt;

/// A reusable, growable buffer holding one logical line of text
///
/// The buffer accumulates one physical line per read, and grows into a
/// full logical header line as folded continuations are merged in.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    data: String,
}

impl LineBuffer {
    /// Create a new empty line buffer
    pub fn new() -> Self {
        LineBuffer {
            data: String::new(),
        }
    }

    /// Create a line buffer with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        LineBuffer {
            data: String::with_capacity(capacity),
        }
    }

    /// Clear the buffer, keeping its allocation for reuse
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the byte at position `index`, if in range
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.data.as_bytes().get(index).copied()
    }

    /// Find the index of the first byte that is not a space or tab
    ///
    /// Returns the buffer length if the whole buffer is fold whitespace.
    pub fn skip_leading_ws(&self) -> usize {
        let bytes = self.data.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b' ' && bytes[i] != b'\t' {
                break;
            }
            i += 1;
        }
        i
    }

    /// Append a single character
    pub fn push(&mut self, ch: char) {
        self.data.push(ch);
    }

    /// Append a string slice
    pub fn push_str(&mut self, s: &str) {
        self.data.push_str(s);
    }

    /// Append the tail of another buffer, starting at byte index `from`
    ///
    /// Used when merging a folded continuation into the owning header line:
    /// the continuation's leading whitespace is skipped by index instead of
    /// being trimmed into a temporary.
    pub fn append_tail(&mut self, other: &LineBuffer, from: usize) {
        self.data.push_str(&other.data[from..]);
    }

    /// View the buffer contents as a string slice
    pub fn as_str(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

impl From<&str> for LineBuffer {
    fn from(s: &str) -> Self {
        LineBuffer {
            data: s.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buf = LineBuffer::with_capacity(64);
        buf.push_str("Host: localhost");
        assert_eq!(buf.len(), 15);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.as_str(), "");
    }

    #[test]
    fn test_byte_at() {
        let buf = LineBuffer::from("\tvalue");
        assert_eq!(buf.byte_at(0), Some(b'\t'));
        assert_eq!(buf.byte_at(1), Some(b'v'));
        assert_eq!(buf.byte_at(6), None);
    }

    #[test]
    fn test_skip_leading_ws() {
        assert_eq!(LineBuffer::from("   \t charset=utf-8").skip_leading_ws(), 5);
        assert_eq!(LineBuffer::from("no-fold").skip_leading_ws(), 0);
        assert_eq!(LineBuffer::from(" \t ").skip_leading_ws(), 3);
        assert_eq!(LineBuffer::from("").skip_leading_ws(), 0);
    }

    #[test]
    fn test_append_tail() {
        let mut owner = LineBuffer::from("Content-Type: text/plain");
        let continuation = LineBuffer::from("  \t charset=utf-8");

        let i = continuation.skip_leading_ws();
        owner.push(' ');
        owner.append_tail(&continuation, i);

        assert_eq!(owner.as_str(), "Content-Type: text/plain charset=utf-8");
    }
}
