use std::fmt;

use memchr::{memchr_iter, memrchr};
use thiserror::Error;

/// Result code of a failed read.
///
/// The numeric values returned by [`ReadCode::code`] are stable and follow
/// the declaration order, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadCode {
    /// Invalid call, such as in-situ flags on a shared buffer.
    InvalidParameter,
    /// The arena could not grow, or its byte limit was reached.
    MemoryAllocation,
    /// Input has no value, such as `""` or `"  "`.
    EmptyContent,
    /// Content after the document, such as `"[1]#"`.
    UnexpectedContent,
    /// Input ends inside a value, such as `"[123"`.
    UnexpectedEnd,
    /// A byte that cannot appear where it is, such as `"[#]"`.
    UnexpectedCharacter,
    /// Invalid structure, such as `"[1,]"`.
    JSONStructure,
    /// Unterminated or malformed comment.
    InvalidComment,
    /// Invalid number, such as `"123.e12"` or `"01"`.
    InvalidNumber,
    /// Invalid escape, surrogate, control character or UTF-8 in a string.
    InvalidString,
    /// Invalid literal, such as `"truu"`.
    Literal,
    /// Failed to open a file. Reported by file helpers, never by the reader.
    FileOpen,
    /// Failed to read a file. Reported by file helpers, never by the reader.
    FileRead,
}

impl ReadCode {
    pub fn code(self) -> u32 {
        match self {
            ReadCode::InvalidParameter => 1,
            ReadCode::MemoryAllocation => 2,
            ReadCode::EmptyContent => 3,
            ReadCode::UnexpectedContent => 4,
            ReadCode::UnexpectedEnd => 5,
            ReadCode::UnexpectedCharacter => 6,
            ReadCode::JSONStructure => 7,
            ReadCode::InvalidComment => 8,
            ReadCode::InvalidNumber => 9,
            ReadCode::InvalidString => 10,
            ReadCode::Literal => 11,
            ReadCode::FileOpen => 12,
            ReadCode::FileRead => 13,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReadCode::InvalidParameter => "invalid parameter",
            ReadCode::MemoryAllocation => "memory allocation",
            ReadCode::EmptyContent => "empty content",
            ReadCode::UnexpectedContent => "unexpected content",
            ReadCode::UnexpectedEnd => "unexpected end",
            ReadCode::UnexpectedCharacter => "unexpected character",
            ReadCode::JSONStructure => "json structure",
            ReadCode::InvalidComment => "invalid comment",
            ReadCode::InvalidNumber => "invalid number",
            ReadCode::InvalidString => "invalid string",
            ReadCode::Literal => "invalid literal",
            ReadCode::FileOpen => "file open",
            ReadCode::FileRead => "file read",
        }
    }
}

impl fmt::Display for ReadCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when the input cannot be read into a document.
///
/// `offset` is the byte position where reading stopped; `line` and `column`
/// are 1-based and count bytes, not characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column} (offset {offset})")]
pub struct ReadError {
    pub code: ReadCode,
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ReadError {
    pub fn new(code: ReadCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn at(code: ReadCode, message: impl Into<String>, input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let head = &input[..offset];
        let line = memchr_iter(b'\n', head).count() + 1;
        let line_start = memrchr(b'\n', head).map_or(0, |idx| idx + 1);
        Self {
            code,
            message: message.into(),
            offset,
            line,
            column: offset - line_start + 1,
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ReadCode::InvalidParameter, message)
    }
}

/// Lexical failure before it is placed in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fault {
    pub code: ReadCode,
    pub message: &'static str,
    pub offset: usize,
}

impl Fault {
    pub(crate) fn new(code: ReadCode, message: &'static str, offset: usize) -> Self {
        Self {
            code,
            message,
            offset,
        }
    }

    pub(crate) fn end(offset: usize) -> Self {
        Self::new(ReadCode::UnexpectedEnd, "unexpected end of data", offset)
    }

    pub(crate) fn locate(self, input: &[u8]) -> ReadError {
        ReadError::at(self.code, self.message, input, self.offset)
    }
}
