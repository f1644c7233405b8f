use memchr::{memchr, memmem};

use crate::arena::Span;
use crate::constants::{is_whitespace, LITERAL_FALSE, LITERAL_NULL, LITERAL_TRUE};
use crate::error::{Fault, ReadCode, ReadError};
use crate::num::number::{parse_number, Number};
use crate::text::string::{match_literal, scan_string, LiteralMatch, ScannedString};
use crate::ReadFlags;

/// The buffer being read. Only an exclusive buffer can be decoded in place.
pub(crate) enum Input<'a> {
    Shared(&'a [u8]),
    Exclusive(&'a mut [u8]),
}

impl<'a> Input<'a> {
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Input::Shared(bytes) => bytes,
            Input::Exclusive(bytes) => bytes,
        }
    }

    fn is_exclusive(&self) -> bool {
        matches!(self, Input::Exclusive(_))
    }

    fn into_shared(self) -> &'a [u8] {
        match self {
            Input::Shared(bytes) => bytes,
            Input::Exclusive(bytes) => bytes,
        }
    }
}

/// Where the content of a string token can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Text {
    /// Bytes of the input buffer. For exclusive input these may be decoded in place.
    Input(Span),
    /// The scanner's scratch buffer, valid until the next token.
    Scratch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Colon,
    Comma,
    String(Text),
    Number(Number),
    Bool(bool),
    Null,
    Eof,
}

impl Token {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Token::BeginObject => "'{'",
            Token::EndObject => "'}'",
            Token::BeginArray => "'['",
            Token::EndArray => "']'",
            Token::Colon => "':'",
            Token::Comma => "','",
            Token::String(_) => "string",
            Token::Number(_) => "number",
            Token::Bool(_) | Token::Null => "literal",
            Token::Eof => "end of data",
        }
    }
}

pub(crate) struct Scanner<'a> {
    input: Input<'a>,
    pos: usize,
    token_start: usize,
    flags: ReadFlags,
    scratch: Vec<u8>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: Input<'a>, flags: ReadFlags) -> Self {
        Self {
            input,
            pos: 0,
            token_start: 0,
            flags,
            scratch: Vec::new(),
        }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        self.input.bytes()
    }

    pub(crate) fn scratch(&self) -> &[u8] {
        &self.scratch
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Offset of the first byte of the last token returned.
    pub(crate) fn token_start(&self) -> usize {
        self.token_start
    }

    /// Strings are decoded into the input buffer and referenced from there.
    pub(crate) fn is_in_situ(&self) -> bool {
        self.input.is_exclusive()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.bytes().len()
    }

    pub(crate) fn into_input(self) -> &'a [u8] {
        self.input.into_shared()
    }

    pub(crate) fn error(
        &self,
        code: ReadCode,
        message: impl Into<String>,
        offset: usize,
    ) -> ReadError {
        ReadError::at(code, message, self.input.bytes(), offset)
    }

    /// Skip whitespace, and comments when allowed. The position is left
    /// unchanged on error.
    pub(crate) fn skip_trivia(&mut self) -> Result<(), ReadError> {
        let allow_comments = self.flags.contains(ReadFlags::ALLOW_COMMENTS);
        match skip_trivia(self.input.bytes(), self.pos, allow_comments) {
            Ok(pos) => {
                self.pos = pos;
                Ok(())
            }
            Err(fault) => Err(fault.locate(self.input.bytes())),
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, ReadError> {
        self.skip_trivia()?;
        self.token_start = self.pos;
        self.scan_token()
            .map_err(|fault| fault.locate(self.input.bytes()))
    }

    fn scan_token(&mut self) -> Result<Token, Fault> {
        let pos = self.pos;
        let bytes = self.input.bytes();
        let Some(&byte) = bytes.get(pos) else {
            return Ok(Token::Eof);
        };
        let allow_special = self.flags.contains(ReadFlags::ALLOW_INF_AND_NAN);
        let punct = match byte {
            b'{' => Token::BeginObject,
            b'}' => Token::EndObject,
            b'[' => Token::BeginArray,
            b']' => Token::EndArray,
            b':' => Token::Colon,
            b',' => Token::Comma,
            b'"' => return self.scan_string(),
            b'-' | b'0'..=b'9' => return self.scan_number(),
            b'+' | b'i' | b'I' | b'N' if allow_special => return self.scan_number(),
            b'n' if allow_special && matches!(bytes.get(pos + 1), Some(b'a' | b'A')) => {
                return self.scan_number()
            }
            b't' => return self.scan_literal(LITERAL_TRUE, Token::Bool(true)),
            b'f' => return self.scan_literal(LITERAL_FALSE, Token::Bool(false)),
            b'n' => return self.scan_literal(LITERAL_NULL, Token::Null),
            _ => {
                return Err(Fault::new(
                    ReadCode::UnexpectedCharacter,
                    "unexpected character",
                    pos,
                ))
            }
        };
        self.pos += 1;
        Ok(punct)
    }

    fn scan_literal(&mut self, literal: &[u8], token: Token) -> Result<Token, Fault> {
        let bytes = self.input.bytes();
        match match_literal(bytes, self.pos, literal, false) {
            LiteralMatch::Full => {
                self.pos += literal.len();
                Ok(token)
            }
            LiteralMatch::Truncated => Err(Fault::end(bytes.len())),
            LiteralMatch::Mismatch => Err(Fault::new(
                ReadCode::Literal,
                "invalid literal",
                self.pos,
            )),
        }
    }

    fn scan_number(&mut self) -> Result<Token, Fault> {
        let allow_special = self.flags.contains(ReadFlags::ALLOW_INF_AND_NAN);
        let (number, end) = parse_number(self.input.bytes(), self.pos, allow_special)?;
        self.pos = end;
        Ok(Token::Number(number))
    }

    fn scan_string(&mut self) -> Result<Token, Fault> {
        let start = self.pos + 1;
        let scanned = scan_string(self.input.bytes(), start, &mut self.scratch)?;
        self.pos = scanned.end() + 1;
        let text = match scanned {
            ScannedString::Raw { end } => Text::Input(Span::new(start, end)),
            ScannedString::Decoded { .. } => match &mut self.input {
                // Decoded content is never longer than its escaped form, so it
                // fits in the bytes already consumed.
                Input::Exclusive(buffer) => {
                    let end = start + self.scratch.len();
                    buffer[start..end].copy_from_slice(&self.scratch);
                    Text::Input(Span::new(start, end))
                }
                Input::Shared(_) => Text::Scratch,
            },
        };
        Ok(Token::String(text))
    }
}

fn skip_trivia(bytes: &[u8], mut pos: usize, allow_comments: bool) -> Result<usize, Fault> {
    loop {
        while bytes.get(pos).copied().is_some_and(is_whitespace) {
            pos += 1;
        }
        if !allow_comments || bytes.get(pos) != Some(&b'/') {
            return Ok(pos);
        }
        let body = pos + 2;
        match bytes.get(pos + 1) {
            Some(b'/') => {
                pos = match memchr(b'\n', &bytes[body..]) {
                    Some(idx) => body + idx + 1,
                    None => bytes.len(),
                };
            }
            Some(b'*') => match memmem::find(&bytes[body..], b"*/") {
                Some(idx) => pos = body + idx + 2,
                None => {
                    return Err(Fault::new(
                        ReadCode::InvalidComment,
                        "unclosed multiline comment",
                        pos,
                    ))
                }
            },
            _ => {
                return Err(Fault::new(
                    ReadCode::InvalidComment,
                    "invalid comment",
                    pos,
                ))
            }
        }
    }
}
