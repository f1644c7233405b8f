use std::mem::size_of;

use smallvec::SmallVec;

use crate::arena::{Arena, ArenaError, Node, NodeId, Pair, StringRef};
use crate::error::{ReadCode, ReadError};
use crate::num::number::Number;
use crate::{ReadFlags, Result};

use super::scanner::{Scanner, Text, Token};

/// A finished read: the arena, its root, and the buffer strings may point into.
pub(crate) struct Parsed<'a> {
    pub input: &'a [u8],
    pub arena: Arena,
    pub root: NodeId,
    pub bytes_read: usize,
}

pub(crate) fn parse_into<'a>(
    scanner: Scanner<'a>,
    arena: Arena,
    flags: ReadFlags,
) -> Result<Parsed<'a>> {
    let mut parser = DocumentParser::new(scanner, arena, flags);
    let (root, bytes_read) = parser.parse_document()?;
    Ok(Parsed {
        input: parser.scanner.into_input(),
        arena: parser.arena,
        root,
        bytes_read,
    })
}

/// An open container. Children collect on the parser's `values` or `pairs`
/// stack from `start` and move into the arena as one run when it closes.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Array { start: usize },
    Object { start: usize, key: StringRef },
}

struct DocumentParser<'a> {
    scanner: Scanner<'a>,
    arena: Arena,
    flags: ReadFlags,
    frames: SmallVec<[Frame; 16]>,
    values: Vec<NodeId>,
    pairs: Vec<Pair>,
}

impl<'a> DocumentParser<'a> {
    fn new(scanner: Scanner<'a>, arena: Arena, flags: ReadFlags) -> Self {
        Self {
            scanner,
            arena,
            flags,
            frames: SmallVec::new(),
            values: Vec::new(),
            pairs: Vec::new(),
        }
    }

    fn parse_document(&mut self) -> Result<(NodeId, usize)> {
        self.scanner.skip_trivia()?;
        if self.scanner.is_at_end() {
            return Err(self.scanner.error(
                ReadCode::EmptyContent,
                "input data is empty",
                self.scanner.position(),
            ));
        }

        let token = self.scanner.next_token()?;
        let root = self.parse_value(token)?;

        if self.flags.contains(ReadFlags::STOP_WHEN_DONE) {
            // Trivia that cannot be skipped belongs to whatever follows.
            self.scanner.skip_trivia().ok();
            return Ok((root, self.scanner.position()));
        }

        self.scanner.skip_trivia()?;
        if !self.scanner.is_at_end() {
            return Err(self.scanner.error(
                ReadCode::UnexpectedContent,
                "unexpected content after document",
                self.scanner.position(),
            ));
        }
        Ok((root, self.scanner.position()))
    }

    fn parse_value(&mut self, mut token: Token) -> Result<NodeId> {
        'value: loop {
            let mut node = match token {
                Token::BeginArray => {
                    let next = self.scanner.next_token()?;
                    if matches!(next, Token::EndArray) {
                        self.close_array(self.values.len())?
                    } else {
                        self.push_frame(Frame::Array {
                            start: self.values.len(),
                        })?;
                        token = next;
                        continue 'value;
                    }
                }
                Token::BeginObject => match self.scanner.next_token()? {
                    Token::EndObject => self.close_object(self.pairs.len())?,
                    Token::String(text) => {
                        let key = self.parse_key(text)?;
                        self.push_frame(Frame::Object {
                            start: self.pairs.len(),
                            key,
                        })?;
                        token = self.scanner.next_token()?;
                        continue 'value;
                    }
                    other => return Err(self.unexpected(&other, "a string key")),
                },
                Token::String(text) => {
                    let string = self.string_ref(text)?;
                    self.push(Node::String(string))?
                }
                Token::Number(Number::Uint(value)) => self.push(Node::Uint(value))?,
                Token::Number(Number::Int(value)) => self.push(Node::Int(value))?,
                Token::Number(Number::Double(value)) => self.push(Node::Double(value))?,
                Token::Bool(value) => self.push(Node::Bool(value))?,
                Token::Null => self.push(Node::Null)?,
                other => return Err(self.unexpected(&other, "a value")),
            };

            loop {
                let Some(&frame) = self.frames.last() else {
                    return Ok(node);
                };
                match frame {
                    Frame::Array { start } => {
                        self.stage_value(node)?;
                        match self.scanner.next_token()? {
                            Token::Comma => {
                                let comma = self.scanner.token_start();
                                let next = self.scanner.next_token()?;
                                if !matches!(next, Token::EndArray) {
                                    token = next;
                                    continue 'value;
                                }
                                self.check_trailing_comma(comma)?;
                            }
                            Token::EndArray => {}
                            other => return Err(self.unexpected(&other, "',' or ']'")),
                        }
                        self.frames.pop();
                        node = self.close_array(start)?;
                    }
                    Frame::Object { start, key } => {
                        self.stage_pair(Pair { key, value: node })?;
                        match self.scanner.next_token()? {
                            Token::Comma => {
                                let comma = self.scanner.token_start();
                                match self.scanner.next_token()? {
                                    Token::String(text) => {
                                        let next_key = self.parse_key(text)?;
                                        if let Some(Frame::Object { key, .. }) =
                                            self.frames.last_mut()
                                        {
                                            *key = next_key;
                                        }
                                        token = self.scanner.next_token()?;
                                        continue 'value;
                                    }
                                    Token::EndObject => self.check_trailing_comma(comma)?,
                                    other => {
                                        return Err(self.unexpected(&other, "a string key"))
                                    }
                                }
                            }
                            Token::EndObject => {}
                            other => return Err(self.unexpected(&other, "',' or '}'")),
                        }
                        self.frames.pop();
                        node = self.close_object(start)?;
                    }
                }
            }
        }
    }

    /// Store a key string and consume the colon after it.
    fn parse_key(&mut self, text: Text) -> Result<StringRef> {
        let key = self.string_ref(text)?;
        match self.scanner.next_token()? {
            Token::Colon => Ok(key),
            other => Err(self.unexpected(&other, "':'")),
        }
    }

    fn string_ref(&mut self, text: Text) -> Result<StringRef> {
        let stored = match text {
            Text::Input(span) if self.scanner.is_in_situ() => {
                return Ok(StringRef::Input(span));
            }
            Text::Input(span) => self
                .arena
                .push_bytes(&self.scanner.bytes()[span.start..span.end]),
            Text::Scratch => self.arena.push_bytes(self.scanner.scratch()),
        };
        stored.map_err(|err| self.memory_error(err))
    }

    /// Parser-side stacks count against the arena limit while a read is in
    /// progress and grow with `try_reserve`.
    fn check_pending(&self, extra: usize) -> Result<()> {
        let pending = self.frames.len() * size_of::<Frame>()
            + self.values.len() * size_of::<NodeId>()
            + self.pairs.len() * size_of::<Pair>();
        self.arena
            .check(pending.saturating_add(extra))
            .map_err(|err| self.memory_error(err))
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        self.check_pending(size_of::<Frame>())?;
        if self.frames.try_reserve(1).is_err() {
            return Err(self.memory_error(ArenaError::AllocationFailed));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn stage_value(&mut self, id: NodeId) -> Result<()> {
        self.check_pending(size_of::<NodeId>())?;
        if self.values.try_reserve(1).is_err() {
            return Err(self.memory_error(ArenaError::AllocationFailed));
        }
        self.values.push(id);
        Ok(())
    }

    fn stage_pair(&mut self, pair: Pair) -> Result<()> {
        self.check_pending(size_of::<Pair>())?;
        if self.pairs.try_reserve(1).is_err() {
            return Err(self.memory_error(ArenaError::AllocationFailed));
        }
        self.pairs.push(pair);
        Ok(())
    }

    fn push(&mut self, node: Node) -> Result<NodeId> {
        self.arena
            .push_node(node)
            .map_err(|err| self.memory_error(err))
    }

    fn close_array(&mut self, start: usize) -> Result<NodeId> {
        let id = self
            .arena
            .push_array(&self.values[start..])
            .map_err(|err| self.memory_error(err))?;
        self.values.truncate(start);
        Ok(id)
    }

    fn close_object(&mut self, start: usize) -> Result<NodeId> {
        let id = self
            .arena
            .push_object(&self.pairs[start..])
            .map_err(|err| self.memory_error(err))?;
        self.pairs.truncate(start);
        Ok(id)
    }

    fn check_trailing_comma(&self, comma: usize) -> Result<()> {
        if self.flags.contains(ReadFlags::ALLOW_TRAILING_COMMAS) {
            return Ok(());
        }
        Err(self.scanner.error(
            ReadCode::JSONStructure,
            "trailing comma is not allowed",
            comma,
        ))
    }

    fn unexpected(&self, token: &Token, expected: &str) -> ReadError {
        let code = match token {
            Token::Eof => {
                return self.scanner.error(
                    ReadCode::UnexpectedEnd,
                    "unexpected end of data",
                    self.scanner.position(),
                )
            }
            Token::EndArray | Token::EndObject | Token::Comma => ReadCode::JSONStructure,
            _ => ReadCode::UnexpectedCharacter,
        };
        self.scanner.error(
            code,
            format!("unexpected {}, expected {expected}", token.describe()),
            self.scanner.token_start(),
        )
    }

    fn memory_error(&self, err: ArenaError) -> ReadError {
        self.scanner.error(
            ReadCode::MemoryAllocation,
            err.to_string(),
            self.scanner.token_start(),
        )
    }
}
