pub(crate) mod parser;
pub(crate) mod scanner;

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::constants::ESTIMATED_BYTES_PER_NODE;
use crate::error::{ReadCode, ReadError};
use crate::options::{ArenaOptions, ReadFlags, ReadOptions};
use crate::types::Document;
use crate::Result;

use self::scanner::{Input, Scanner};

/// Read `input` into a document that owns copies of all of its strings.
///
/// The buffer may be dropped as soon as this returns. `IN_SITU` in
/// `options` is rejected with `InvalidParameter`; use [`parse_in_situ`].
pub fn parse(input: &[u8], options: &ReadOptions) -> Result<Document<'static>> {
    parse_with_arena(input, options, Arena::new())
}

/// Like [`parse`], but builds into a caller-supplied arena, for example one
/// recovered from a previous document with [`Document::into_arena`].
pub fn parse_with_arena(
    input: &[u8],
    options: &ReadOptions,
    arena: Arena,
) -> Result<Document<'static>> {
    if options.allows(ReadFlags::IN_SITU) {
        return Err(ReadError::invalid_parameter(
            "in-situ reading needs a mutable buffer, use parse_in_situ",
        ));
    }
    let document = read(Input::Shared(input), options.flags, &options.arena, arena)?;
    Ok(document.detach())
}

/// Read `input` in place: escaped strings are decoded inside the buffer and
/// every string of the document borrows from it.
///
/// The buffer is exclusively borrowed for as long as the document lives. Its
/// contents after the call are unspecified, even when the read fails.
pub fn parse_in_situ<'a>(input: &'a mut [u8], options: &ReadOptions) -> Result<Document<'a>> {
    let flags = options.flags | ReadFlags::IN_SITU;
    read(Input::Exclusive(input), flags, &options.arena, Arena::new())
}

/// Read a strict RFC 8259 document from a string.
pub fn from_str(input: &str) -> Result<Document<'static>> {
    parse(input.as_bytes(), &ReadOptions::default())
}

fn read<'a>(
    input: Input<'a>,
    flags: ReadFlags,
    arena_options: &ArenaOptions,
    mut arena: Arena,
) -> Result<Document<'a>> {
    arena.clear();
    let estimate = input.bytes().len() / ESTIMATED_BYTES_PER_NODE;
    let sized = arena.configure(arena_options).and_then(|()| {
        if arena_options.nodes == 0 {
            arena.reserve(estimate, 0)
        } else {
            Ok(())
        }
    });
    if let Err(err) = sized {
        return Err(ReadError::new(ReadCode::MemoryAllocation, err.to_string()));
    }

    let scanner = Scanner::new(input, flags);
    match parser::parse_into(scanner, arena, flags) {
        Ok(parsed) => {
            trace!(
                nodes = parsed.arena.len(),
                bytes_read = parsed.bytes_read,
                in_situ = flags.contains(ReadFlags::IN_SITU),
                "document read"
            );
            Ok(Document::new(
                parsed.input,
                parsed.arena,
                parsed.root,
                parsed.bytes_read,
                flags.contains(ReadFlags::IN_SITU),
            ))
        }
        Err(err) => {
            debug!(code = %err.code, offset = err.offset, "read failed: {}", err.message);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_parse_rejects_in_situ_flag() {
        let options = ReadOptions::new().with_flag(ReadFlags::IN_SITU);
        let err = parse(b"[]", &options).unwrap_err();
        assert_eq!(err.code, ReadCode::InvalidParameter);
    }

    #[rstest::rstest]
    fn test_copied_document_outlives_input() {
        let document = {
            let input = br#"{"name": "a\"b"}"#.to_vec();
            parse(&input, &ReadOptions::default()).unwrap()
        };
        assert_eq!(document.root().get("name").and_then(|v| v.as_str()), Some("a\"b"));
        assert!(!document.is_in_situ());
    }

    #[rstest::rstest]
    fn test_arena_is_reused() {
        let first = from_str(r#"["x", "y", "z"]"#).unwrap();
        let arena = first.into_arena();
        assert!(arena.is_empty());
        let second = parse_with_arena(b"[true]", &ReadOptions::default(), arena).unwrap();
        assert_eq!(second.node_count(), 2);
        assert_eq!(second.root().at(0).and_then(|v| v.as_bool()), Some(true));
    }

    #[rstest::rstest]
    fn test_limit_applies_to_copied_strings() {
        let options =
            ReadOptions::new().with_arena(ArenaOptions::new().with_limit(128));
        let long = format!("\"{}\"", "x".repeat(256));
        let err = parse(long.as_bytes(), &options).unwrap_err();
        assert_eq!(err.code, ReadCode::MemoryAllocation);

        let mut buffer = long.into_bytes();
        let document = parse_in_situ(&mut buffer, &options).unwrap();
        assert_eq!(document.root().as_str().map(str::len), Some(256));
    }
}
