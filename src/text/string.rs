use memchr::memchr2;

use crate::error::{Fault, ReadCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralMatch {
    Full,
    /// Input ended while still matching.
    Truncated,
    Mismatch,
}

pub(crate) fn match_literal(
    input: &[u8],
    pos: usize,
    literal: &[u8],
    ignore_case: bool,
) -> LiteralMatch {
    let rest = input.get(pos..).unwrap_or(&[]);
    let len = rest.len().min(literal.len());
    let same = if ignore_case {
        rest[..len].eq_ignore_ascii_case(&literal[..len])
    } else {
        rest[..len] == literal[..len]
    };
    if !same {
        LiteralMatch::Mismatch
    } else if len < literal.len() {
        LiteralMatch::Truncated
    } else {
        LiteralMatch::Full
    }
}

/// Outcome of scanning a string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScannedString {
    /// No escapes: the content is `input[start..end]` verbatim.
    Raw { end: usize },
    /// Escapes were decoded into the scratch buffer.
    Decoded { end: usize },
}

impl ScannedString {
    /// Offset of the closing quote.
    pub(crate) fn end(self) -> usize {
        match self {
            ScannedString::Raw { end } | ScannedString::Decoded { end } => end,
        }
    }
}

/// Scan a string whose content begins at `start` (just past the opening quote).
///
/// `scratch` is only written when the string contains escapes.
pub(crate) fn scan_string(
    input: &[u8],
    start: usize,
    scratch: &mut Vec<u8>,
) -> Result<ScannedString, Fault> {
    let mut pos = start;
    let mut decoding = false;
    loop {
        let Some(offset) = memchr2(b'"', b'\\', &input[pos..]) else {
            validate_run(input, pos, input.len())?;
            return Err(Fault::end(input.len()));
        };
        let stop = pos + offset;
        validate_run(input, pos, stop)?;
        if decoding {
            scratch.extend_from_slice(&input[pos..stop]);
        } else if input[stop] == b'\\' {
            scratch.clear();
            scratch.extend_from_slice(&input[start..stop]);
            decoding = true;
        }
        if input[stop] == b'"' {
            return Ok(if decoding {
                ScannedString::Decoded { end: stop }
            } else {
                ScannedString::Raw { end: stop }
            });
        }
        pos = decode_escape(input, stop, scratch)?;
    }
}

/// Reject control bytes and invalid UTF-8 in an unescaped run.
fn validate_run(input: &[u8], start: usize, end: usize) -> Result<(), Fault> {
    let run = &input[start..end];
    if let Some(idx) = run.iter().position(|&byte| byte < 0x20) {
        return Err(Fault::new(
            ReadCode::InvalidString,
            "unexpected control character in string",
            start + idx,
        ));
    }
    if !run.is_ascii() {
        if let Err(err) = std::str::from_utf8(run) {
            return Err(Fault::new(
                ReadCode::InvalidString,
                "invalid utf-8 encoding in string",
                start + err.valid_up_to(),
            ));
        }
    }
    Ok(())
}

/// Decode the escape at `at` (a backslash) into `out`, returning the offset after it.
fn decode_escape(input: &[u8], at: usize, out: &mut Vec<u8>) -> Result<usize, Fault> {
    let Some(&kind) = input.get(at + 1) else {
        return Err(Fault::end(input.len()));
    };
    let byte = match kind {
        b'"' => b'"',
        b'\\' => b'\\',
        b'/' => b'/',
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'u' => return decode_unicode(input, at, out),
        _ => {
            return Err(Fault::new(
                ReadCode::InvalidString,
                "invalid escaped character in string",
                at,
            ))
        }
    };
    out.push(byte);
    Ok(at + 2)
}

fn decode_unicode(input: &[u8], at: usize, out: &mut Vec<u8>) -> Result<usize, Fault> {
    let high = read_hex4(input, at + 2)?;
    let (scalar, next) = match high {
        0xD800..=0xDBFF => {
            let low_at = at + 6;
            match (input.get(low_at), input.get(low_at + 1)) {
                (Some(b'\\'), Some(b'u')) => {}
                (None, _) | (Some(b'\\'), None) => return Err(Fault::end(input.len())),
                _ => {
                    return Err(Fault::new(
                        ReadCode::InvalidString,
                        "no low surrogate in string",
                        at,
                    ))
                }
            }
            let low = read_hex4(input, low_at + 2)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(Fault::new(
                    ReadCode::InvalidString,
                    "invalid low surrogate in string",
                    low_at,
                ));
            }
            (0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00), low_at + 6)
        }
        0xDC00..=0xDFFF => {
            return Err(Fault::new(
                ReadCode::InvalidString,
                "unpaired low surrogate in string",
                at,
            ))
        }
        _ => (high, at + 6),
    };
    let ch = char::from_u32(scalar).ok_or(Fault::new(
        ReadCode::InvalidString,
        "invalid code point in string",
        at,
    ))?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    Ok(next)
}

fn read_hex4(input: &[u8], at: usize) -> Result<u32, Fault> {
    let mut value = 0u32;
    for idx in at..at + 4 {
        let Some(&byte) = input.get(idx) else {
            return Err(Fault::end(input.len()));
        };
        let digit = (byte as char).to_digit(16).ok_or(Fault::new(
            ReadCode::InvalidString,
            "invalid escaped sequence in string",
            idx,
        ))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<Vec<u8>, Fault> {
        let input = format!("{body}\"");
        let mut scratch = Vec::new();
        match scan_string(input.as_bytes(), 0, &mut scratch)? {
            ScannedString::Raw { end } => Ok(input.as_bytes()[..end].to_vec()),
            ScannedString::Decoded { .. } => Ok(scratch),
        }
    }

    #[rstest::rstest]
    #[case("plain", "plain")]
    #[case("caf\u{e9}", "caf\u{e9}")]
    #[case(r"a\nb", "a\nb")]
    #[case(r#"\"\\\/\b\f\n\r\t"#, "\"\\/\u{8}\u{c}\n\r\t")]
    #[case(r"\u00e9", "\u{e9}")]
    #[case(r"\u20AC!", "\u{20ac}!")]
    #[case(r"\ud83d\ude00", "\u{1f600}")]
    #[case(r"x\u0000y", "x\u{0}y")]
    fn test_decode(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(decode(body).unwrap(), expected.as_bytes());
    }

    #[rstest::rstest]
    fn test_raw_string_leaves_scratch_untouched() {
        let mut scratch = vec![1, 2, 3];
        let scanned = scan_string(b"\"abc\" tail", 1, &mut scratch).unwrap();
        assert_eq!(scanned, ScannedString::Raw { end: 4 });
        assert_eq!(scratch, vec![1, 2, 3]);
    }

    #[rstest::rstest]
    fn test_decoded_is_never_longer_than_raw() {
        let body = r"\u00e9\ud83d\ude00\nA";
        let decoded = decode(body).unwrap();
        assert!(decoded.len() <= body.len());
    }

    #[rstest::rstest]
    #[case(r"\ud800", 0)]
    #[case(r"\ud800A", 0)]
    #[case(r"\udc00", 0)]
    #[case(r"\x", 0)]
    #[case(r"\u12g4", 4)]
    #[case("a\tb", 1)]
    fn test_invalid_string(#[case] body: &str, #[case] offset: usize) {
        let fault = decode(body).unwrap_err();
        assert_eq!(fault.code, ReadCode::InvalidString);
        assert_eq!(fault.offset, offset);
    }

    #[rstest::rstest]
    fn test_invalid_utf8() {
        let mut scratch = Vec::new();
        let fault = scan_string(b"ab\xff\"", 0, &mut scratch).unwrap_err();
        assert_eq!(fault.code, ReadCode::InvalidString);
        assert_eq!(fault.offset, 2);
        let fault = scan_string(b"\xc3\"", 0, &mut scratch).unwrap_err();
        assert_eq!(fault.code, ReadCode::InvalidString);
    }

    #[rstest::rstest]
    #[case(b"abc" as &[u8])]
    #[case(b"abc\\")]
    #[case(b"\\u00")]
    fn test_unterminated(#[case] input: &[u8]) {
        let mut scratch = Vec::new();
        let fault = scan_string(input, 0, &mut scratch).unwrap_err();
        assert_eq!(fault.code, ReadCode::UnexpectedEnd);
    }

    #[rstest::rstest]
    #[case(b"true", false, LiteralMatch::Full)]
    #[case(b"tru", false, LiteralMatch::Truncated)]
    #[case(b"truu", false, LiteralMatch::Mismatch)]
    #[case(b"TRUE", false, LiteralMatch::Mismatch)]
    #[case(b"TRUE", true, LiteralMatch::Full)]
    fn test_match_literal(
        #[case] input: &[u8],
        #[case] ignore_case: bool,
        #[case] expected: LiteralMatch,
    ) {
        assert_eq!(match_literal(input, 0, b"true", ignore_case), expected);
    }
}
