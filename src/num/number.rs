use crate::constants::{LITERAL_INF, LITERAL_INFINITY, LITERAL_NAN};
use crate::error::{Fault, ReadCode};
use crate::text::string::{match_literal, LiteralMatch};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Uint(u64),
    Int(i64),
    Double(f64),
}

/// Read the number starting at `start`, returning it with the offset just past it.
///
/// Integers without sign fit `Uint`, negative integers fit `Int`, anything
/// else (fraction, exponent, out of range) becomes a correctly rounded `Double`.
pub(crate) fn parse_number(
    input: &[u8],
    start: usize,
    allow_inf_nan: bool,
) -> Result<(Number, usize), Fault> {
    let mut pos = start;
    let mut negative = false;
    let mut plus = false;
    match input.get(pos) {
        Some(b'-') => {
            negative = true;
            pos += 1;
        }
        Some(b'+') if allow_inf_nan => {
            plus = true;
            pos += 1;
        }
        _ => {}
    }

    if allow_inf_nan && matches!(input.get(pos), Some(b'i' | b'I' | b'n' | b'N')) {
        return parse_special(input, pos, negative);
    }
    if plus {
        return Err(Fault::new(
            ReadCode::InvalidNumber,
            "leading '+' is only allowed before inf or nan",
            start,
        ));
    }

    let int_start = pos;
    match input.get(pos) {
        Some(b'0') => {
            pos += 1;
            if input.get(pos).is_some_and(u8::is_ascii_digit) {
                return Err(Fault::new(
                    ReadCode::InvalidNumber,
                    "number with leading zero is not allowed",
                    pos,
                ));
            }
        }
        Some(b'1'..=b'9') => pos = skip_digits(input, pos + 1),
        Some(_) => {
            let message = if negative {
                "no digit after minus sign"
            } else {
                "invalid number"
            };
            return Err(Fault::new(ReadCode::InvalidNumber, message, pos));
        }
        None => return Err(Fault::end(pos)),
    }
    let int_end = pos;

    let mut is_real = false;
    if input.get(pos) == Some(&b'.') {
        pos = expect_digits(input, pos + 1, "no digit after decimal point")?;
        is_real = true;
    }
    if matches!(input.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(input.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        pos = expect_digits(input, pos, "no digit after exponent sign")?;
        is_real = true;
    }

    if !is_real {
        if let Some(magnitude) = accumulate(&input[int_start..int_end]) {
            if !negative {
                return Ok((Number::Uint(magnitude), pos));
            }
            if magnitude <= i64::MAX as u64 + 1 {
                return Ok((Number::Int((magnitude as i64).wrapping_neg()), pos));
            }
        }
    }

    let value = parse_double(&input[start..pos], start)?;
    if value.is_infinite() && !allow_inf_nan {
        return Err(Fault::new(
            ReadCode::InvalidNumber,
            "number is infinity when parsed as double",
            start,
        ));
    }
    Ok((Number::Double(value), pos))
}

fn skip_digits(input: &[u8], mut pos: usize) -> usize {
    while input.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

fn expect_digits(input: &[u8], pos: usize, message: &'static str) -> Result<usize, Fault> {
    match input.get(pos) {
        Some(byte) if byte.is_ascii_digit() => Ok(skip_digits(input, pos + 1)),
        Some(_) => Err(Fault::new(ReadCode::InvalidNumber, message, pos)),
        None => Err(Fault::end(pos)),
    }
}

fn accumulate(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &digit| {
        acc.checked_mul(10)?.checked_add(u64::from(digit - b'0'))
    })
}

fn parse_double(text: &[u8], start: usize) -> Result<f64, Fault> {
    std::str::from_utf8(text)
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or(Fault::new(ReadCode::InvalidNumber, "invalid number", start))
}

fn parse_special(input: &[u8], pos: usize, negative: bool) -> Result<(Number, usize), Fault> {
    let candidates: [(&[u8], f64); 3] = [
        (LITERAL_INFINITY, f64::INFINITY),
        (LITERAL_INF, f64::INFINITY),
        (LITERAL_NAN, f64::NAN),
    ];
    let mut partial = false;
    for (literal, value) in candidates {
        match match_literal(input, pos, literal, true) {
            LiteralMatch::Full => {
                let value = if negative { -value } else { value };
                return Ok((Number::Double(value), pos + literal.len()));
            }
            LiteralMatch::Truncated => partial = true,
            LiteralMatch::Mismatch => {}
        }
    }
    if partial {
        return Err(Fault::end(input.len()));
    }
    Err(Fault::new(ReadCode::Literal, "invalid literal", pos))
}
