pub const LITERAL_TRUE: &[u8] = b"true";
pub const LITERAL_FALSE: &[u8] = b"false";
pub const LITERAL_NULL: &[u8] = b"null";

pub const LITERAL_INF: &[u8] = b"inf";
pub const LITERAL_INFINITY: &[u8] = b"infinity";
pub const LITERAL_NAN: &[u8] = b"nan";

/// Rough input bytes per node in minified JSON, used to pre-size the arena.
pub const ESTIMATED_BYTES_PER_NODE: usize = 8;

/// Deepest container nesting that `Serialize` and `Debug` descend into.
/// Both recurse once per level; reading itself has no depth limit.
pub const MAX_WRITE_DEPTH: usize = 512;

#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}
