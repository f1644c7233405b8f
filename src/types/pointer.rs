//! RFC 6901 JSON Pointer lookup.

use std::borrow::Cow;

use super::NodeRef;

/// Walk `pointer` from `node`. The empty pointer names `node` itself; any
/// other pointer must start with `/`. Object steps take the first member
/// with a matching key.
pub(crate) fn resolve<'d>(node: NodeRef<'d>, pointer: &str) -> Option<NodeRef<'d>> {
    if pointer.is_empty() {
        return Some(node);
    }
    let rest = pointer.strip_prefix('/')?;
    rest.split('/').try_fold(node, |current, token| {
        if current.is_array() {
            current.at(parse_index(token)?)
        } else {
            current.get(&unescape(token)?)
        }
    })
}

fn unescape(token: &str) -> Option<Cow<'_, str>> {
    if !token.contains('~') {
        return Some(Cow::Borrowed(token));
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '0' => out.push('~'),
            '1' => out.push('/'),
            _ => return None,
        }
    }
    Some(Cow::Owned(out))
}

/// Array indexes are decimal without leading zeros; `-` (past the end) never
/// names an existing element.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
