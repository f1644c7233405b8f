//! Storage for one parsed document.
//!
//! Nodes are pushed in post-order: a container is pushed after all of its
//! children, whose ids are then copied into one contiguous run of
//! `children` (arrays) or `pairs` (objects). Strings live either in the
//! caller's buffer (`StringRef::Input`) or in the arena's own byte buffer
//! (`StringRef::Arena`).

use std::mem::size_of;

use thiserror::Error;

use crate::options::ArenaOptions;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringRef {
    Input(Span),
    Arena(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub key: StringRef,
    pub value: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Double(f64),
    String(StringRef),
    Array { first: usize, len: usize },
    Object { first: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena limit of {limit} bytes exceeded")]
    LimitExceeded { limit: usize },
    #[error("arena allocation failed")]
    AllocationFailed,
}

#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    children: Vec<NodeId>,
    pairs: Vec<Pair>,
    bytes: Vec<u8>,
    limit: Option<usize>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, bytes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            children: Vec::with_capacity(nodes),
            pairs: Vec::new(),
            bytes: Vec::with_capacity(bytes),
            limit: None,
        }
    }

    /// Drop all nodes and strings, keeping the allocations.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.children.clear();
        self.pairs.clear();
        self.bytes.clear();
        self.limit = None;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bytes currently held by nodes, child runs, pairs and copied strings.
    pub fn used_bytes(&self) -> usize {
        self.nodes.len() * size_of::<Node>()
            + self.children.len() * size_of::<NodeId>()
            + self.pairs.len() * size_of::<Pair>()
            + self.bytes.len()
    }

    pub(crate) fn configure(&mut self, options: &ArenaOptions) -> Result<(), ArenaError> {
        self.limit = options.limit;
        self.reserve(options.nodes, options.bytes)
    }

    /// Pre-size for `nodes` more nodes and `bytes` more string bytes. Hints
    /// that would not fit under the limit are ignored.
    pub(crate) fn reserve(&mut self, nodes: usize, bytes: usize) -> Result<(), ArenaError> {
        let wanted = nodes
            .saturating_mul(size_of::<Node>() + size_of::<NodeId>())
            .saturating_add(bytes);
        if self.check(wanted).is_err() {
            return Ok(());
        }
        try_reserve(&mut self.nodes, nodes)?;
        try_reserve(&mut self.children, nodes)?;
        try_reserve(&mut self.bytes, bytes)
    }

    /// Fail if `extra` more bytes would push usage past the limit.
    pub(crate) fn check(&self, extra: usize) -> Result<(), ArenaError> {
        match self.limit {
            Some(limit) if self.used_bytes().saturating_add(extra) > limit => {
                Err(ArenaError::LimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn push_node(&mut self, node: Node) -> Result<NodeId, ArenaError> {
        self.check(size_of::<Node>())?;
        try_reserve(&mut self.nodes, 1)?;
        let id = self.nodes.len();
        self.nodes.push(node);
        Ok(id)
    }

    pub(crate) fn push_array(&mut self, children: &[NodeId]) -> Result<NodeId, ArenaError> {
        self.check(children.len() * size_of::<NodeId>())?;
        try_reserve(&mut self.children, children.len())?;
        let first = self.children.len();
        self.children.extend_from_slice(children);
        self.push_node(Node::Array {
            first,
            len: children.len(),
        })
    }

    pub(crate) fn push_object(&mut self, pairs: &[Pair]) -> Result<NodeId, ArenaError> {
        self.check(pairs.len() * size_of::<Pair>())?;
        try_reserve(&mut self.pairs, pairs.len())?;
        let first = self.pairs.len();
        self.pairs.extend_from_slice(pairs);
        self.push_node(Node::Object {
            first,
            len: pairs.len(),
        })
    }

    pub(crate) fn push_bytes(&mut self, bytes: &[u8]) -> Result<StringRef, ArenaError> {
        self.check(bytes.len())?;
        try_reserve(&mut self.bytes, bytes.len())?;
        let start = self.bytes.len();
        self.bytes.extend_from_slice(bytes);
        Ok(StringRef::Arena(Span::new(start, self.bytes.len())))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn children(&self, first: usize, len: usize) -> &[NodeId] {
        let end = first.saturating_add(len);
        self.children.get(first..end).unwrap_or(&[])
    }

    pub fn pairs(&self, first: usize, len: usize) -> &[Pair] {
        let end = first.saturating_add(len);
        self.pairs.get(first..end).unwrap_or(&[])
    }

    /// Resolve a string against this arena and the buffer the document was read from.
    pub fn resolve<'d>(&'d self, input: &'d [u8], string: StringRef) -> &'d [u8] {
        match string {
            StringRef::Input(span) => input.get(span.start..span.end).unwrap_or(&[]),
            StringRef::Arena(span) => self.bytes.get(span.start..span.end).unwrap_or(&[]),
        }
    }
}

fn try_reserve<T>(vec: &mut Vec<T>, additional: usize) -> Result<(), ArenaError> {
    vec.try_reserve(additional)
        .map_err(|_| ArenaError::AllocationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_containers_own_contiguous_runs() {
        let mut arena = Arena::new();
        let one = arena.push_node(Node::Uint(1)).unwrap();
        let two = arena.push_node(Node::Uint(2)).unwrap();
        let array = arena.push_array(&[one, two]).unwrap();
        let key = arena.push_bytes(b"k").unwrap();
        let object = arena.push_object(&[Pair { key, value: array }]).unwrap();

        assert_eq!(arena.len(), 4);
        match arena.node(array) {
            Some(&Node::Array { first, len }) => assert_eq!(arena.children(first, len), &[one, two]),
            other => panic!("expected array, got {other:?}"),
        }
        match arena.node(object) {
            Some(&Node::Object { first, len }) => {
                let pairs = arena.pairs(first, len);
                assert_eq!(pairs.len(), 1);
                assert_eq!(arena.resolve(&[], pairs[0].key), b"k");
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[rstest::rstest]
    fn test_resolve_input_span() {
        let arena = Arena::new();
        let input = b"\"abc\"";
        let string = StringRef::Input(Span::new(1, 4));
        assert_eq!(arena.resolve(input, string), b"abc");
    }

    #[rstest::rstest]
    fn test_limit_rejects_growth() {
        let mut arena = Arena::new();
        arena
            .configure(&ArenaOptions::new().with_limit(size_of::<Node>()))
            .unwrap();
        assert!(arena.push_node(Node::Null).is_ok());
        assert_eq!(
            arena.push_node(Node::Null),
            Err(ArenaError::LimitExceeded {
                limit: size_of::<Node>()
            })
        );
    }

    #[rstest::rstest]
    fn test_oversized_hint_is_ignored() {
        let mut arena = Arena::new();
        let options = ArenaOptions::new().with_capacity(1 << 20, 0).with_limit(16);
        assert!(arena.configure(&options).is_ok());
        assert!(arena.push_bytes(b"0123456789abcdef").is_ok());
        assert!(arena.push_bytes(b"x").is_err());
    }

    #[rstest::rstest]
    fn test_clear_keeps_capacity() {
        let mut arena = Arena::with_capacity(8, 8);
        arena.push_bytes(b"hello").unwrap();
        arena.push_node(Node::Bool(true)).unwrap();
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.used_bytes(), 0);
        assert!(arena.nodes.capacity() >= 8);
    }
}
