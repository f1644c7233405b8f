use std::fmt;

use smallvec::SmallVec;

use crate::arena::{Arena, Node, NodeId};
use crate::constants::MAX_WRITE_DEPTH;

use super::iter::{ArrayIter, ObjectIter};
use super::pointer;

/// The tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Uint,
    Int,
    Double,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Uint => "uint",
            Kind::Int => "int",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    pub fn is_number(self) -> bool {
        matches!(self, Kind::Uint | Kind::Int | Kind::Double)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle to one node of a [`Document`](crate::Document).
///
/// Handles are `Copy` and borrow the document. The typed accessors return
/// `None` when the tag does not match; they never convert between number
/// tiers (`as_i64` on a `Double` is `None`). Use [`NodeRef::as_number`] for
/// an explicit conversion to `f64`.
#[derive(Clone, Copy)]
pub struct NodeRef<'d> {
    input: &'d [u8],
    arena: &'d Arena,
    id: NodeId,
}

impl<'d> NodeRef<'d> {
    pub(crate) fn new(input: &'d [u8], arena: &'d Arena, id: NodeId) -> Self {
        Self { input, arena, id }
    }

    fn node(&self) -> Node {
        self.arena.node(self.id).copied().unwrap_or(Node::Null)
    }

    fn with_id(&self, id: NodeId) -> NodeRef<'d> {
        NodeRef::new(self.input, self.arena, id)
    }

    /// Index of this node in the document's arena.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        match self.node() {
            Node::Null => Kind::Null,
            Node::Bool(_) => Kind::Bool,
            Node::Uint(_) => Kind::Uint,
            Node::Int(_) => Kind::Int,
            Node::Double(_) => Kind::Double,
            Node::String(_) => Kind::String,
            Node::Array { .. } => Kind::Array,
            Node::Object { .. } => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    pub fn is_bool(&self) -> bool {
        self.kind() == Kind::Bool
    }

    pub fn is_uint(&self) -> bool {
        self.kind() == Kind::Uint
    }

    pub fn is_int(&self) -> bool {
        self.kind() == Kind::Int
    }

    pub fn is_double(&self) -> bool {
        self.kind() == Kind::Double
    }

    pub fn is_number(&self) -> bool {
        self.kind().is_number()
    }

    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.node() {
            Node::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.node() {
            Node::Uint(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.node() {
            Node::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.node() {
            Node::Double(value) => Some(value),
            _ => None,
        }
    }

    /// Any number tier converted to `f64`; large integers may lose precision.
    pub fn as_number(&self) -> Option<f64> {
        match self.node() {
            Node::Uint(value) => Some(value as f64),
            Node::Int(value) => Some(value as f64),
            Node::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'d [u8]> {
        match self.node() {
            Node::String(string) => Some(self.arena.resolve(self.input, string)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'d str> {
        self.as_bytes()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Number of elements of an array or members of an object; 0 otherwise.
    pub fn len(&self) -> usize {
        match self.node() {
            Node::Array { len, .. } | Node::Object { len, .. } => len,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First member of an object whose key equals `key`.
    ///
    /// Duplicate keys are all kept in document order, so the earliest one
    /// wins here; [`NodeRef::entries`] yields every member.
    pub fn get(&self, key: &str) -> Option<NodeRef<'d>> {
        self.get_bytes(key.as_bytes())
    }

    pub fn get_bytes(&self, key: &[u8]) -> Option<NodeRef<'d>> {
        let Node::Object { first, len } = self.node() else {
            return None;
        };
        self.arena
            .pairs(first, len)
            .iter()
            .find(|pair| self.arena.resolve(self.input, pair.key) == key)
            .map(|pair| self.with_id(pair.value))
    }

    /// Element `index` of an array.
    pub fn at(&self, index: usize) -> Option<NodeRef<'d>> {
        self.children().get(index).map(|&id| self.with_id(id))
    }

    pub fn first(&self) -> Option<NodeRef<'d>> {
        self.at(0)
    }

    pub fn last(&self) -> Option<NodeRef<'d>> {
        self.children().last().map(|&id| self.with_id(id))
    }

    /// Elements of an array in document order; empty for other kinds.
    pub fn iter(&self) -> ArrayIter<'d> {
        ArrayIter::new(self.input, self.arena, self.children())
    }

    /// Members of an object in document order, duplicates included; empty
    /// for other kinds.
    pub fn entries(&self) -> ObjectIter<'d> {
        let pairs = match self.node() {
            Node::Object { first, len } => self.arena.pairs(first, len),
            _ => &[],
        };
        ObjectIter::new(self.input, self.arena, pairs)
    }

    /// Resolve an RFC 6901 JSON Pointer relative to this node.
    pub fn pointer(&self, pointer: &str) -> Option<NodeRef<'d>> {
        pointer::resolve(*self, pointer)
    }

    fn children(&self) -> &'d [NodeId] {
        match self.node() {
            Node::Array { first, len } => self.arena.children(first, len),
            _ => &[],
        }
    }
}

impl<'a, 'b> PartialEq<NodeRef<'b>> for NodeRef<'a> {
    /// Structural equality: same tags, equal scalars, byte-equal strings, and
    /// equal children and members in the same order.
    fn eq(&self, other: &NodeRef<'b>) -> bool {
        let mut pending: SmallVec<[(NodeRef<'a>, NodeRef<'b>); 16]> = SmallVec::new();
        pending.push((*self, *other));
        while let Some((left, right)) = pending.pop() {
            let same = match (left.node(), right.node()) {
                (Node::Null, Node::Null) => true,
                (Node::Bool(a), Node::Bool(b)) => a == b,
                (Node::Uint(a), Node::Uint(b)) => a == b,
                (Node::Int(a), Node::Int(b)) => a == b,
                (Node::Double(a), Node::Double(b)) => a == b,
                (Node::String(_), Node::String(_)) => left.as_bytes() == right.as_bytes(),
                (Node::Array { len: a, .. }, Node::Array { len: b, .. }) => {
                    pending.extend(left.iter().zip(right.iter()));
                    a == b
                }
                (Node::Object { len: a, .. }, Node::Object { len: b, .. }) => {
                    let mut keys_match = true;
                    for ((left_key, left_value), (right_key, right_value)) in
                        left.entries().zip(right.entries())
                    {
                        keys_match &= left_key == right_key;
                        pending.push((left_value, right_value));
                    }
                    a == b && keys_match
                }
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&DebugNode { node: *self, depth: 0 }, f)
    }
}

/// Containers nested deeper than [`MAX_WRITE_DEPTH`] render as `[...]` or `{...}`.
struct DebugNode<'d> {
    node: NodeRef<'d>,
    depth: usize,
}

impl<'d> DebugNode<'d> {
    fn child(&self, node: NodeRef<'d>) -> DebugNode<'d> {
        DebugNode {
            node,
            depth: self.depth + 1,
        }
    }
}

impl fmt::Debug for DebugNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node;
        match node.node() {
            Node::Null => f.write_str("Null"),
            Node::Bool(value) => write!(f, "Bool({value})"),
            Node::Uint(value) => write!(f, "Uint({value})"),
            Node::Int(value) => write!(f, "Int({value})"),
            Node::Double(value) => write!(f, "Double({value:?})"),
            Node::String(_) => {
                let bytes = node.as_bytes().unwrap_or_default();
                write!(f, "String({:?})", String::from_utf8_lossy(bytes))
            }
            Node::Array { .. } if self.depth >= MAX_WRITE_DEPTH => f.write_str("[...]"),
            Node::Object { .. } if self.depth >= MAX_WRITE_DEPTH => f.write_str("{...}"),
            Node::Array { .. } => f
                .debug_list()
                .entries(node.iter().map(|element| self.child(element)))
                .finish(),
            Node::Object { .. } => f
                .debug_map()
                .entries(node.entries().map(|(key, value)| (key, self.child(value))))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_str;

    #[rstest::rstest]
    #[case("null", Kind::Null)]
    #[case("false", Kind::Bool)]
    #[case("7", Kind::Uint)]
    #[case("-7", Kind::Int)]
    #[case("7.5", Kind::Double)]
    #[case("\"s\"", Kind::String)]
    #[case("[]", Kind::Array)]
    #[case("{}", Kind::Object)]
    fn test_kind(#[case] input: &str, #[case] kind: Kind) {
        let document = from_str(input).unwrap();
        assert_eq!(document.root().kind(), kind);
    }

    #[rstest::rstest]
    fn test_accessors_do_not_coerce() {
        let document = from_str("[1, -1, 1.5, \"1\", true]").unwrap();
        let root = document.root();
        let uint = root.at(0).unwrap();
        let int = root.at(1).unwrap();
        let double = root.at(2).unwrap();

        assert_eq!(uint.as_u64(), Some(1));
        assert_eq!(uint.as_i64(), None);
        assert_eq!(uint.as_f64(), None);
        assert_eq!(int.as_i64(), Some(-1));
        assert_eq!(int.as_u64(), None);
        assert_eq!(double.as_f64(), Some(1.5));
        assert_eq!(double.as_i64(), None);
        assert_eq!(root.at(3).unwrap().as_u64(), None);
        assert_eq!(root.at(4).unwrap().as_str(), None);
        assert_eq!(root.as_bool(), None);
    }

    #[rstest::rstest]
    fn test_as_number_converts_every_tier() {
        let document = from_str("[3, -3, 0.25, null]").unwrap();
        let numbers: Vec<Option<f64>> = document.root().iter().map(|v| v.as_number()).collect();
        assert_eq!(numbers, vec![Some(3.0), Some(-3.0), Some(0.25), None]);
    }

    #[rstest::rstest]
    fn test_lookup_on_wrong_kind_is_none() {
        let document = from_str("[1]").unwrap();
        let root = document.root();
        assert!(root.get("a").is_none());
        assert!(root.at(1).is_none());
        assert!(root.at(0).unwrap().at(0).is_none());
        assert_eq!(root.at(0).unwrap().iter().count(), 0);
        assert_eq!(root.entries().count(), 0);
    }

    #[rstest::rstest]
    fn test_structural_equality_across_documents() {
        let left = from_str(r#"{"a": [1, {"b": "c"}], "d": null}"#).unwrap();
        let right = from_str("{ \"a\" : [ 1 , { \"b\" : \"\\u0063\" } ] , \"d\" : null }").unwrap();
        let other = from_str(r#"{"d": null, "a": [1, {"b": "c"}]}"#).unwrap();
        assert_eq!(left.root(), right.root());
        assert_ne!(left.root(), other.root());
        assert_ne!(left.root().get("a").unwrap(), right.root());
    }

    #[rstest::rstest]
    fn test_debug_elides_deep_nesting() {
        let depth = 200_000;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let document = from_str(&input).unwrap();
        let rendered = format!("{:?}", document.root());
        let expected = format!(
            "{}[...]{}",
            "[".repeat(MAX_WRITE_DEPTH),
            "]".repeat(MAX_WRITE_DEPTH)
        );
        assert_eq!(rendered, expected);
    }

    #[rstest::rstest]
    fn test_number_tiers_are_not_equal() {
        let document = from_str("[1, 1.0, -0, 0]").unwrap();
        let root = document.root();
        assert_ne!(root.at(0).unwrap(), root.at(1).unwrap());
        assert_ne!(root.at(2).unwrap(), root.at(3).unwrap());
    }
}
