use std::iter::FusedIterator;
use std::slice;

use crate::arena::{Arena, NodeId, Pair};

use super::NodeRef;

/// Elements of an array, in document order.
#[derive(Clone)]
pub struct ArrayIter<'d> {
    input: &'d [u8],
    arena: &'d Arena,
    ids: slice::Iter<'d, NodeId>,
}

impl<'d> ArrayIter<'d> {
    pub(crate) fn new(input: &'d [u8], arena: &'d Arena, ids: &'d [NodeId]) -> Self {
        Self {
            input,
            arena,
            ids: ids.iter(),
        }
    }
}

impl<'d> Iterator for ArrayIter<'d> {
    type Item = NodeRef<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next()?;
        Some(NodeRef::new(self.input, self.arena, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for ArrayIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next_back()?;
        Some(NodeRef::new(self.input, self.arena, id))
    }
}

impl ExactSizeIterator for ArrayIter<'_> {}

impl FusedIterator for ArrayIter<'_> {}

/// Members of an object as `(key, value)`, in document order. Duplicate keys
/// are yielded as often as they occur.
#[derive(Clone)]
pub struct ObjectIter<'d> {
    input: &'d [u8],
    arena: &'d Arena,
    pairs: slice::Iter<'d, Pair>,
}

impl<'d> ObjectIter<'d> {
    pub(crate) fn new(input: &'d [u8], arena: &'d Arena, pairs: &'d [Pair]) -> Self {
        Self {
            input,
            arena,
            pairs: pairs.iter(),
        }
    }

    fn entry(&self, pair: &Pair) -> (&'d str, NodeRef<'d>) {
        let key = self.arena.resolve(self.input, pair.key);
        // Keys were validated as UTF-8 while reading.
        let key = std::str::from_utf8(key).unwrap_or_default();
        (key, NodeRef::new(self.input, self.arena, pair.value))
    }
}

impl<'d> Iterator for ObjectIter<'d> {
    type Item = (&'d str, NodeRef<'d>);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.next()?;
        Some(self.entry(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl DoubleEndedIterator for ObjectIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.next_back()?;
        Some(self.entry(pair))
    }
}

impl ExactSizeIterator for ObjectIter<'_> {}

impl FusedIterator for ObjectIter<'_> {}
