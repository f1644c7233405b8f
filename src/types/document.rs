use std::fmt;

use crate::arena::{Arena, NodeId};

use super::NodeRef;

/// A parsed JSON value tree and the arena backing it.
///
/// `'a` is the lifetime of the input buffer for in-situ documents; copied
/// documents are `Document<'static>`. A document is never modified after
/// the read returns, so it can be shared across threads for reading.
pub struct Document<'a> {
    input: &'a [u8],
    arena: Arena,
    root: NodeId,
    bytes_read: usize,
    in_situ: bool,
}

impl<'a> Document<'a> {
    pub(crate) fn new(
        input: &'a [u8],
        arena: Arena,
        root: NodeId,
        bytes_read: usize,
        in_situ: bool,
    ) -> Self {
        Self {
            input,
            arena,
            root,
            bytes_read,
            in_situ,
        }
    }

    /// Release the input borrow of a document whose strings were all copied.
    pub(crate) fn detach(self) -> Document<'static> {
        debug_assert!(!self.in_situ);
        Document {
            input: &[],
            arena: self.arena,
            root: self.root,
            bytes_read: self.bytes_read,
            in_situ: false,
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self.input, &self.arena, self.root)
    }

    /// Bytes of input consumed. With `STOP_WHEN_DONE` this is where the next
    /// document of a stream begins.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_in_situ(&self) -> bool {
        self.in_situ
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Resolve an RFC 6901 JSON Pointer from the root.
    pub fn pointer(&self, pointer: &str) -> Option<NodeRef<'_>> {
        self.root().pointer(pointer)
    }

    pub fn to_value(&self) -> serde_json::Value {
        self.root().to_value()
    }

    /// Give back the arena, emptied, for another read.
    pub fn into_arena(self) -> Arena {
        let mut arena = self.arena;
        arena.clear();
        arena
    }
}

impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root())
            .field("bytes_read", &self.bytes_read)
            .field("in_situ", &self.in_situ)
            .finish()
    }
}
