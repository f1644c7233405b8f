use bitflags::bitflags;

bitflags! {
    /// Dialect and memory flags for the reader. The empty set reads strict RFC 8259.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReadFlags: u32 {
        /// Decode strings inside the caller's buffer instead of copying them.
        const IN_SITU = 1 << 0;
        /// Stop after the first value instead of rejecting trailing content.
        const STOP_WHEN_DONE = 1 << 1;
        /// Accept one trailing comma in arrays and objects, such as `[1,2,]`.
        const ALLOW_TRAILING_COMMAS = 1 << 2;
        /// Accept `//` line comments and `/* */` block comments.
        const ALLOW_COMMENTS = 1 << 3;
        /// Accept `inf`/`nan` literals and real numbers that overflow to infinity.
        const ALLOW_INF_AND_NAN = 1 << 4;
    }
}

/// Sizing and limits for the arena backing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaOptions {
    pub nodes: usize,
    pub bytes: usize,
    pub limit: Option<usize>,
}

impl ArenaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size node storage and copied-string storage.
    pub fn with_capacity(mut self, nodes: usize, bytes: usize) -> Self {
        self.nodes = nodes;
        self.bytes = bytes;
        self
    }

    /// Cap the bytes the arena may hold; exceeding it fails the read.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub flags: ReadFlags,
    pub arena: ArenaOptions,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every dialect extension enabled; memory strategy left to the caller.
    pub fn relaxed() -> Self {
        Self::new().with_flags(
            ReadFlags::ALLOW_TRAILING_COMMAS
                | ReadFlags::ALLOW_COMMENTS
                | ReadFlags::ALLOW_INF_AND_NAN,
        )
    }

    pub fn with_flags(mut self, flags: ReadFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_flag(mut self, flag: ReadFlags) -> Self {
        self.flags |= flag;
        self
    }

    pub fn with_arena(mut self, arena: ArenaOptions) -> Self {
        self.arena = arena;
        self
    }

    pub fn allows(&self, flag: ReadFlags) -> bool {
        self.flags.contains(flag)
    }
}
