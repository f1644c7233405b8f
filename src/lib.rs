//! Arena-backed JSON reader.
//!
//! A read turns a byte buffer into a [`Document`]: an immutable tree whose
//! nodes, child runs and copied strings all live in one [`Arena`]. Numbers
//! keep their tier (`u64`, `i64` or `f64`) and strings are stored decoded.
//!
//! ```
//! use arenajson::{parse, ReadFlags, ReadOptions};
//!
//! let options = ReadOptions::new()
//!     .with_flag(ReadFlags::ALLOW_COMMENTS | ReadFlags::ALLOW_TRAILING_COMMAS);
//! let input = br#"{"title": "feed", /* two */ "entries": [{"id": 1}, {"id": 2},]}"#;
//! let document = parse(input, &options).unwrap();
//!
//! let root = document.root();
//! assert_eq!(root.get("title").and_then(|v| v.as_str()), Some("feed"));
//! let ids: Vec<u64> = root
//!     .get("entries")
//!     .map(|entries| entries.iter().filter_map(|e| e.get("id")?.as_u64()).collect())
//!     .unwrap_or_default();
//! assert_eq!(ids, vec![1, 2]);
//! ```

pub mod arena;
pub(crate) mod constants;
pub mod decode;
pub mod error;
pub(crate) mod num;
pub mod options;
mod serde;
pub(crate) mod text;
pub mod types;

pub use crate::arena::{Arena, ArenaError, NodeId};
pub use crate::decode::{from_str, parse, parse_in_situ, parse_with_arena};
pub use crate::error::{ReadCode, ReadError};
pub use crate::options::{ArenaOptions, ReadFlags, ReadOptions};
pub use crate::types::{ArrayIter, Document, Kind, NodeRef, ObjectIter};

pub type Result<T> = std::result::Result<T, ReadError>;
