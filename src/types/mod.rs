mod document;
mod iter;
mod pointer;
mod value;

pub use document::Document;
pub use iter::{ArrayIter, ObjectIter};
pub use value::{Kind, NodeRef};
