//! Split module - Breaks a document into a tree of fragment files.

mod splitter;

pub use splitter::*;
