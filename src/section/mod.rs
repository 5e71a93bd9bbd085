//! Section module - Top-level sections and their on-disk layout.
//!
//! The same table drives both the splitter and the merger.

mod table;

pub use table::*;
