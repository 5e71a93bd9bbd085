//! Merge module - Reassembles a fragment tree into one document.
//!
//! Fragments are discovered in a fixed order and deep-merged one by one.

mod deep;
mod discovery;
mod merger;


pub use deep::*;
pub use discovery::*;
pub use merger::*;
