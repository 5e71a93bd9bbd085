//! Value module - In-memory representation of a parsed document.
//!
//! Mappings, sequences and scalars as a closed enum, plus the YAML/JSON codec.

mod value;

pub use value::*;
