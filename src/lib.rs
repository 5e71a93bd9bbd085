//! # OAS Fragments
//!
//! Splits a single OpenAPI document into a directory tree of small, separately
//! editable fragment files, and merges such a tree back into one document.
//!
//! ```text
//! <root>/01_Info/__info.yaml, api-info.yaml
//! <root>/02_Servers/__servers.yaml, server-1.yaml, ...
//! <root>/03_Tags/__tags.yaml, tags.yaml
//! <root>/04_Paths/__paths.yaml, <sanitized-path>.yaml, ...
//! <root>/06_Components/__components.yaml, <schema-name>.yaml, ...
//! <root>/07_Security/__securitySchemes.yaml, security.yaml
//! <root>/08_ExternalDocs/__externalDocs.yaml, externalDocs.yaml
//! ```
//!
//! ## Modules
//!
//! - [`value`] - In-memory document model and YAML/JSON codec
//! - [`section`] - The section table shared by split and merge
//! - [`naming`] - File name sanitization and ordering
//! - [`split`] - Document to fragment tree
//! - [`merge`] - Fragment tree to document

pub mod config;
pub mod error;
pub mod merge;
pub mod naming;
pub mod section;
pub mod split;
pub mod value;

use std::path::Path;

pub use config::{Config, OutputFormat, DEFAULT_OUTPUT_FILE_NAME};
pub use error::{Error, MalformedFragment, Result};
pub use merge::{deep_merge, MergeReport, Merger};
pub use naming::{fragment_stem, sanitize};
pub use section::{Layout, Section, SectionTable};
pub use split::{SplitReport, Splitter};
pub use value::Value;

/// Splits `document` into `out_dir` using the OpenAPI section table and
/// default settings.
pub fn split(document: &Value, out_dir: &Path) -> Result<SplitReport> {
    Splitter::new(SectionTable::openapi(), &Config::default()).split(document, out_dir)
}

/// Merges the tree under `root` into `root/output_file_name` using the
/// OpenAPI section table and default settings.
pub fn merge(root: &Path, output_file_name: &str) -> Result<MergeReport> {
    Merger::new(SectionTable::openapi(), &Config::default()).merge(root, output_file_name)
}
