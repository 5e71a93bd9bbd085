//! The static table of recognized top-level sections.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::value::{Map, Value};

/// Layout describes how a section's value is spread over content fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The whole value in one file, written without the section key.
    Whole { file: &'static str },
    /// One file per list item, named `<stem>-<n>` with a 1-based index.
    Items { stem: &'static str },
    /// One file per mapping entry, each holding `{key: value}`.
    Entries,
    /// One file per entry of the mapping found under `key`.
    NestedEntries { key: &'static str },
}

impl Layout {
    /// Re-wraps a content fragment under its section key so it can be
    /// deep-merged into the document.
    ///
    /// Returns a description of the expected shape when the fragment does not
    /// fit the layout.
    pub fn wrap(&self, section_key: &str, content: Value) -> Result<Value, String> {
        let wrapped = match self {
            Layout::Whole { .. } => content,
            Layout::Items { .. } => Value::List(vec![content]),
            Layout::Entries => match content {
                Value::Map(_) => content,
                other => return Err(format!("expected a map of entries, found {}", other.kind())),
            },
            Layout::NestedEntries { key } => match content {
                Value::Map(_) => Value::single(*key, content),
                other => return Err(format!("expected a map of entries, found {}", other.kind())),
            },
        };
        Ok(Value::single(section_key, wrapped))
    }

    /// Value of a section whose directory held no content fragments, or
    /// `None` when the layout has no empty form.
    pub fn empty(&self) -> Option<Value> {
        match self {
            Layout::Whole { .. } => None,
            Layout::Items { .. } => Some(Value::List(Vec::new())),
            Layout::Entries => Some(Value::Map(Map::new())),
            Layout::NestedEntries { key } => Some(Value::single(*key, Value::Map(Map::new()))),
        }
    }
}

/// Section is one recognized top-level key and the directory that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Top-level document key, e.g. `paths`.
    pub key: &'static str,
    /// Numeric prefix of the directory; encodes merge and display order.
    pub order: u8,
    pub title: &'static str,
    /// Stem of the header fragment, without the leading `__`.
    pub header: &'static str,
    pub layout: Layout,
}

impl Section {
    /// Directory name, e.g. `04_Paths`.
    pub fn directory(&self) -> String {
        format!("{:02}_{}", self.order, self.title)
    }

    /// Header fragment stem, e.g. `__paths`.
    pub fn header_stem(&self) -> String {
        format!("__{}", self.header)
    }

    /// Text of the header fragment: the section key with an empty body.
    pub fn header_content(&self) -> String {
        format!("{}:\n", self.key)
    }
}

/// SectionTable is the immutable set of sections shared by split and merge.
#[derive(Debug, Clone)]
pub struct SectionTable {
    sections: Vec<Section>,
    by_key: HashMap<&'static str, usize>,
    by_directory: HashMap<String, usize>,
}

static OPENAPI: Lazy<SectionTable> = Lazy::new(|| {
    SectionTable::new(vec![
        Section {
            key: "info",
            order: 1,
            title: "Info",
            header: "info",
            layout: Layout::Whole { file: "api-info" },
        },
        Section {
            key: "servers",
            order: 2,
            title: "Servers",
            header: "servers",
            layout: Layout::Items { stem: "server" },
        },
        Section {
            key: "tags",
            order: 3,
            title: "Tags",
            header: "tags",
            layout: Layout::Whole { file: "tags" },
        },
        Section {
            key: "paths",
            order: 4,
            title: "Paths",
            header: "paths",
            layout: Layout::Entries,
        },
        // 05 is unassigned.
        Section {
            key: "components",
            order: 6,
            title: "Components",
            header: "components",
            layout: Layout::NestedEntries { key: "schemas" },
        },
        Section {
            key: "security",
            order: 7,
            title: "Security",
            header: "securitySchemes",
            layout: Layout::Whole { file: "security" },
        },
        Section {
            key: "externalDocs",
            order: 8,
            title: "ExternalDocs",
            header: "externalDocs",
            layout: Layout::Whole { file: "externalDocs" },
        },
    ])
});

impl SectionTable {
    /// Builds a table from sections listed in split order.
    pub fn new(sections: Vec<Section>) -> Self {
        let by_key = sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key, i))
            .collect();
        let by_directory = sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.directory(), i))
            .collect();
        SectionTable {
            sections,
            by_key,
            by_directory,
        }
    }

    /// The OpenAPI 3.x section layout.
    pub fn openapi() -> &'static SectionTable {
        &OPENAPI
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn by_key(&self, key: &str) -> Option<&Section> {
        self.by_key.get(key).map(|&i| &self.sections[i])
    }

    pub fn by_directory(&self, directory: &str) -> Option<&Section> {
        self.by_directory.get(directory).map(|&i| &self.sections[i])
    }

    /// Top-level keys of `document` that no section claims.
    pub fn unrecognized_keys<'a>(&self, document: &'a Map) -> Vec<&'a str> {
        document
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| self.by_key(k).is_none())
            .collect()
    }
}
