//! Splits a document into a tree of fragment files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::naming::fragment_stem;
use crate::section::{Layout, Section, SectionTable};
use crate::value::{self, Map, Value};

/// Two keys whose fragment file names differ at most in letter case.
///
/// Identical names overwrite, and the later write wins. Names that differ only
/// in case overwrite each other on case-insensitive filesystems, so they are
/// reported too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub path: PathBuf,
    /// Key whose fragment was overwritten.
    pub overwritten: String,
    /// Key whose fragment now occupies the file.
    pub by: String,
}

/// Outcome of a split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Every file written, headers included, in write order.
    pub written: Vec<PathBuf>,
    /// Dotted key paths present in the input but not written anywhere.
    pub dropped: Vec<String>,
    pub collisions: Vec<Collision>,
}

/// One content fragment waiting to be written.
struct Fragment {
    stem: String,
    /// Key the fragment came from, for collision reports.
    label: String,
    content: Value,
}

/// Splitter writes each recognized section of a document into its own directory.
pub struct Splitter<'a> {
    table: &'a SectionTable,
    config: &'a Config,
}

impl<'a> Splitter<'a> {
    pub fn new(table: &'a SectionTable, config: &'a Config) -> Self {
        Splitter { table, config }
    }

    /// Reads and parses `input`, then splits it into `out_dir`.
    pub fn split_file(&self, input: &Path, out_dir: &Path) -> Result<SplitReport> {
        let content = fs::read_to_string(input).map_err(|e| Error::io(input, e))?;
        let document = value::from_yaml(&content).map_err(|e| Error::Parse {
            path: input.to_path_buf(),
            source: e,
        })?;
        self.split_from(&document, input, out_dir)
    }

    /// Splits an in-memory document into `out_dir`.
    ///
    /// Existing files are overwritten but never deleted, so fragments left
    /// over from an earlier split stay in place.
    pub fn split(&self, document: &Value, out_dir: &Path) -> Result<SplitReport> {
        self.split_from(document, out_dir, out_dir)
    }

    fn split_from(&self, document: &Value, source: &Path, out_dir: &Path) -> Result<SplitReport> {
        let root = match document {
            Value::Map(root) => root,
            other => {
                return Err(Error::Structure {
                    path: source.to_path_buf(),
                    found: other.kind(),
                })
            }
        };

        create_dir(out_dir)?;

        let mut report = SplitReport::default();
        for key in self.table.unrecognized_keys(root) {
            drop_key(&mut report, key.to_string(), "top-level key has no section");
        }

        for section in self.table.iter() {
            if let Some(value) = root.get(section.key) {
                self.split_section(section, value, out_dir, &mut report)?;
            }
        }

        info!(
            out_dir = %out_dir.display(),
            files = report.written.len(),
            dropped = report.dropped.len(),
            "split complete"
        );
        Ok(report)
    }

    fn split_section(
        &self,
        section: &Section,
        body: &Value,
        out_dir: &Path,
        report: &mut SplitReport,
    ) -> Result<()> {
        // Shape is checked before anything touches the disk, so a section
        // that cannot be split leaves no directory behind.
        let fragments = match fragments_for(section, body, report) {
            Some(fragments) => fragments,
            None => return Ok(()),
        };

        let dir = out_dir.join(section.directory());
        create_dir(&dir)?;

        let header = dir.join(self.config.file_name(&section.header_stem()));
        write_file(&header, &section.header_content())?;

        // keyed by the lowercased path
        let mut claimed: HashMap<String, (PathBuf, String)> = HashMap::new();
        claimed.insert(fold_case(&header), (header.clone(), section.header_stem()));
        report.written.push(header);

        for fragment in fragments {
            let path = dir.join(self.config.file_name(&fragment.stem));
            let text = value::to_yaml(&fragment.content).map_err(|e| Error::EmitYaml {
                path: path.clone(),
                source: e,
            })?;

            match claimed.insert(fold_case(&path), (path.clone(), fragment.label.clone())) {
                Some((previous_path, previous)) => {
                    warn!(
                        path = %path.display(),
                        overwritten = %previous,
                        by = %fragment.label,
                        "fragment file name collision"
                    );
                    report.collisions.push(Collision {
                        path: path.clone(),
                        overwritten: previous,
                        by: fragment.label,
                    });
                    if previous_path != path {
                        report.written.push(path.clone());
                    }
                }
                None => report.written.push(path.clone()),
            }

            write_file(&path, &text)?;
            debug!(path = %path.display(), "wrote fragment");
        }

        Ok(())
    }
}

/// Lays a section value out as content fragments. Returns `None` when the
/// value does not have the shape the layout needs.
fn fragments_for(section: &Section, body: &Value, report: &mut SplitReport) -> Option<Vec<Fragment>> {
    match section.layout {
        Layout::Whole { file } => Some(vec![Fragment {
            stem: file.to_string(),
            label: section.key.to_string(),
            content: body.clone(),
        }]),
        Layout::Items { stem } => match body {
            Value::List(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Fragment {
                        stem: format!("{}-{}", stem, i + 1),
                        label: format!("{}[{}]", section.key, i),
                        content: item.clone(),
                    })
                    .collect(),
            ),
            other => {
                drop_key(report, section.key.to_string(), &expected("list", other));
                None
            }
        },
        Layout::Entries => match body {
            Value::Map(entries) => Some(entry_fragments(entries)),
            other => {
                drop_key(report, section.key.to_string(), &expected("map", other));
                None
            }
        },
        Layout::NestedEntries { key } => {
            let members = match body {
                Value::Map(members) => members,
                other => {
                    drop_key(report, section.key.to_string(), &expected("map", other));
                    return None;
                }
            };
            for (member, _) in members.iter().filter(|(member, _)| member.as_str() != key) {
                drop_key(
                    report,
                    format!("{}.{}", section.key, member),
                    &format!("only {}.{} is split", section.key, key),
                );
            }
            match members.get(key) {
                Some(Value::Map(entries)) => Some(entry_fragments(entries)),
                Some(other) => {
                    drop_key(report, format!("{}.{}", section.key, key), &expected("map", other));
                    Some(Vec::new())
                }
                None => Some(Vec::new()),
            }
        }
    }
}

fn entry_fragments(entries: &Map) -> Vec<Fragment> {
    entries
        .iter()
        .map(|(key, value)| Fragment {
            stem: fragment_stem(key),
            label: key.clone(),
            content: Value::single(key.clone(), value.clone()),
        })
        .collect()
}

fn fold_case(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

fn expected(shape: &str, found: &Value) -> String {
    format!("expected a {}, found {}", shape, found.kind())
}

fn drop_key(report: &mut SplitReport, key: String, reason: &str) {
    warn!(key = %key, reason, "dropping key");
    report.dropped.push(key);
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}
