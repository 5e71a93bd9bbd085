//! Reassembles a fragment tree into a single document.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::deep::deep_merge;
use super::discovery::{discover, FragmentFile};
use crate::config::{Config, OutputFormat};
use crate::error::{Error, MalformedFragment, Result};
use crate::section::SectionTable;
use crate::value::{self, Map, Value};

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Fragments merged, relative to the root, in merge order.
    pub merged: Vec<PathBuf>,
    /// Fragments skipped because they could not be used.
    pub malformed: Vec<MalformedFragment>,
    /// The written document, when the merge wrote one.
    pub output: Option<PathBuf>,
}

/// Merger deep-merges every fragment under a root directory.
pub struct Merger<'a> {
    table: &'a SectionTable,
    config: &'a Config,
}

impl<'a> Merger<'a> {
    pub fn new(table: &'a SectionTable, config: &'a Config) -> Self {
        Merger { table, config }
    }

    /// Builds the merged document in memory.
    ///
    /// The configured output file at the root is not treated as a fragment.
    pub fn combine(&self, root: &Path) -> Result<(Value, MergeReport)> {
        self.combine_excluding(root, Path::new(&self.config.output_file_name))
    }

    /// Merges the tree under `root` and writes the result to
    /// `root/output_file_name`, replacing any earlier output.
    pub fn merge(&self, root: &Path, output_file_name: &str) -> Result<MergeReport> {
        let (document, mut report) = self.combine_excluding(root, Path::new(output_file_name))?;

        let output = root.join(output_file_name);
        let text = match self.config.output_format {
            OutputFormat::Yaml => value::to_yaml(&document).map_err(|e| Error::EmitYaml {
                path: output.clone(),
                source: e,
            })?,
            OutputFormat::Json => {
                let mut json = value::to_json(&document).map_err(|e| Error::EmitJson {
                    path: output.clone(),
                    source: e,
                })?;
                json.push('\n');
                json
            }
        };
        fs::write(&output, text).map_err(|e| Error::io(&output, e))?;

        info!(
            output = %output.display(),
            fragments = report.merged.len(),
            malformed = report.malformed.len(),
            "merge complete"
        );
        report.output = Some(output);
        Ok(report)
    }

    fn combine_excluding(&self, root: &Path, exclude: &Path) -> Result<(Value, MergeReport)> {
        let files = discover(root, &self.config.extension, Some(exclude))?;

        let mut document = Map::new();
        let mut report = MergeReport::default();
        for file in files {
            match self.load(&file) {
                Ok(fragment) => {
                    debug!(path = %file.relative.display(), "merging fragment");
                    deep_merge(&mut document, fragment);
                    report.merged.push(file.relative);
                }
                Err(reason) => {
                    let bad = MalformedFragment::new(file.path, reason);
                    warn!(%bad, "skipping malformed fragment");
                    report.malformed.push(bad);
                }
            }
        }

        // A header with no content fragments leaves its key null.
        for section in self.table.iter() {
            if !matches!(document.get(section.key), Some(Value::Null)) {
                continue;
            }
            if let Some(empty) = section.layout.empty() {
                debug!(key = section.key, "restoring empty section");
                document.set(section.key.to_string(), empty);
            }
        }

        if report.merged.is_empty() {
            warn!(root = %root.display(), "no fragments found; result is empty");
        }
        Ok((Value::Map(document), report))
    }

    /// Reads one fragment and shapes it for merging. Content fragments inside
    /// a section directory are placed back under their section key.
    fn load(&self, file: &FragmentFile) -> std::result::Result<Map, String> {
        let text = fs::read_to_string(&file.path).map_err(|e| format!("unreadable: {}", e))?;
        if text.trim().is_empty() {
            return Err("empty fragment".to_string());
        }
        let content = value::from_yaml(&text).map_err(|e| format!("invalid YAML: {}", e))?;

        let section = if file.is_header {
            None
        } else {
            file.top_directory().and_then(|dir| self.table.by_directory(dir))
        };
        let shaped = match section {
            Some(section) => section.layout.wrap(section.key, content)?,
            None => content,
        };

        match shaped {
            Value::Map(fragment) => Ok(fragment),
            other => Err(format!("expected a map, found {}", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn combine(root: &Path) -> (Value, MergeReport) {
        let config = Config::default();
        Merger::new(SectionTable::openapi(), &config)
            .combine(root)
            .unwrap()
    }

    #[test]
    fn test_merge_rewraps_section_fragments() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "01_Info/__info.yaml", "info:\n");
        write(tmp.path(), "01_Info/api-info.yaml", "title: T\nversion: '1'\n");
        write(tmp.path(), "02_Servers/__servers.yaml", "servers:\n");
        write(tmp.path(), "02_Servers/server-1.yaml", "url: https://a\n");
        write(tmp.path(), "02_Servers/server-2.yaml", "url: https://b\n");
        write(tmp.path(), "03_Tags/tags.yaml", "- name: users\n");
        write(tmp.path(), "06_Components/User.yaml", "User:\n  type: object\n");

        let (document, report) = combine(tmp.path());
        assert_eq!(
            document,
            value::from_yaml(
                "info:\n  title: T\n  version: '1'\n\
                 servers:\n- url: https://a\n- url: https://b\n\
                 tags:\n- name: users\n\
                 components:\n  schemas:\n    User:\n      type: object\n"
            )
            .unwrap()
        );
        assert!(report.malformed.is_empty());
        assert_eq!(report.merged.len(), 7);
    }

    #[test]
    fn test_header_after_content_does_not_clobber() {
        let tmp = TempDir::new().unwrap();
        // Lives outside a section directory, so it is merged as written and
        // sorts after the content fragment.
        write(tmp.path(), "a/paths.yaml", "paths:\n  /a:\n    get: {}\n");
        write(tmp.path(), "b/__paths.yaml", "paths:\n");

        let (document, _) = combine(tmp.path());
        assert_eq!(document, value::from_yaml("paths:\n  /a:\n    get: {}\n").unwrap());
    }

    #[test]
    fn test_malformed_fragments_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "04_Paths/_a.yaml", "/a:\n  get: {}\n");
        write(tmp.path(), "04_Paths/_b.yaml", "- not\n- a map\n");
        write(tmp.path(), "04_Paths/_c.yaml", "key: [unclosed\n");
        write(tmp.path(), "04_Paths/_d.yaml", "   \n");
        write(tmp.path(), "loose.yaml", "just a string\n");

        let (document, report) = combine(tmp.path());
        assert_eq!(document, value::from_yaml("paths:\n  /a:\n    get: {}\n").unwrap());

        let bad: Vec<PathBuf> = report.malformed.iter().map(|m| m.path.clone()).collect();
        assert_eq!(
            bad,
            vec![
                tmp.path().join("loose.yaml"),
                tmp.path().join("04_Paths/_b.yaml"),
                tmp.path().join("04_Paths/_c.yaml"),
                tmp.path().join("04_Paths/_d.yaml"),
            ]
        );
        assert_eq!(report.malformed[0].reason, "expected a map, found string");
        assert_eq!(report.malformed[1].reason, "expected a map of entries, found list");
        assert!(report.malformed[2].reason.starts_with("invalid YAML"));
        assert_eq!(report.malformed[3].reason, "empty fragment");
    }

    #[test]
    fn test_header_only_sections_become_empty() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "01_Info/__info.yaml", "info:\n");
        write(tmp.path(), "02_Servers/__servers.yaml", "servers:\n");
        write(tmp.path(), "04_Paths/__paths.yaml", "paths:\n");
        write(tmp.path(), "06_Components/__components.yaml", "components:\n");

        let (document, _) = combine(tmp.path());
        assert_eq!(
            document,
            value::from_yaml("info: null\nservers: []\npaths: {}\ncomponents:\n  schemas: {}\n").unwrap()
        );
    }

    #[test]
    fn test_files_outside_sections_merge_as_written() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "00_Meta/openapi.yaml", "openapi: 3.1.0\n");
        write(tmp.path(), "01_Info/api-info.yaml", "title: T\n");

        let (document, _) = combine(tmp.path());
        assert_eq!(
            document,
            value::from_yaml("openapi: 3.1.0\ninfo:\n  title: T\n").unwrap()
        );
    }

    #[test]
    fn test_empty_tree_gives_empty_document() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let report = Merger::new(SectionTable::openapi(), &config)
            .merge(tmp.path(), "CombinedSpec.yaml")
            .unwrap();

        assert!(report.merged.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.path().join("CombinedSpec.yaml")).unwrap(),
            "{}\n"
        );
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let missing = tmp.path().join("nope");
        let err = Merger::new(SectionTable::openapi(), &config)
            .merge(&missing, "CombinedSpec.yaml")
            .unwrap_err();
        assert_eq!(err.path(), missing.as_path());
    }

    #[test]
    fn test_merge_output_is_excluded_and_idempotent() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "02_Servers/server-1.yaml", "url: https://a\n");
        write(tmp.path(), "04_Paths/_a.yaml", "/a:\n  get: {}\n");

        let config = Config::default();
        let merger = Merger::new(SectionTable::openapi(), &config);
        let output = tmp.path().join("Out.yaml");

        let first = merger.merge(tmp.path(), "Out.yaml").unwrap();
        let first_text = fs::read_to_string(&output).unwrap();
        let second = merger.merge(tmp.path(), "Out.yaml").unwrap();
        let second_text = fs::read_to_string(&output).unwrap();

        assert_eq!(first_text, second_text);
        assert_eq!(first.merged, second.merged);
        assert_eq!(second.output, Some(output));
        // the server list would double if the output were read back in
        assert_eq!(
            value::from_yaml(&second_text).unwrap(),
            value::from_yaml("servers:\n- url: https://a\npaths:\n  /a:\n    get: {}\n").unwrap()
        );
    }

    #[test]
    fn test_merge_json_output() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "01_Info/api-info.yaml", "title: T\n");

        let config = Config {
            output_format: OutputFormat::Json,
            ..Config::default()
        };
        Merger::new(SectionTable::openapi(), &config)
            .merge(tmp.path(), "openapi.json")
            .unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("openapi.json")).unwrap(),
            "{\n  \"info\": {\n    \"title\": \"T\"\n  }\n}\n"
        );
    }
}
