//! Settings shared by the splitter and the merger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::value::ParseError;

/// Default name of the merged document written at the root of the tree.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "CombinedSpec.yaml";

/// Serialization used for the merged document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => f.write_str("yaml"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Config controls file naming and output encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Extension (without the dot) of fragment files, both written and scanned.
    pub extension: String,
    /// File name of the merged document, written at the root of the tree.
    pub output_file_name: String,
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            extension: "yaml".to_string(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
            output_format: OutputFormat::Yaml,
        }
    }
}

impl Config {
    /// Loads a config from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            source: ParseError::Yaml(e),
        })
    }

    /// Appends the fragment extension to a file stem.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extension, "yaml");
        assert_eq!(config.output_file_name, "CombinedSpec.yaml");
        assert_eq!(config.output_format, OutputFormat::Yaml);
        assert_eq!(config.file_name("server-1"), "server-1.yaml");
    }

    #[test]
    fn test_from_yaml_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "outputFileName: openapi.json\noutputFormat: json").unwrap();

        let config = Config::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.extension, "yaml");
        assert_eq!(config.output_file_name, "openapi.json");
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = Config::from_yaml_file(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("yml".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert!("toml".parse::<OutputFormat>().is_err());
    }
}
