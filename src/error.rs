//! Error types shared by the splitter and the merger.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::value::ParseError;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal errors. Each variant that touches the filesystem names the path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: document root must be a mapping, found {found}", path.display())]
    Structure { path: PathBuf, found: &'static str },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: failed to parse YAML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: failed to serialize YAML: {source}", path.display())]
    EmitYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: failed to serialize JSON: {source}", path.display())]
    EmitJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Error::Structure { path, .. }
            | Error::Io { path, .. }
            | Error::Parse { path, .. }
            | Error::EmitYaml { path, .. }
            | Error::EmitJson { path, .. } => path,
        }
    }
}

/// A fragment skipped during merge. Not fatal: the merge carries on without it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {reason}", path.display())]
pub struct MalformedFragment {
    pub path: PathBuf,
    pub reason: String,
}

impl MalformedFragment {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MalformedFragment {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_path() {
        let err = Error::io(
            "/tmp/missing",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "/tmp/missing: not found");
        assert_eq!(err.path(), Path::new("/tmp/missing"));
    }

    #[test]
    fn test_structure_error_display() {
        let err = Error::Structure {
            path: PathBuf::from("openapi.yaml"),
            found: "list",
        };
        assert!(err.to_string().contains("must be a mapping, found list"));
    }

    #[test]
    fn test_malformed_fragment_display() {
        let bad = MalformedFragment::new("04_Paths/_a.yaml", "expected a map, found string");
        assert_eq!(bad.to_string(), "04_Paths/_a.yaml: expected a map, found string");
    }
}
