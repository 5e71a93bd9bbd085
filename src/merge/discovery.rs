//! Finds fragment files under a merge root and puts them in merge order.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::naming::{is_header, natural_cmp};

/// A fragment file found under the merge root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
    pub path: PathBuf,
    /// Path relative to the merge root.
    pub relative: PathBuf,
    pub name: String,
    pub is_header: bool,
}

impl FragmentFile {
    /// First directory below the root, or `None` for files at the root.
    pub fn top_directory(&self) -> Option<&str> {
        let mut components = self.relative.components();
        let first = components.next()?;
        components.next()?;
        first.as_os_str().to_str()
    }
}

/// Walks `root` recursively and returns every file with `extension`.
///
/// Dot-files and dot-directories are ignored, as is `exclude` (a path relative
/// to the root). Symlinked directories are not followed.
///
/// The result is ordered by parent directory, then header fragments before
/// content fragments, then by file name with numbers compared by value.
pub fn discover(root: &Path, extension: &str, exclude: Option<&Path>) -> Result<Vec<FragmentFile>> {
    let mut files = Vec::new();
    walk(root, root, extension, exclude, &mut files)?;
    files.sort_by(|a, b| {
        a.relative
            .parent()
            .cmp(&b.relative.parent())
            .then_with(|| b.is_header.cmp(&a.is_header))
            .then_with(|| natural_cmp(&a.name, &b.name))
    });
    Ok(files)
}

fn walk(
    root: &Path,
    dir: &Path,
    extension: &str,
    exclude: Option<&Path>,
    files: &mut Vec<FragmentFile>,
) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        if file_type.is_dir() {
            walk(root, &path, extension, exclude, files)?;
            continue;
        }

        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        if !is_file || !matches {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        if exclude.is_some_and(|excluded| relative == excluded) {
            debug!(path = %path.display(), "skipping merge output");
            continue;
        }

        files.push(FragmentFile {
            is_header: is_header(&name),
            path,
            relative,
            name,
        });
    }
    Ok(())
}
