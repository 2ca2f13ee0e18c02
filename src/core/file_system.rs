//! Translation between URLs and files under the content root

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::core::error::{Error, Result};

/// Suffix of every document file
pub const EXTENSION: &str = ".md";

/// Strip exactly one leading and one trailing `/` from a URL.
///
/// Internal separators and `.`/`..` segments are left alone. An empty or
/// all-separator URL maps to the empty key, i.e. a file named `.md` at
/// the root.
pub fn normalize(url: &str) -> &str {
    let url = url.strip_prefix('/').unwrap_or(url);
    url.strip_suffix('/').unwrap_or(url)
}

/// Join a document file name onto the root.
///
/// `normalize` only strips one separator, so a key may still start with `/`;
/// those are dropped here so the result always stays below `root`.
pub fn join_root(root: &Path, file: &str) -> PathBuf {
    root.join(file.trim_start_matches('/'))
}

/// Resolves URLs to document files below a root directory
#[derive(Debug, Clone)]
pub struct PathMapper {
    root: Arc<Path>,
}

impl PathMapper {
    pub fn new(root: Arc<Path>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Arc<Path> {
        &self.root
    }

    /// Path of the document file for `url`, relative to the root or absolute
    pub fn to_path(&self, url: &str, relative: bool) -> PathBuf {
        let file = format!("{}{}", normalize(url), EXTENSION);
        if relative {
            PathBuf::from(file)
        } else {
            join_root(&self.root, &file)
        }
    }

    /// Whether a regular file backs `url`
    pub fn exists(&self, url: &str) -> bool {
        self.to_path(url, false).is_file()
    }

    /// Remove the file backing `url`. Returns `false` if there was none.
    ///
    /// Parent directories are left in place even when they become empty.
    pub fn remove(&self, url: &str) -> Result<bool> {
        if !self.exists(url) {
            return Ok(false);
        }
        let path = self.to_path(url, false);
        std::fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        Ok(true)
    }

    /// Create every directory between the root and the file for `url`
    pub fn ensure_parent(&self, url: &str) -> Result<()> {
        let path = self.to_path(url, false);
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        if !dir.exists() {
            tracing::debug!("Creating directory: {}", dir.display());
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        Ok(())
    }

    /// Directory for a subtree key, if it exists
    pub fn directory(&self, key: &str) -> Option<PathBuf> {
        let dir = join_root(&self.root, normalize(key));
        dir.is_dir().then_some(dir)
    }

    /// Collect the keys of all document files below `dir`, depth first.
    ///
    /// Sibling order is whatever the filesystem enumerates; it is not sorted.
    pub fn walk(&self, dir: &Path) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };
            if !name.ends_with(EXTENSION) {
                continue;
            }
            match self.key_for(entry.path()) {
                Some(key) => keys.push(key),
                None => tracing::warn!("Skipping unmappable path: {}", entry.path().display()),
            }
        }

        Ok(keys)
    }

    /// Key of a document file below the root, without the extension
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?),
                _ => return None,
            }
        }
        let file = segments.join("/");
        file.strip_suffix(EXTENSION).map(str::to_string)
    }
}
