//! Store configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory the URLs are mapped onto
    pub content_root: Option<PathBuf>,
    /// Markdown rendering settings
    pub markdown: MarkdownConfig,
}

/// Markdown extensions enabled when rendering bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub footnotes: bool,
    /// Curly quotes and dashes
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: false,
            smart_punctuation: false,
        }
    }
}

impl StoreConfig {
    /// Create a configuration pointing at a content root
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "mdmapper", "Mdmapper")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a file, falling back to defaults if it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to save config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert!(config.content_root.is_none());
        assert!(config.markdown.tables);
        assert!(!config.markdown.footnotes);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = StoreConfig::with_root("/srv/content");
        config.markdown.footnotes = true;
        config.save_to(&path).unwrap();

        let loaded = StoreConfig::load_from(&path).unwrap();
        assert_eq!(loaded.content_root, Some(PathBuf::from("/srv/content")));
        assert!(loaded.markdown.footnotes);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"markdown": {"tables": false}}"#).unwrap();

        let config = StoreConfig::load_from(&path).unwrap();
        assert!(config.content_root.is_none());
        assert!(!config.markdown.tables);
        assert!(config.markdown.strikethrough);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(StoreConfig::load_from(&path).is_err());
    }
}
