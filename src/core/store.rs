//! Document store: URL lookup, creation, deletion and indexing

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::config::StoreConfig;
use crate::core::document::{Content, Document, Location};
use crate::core::error::{Error, Result};
use crate::core::file_system::{normalize, PathMapper};
use crate::core::metadata::{MetadataCodec, YamlCodec};
use crate::core::render::{MarkdownRenderer, Renderer};

/// Builds the documents a store hands out
pub type DocumentFactory<C> = Arc<dyn Fn(Location) -> Result<C> + Send + Sync>;

/// Maps URLs onto markdown documents below a content root.
///
/// The store keeps no state besides its root and collaborators; every call
/// goes to the filesystem. Nothing is locked: two callers racing on
/// [`create`](Self::create) for the same URL both succeed and the last
/// `save` wins.
pub struct DocumentStore<C = Document> {
    mapper: PathMapper,
    codec: Arc<dyn MetadataCodec + Send + Sync>,
    renderer: Arc<dyn Renderer + Send + Sync>,
    factory: DocumentFactory<C>,
}

impl DocumentStore<Document> {
    /// Create a store over `path`, which must be an existing directory
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_factory(path, Document::open)
    }

    /// Create a store from configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let root = config
            .content_root
            .as_deref()
            .ok_or_else(|| Error::InvalidRoot {
                path: PathBuf::new(),
                reason: "no content root configured".to_string(),
            })?;
        Ok(Self::new(root)?.with_renderer(MarkdownRenderer::from_config(&config.markdown)))
    }
}

impl<C: Content> DocumentStore<C> {
    /// Create a store whose documents are built by `factory`
    pub fn with_factory<F>(path: impl AsRef<Path>, factory: F) -> Result<Self>
    where
        F: Fn(Location) -> Result<C> + Send + Sync + 'static,
    {
        let root = Self::validate_root(path.as_ref())?;
        tracing::debug!("Opened content root: {}", root.display());
        Ok(Self {
            mapper: PathMapper::new(root),
            codec: Arc::new(YamlCodec),
            renderer: Arc::new(MarkdownRenderer::default()),
            factory: Arc::new(factory),
        })
    }

    /// Replace the metadata codec
    pub fn with_codec(mut self, codec: impl MetadataCodec + Send + Sync + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Replace the body renderer
    pub fn with_renderer(mut self, renderer: impl Renderer + Send + Sync + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    fn validate_root(path: &Path) -> Result<Arc<Path>> {
        let invalid = |reason: String| Error::InvalidRoot {
            path: path.to_path_buf(),
            reason,
        };

        let attr = std::fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
        if !attr.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }

        let absolute = std::path::absolute(path).map_err(|e| invalid(e.to_string()))?;
        Ok(Arc::from(absolute))
    }

    pub fn root(&self) -> &Path {
        self.mapper.root()
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// Path of the file backing `url`, relative to the root or absolute
    pub fn to_path(&self, url: &str, relative: bool) -> PathBuf {
        self.mapper.to_path(url, relative)
    }

    /// Whether a document exists for `url`
    pub fn exists(&self, url: &str) -> bool {
        self.mapper.exists(url)
    }

    /// Load the document for `url`, or `None` if there is none
    pub fn get(&self, url: &str) -> Result<Option<C>> {
        if !self.exists(url) {
            return Ok(None);
        }
        self.instantiate(normalize(url)).map(Some)
    }

    /// Prepare a new document for `url`.
    ///
    /// Returns `None` if one already exists. Otherwise creates the parent
    /// directories and returns an unsaved document; nothing is written
    /// until it is saved.
    pub fn create(&self, url: &str) -> Result<Option<C>> {
        if self.exists(url) {
            return Ok(None);
        }
        self.mapper.ensure_parent(url)?;
        tracing::info!("Created document: {}", self.to_path(url, true).display());
        self.instantiate(normalize(url)).map(Some)
    }

    /// Remove the document for `url`. Returns `false` if there was none.
    ///
    /// Documents already loaded stay usable; empty directories are kept.
    pub fn delete(&self, url: &str) -> Result<bool> {
        let removed = self.mapper.remove(url)?;
        if removed {
            tracing::info!("Deleted document: {}", self.to_path(url, true).display());
        }
        Ok(removed)
    }

    /// Load every document below the root, or below `subdirectory`.
    ///
    /// Walks the whole tree on every call, so avoid calling it repeatedly
    /// on large collections. A missing subdirectory yields nothing.
    pub fn list(&self, subdirectory: Option<&str>) -> Result<Vec<C>> {
        let dir = match subdirectory {
            Some(sub) => match self.mapper.directory(sub) {
                Some(dir) => dir,
                None => return Ok(Vec::new()),
            },
            None => self.root().to_path_buf(),
        };

        let keys = self.mapper.walk(&dir)?;
        tracing::debug!("Indexed {} documents under {}", keys.len(), dir.display());
        keys.iter().map(|key| self.instantiate(key)).collect()
    }

    /// Like [`list`](Self::list), keyed by document URL
    pub fn index(&self, subdirectory: Option<&str>) -> Result<BTreeMap<String, C>> {
        Ok(self
            .list(subdirectory)?
            .into_iter()
            .map(|doc| (doc.url(), doc))
            .collect())
    }

    /// All documents in the store
    pub fn contents(&self) -> Result<Vec<C>> {
        self.list(None)
    }

    /// All documents below `path`, or `None` if it is not a directory
    pub fn subcontents(&self, path: &str) -> Result<Option<Vec<C>>> {
        if self.mapper.directory(path).is_none() {
            return Ok(None);
        }
        self.list(Some(path)).map(Some)
    }

    fn instantiate(&self, key: &str) -> Result<C> {
        (self.factory)(Location {
            root: Arc::clone(self.mapper.root()),
            relative_path: key.to_string(),
            codec: Arc::clone(&self.codec),
            renderer: Arc::clone(&self.renderer),
        })
    }
}

impl<C> Clone for DocumentStore<C> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper.clone(),
            codec: Arc::clone(&self.codec),
            renderer: Arc::clone(&self.renderer),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<C> fmt::Debug for DocumentStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("root", self.mapper.root())
            .finish_non_exhaustive()
    }
}
