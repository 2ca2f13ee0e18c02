//! Documents: a metadata header and a markdown body stored in one file

use std::fmt;
use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Value;

use crate::core::error::{Error, Result};
use crate::core::file_system::{join_root, EXTENSION};
use crate::core::metadata::{Metadata, MetadataCodec};
use crate::core::render::Renderer;

/// Separator between the metadata header and the body
const HEADER_END: &str = "\n\n";

/// Where a document lives and how its file is encoded.
///
/// Handed by the store to the document factory. The root and the
/// collaborators are shared with every other document of the same store.
#[derive(Clone)]
pub struct Location {
    /// Content root directory
    pub root: Arc<Path>,
    /// Normalized key: no leading or trailing `/`, no extension
    pub relative_path: String,
    pub codec: Arc<dyn MetadataCodec + Send + Sync>,
    pub renderer: Arc<dyn Renderer + Send + Sync>,
}

impl Location {
    /// Absolute path of the backing file
    pub fn full_path(&self) -> PathBuf {
        join_root(&self.root, &format!("{}{}", self.relative_path, EXTENSION))
    }

    /// URL of the document, always wrapped in `/`
    pub fn url(&self) -> String {
        format!("/{}/", self.relative_path)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("root", &self.root)
            .field("relative_path", &self.relative_path)
            .finish_non_exhaustive()
    }
}

/// Capabilities a store needs from the documents it hands out.
///
/// Implement this on your own type and pass a factory to
/// [`DocumentStore::with_factory`](crate::DocumentStore::with_factory) to
/// customize documents without touching path logic or traversal.
pub trait Content {
    /// URL of the document, always wrapped in `/`
    fn url(&self) -> String;

    fn metadata(&self) -> &Metadata;

    fn body(&self) -> &str;

    /// Load the state on disk, discarding in-memory changes
    fn read(&mut self) -> Result<()>;

    /// Write the in-memory state to disk, overwriting the file
    fn write(&self) -> Result<()>;

    /// Render the body
    fn render(&self) -> String;

    fn save(&self) -> Result<()> {
        self.write()
    }

    fn reload(&mut self) -> Result<()> {
        self.read()
    }

    fn html(&self) -> String {
        self.render()
    }

    /// Look up a metadata value, failing if the key is absent
    fn field(&self, key: &str) -> Result<&Value> {
        self.metadata()
            .get(key)
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }
}

/// A markdown document with a metadata header
#[derive(Debug, Clone)]
pub struct Document {
    location: Location,
    metadata: Metadata,
    body: String,
}

impl Document {
    /// Create a document at `location`, loading it if the file exists.
    ///
    /// Without a backing file the document is new: empty metadata and body.
    pub fn open(location: Location) -> Result<Self> {
        let mut doc = Self {
            location,
            metadata: Metadata::new(),
            body: String::new(),
        };
        if doc.full_path().is_file() {
            doc.read()?;
        }
        Ok(doc)
    }

    /// Split file content into header and body at the first blank line
    pub fn split(content: &str) -> (&str, &str) {
        content.split_once(HEADER_END).unwrap_or((content, ""))
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn relative_path(&self) -> &str {
        &self.location.relative_path
    }

    pub fn full_path(&self) -> PathBuf {
        self.location.full_path()
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Get the document title from metadata, if it has one
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .or_else(|| self.metadata.get("Title"))
            .and_then(Value::as_str)
    }

    fn decode(&self, header: &str) -> Metadata {
        match self.location.codec.decode(header) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(
                    "Unreadable metadata in {}, using empty mapping: {}",
                    self.full_path().display(),
                    e
                );
                Metadata::new()
            }
        }
    }
}

impl Content for Document {
    fn url(&self) -> String {
        self.location.url()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn read(&mut self) -> Result<()> {
        let path = self.full_path();
        tracing::debug!("Reading document: {}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;

        let (header, body) = Self::split(&content);
        self.metadata = self.decode(header);
        self.body = body.to_string();
        Ok(())
    }

    fn write(&self) -> Result<()> {
        let mut content = self.location.codec.encode(&self.metadata)?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
        content.push_str(&self.body);

        let path = self.full_path();
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        tracing::info!("Saved document: {}", path.display());
        Ok(())
    }

    fn render(&self) -> String {
        self.location.renderer.render(&self.body)
    }
}

impl Index<&str> for Document {
    type Output = Value;

    /// Panics if the key is absent; use [`Content::field`] to handle that case
    fn index(&self, key: &str) -> &Value {
        &self.metadata[key]
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = format!("{}{}", self.relative_path(), EXTENSION);
        match self.title() {
            Some(title) => write!(f, "<Document '{}' at '{}'>", title, path),
            None => write!(f, "<Document at '{}'>", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::YamlCodec;
    use crate::core::render::MarkdownRenderer;

    fn location(root: &Path, key: &str) -> Location {
        Location {
            root: Arc::from(root),
            relative_path: key.to_string(),
            codec: Arc::new(YamlCodec),
            renderer: Arc::new(MarkdownRenderer::default()),
        }
    }

    #[test]
    fn test_split_on_first_blank_line() {
        assert_eq!(Document::split("title: Hi\n\nHello"), ("title: Hi", "Hello"));
        assert_eq!(
            Document::split("a: 1\n\none\n\ntwo\n\n"),
            ("a: 1", "one\n\ntwo\n\n")
        );
        assert_eq!(Document::split("a: 1\n"), ("a: 1\n", ""));
        assert_eq!(Document::split(""), ("", ""));
    }

    #[test]
    fn test_open_parses_header_and_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hi.md"), "title: Hi\n\nHello **world**").unwrap();

        let doc = Document::open(location(dir.path(), "hi")).unwrap();
        assert_eq!(doc["title"], Value::from("Hi"));
        assert_eq!(doc.metadata().len(), 1);
        assert_eq!(doc.body(), "Hello **world**");
        assert_eq!(doc.render(), "<p>Hello <strong>world</strong></p>\n");
        assert_eq!(doc.url(), "/hi/");
    }

    #[test]
    fn test_open_missing_file_is_new() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::open(location(dir.path(), "blog/post")).unwrap();
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.body(), "");
        assert_eq!(doc.url(), "/blog/post/");
        assert_eq!(doc.full_path(), dir.path().join("blog/post.md"));
    }

    #[test]
    fn test_unparseable_header_gives_empty_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("list.md"), "- a\n- b\n\nbody").unwrap();
        std::fs::write(dir.path().join("empty.md"), "").unwrap();

        let doc = Document::open(location(dir.path(), "list")).unwrap();
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.body(), "body");

        let doc = Document::open(location(dir.path(), "empty")).unwrap();
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.body(), "");
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::open(location(dir.path(), "ghost")).unwrap();
        let err = doc.read().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::open(location(dir.path(), "post")).unwrap();
        doc.metadata_mut().insert("title".into(), Value::from("Post"));
        doc.metadata_mut().insert("order".into(), Value::from(3));
        doc.set_body("First\n\nSecond\n");
        doc.save().unwrap();

        let reopened = Document::open(location(dir.path(), "post")).unwrap();
        assert_eq!(reopened.metadata(), doc.metadata());
        assert_eq!(reopened.body(), "First\n\nSecond\n");
    }

    #[test]
    fn test_save_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::open(location(dir.path(), "blank")).unwrap();
        doc.save().unwrap();

        let reopened = Document::open(location(dir.path(), "blank")).unwrap();
        assert!(reopened.metadata().is_empty());
        assert_eq!(reopened.body(), "");
    }

    #[test]
    fn test_reload_discards_changes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.md"), "title: Old\n\nold body").unwrap();

        let mut doc = Document::open(location(dir.path(), "page")).unwrap();
        doc.set_body("new body");
        doc.metadata_mut().clear();
        doc.reload().unwrap();

        assert_eq!(doc.body(), "old body");
        assert_eq!(doc.title(), Some("Old"));
    }

    #[test]
    fn test_field_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.md"), "title: Hi\n\n").unwrap();
        let doc = Document::open(location(dir.path(), "page")).unwrap();

        assert_eq!(doc.field("title").unwrap(), &Value::from("Hi"));
        assert!(matches!(doc.field("author"), Err(Error::MissingKey(key)) if key == "author"));
    }

    #[test]
    #[should_panic]
    fn test_index_missing_key_panics() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::open(location(dir.path(), "page")).unwrap();
        let _ = &doc["author"];
    }

    #[test]
    fn test_display() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.md"), "Title: Welcome\n\n").unwrap();
        let doc = Document::open(location(dir.path(), "page")).unwrap();
        assert_eq!(doc.to_string(), "<Document 'Welcome' at 'page.md'>");

        let doc = Document::open(location(dir.path(), "blog/other")).unwrap();
        assert_eq!(doc.to_string(), "<Document at 'blog/other.md'>");
    }
}
