//! Mdmapper - map URL paths onto markdown files
//!
//! Each URL like `/blog/2020/post/` resolves to `<root>/blog/2020/post.md`,
//! a UTF-8 file holding a YAML metadata header, one blank line, and a
//! markdown body.

pub mod core;

pub use crate::core::config::{MarkdownConfig, StoreConfig};
pub use crate::core::document::{Content, Document, Location};
pub use crate::core::error::{Error, Result};
pub use crate::core::file_system::{normalize, PathMapper, EXTENSION};
pub use crate::core::metadata::{Metadata, MetadataCodec, YamlCodec};
pub use crate::core::render::{MarkdownRenderer, Renderer};
pub use crate::core::store::{DocumentFactory, DocumentStore};
