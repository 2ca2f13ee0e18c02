//! Metadata header codec

use std::collections::BTreeMap;

use crate::core::error::{Error, Result};

/// Decoded metadata header: string keys to arbitrary YAML values
pub type Metadata = BTreeMap<String, serde_yaml::Value>;

/// Encodes and decodes the metadata header of a document
pub trait MetadataCodec {
    /// Decode header text into a mapping.
    ///
    /// Input that is not a key/value mapping (a scalar, a list, malformed
    /// YAML) must be reported as an error; documents degrade it to an
    /// empty mapping.
    fn decode(&self, text: &str) -> Result<Metadata>;

    /// Encode a mapping into header text.
    ///
    /// The text must not contain a blank line, since the first blank line
    /// of a file ends the header.
    fn encode(&self, metadata: &Metadata) -> Result<String>;
}

/// YAML metadata codec
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl MetadataCodec for YamlCodec {
    fn decode(&self, text: &str) -> Result<Metadata> {
        serde_yaml::from_str::<Metadata>(text).map_err(|e| Error::Decode(e.to_string()))
    }

    fn encode(&self, metadata: &Metadata) -> Result<String> {
        let text = serde_yaml::to_string(metadata).map_err(|e| Error::Encode(e.to_string()))?;
        if !text.contains("\n\n") {
            return Ok(text);
        }
        // Block scalars keep blank lines verbatim; JSON is flow YAML with escaped newlines
        tracing::debug!("Metadata has blank lines, encoding as flow mapping");
        serde_json::to_string(metadata).map_err(|e| Error::Encode(e.to_string()))
    }
}
