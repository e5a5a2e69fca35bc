use crate::error::{Result, SyncError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An inline `data:` URL, kept verbatim so saving reproduces it byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    /// Wraps `text` if it is a `data:` URL.
    pub fn parse(text: &str) -> Option<Self> {
        text.starts_with("data:").then(|| Self(text.to_string()))
    }

    /// Encodes raw bytes as a base64 data URL.
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The media type between `data:` and the first `;` or `,`.
    pub fn media_type(&self) -> &str {
        let header = self.header();
        header.split(';').next().unwrap_or(header)
    }

    /// Decodes the payload.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the URL has no payload separator or the base64
    /// payload is malformed.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let (header, payload) = self.0["data:".len()..]
            .split_once(',')
            .ok_or_else(|| SyncError::decode("data URL", "missing ',' separator"))?;

        if header.ends_with(";base64") {
            Ok(STANDARD.decode(payload.trim())?)
        } else {
            Ok(payload.as_bytes().to_vec())
        }
    }

    fn header(&self) -> &str {
        let rest = &self.0["data:".len()..];
        rest.split_once(',').map(|(header, _)| header).unwrap_or(rest)
    }
}

/// Where an asset's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetSource {
    Inline(DataUrl),
    Remote(String),
}

impl AssetSource {
    pub fn is_inline(&self) -> bool {
        matches!(self, AssetSource::Inline(_))
    }

    /// The value as written in a persisted document.
    pub fn as_document_value(&self) -> &str {
        match self {
            AssetSource::Inline(data) => data.as_str(),
            AssetSource::Remote(url) => url,
        }
    }
}

impl From<String> for AssetSource {
    fn from(value: String) -> Self {
        match DataUrl::parse(&value) {
            Some(data) => AssetSource::Inline(data),
            None => AssetSource::Remote(value),
        }
    }
}

impl From<AssetSource> for String {
    fn from(source: AssetSource) -> Self {
        match source {
            AssetSource::Inline(data) => data.0,
            AssetSource::Remote(url) => url,
        }
    }
}

/// Lowercased extension used to tell the runtime what it is loading.
///
/// Mirrors the runtime's own convention: the text after the last `.`, or the
/// whole name when there is none.
pub fn asset_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

/// Assets keyed by name, in insertion order.
///
/// Inserting an existing name replaces its source in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct AssetMap {
    entries: Vec<(String, AssetSource)>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-replace keyed by name.
    ///
    /// # Returns
    ///
    /// The previous source for `name`, if any.
    pub fn insert(&mut self, name: impl Into<String>, source: AssetSource) -> Option<AssetSource> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, source)),
            None => {
                self.entries.push((name, source));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&AssetSource> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, source)| source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetSource)> {
        self.entries.iter().map(|(name, source)| (name.as_str(), source))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for AssetMap {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let mut assets = AssetMap::new();
        for (name, value) in map {
            match value {
                Value::String(text) => {
                    assets.insert(name, AssetSource::from(text));
                }
                other => {
                    return Err(format!(
                        "asset '{}' must be a URL string, got {}",
                        name, other
                    ));
                }
            }
        }
        Ok(assets)
    }
}

impl From<AssetMap> for Map<String, Value> {
    fn from(assets: AssetMap) -> Self {
        assets
            .entries
            .into_iter()
            .map(|(name, source)| (name, Value::String(source.into())))
            .collect()
    }
}
