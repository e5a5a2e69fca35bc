use super::asset::AssetMap;
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

/// The persisted JSON form of a session.
///
/// ```json
/// { "frag": "...", "vert": "...", "assets": { "tex.png": "data:..." }, "commands": ["floor,on"] }
/// ```
///
/// `assets` and `commands` are omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub frag: String,
    #[serde(default)]
    pub vert: String,
    #[serde(default, skip_serializing_if = "AssetMap::is_empty")]
    pub assets: AssetMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
}

impl Document {
    /// Parses a document body.
    ///
    /// # Errors
    ///
    /// Returns `Decode` for malformed JSON or a malformed field.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SyncError::decode("document", e.to_string()))
    }

    /// Serializes with two-space indentation, the layout stored documents use.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
