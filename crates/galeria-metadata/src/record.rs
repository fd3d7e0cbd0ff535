//! The display-ready metadata shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One resolved token, ready for a gallery card.
///
/// `name` and `description` are absent when the source document lacks them;
/// `image` is always present — every failure path substitutes the placeholder
/// address. Fields beyond the known three pass through in `extra` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "tokenId")]
    pub token_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    /// The record substituted when a token's metadata cannot be resolved.
    pub fn fallback(token_id: u64, placeholder_image: &str) -> Self {
        Self {
            token_id,
            name: Some(format!("NFT #{token_id}")),
            description: Some("Metadata no disponible".to_owned()),
            image: placeholder_image.to_owned(),
            extra: Map::new(),
        }
    }

    /// Merge a fetched metadata document with the token id.
    ///
    /// `image` is the already-normalized address; the payload's own `image`
    /// entry is dropped in its favor. Non-string `name`/`description` values
    /// stay in `extra` rather than being coerced.
    pub fn from_payload(token_id: u64, payload: Map<String, Value>, image: String) -> Self {
        let mut extra = payload;
        extra.remove("image");
        let name = take_string(&mut extra, "name");
        let description = take_string(&mut extra, "description");
        Self {
            token_id,
            name,
            description,
            image,
            extra,
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            map.insert(key.to_owned(), other);
            None
        }
        None => None,
    }
}
