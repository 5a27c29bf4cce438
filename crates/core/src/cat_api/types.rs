//! Types for the upstream image API.

use serde::{Deserialize, Serialize};

/// An image record as returned by the search endpoint.
///
/// The `id` is the external identifier: stable across repeated fetches
/// of the same image and the key the gallery deduplicates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatImage {
    /// External id assigned by the image API.
    pub id: String,
    /// Image URL.
    pub url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Breed metadata, when the API knows it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breeds: Vec<CatBreed>,
}

/// Breed metadata attached to some images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatBreed {
    pub id: String,
    pub name: String,
}

/// Query for the image search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSearchQuery {
    /// Maximum number of images to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Mime type filter (e.g. "gif", "jpg,png").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_types: Option<String>,
}

impl Default for ImageSearchQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            mime_types: None,
        }
    }
}

fn default_limit() -> u32 {
    10
}
