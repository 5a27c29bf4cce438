//! Types for the cat gallery (persisted images + likes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cat_api::CatImage;

/// A persisted cat image (one row per distinct external id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cat {
    /// Internal id assigned by the store on first ingestion.
    pub id: i64,
    /// External id assigned by the image API.
    pub api_id: String,
    /// Image URL.
    pub image_url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// When first ingested.
    pub created_at: DateTime<Utc>,
}

/// Row shape for ingestion (everything but the store-assigned fields).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCat {
    pub api_id: String,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

impl From<&CatImage> for NewCat {
    fn from(image: &CatImage) -> Self {
        Self {
            api_id: image.id.clone(),
            image_url: image.url.clone(),
            width: image.width,
            height: image.height,
        }
    }
}

/// A cat joined with its derived like data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatWithLikes {
    /// Internal id.
    pub id: i64,
    /// External id.
    pub api_id: String,
    /// Image URL.
    pub image_url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of like rows referencing this cat.
    pub like_count: u64,
    /// Whether the querying user has liked this cat. Always false when
    /// no user was supplied.
    pub liked_by_user: bool,
}

/// Outcome of a like toggle.
///
/// Failures are absorbed into `success = false` with the last known
/// observable state; callers never see a raw store error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResult {
    pub success: bool,
    pub is_liked: bool,
    pub like_count: u64,
}

impl ToggleResult {
    /// Neutral failure outcome (precondition not met, nothing known).
    pub fn denied() -> Self {
        Self {
            success: false,
            is_liked: false,
            like_count: 0,
        }
    }
}

/// Gallery statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryStats {
    /// Total persisted cats.
    pub total_cats: u64,
    /// Total like rows.
    pub total_likes: u64,
    /// Number of distinct users with at least one like.
    pub distinct_likers: u64,
    /// Oldest ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Most recent ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Errors for gallery operations.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
