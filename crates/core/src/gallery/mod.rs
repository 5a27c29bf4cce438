//! Cat gallery - persisted images and the per-user like relation.
//!
//! The gallery deduplicates externally fetched images by their external
//! id and records likes as (user, cat) rows. Like counts and liked
//! flags are always derived from the relation, never stored.

mod service;
mod sqlite;
mod types;

pub use service::GalleryService;
pub use sqlite::SqliteGallery;
pub use types::*;

/// Trait for gallery storage.
pub trait GalleryStore: Send + Sync {
    /// Return the subset of the given external ids that already have a
    /// cat row.
    fn existing_api_ids(
        &self,
        api_ids: &[String],
    ) -> Result<std::collections::HashSet<String>, GalleryError>;

    /// Insert cat rows for images not yet present.
    ///
    /// Keyed on the external id with ignore-on-conflict semantics, so
    /// overlapping concurrent batches neither error nor duplicate.
    ///
    /// Returns the number of rows actually inserted.
    fn insert_missing(&self, cats: &[NewCat]) -> Result<u32, GalleryError>;

    /// Resolve an external id to its cat row, if ingested.
    fn resolve(&self, api_id: &str) -> Result<Option<Cat>, GalleryError>;

    /// Flip the like relation for (user, cat).
    ///
    /// Deletes the row if present, inserts it otherwise. Returns the new
    /// liked state. The unique (cat_id, user_id) constraint keeps
    /// concurrent flips from ever leaving two rows.
    fn toggle_like(&self, cat_id: i64, user_id: &str) -> Result<bool, GalleryError>;

    /// Count like rows for a cat.
    fn like_count(&self, cat_id: i64) -> Result<u64, GalleryError>;

    /// Whether the given user has a like row for the cat.
    fn is_liked_by(&self, cat_id: i64, user_id: &str) -> Result<bool, GalleryError>;

    /// Join the given external ids against the gallery.
    ///
    /// Ids without a cat row are dropped from the result. The liked flag
    /// is computed only when a user id is supplied.
    fn with_likes(
        &self,
        api_ids: &[String],
        user_id: Option<&str>,
    ) -> Result<Vec<CatWithLikes>, GalleryError>;

    /// Top cats by like count, descending; ties break by internal id
    /// ascending (ingestion order). Cats without likes are not listed.
    fn top_liked(
        &self,
        limit: u32,
        user_id: Option<&str>,
    ) -> Result<Vec<CatWithLikes>, GalleryError>;

    /// Gallery statistics.
    fn stats(&self) -> Result<GalleryStats, GalleryError>;
}
