//! Gallery service - ingestion, like toggling, enrichment, popularity.
//!
//! Failure policy: nothing above this layer sees a raw store error.
//! Writes on the display path are detached, read failures degrade to
//! empty results, and toggle failures report `success = false` with the
//! last known state. Every absorbed failure is logged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{CatWithLikes, GalleryError, GalleryStore, NewCat, ToggleResult};
use crate::cat_api::CatImage;
use crate::metrics::{CATS_INGESTED_TOTAL, INGEST_RUNS_TOTAL, LIKE_TOGGLES_TOTAL};

/// Gallery service over a [`GalleryStore`].
#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn GalleryStore>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    /// Access to the underlying store (used by stats and tests).
    pub fn store(&self) -> &Arc<dyn GalleryStore> {
        &self.store
    }

    /// Ingest a batch of fetched images, deduplicating against the store.
    ///
    /// Returns the number of newly persisted cats.
    pub fn ingest(&self, images: &[CatImage]) -> Result<u32, GalleryError> {
        let cats: Vec<NewCat> = images
            .iter()
            .filter(|i| !i.id.is_empty())
            .map(NewCat::from)
            .collect();

        if cats.is_empty() {
            debug!("ingest: nothing to persist");
            return Ok(0);
        }

        let api_ids: Vec<String> = cats.iter().map(|c| c.api_id.clone()).collect();
        let existing = self.store.existing_api_ids(&api_ids)?;

        let unseen: Vec<NewCat> = cats
            .into_iter()
            .filter(|c| !existing.contains(&c.api_id))
            .collect();

        if unseen.is_empty() {
            debug!("ingest: all {} images already persisted", api_ids.len());
            return Ok(0);
        }

        let new_count = self.store.insert_missing(&unseen)?;
        info!(
            "ingest: persisted {} new cats ({} already known)",
            new_count,
            api_ids.len() - unseen.len()
        );
        CATS_INGESTED_TOTAL.inc_by(new_count as u64);
        Ok(new_count)
    }

    /// Ingest a batch detached from the calling request.
    ///
    /// Errors are logged and swallowed so a persistence hiccup can never
    /// block or fail image display. Callers drop the returned handle;
    /// tests await it.
    pub fn ingest_detached(&self, images: Vec<CatImage>) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            match service.ingest(&images) {
                Ok(_) => INGEST_RUNS_TOTAL.with_label_values(&["ok"]).inc(),
                Err(e) => {
                    warn!("detached ingest failed: {}", e);
                    INGEST_RUNS_TOTAL.with_label_values(&["failed"]).inc();
                }
            }
        })
    }

    /// Flip the like state of `api_id` for the given user.
    ///
    /// `success = false` when there is no user, the image was never
    /// ingested, or the store fails; the count always reflects the like
    /// relation, never a stored counter.
    pub fn toggle_like(&self, user_id: Option<&str>, api_id: &str) -> ToggleResult {
        let Some(user_id) = user_id else {
            debug!("toggle rejected: no authenticated user");
            LIKE_TOGGLES_TOTAL.with_label_values(&["rejected"]).inc();
            return ToggleResult::denied();
        };

        let cat = match self.store.resolve(api_id) {
            Ok(Some(cat)) => cat,
            Ok(None) => {
                debug!("toggle rejected: {} not ingested", api_id);
                LIKE_TOGGLES_TOTAL.with_label_values(&["rejected"]).inc();
                return ToggleResult::denied();
            }
            Err(e) => {
                error!("toggle: failed to resolve {}: {}", api_id, e);
                LIKE_TOGGLES_TOTAL.with_label_values(&["rejected"]).inc();
                return ToggleResult::denied();
            }
        };

        let is_liked = match self.store.toggle_like(cat.id, user_id) {
            Ok(is_liked) => is_liked,
            Err(e) => {
                error!("toggle: failed to flip like for {}: {}", api_id, e);
                LIKE_TOGGLES_TOTAL.with_label_values(&["rejected"]).inc();
                // Report the state we can still observe
                return ToggleResult {
                    success: false,
                    is_liked: self.store.is_liked_by(cat.id, user_id).unwrap_or(false),
                    like_count: self.store.like_count(cat.id).unwrap_or(0),
                };
            }
        };

        let like_count = match self.store.like_count(cat.id) {
            Ok(count) => count,
            Err(e) => {
                error!("toggle: failed to recount likes for {}: {}", api_id, e);
                return ToggleResult {
                    success: false,
                    is_liked,
                    like_count: 0,
                };
            }
        };

        LIKE_TOGGLES_TOTAL
            .with_label_values(&[if is_liked { "liked" } else { "unliked" }])
            .inc();

        ToggleResult {
            success: true,
            is_liked,
            like_count,
        }
    }

    /// Enrich the given external ids with like data.
    ///
    /// Never-ingested ids produce no entry; store failures degrade to an
    /// empty list.
    pub fn with_likes(&self, api_ids: &[String], user_id: Option<&str>) -> Vec<CatWithLikes> {
        match self.store.with_likes(api_ids, user_id) {
            Ok(cats) => cats,
            Err(e) => {
                error!("enrichment failed for {} ids: {}", api_ids.len(), e);
                Vec::new()
            }
        }
    }

    /// Top cats by like count, store failures degrading to empty.
    pub fn top_liked(&self, limit: u32, user_id: Option<&str>) -> Vec<CatWithLikes> {
        match self.store.top_liked(limit, user_id) {
            Ok(cats) => cats,
            Err(e) => {
                error!("popularity query failed: {}", e);
                Vec::new()
            }
        }
    }
}
