//! Cat browsing API handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use whiskerboard_core::{CatBreed, CatWithLikes, GalleryStats, ImageSearchQuery};

use super::middleware::CurrentUser;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FetchCatsParams {
    #[serde(default = "default_fetch_limit")]
    pub limit: u32,
    #[serde(default)]
    pub mime_types: Option<String>,
}

fn default_fetch_limit() -> u32 {
    10
}

/// A fetched image merged with its like data.
///
/// `db_id` is absent until ingestion has caught up with this image, in
/// which case the like fields are the zero/false defaults.
#[derive(Debug, Serialize)]
pub struct CatView {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breeds: Vec<CatBreed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_id: Option<i64>,
    pub like_count: u64,
    pub liked_by_user: bool,
}

#[derive(Debug, Serialize)]
pub struct CatsResponse {
    pub cats: Vec<CatView>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    pub api_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrichedCatsResponse {
    pub cats: Vec<CatWithLikes>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    #[serde(default = "default_popular_limit")]
    pub limit: u32,
}

fn default_popular_limit() -> u32 {
    6
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/cats
///
/// Fetch images from the upstream source, schedule detached ingestion,
/// and return the batch merged with like data. A missing source or a
/// failed upstream call degrades to an empty list - image browsing is
/// never failed by this path.
pub async fn fetch_cats(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<FetchCatsParams>,
) -> Json<CatsResponse> {
    let Some(source) = state.image_source() else {
        warn!("image source not configured, returning empty cat list");
        return Json(CatsResponse {
            cats: vec![],
            total: 0,
        });
    };

    let query = ImageSearchQuery {
        limit: params.limit,
        mime_types: params.mime_types,
    };

    let images = match source.search_images(&query).await {
        Ok(images) => images,
        Err(e) => {
            warn!("image search failed: {}", e);
            return Json(CatsResponse {
                cats: vec![],
                total: 0,
            });
        }
    };

    // Persist unseen images after this response; display never waits on
    // the store
    if !images.is_empty() {
        let _ = state.gallery().ingest_detached(images.clone());
    }

    let api_ids: Vec<String> = images.iter().map(|i| i.id.clone()).collect();
    let enriched: HashMap<String, CatWithLikes> = state
        .gallery()
        .with_likes(&api_ids, user.as_deref())
        .into_iter()
        .map(|c| (c.api_id.clone(), c))
        .collect();

    let cats: Vec<CatView> = images
        .into_iter()
        .map(|image| {
            let likes = enriched.get(&image.id);
            CatView {
                id: image.id,
                url: image.url,
                width: image.width,
                height: image.height,
                breeds: image.breeds,
                db_id: likes.map(|l| l.id),
                like_count: likes.map(|l| l.like_count).unwrap_or(0),
                liked_by_user: likes.map(|l| l.liked_by_user).unwrap_or(false),
            }
        })
        .collect();

    let total = cats.len();
    Json(CatsResponse { cats, total })
}

/// POST /api/v1/cats/likes
///
/// Enrich a set of external ids with like data. Ids never ingested get
/// no entry; callers merge by external id and treat absence as
/// zero/false.
pub async fn enrich_cats(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<EnrichRequest>,
) -> Json<EnrichedCatsResponse> {
    let cats = state.gallery().with_likes(&body.api_ids, user.as_deref());
    let total = cats.len();
    Json(EnrichedCatsResponse { cats, total })
}

/// GET /api/v1/cats/popular
///
/// Top cats by like count, descending.
pub async fn popular_cats(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PopularParams>,
) -> Json<EnrichedCatsResponse> {
    let cats = state.gallery().top_liked(params.limit, user.as_deref());
    let total = cats.len();
    Json(EnrichedCatsResponse { cats, total })
}

/// GET /api/v1/gallery/stats
///
/// Gallery statistics.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GalleryStats>, impl IntoResponse> {
    match state.gallery().store().stats() {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
