//! Like toggle API handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use whiskerboard_core::ToggleResult;

use super::middleware::CurrentUser;
use crate::state::AppState;

/// POST /api/v1/cats/{api_id}/like
///
/// Flip the like state of a cat for the current user. Always returns a
/// `ToggleResult` body: precondition and store failures are reported as
/// `success = false`, never as an error status, so the UI can revert its
/// optimistic update and offer a retry.
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(api_id): Path<String>,
) -> Json<ToggleResult> {
    Json(state.gallery().toggle_like(user.as_deref(), &api_id))
}
