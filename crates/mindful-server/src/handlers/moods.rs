//! Mood entry handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use tracing::info;

use crate::{AppError, AppState, RequestContext, StatusResponse};
use mindful_core::{create_mood_entry, DeleteOutcome, MoodCreate, MoodEntry};

/// GET /api/v1/moods/ - List the user's mood entries, newest first
pub async fn list_moods(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<MoodEntry>>, AppError> {
    let moods = state.db.list_mood_entries(&ctx.user_id)?;
    Ok(Json(moods))
}

/// POST /api/v1/moods/ - Log a mood, analyzing its note when present
pub async fn create_mood(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<MoodCreate>, JsonRejection>,
) -> Result<Json<MoodEntry>, AppError> {
    let Json(input) = payload?;

    let entry = create_mood_entry(&state.db, &state.analyzer, &ctx.user_id, input).await?;
    info!(
        mood_id = %entry.id,
        analyzed = entry.ai_analysis.is_some(),
        "Mood logged"
    );

    Ok(Json(entry))
}

/// DELETE /api/v1/moods/:id - Delete a mood entry (idempotent)
pub async fn delete_mood(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    if state.db.delete_mood_entry(&ctx.user_id, &id)? == DeleteOutcome::AlreadyAbsent {
        info!(mood_id = %id, "Delete requested for unknown mood entry");
    }
    Ok(Json(StatusResponse::success()))
}
