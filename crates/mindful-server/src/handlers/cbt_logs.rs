//! CBT log handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, RequestContext, StatusResponse};
use mindful_core::{CbtLog, CbtLogCreate, CbtLogUpdate};

/// GET /api/v1/cbt-logs/ - List the user's CBT logs, newest first
pub async fn list_cbt_logs(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<CbtLog>>, AppError> {
    let logs = state.db.list_cbt_logs(&ctx.user_id)?;
    Ok(Json(logs))
}

/// POST /api/v1/cbt-logs/ - Create a CBT log
pub async fn create_cbt_log(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<CbtLogCreate>, JsonRejection>,
) -> Result<Json<CbtLog>, AppError> {
    let Json(input) = payload?;
    input.validate()?;

    state.db.create_cbt_log(&ctx.user_id, &input)?;
    Ok(Json(input.into_log(&ctx.user_id)))
}

/// PUT /api/v1/cbt-logs/:id - Replace a CBT log
///
/// The id in the path wins over any id in the body.
pub async fn update_cbt_log(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    payload: Result<Json<CbtLogUpdate>, JsonRejection>,
) -> Result<Json<CbtLog>, AppError> {
    let Json(update) = payload?;
    update.validate()?;

    if !state.db.update_cbt_log(&ctx.user_id, &id, &update)? {
        return Err(AppError::not_found("CBT log not found"));
    }

    Ok(Json(update.into_log(&id, &ctx.user_id)))
}

/// DELETE /api/v1/cbt-logs/:id - Delete a CBT log (idempotent)
pub async fn delete_cbt_log(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    state.db.delete_cbt_log(&ctx.user_id, &id)?;
    Ok(Json(StatusResponse::success()))
}
