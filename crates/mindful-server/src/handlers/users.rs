//! Profile handlers for the acting user

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::{AppError, AppState, RequestContext};
use mindful_core::{User, UserUpdate};

/// GET /api/v1/users/me - Current user's profile
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(&ctx.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

/// PUT /api/v1/users/me - Update name and email
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(update) = payload?;
    update.validate()?;

    if !state.db.update_user(&ctx.user_id, &update)? {
        return Err(AppError::not_found("User not found"));
    }

    let user = state
        .db
        .get_user(&ctx.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}
