//! Export and import handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Query, State},
    http::{header, Response, StatusCode},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{AppError, AppState, RequestContext};
use mindful_core::{ExportFormat, ImportRequest};

/// Query parameters for export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Output format (default: json)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

/// GET /api/v1/data/export - Download all moods and CBT logs
pub async fn export_data(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<ExportQuery>,
) -> Result<Response<Body>, AppError> {
    let format: ExportFormat = params.format.parse()?;
    let rendered = state.db.export(&ctx.user_id, format)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, rendered.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", rendered.filename),
        )
        .body(Body::from(rendered.body))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// POST /api/v1/data/import - Restore a JSON export
///
/// Any failure is reported as 400 with the underlying message, and nothing
/// from the document is kept.
pub async fn import_data(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;

    let stats = state
        .db
        .import_json(&ctx.user_id, &request)
        .map_err(|e| {
            warn!(
                correlation_id = %ctx.correlation_id,
                error = %e,
                "Data import failed"
            );
            match e {
                mindful_core::Error::InvalidData(msg) => AppError::bad_request(&msg),
                other => AppError::bad_request(&other.to_string()),
            }
        })?;

    info!(
        moods_imported = stats.moods_imported,
        cbt_logs_imported = stats.cbt_logs_imported,
        "Data imported"
    );

    Ok(Json(json!({
        "message": "Data imported successfully",
        "stats": stats
    })))
}
