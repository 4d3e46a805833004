//! Standalone note analysis service
//!
//! Exposes the embedded lexicon analyzer over HTTP for API servers running
//! with `ANALYSIS_BACKEND=remote`. Callers authenticate with a shared key
//! in the `X-AI-Key` header.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use mindful_core::{analysis::AI_KEY_HEADER, AnalysisResult, LexiconAnalyzer};

use crate::{correlation, AppError};

/// Shared state of the analysis service
struct AnalysisState {
    api_key: String,
    analyzer: LexiconAnalyzer,
}

/// Request body for note analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Compare a presented key with the configured one in constant time
fn validate_api_key(provided: &str, expected: &str) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    // Only compare if lengths match (constant-time for same-length keys)
    provided_bytes.len() == expected_bytes.len() && provided_bytes.ct_eq(expected_bytes).into()
}

/// GET /health - Liveness check
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "mindful-track-ai"
    }))
}

/// POST /v1/analyze/mood - Score a note
///
/// The key is checked before the body is looked at. Blank text scores zero
/// with no keywords.
async fn analyze_mood(
    State(state): State<Arc<AnalysisState>>,
    headers: HeaderMap,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let provided = headers
        .get(AI_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !validate_api_key(provided, &state.api_key) {
        warn!("Rejected analysis request with invalid key");
        return Err(AppError::forbidden("Could not validate credentials"));
    }

    let Json(request) = payload?;
    if request.text.trim().is_empty() {
        return Ok(Json(AnalysisResult {
            sentiment_score: 0.0,
            subjectivity: 0.0,
            keywords: vec![],
        }));
    }

    let analysis = state.analyzer.analyze_text(&request.text)?;
    info!(
        text_length = request.text.len(),
        sentiment_score = analysis.sentiment_score,
        "Note analyzed"
    );
    Ok(Json(analysis))
}

/// Create the analysis service router
pub fn create_analysis_router(api_key: &str) -> Router {
    let state = Arc::new(AnalysisState {
        api_key: api_key.to_string(),
        analyzer: LexiconAnalyzer::new(),
    });

    Router::new()
        .route("/health", get(health))
        .route("/v1/analyze/mood", post(analyze_mood))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(correlation::correlation_middleware))
        .layer(CorsLayer::permissive())
}

/// Start the analysis service
pub async fn serve_analysis(host: &str, port: u16, api_key: &str) -> anyhow::Result<()> {
    if api_key == mindful_core::analysis::DEFAULT_AI_SERVICE_KEY {
        warn!("AI_SERVICE_KEY not set, using the development key");
    }

    let app = create_analysis_router(api_key);
    let addr = format!("{}:{}", host, port);

    info!("Starting analysis service at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
