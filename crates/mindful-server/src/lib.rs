//! MindfulTrack Web Server
//!
//! Axum-based REST API for the MindfulTrack mood journal, plus the standalone
//! note analysis service.
//!
//! Every request on both services:
//! - carries a correlation id (`X-Correlation-ID`, generated when absent)
//! - runs inside a tracing span recording that id
//! - gets a [`RequestContext`] extension naming the acting user

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use mindful_core::{AnalysisClient, Analyzer, Database};

mod analysis_service;
mod correlation;
mod handlers;

pub use analysis_service::{create_analysis_router, serve_analysis};
pub use correlation::{RequestContext, CORRELATION_ID_HEADER};

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read `MINDFUL_ALLOWED_ORIGINS` (comma separated)
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("MINDFUL_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub analyzer: AnalysisClient,
}

/// Status body returned by deletes
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::HeaderName::from_static(CORRELATION_ID_HEADER),
    ];

    if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}

/// Create the application router
pub fn create_router(db: Database, analyzer: AnalysisClient, config: ServerConfig) -> Router {
    info!(backend = analyzer.name(), "Mood analysis backend configured");

    let state = Arc::new(AppState { db, analyzer });

    // Collection routes answer with and without the trailing slash
    let api_routes = Router::new()
        // Moods
        .route(
            "/moods",
            get(handlers::list_moods).post(handlers::create_mood),
        )
        .route(
            "/moods/",
            get(handlers::list_moods).post(handlers::create_mood),
        )
        .route("/moods/:id", delete(handlers::delete_mood))
        // CBT logs
        .route(
            "/cbt-logs",
            get(handlers::list_cbt_logs).post(handlers::create_cbt_log),
        )
        .route(
            "/cbt-logs/",
            get(handlers::list_cbt_logs).post(handlers::create_cbt_log),
        )
        .route(
            "/cbt-logs/:id",
            put(handlers::update_cbt_log).delete(handlers::delete_cbt_log),
        )
        // Data transfer
        .route("/data/export", get(handlers::export_data))
        .route("/data/import", axum::routing::post(handlers::import_data))
        // Profile
        .route(
            "/users/me",
            get(handlers::get_me).put(handlers::update_me),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(correlation::correlation_middleware))
        .layer(cors_layer(&config))
}

/// Start the API server
pub async fn serve(
    db: Database,
    analyzer: AnalysisClient,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_analyzer(&analyzer).await;

    let app = create_router(db, analyzer, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log analysis backend status
async fn check_analyzer(analyzer: &AnalysisClient) {
    if analyzer.health_check().await {
        info!(backend = analyzer.name(), "Analysis backend ready");
    } else {
        warn!(
            backend = analyzer.name(),
            "Analysis backend not responding, moods will be stored without analysis"
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn forbidden(msg: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "detail": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        if let Some(rejection) = err.downcast_ref::<JsonRejection>() {
            return Self::bad_request(&rejection.body_text());
        }

        if let Some(core) = err.downcast_ref::<mindful_core::Error>() {
            match core {
                mindful_core::Error::InvalidData(msg) => return Self::bad_request(msg),
                mindful_core::Error::NotFound(msg) => return Self::not_found(msg),
                mindful_core::Error::Conflict(msg) => return Self::conflict(msg),
                _ => {}
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
