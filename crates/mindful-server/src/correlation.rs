//! Per-request correlation ids and acting-user context

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use mindful_core::DEFAULT_USER_ID;

/// Header carrying the correlation id in both directions
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Longest client-supplied id that is echoed back; longer ones are replaced
const MAX_CORRELATION_ID_LEN: usize = 128;

/// Who is acting and under which correlation id
///
/// Inserted into request extensions by [`correlation_middleware`] and handed
/// to every repository call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: String,
    pub correlation_id: String,
}

fn correlation_id_from(request: &Request) -> String {
    request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_CORRELATION_ID_LEN)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Attach a correlation id, a tracing span and a [`RequestContext`]
///
/// Every log line emitted while handling the request is recorded inside the
/// span, and the id is echoed in the response header.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = correlation_id_from(&request);

    let span = info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    request.extensions_mut().insert(RequestContext {
        user_id: DEFAULT_USER_ID.to_string(),
        correlation_id: correlation_id.clone(),
    });

    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value);
    }

    response
}
