//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use mindful_core::{Database, MockAnalyzer};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), AnalysisClient::lexicon(), ServerConfig::default());
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn sample_cbt(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "timestamp": 1700000000,
        "situation": "Friend did not reply",
        "automatic_thoughts": "They are angry with me",
        "distortions": ["Mind Reading"],
        "rational_response": "They are probably busy",
        "mood_before": 3,
        "mood_after": 6
    })
}

// ========== Health & Correlation Tests ==========

#[tokio::test]
async fn test_health() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "mindful-track-api");
}

#[tokio::test]
async fn test_correlation_id_echoed() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Correlation-ID", "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(CORRELATION_ID_HEADER).unwrap(),
        "trace-42"
    );
}

#[tokio::test]
async fn test_correlation_id_generated() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get_request("/api/v1/moods/")).await.unwrap();
    let id = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_correlation_id_on_error_responses() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/data/export?format=xml")
                .header("X-Correlation-ID", "err-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers().get(CORRELATION_ID_HEADER).unwrap(), "err-1");
}

// ========== Mood API Tests ==========

#[tokio::test]
async fn test_create_mood_with_note_is_analyzed() {
    let (app, _) = setup_test_app();

    let body = json!({
        "id": "m1",
        "rating": 4,
        "emotions": ["calm"],
        "note": "Had a good day with friends",
        "timestamp": 1700000000
    });
    let response = app
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["id"], "m1");
    assert_eq!(json["user_id"], "1");
    assert!(json["ai_analysis"]["sentiment_score"].as_f64().unwrap() > 0.0);
    assert!(json["ai_analysis"]["keywords"].is_array());
}

#[tokio::test]
async fn test_create_mood_without_note() {
    let (app, db) = setup_test_app();

    let body = json!({
        "id": "m1",
        "rating": 6,
        "emotions": [],
        "timestamp": 1700000000
    });
    let response = app
        .oneshot(json_request("POST", "/api/v1/moods", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["ai_analysis"].is_null());
    assert_eq!(db.count_rows("mood_entries").unwrap(), 1);
}

#[tokio::test]
async fn test_create_mood_with_failing_analyzer() {
    let db = Database::in_memory().unwrap();
    let app = create_router(
        db.clone(),
        AnalysisClient::Mock(MockAnalyzer::failing()),
        ServerConfig::default(),
    );

    let body = json!({
        "id": "m1",
        "rating": 2,
        "emotions": ["sad"],
        "note": "Rough afternoon",
        "timestamp": 1700000000
    });
    let response = app
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["ai_analysis"].is_null());
    assert_eq!(db.count_rows("mood_entries").unwrap(), 1);
}

#[tokio::test]
async fn test_create_mood_invalid_rating() {
    let (app, db) = setup_test_app();

    let body = json!({
        "id": "m1",
        "rating": 11,
        "emotions": [],
        "timestamp": 1700000000
    });
    let response = app
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("rating"));
    assert_eq!(db.count_rows("mood_entries").unwrap(), 0);
}

#[tokio::test]
async fn test_create_mood_malformed_body() {
    let (app, _) = setup_test_app();

    let body = json!({"id": "m1", "emotions": []});
    let response = app
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_create_mood_duplicate_id() {
    let (app, _) = setup_test_app();
    let body = json!({"id": "m1", "rating": 5, "emotions": [], "timestamp": 1});

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_moods_newest_first() {
    let (app, _) = setup_test_app();

    for (id, ts) in [("old", 100), ("new", 200)] {
        let body = json!({"id": id, "rating": 5, "emotions": [], "timestamp": ts});
        app.clone()
            .oneshot(json_request("POST", "/api/v1/moods/", &body))
            .await
            .unwrap();
    }

    let response = app.oneshot(get_request("/api/v1/moods/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let moods = json.as_array().unwrap();
    assert_eq!(moods.len(), 2);
    assert_eq!(moods[0]["id"], "new");
    assert_eq!(moods[1]["id"], "old");
}

#[tokio::test]
async fn test_delete_mood_idempotent() {
    let (app, db) = setup_test_app();
    let body = json!({"id": "m1", "rating": 5, "emotions": [], "timestamp": 1});
    app.clone()
        .oneshot(json_request("POST", "/api/v1/moods/", &body))
        .await
        .unwrap();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(delete_request("/api/v1/moods/m1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["status"], "success");
    }
    assert_eq!(db.count_rows("mood_entries").unwrap(), 0);
}

// ========== CBT Log API Tests ==========

#[tokio::test]
async fn test_cbt_log_lifecycle() {
    let (app, db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/cbt-logs/", &sample_cbt("c1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = get_body_json(response).await;
    assert_eq!(created["user_id"], "1");
    assert_eq!(created["mood_after"], 6);

    // Body id is ignored in favor of the path
    let mut update = sample_cbt("something-else");
    update["rational_response"] = json!("They replied an hour later");
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/v1/cbt-logs/c1", &update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = get_body_json(response).await;
    assert_eq!(updated["id"], "c1");
    assert_eq!(updated["rational_response"], "They replied an hour later");

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/cbt-logs"))
        .await
        .unwrap();
    let logs = get_body_json(response).await;
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["rational_response"], "They replied an hour later");

    let response = app
        .oneshot(delete_request("/api/v1/cbt-logs/c1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(db.count_rows("cbt_logs").unwrap(), 0);
}

#[tokio::test]
async fn test_update_unknown_cbt_log() {
    let (app, db) = setup_test_app();
    app.clone()
        .oneshot(json_request("POST", "/api/v1/cbt-logs/", &sample_cbt("c1")))
        .await
        .unwrap();
    let before = db.list_cbt_logs("1").unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/v1/cbt-logs/missing",
            &sample_cbt("missing"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "CBT log not found");
    assert_eq!(db.list_cbt_logs("1").unwrap(), before);
}

#[tokio::test]
async fn test_delete_unknown_cbt_log() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(delete_request("/api/v1/cbt-logs/doesnotexist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json, json!({"status": "success"}));
}

#[tokio::test]
async fn test_create_cbt_log_invalid_mood_before() {
    let (app, _) = setup_test_app();
    let mut body = sample_cbt("c1");
    body["mood_before"] = json!(0);

    let response = app
        .oneshot(json_request("POST", "/api/v1/cbt-logs/", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Data Transfer Tests ==========

#[tokio::test]
async fn test_export_csv_has_both_sections() {
    let (app, _) = setup_test_app();
    let mood = json!({"id": "m1", "rating": 7, "emotions": ["glad", "calm"], "timestamp": 1});
    app.clone()
        .oneshot(json_request("POST", "/api/v1/moods/", &mood))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request("POST", "/api/v1/cbt-logs/", &sample_cbt("c1")))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/api/v1/data/export?format=csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "text/csv");
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=mindfultrack_export.csv"
    );

    let body = get_body_text(response).await;
    assert!(body.contains("--- MOOD ENTRIES ---"));
    assert!(body.contains("--- CBT LOGS ---"));
}

#[tokio::test]
async fn test_export_defaults_to_json() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(get_request("/api/v1/data/export"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let json = get_body_json(response).await;
    assert!(json["moodEntries"].as_array().unwrap().is_empty());
    assert!(json["cbtLogs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_markdown() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(get_request("/api/v1/data/export?format=md"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/markdown"
    );
    let body = get_body_text(response).await;
    assert!(body.starts_with("# MindfulTrack Export"));
}

#[tokio::test]
async fn test_export_unsupported_format() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(get_request("/api/v1/data/export?format=xml"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Unsupported format");
}

#[tokio::test]
async fn test_export_then_import_is_noop() {
    let (app, db) = setup_test_app();
    let mood = json!({
        "id": "m1", "rating": 8, "emotions": ["proud"],
        "note": "Finished the project", "timestamp": 1
    });
    app.clone()
        .oneshot(json_request("POST", "/api/v1/moods/", &mood))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request("POST", "/api/v1/cbt-logs/", &sample_cbt("c1")))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/data/export?format=json"))
        .await
        .unwrap();
    let exported = get_body_text(response).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/data/import",
            &json!({"format": "json", "content": exported}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Data imported successfully");
    assert_eq!(json["stats"]["moods_imported"], 0);
    assert_eq!(json["stats"]["moods_skipped"], 1);
    assert_eq!(db.count_rows("mood_entries").unwrap(), 1);
    assert_eq!(db.count_rows("cbt_logs").unwrap(), 1);
}

#[tokio::test]
async fn test_import_non_json_format() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/data/import",
            &json!({"format": "csv", "content": "a,b"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(
        json["detail"],
        "Only JSON import is supported in this version"
    );
}

#[tokio::test]
async fn test_failed_import_leaves_database_unchanged() {
    let (app, db) = setup_test_app();

    let content = json!({
        "moodEntries": [
            {"id": "n1", "rating": 5, "emotions": [], "timestamp": 2}
        ],
        "cbtLogs": [
            {"id": "c1", "timestamp": 4, "distortions": [], "mood_before": 2}
        ]
    })
    .to_string();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/data/import",
            &json!({"format": "json", "content": content}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("missing field"));
    assert_eq!(db.count_rows("mood_entries").unwrap(), 0);
    assert_eq!(db.count_rows("cbt_logs").unwrap(), 0);
}

// ========== User API Tests ==========

#[tokio::test]
async fn test_get_me() {
    let (app, _) = setup_test_app();

    let response = app.oneshot(get_request("/api/v1/users/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["id"], "1");
    assert_eq!(json["name"], "Demo User");
    assert_eq!(json["email"], "demo@example.com");
}

#[tokio::test]
async fn test_update_me() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/users/me",
            &json!({"name": "Jordan", "email": "jordan@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["id"], "1");
    assert_eq!(json["name"], "Jordan");

    let response = app.oneshot(get_request("/api/v1/users/me")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["email"], "jordan@example.com");
}

#[tokio::test]
async fn test_update_me_invalid_email() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/v1/users/me",
            &json!({"name": "Jordan", "email": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_server_on_file_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("mood.db");
    let db = Database::new(&path.to_string_lossy()).unwrap();
    let app = create_router(db, AnalysisClient::mock(), ServerConfig::default());

    let response = app.oneshot(get_request("/api/v1/users/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(path.exists());
}

// ========== Analysis Service Tests ==========

#[tokio::test]
async fn test_analysis_health() {
    let app = create_analysis_router("secret");

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["service"], "mindful-track-ai");
}

#[tokio::test]
async fn test_analysis_requires_key() {
    let app = create_analysis_router("secret");

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/analyze/mood",
            &json!({"text": "I feel great"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn test_analysis_wrong_key() {
    let app = create_analysis_router("secret");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/analyze/mood")
                .header("content-type", "application/json")
                .header("X-AI-Key", "guess")
                .body(Body::from(r#"{"text":"I feel great"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_analysis_with_key() {
    let app = create_analysis_router("secret");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/analyze/mood")
                .header("content-type", "application/json")
                .header("X-AI-Key", "secret")
                .header("X-Correlation-ID", "ai-7")
                .body(Body::from(r#"{"text":"Had a good day with friends"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CORRELATION_ID_HEADER).unwrap(), "ai-7");
    let json = get_body_json(response).await;
    assert!(json["sentiment_score"].as_f64().unwrap() > 0.0);
    assert_eq!(json["keywords"], json!(["good day"]));
}

#[tokio::test]
async fn test_analysis_blank_text_scores_zero() {
    let app = create_analysis_router("secret");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/analyze/mood")
                .header("content-type", "application/json")
                .header("X-AI-Key", "secret")
                .body(Body::from(r#"{"text":"   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["sentiment_score"], 0.0);
    assert_eq!(json["keywords"], json!([]));
}

// ========== Config Tests ==========

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins("http://localhost:3000, https://app.example.com,,"),
        vec!["http://localhost:3000", "https://app.example.com"]
    );
    assert!(parse_origins("").is_empty());
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
    };
    let app = create_router(db, AnalysisClient::lexicon(), config);

    let allowed = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let other = Request::builder()
        .uri("/health")
        .header("origin", "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(other).await.unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_cors_any_origin_when_unconfigured() {
    let (app, _) = setup_test_app();

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://anywhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
