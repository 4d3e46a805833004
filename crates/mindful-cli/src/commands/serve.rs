//! Server command implementations

use std::path::Path;

use anyhow::{Context, Result};
use mindful_core::{analysis::service_key_from_env, AnalysisClient, Analyzer};
use mindful_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16) -> Result<()> {
    println!("🚀 Starting MindfulTrack API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let config = ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: any origin (set MINDFUL_ALLOWED_ORIGINS to restrict)");
    } else {
        println!("   🌐 CORS: {}", config.allowed_origins.join(", "));
    }

    let analyzer = AnalysisClient::from_env();
    println!("   🧠 Analysis backend: {}", analyzer.name());

    let db = open_db(db_path)?;

    mindful_server::serve(db, analyzer, host, port, config)
        .await
        .context("Server error")
}

pub async fn cmd_serve_ai(host: &str, port: u16) -> Result<()> {
    println!("🧠 Starting MindfulTrack analysis service...");
    println!("   Listening: http://{}:{}", host, port);

    let api_key = service_key_from_env();

    mindful_server::serve_analysis(host, port, &api_key)
        .await
        .context("Analysis service error")
}
