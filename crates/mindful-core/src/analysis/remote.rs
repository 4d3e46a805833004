//! HTTP client for the standalone analysis service
//!
//! Calls `POST {base_url}/v1/analyze/mood` with the shared key in `X-AI-Key`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{service_key_from_env, Analyzer, AI_KEY_HEADER};
use crate::error::{Error, Result};
use crate::models::AnalysisResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote analysis backend
#[derive(Clone)]
pub struct RemoteAnalyzer {
    http_client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

impl RemoteAnalyzer {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from `ANALYSIS_URL` and `AI_SERVICE_KEY`
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("ANALYSIS_URL").ok().filter(|u| !u.is_empty())?;
        Some(Self::new(&url, &service_key_from_env()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let response = self
            .http_client
            .post(format!("{}/v1/analyze/mood", self.base_url))
            .header(AI_KEY_HEADER, &self.api_key)
            .json(&AnalyzeRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Analysis(format!(
                "analysis service returned {}: {}",
                status, body
            )));
        }

        let analysis: AnalysisResult = response.json().await?;
        debug!(
            sentiment_score = analysis.sentiment_score,
            keywords = analysis.keywords.len(),
            "Remote analysis response"
        );
        Ok(analysis)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "remote"
    }
}
