//! Pluggable note analysis
//!
//! Mood notes are scored for sentiment polarity and subjectivity, and
//! noun phrases are pulled out as keywords.
//!
//! # Architecture
//!
//! - `Analyzer` trait: the interface every backend implements
//! - `AnalysisClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backends: `LexiconAnalyzer` (embedded), `RemoteAnalyzer` (HTTP), `MockAnalyzer`
//!
//! # Configuration
//!
//! Environment variables:
//! - `ANALYSIS_BACKEND`: `local` (default), `remote`, or `mock`
//! - `ANALYSIS_URL`: base URL of the analysis service (required for `remote`)
//! - `AI_SERVICE_KEY`: key sent as `X-AI-Key` (default: `development_key`)

mod lexicon;
mod mock;
mod remote;

pub use lexicon::LexiconAnalyzer;
pub use mock::MockAnalyzer;
pub use remote::RemoteAnalyzer;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::models::AnalysisResult;

/// Header carrying the shared analysis service key
pub const AI_KEY_HEADER: &str = "X-AI-Key";

/// Key used when `AI_SERVICE_KEY` is unset
pub const DEFAULT_AI_SERVICE_KEY: &str = "development_key";

/// Read the shared analysis service key from the environment
pub fn service_key_from_env() -> String {
    std::env::var("AI_SERVICE_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_AI_SERVICE_KEY.to_string())
}

/// Interface for all analysis backends
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Score a non-empty text
    async fn analyze(&self, text: &str) -> Result<AnalysisResult>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Backend name (for logging)
    fn name(&self) -> &str;
}

/// Concrete analysis client
#[derive(Clone)]
pub enum AnalysisClient {
    /// Embedded lexicon scorer
    Lexicon(LexiconAnalyzer),
    /// Remote analysis service
    Remote(RemoteAnalyzer),
    /// Mock backend for testing
    Mock(MockAnalyzer),
}

impl AnalysisClient {
    /// Create a client from environment variables
    ///
    /// Falls back to the embedded lexicon when `remote` is requested without
    /// an `ANALYSIS_URL`, or when the backend name is unknown.
    pub fn from_env() -> Self {
        let backend = std::env::var("ANALYSIS_BACKEND").unwrap_or_else(|_| "local".to_string());

        match backend.to_lowercase().as_str() {
            "local" | "lexicon" => AnalysisClient::Lexicon(LexiconAnalyzer::new()),
            "remote" => match RemoteAnalyzer::from_env() {
                Some(remote) => AnalysisClient::Remote(remote),
                None => {
                    warn!("ANALYSIS_BACKEND=remote but ANALYSIS_URL is not set, using local lexicon");
                    AnalysisClient::Lexicon(LexiconAnalyzer::new())
                }
            },
            "mock" => AnalysisClient::Mock(MockAnalyzer::new()),
            _ => {
                warn!(backend = %backend, "Unknown ANALYSIS_BACKEND, falling back to local lexicon");
                AnalysisClient::Lexicon(LexiconAnalyzer::new())
            }
        }
    }

    /// Embedded lexicon backend
    pub fn lexicon() -> Self {
        AnalysisClient::Lexicon(LexiconAnalyzer::new())
    }

    /// Remote backend pointing at `base_url`
    pub fn remote(base_url: &str, api_key: &str) -> Self {
        AnalysisClient::Remote(RemoteAnalyzer::new(base_url, api_key))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AnalysisClient::Mock(MockAnalyzer::new())
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        match self {
            AnalysisClient::Lexicon(b) => b.analyze(text).await,
            AnalysisClient::Remote(b) => b.analyze(text).await,
            AnalysisClient::Mock(b) => b.analyze(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AnalysisClient::Lexicon(b) => b.health_check().await,
            AnalysisClient::Remote(b) => b.health_check().await,
            AnalysisClient::Mock(b) => b.health_check().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            AnalysisClient::Lexicon(b) => b.name(),
            AnalysisClient::Remote(b) => b.name(),
            AnalysisClient::Mock(b) => b.name(),
        }
    }
}

/// Analyze an optional note, never failing
///
/// Absent, empty or whitespace-only notes produce `None`. Backend errors are
/// logged and also produce `None`, so callers can store the entry without
/// enrichment.
pub async fn analyze_note<A: Analyzer + ?Sized>(
    analyzer: &A,
    note: Option<&str>,
) -> Option<AnalysisResult> {
    let text = note.map(str::trim).filter(|t| !t.is_empty())?;

    info!(text_length = text.len(), backend = analyzer.name(), "Analyzing mood note");

    match analyzer.analyze(text).await {
        Ok(analysis) => {
            info!(
                sentiment_score = analysis.sentiment_score,
                "Mood analysis complete"
            );
            Some(analysis)
        }
        Err(e) => {
            error!(error = %e, "Mood analysis failed");
            None
        }
    }
}
