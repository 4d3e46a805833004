//! Mock backend for testing
//!
//! Returns predictable scores without a lexicon or a running service.

use async_trait::async_trait;

use super::Analyzer;
use crate::error::{Error, Result};
use crate::models::AnalysisResult;

/// Mock analysis backend
///
/// Positive words push the score up, negative words push it down, and every
/// word longer than six letters is reported as a keyword.
#[derive(Clone, Default)]
pub struct MockAnalyzer {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether analyze should fail
    pub fail: bool,
}

impl MockAnalyzer {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            fail: false,
        }
    }

    /// Create a backend whose analysis always errors
    pub fn failing() -> Self {
        Self {
            healthy: false,
            fail: true,
        }
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if self.fail {
            return Err(Error::Analysis("mock analyzer configured to fail".to_string()));
        }

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let positive = words
            .iter()
            .filter(|w| matches!(**w, "good" | "great" | "happy" | "calm"))
            .count() as f64;
        let negative = words
            .iter()
            .filter(|w| matches!(**w, "bad" | "sad" | "awful" | "anxious"))
            .count() as f64;

        let scored = positive + negative;
        let sentiment_score = if scored > 0.0 {
            (positive - negative) / scored
        } else {
            0.0
        };

        let mut keywords: Vec<String> = words
            .iter()
            .filter(|w| w.len() > 6)
            .map(|w| w.to_string())
            .collect();
        keywords.sort();
        keywords.dedup();

        Ok(AnalysisResult {
            sentiment_score,
            subjectivity: if scored > 0.0 { 0.5 } else { 0.0 },
            keywords,
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &str {
        "mock"
    }
}
