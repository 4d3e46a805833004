//! Domain models for MindfulTrack

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest rating accepted for moods and CBT before/after scores
pub const MIN_RATING: i64 = 1;

/// Highest rating accepted for moods and CBT before/after scores
pub const MAX_RATING: i64 = 10;

/// Sentiment and keyword analysis of a mood note
///
/// Embedded in [`MoodEntry`] as JSON text; never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Polarity in [-1.0, 1.0]
    pub sentiment_score: f64,
    /// Subjectivity in [0.0, 1.0]
    pub subjectivity: f64,
    /// Deduplicated noun phrases
    pub keywords: Vec<String>,
}

/// A logged mood as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub rating: i64,
    pub emotions: Vec<String>,
    pub note: Option<String>,
    pub trigger: Option<String>,
    pub behavior: Option<String>,
    /// Epoch timestamp supplied by the client
    pub timestamp: i64,
    /// Owner; absent in hand-written import files
    #[serde(default)]
    pub user_id: String,
    /// Computed once at creation when a note is present
    pub ai_analysis: Option<AnalysisResult>,
}

/// Request body for logging a mood
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodCreate {
    pub id: String,
    pub rating: i64,
    pub emotions: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub behavior: Option<String>,
    pub timestamp: i64,
}

impl MoodCreate {
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id)?;
        validate_rating("rating", self.rating)
    }

    /// Attach ownership and analysis to produce the stored entry
    pub fn into_entry(self, user_id: &str, ai_analysis: Option<AnalysisResult>) -> MoodEntry {
        MoodEntry {
            id: self.id,
            rating: self.rating,
            emotions: self.emotions,
            note: self.note,
            trigger: self.trigger,
            behavior: self.behavior,
            timestamp: self.timestamp,
            user_id: user_id.to_string(),
            ai_analysis,
        }
    }
}

/// A CBT thought record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbtLog {
    pub id: String,
    pub timestamp: i64,
    pub situation: String,
    pub automatic_thoughts: String,
    pub distortions: Vec<String>,
    pub rational_response: String,
    pub mood_before: i64,
    pub mood_after: Option<i64>,
    pub behavioral_link: Option<String>,
    #[serde(default)]
    pub user_id: String,
}

/// Request body for creating a CBT log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbtLogCreate {
    pub id: String,
    pub timestamp: i64,
    pub situation: String,
    pub automatic_thoughts: String,
    pub distortions: Vec<String>,
    pub rational_response: String,
    pub mood_before: i64,
    #[serde(default)]
    pub mood_after: Option<i64>,
    #[serde(default)]
    pub behavioral_link: Option<String>,
}

impl CbtLogCreate {
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id)?;
        self.fields().validate()
    }

    /// The replaceable fields of this log
    pub fn fields(&self) -> CbtLogUpdate {
        CbtLogUpdate {
            timestamp: self.timestamp,
            situation: self.situation.clone(),
            automatic_thoughts: self.automatic_thoughts.clone(),
            distortions: self.distortions.clone(),
            rational_response: self.rational_response.clone(),
            mood_before: self.mood_before,
            mood_after: self.mood_after,
            behavioral_link: self.behavioral_link.clone(),
        }
    }

    pub fn into_log(self, user_id: &str) -> CbtLog {
        CbtLog {
            id: self.id,
            timestamp: self.timestamp,
            situation: self.situation,
            automatic_thoughts: self.automatic_thoughts,
            distortions: self.distortions,
            rational_response: self.rational_response,
            mood_before: self.mood_before,
            mood_after: self.mood_after,
            behavioral_link: self.behavioral_link,
            user_id: user_id.to_string(),
        }
    }
}

/// Full-replace body for updating a CBT log
///
/// The log id comes from the route; `id` or `user_id` keys in the body are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbtLogUpdate {
    pub timestamp: i64,
    pub situation: String,
    pub automatic_thoughts: String,
    pub distortions: Vec<String>,
    pub rational_response: String,
    pub mood_before: i64,
    #[serde(default)]
    pub mood_after: Option<i64>,
    #[serde(default)]
    pub behavioral_link: Option<String>,
}

impl CbtLogUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_rating("mood_before", self.mood_before)?;
        if let Some(after) = self.mood_after {
            validate_rating("mood_after", after)?;
        }
        Ok(())
    }

    pub fn into_log(self, id: &str, user_id: &str) -> CbtLog {
        CbtLog {
            id: id.to_string(),
            timestamp: self.timestamp,
            situation: self.situation,
            automatic_thoughts: self.automatic_thoughts,
            distortions: self.distortions,
            rational_response: self.rational_response,
            mood_before: self.mood_before,
            mood_after: self.mood_after,
            behavioral_link: self.behavioral_link,
            user_id: user_id.to_string(),
        }
    }
}

/// The profile of the (single) user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Request body for updating the profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("name must not be empty".to_string()));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(Error::InvalidData(format!("invalid email: {}", email))),
        }
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::InvalidData("id must not be empty".to_string()));
    }
    Ok(())
}

fn validate_rating(field: &str, value: i64) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(Error::InvalidData(format!(
            "{} must be between {} and {}, got {}",
            field, MIN_RATING, MAX_RATING, value
        )));
    }
    Ok(())
}
