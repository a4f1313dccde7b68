use serde::{Deserialize, Serialize};

use crate::review::error::ReviewError;

/// Highest score the model may award.
pub const MAX_SCORE: u8 = 100;

/// The proposal fields sent for review. Created per call, never persisted.
///
/// Missing JSON fields deserialize as empty strings so they are rejected by
/// `validate()` with a readable message instead of a serde rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub objectives: String,
}

impl ReviewRequest {
    #[allow(dead_code)]
    pub fn new(abstract_text: impl Into<String>, objectives: impl Into<String>) -> Self {
        Self {
            abstract_text: abstract_text.into(),
            objectives: objectives.into(),
        }
    }

    /// Both fields must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.abstract_text.trim().is_empty() {
            return Err(ReviewError::Validation(
                "abstract cannot be empty".to_string(),
            ));
        }
        if self.objectives.trim().is_empty() {
            return Err(ReviewError::Validation(
                "objectives cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Accept/reject verdict. Serialized as the exact labels the model is asked to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Recommended => "Recommended",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }

    /// Matches a captured label case-insensitively. A single trailing period is tolerated;
    /// anything else (hedged or qualified verdicts included) is rejected.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let label = label.strip_suffix('.').unwrap_or(label).trim_end();

        if label.eq_ignore_ascii_case(Recommendation::Recommended.as_str()) {
            Some(Recommendation::Recommended)
        } else if label.eq_ignore_ascii_case(Recommendation::NotRecommended.as_str()) {
            Some(Recommendation::NotRecommended)
        } else {
            None
        }
    }
}

/// Structured verdict plus the verbatim model reply.
///
/// Each field is extracted independently; `None` means "could not be determined",
/// which is distinct from a genuine score of 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewResult {
    pub score: Option<u8>,
    pub explanation: Option<String>,
    pub recommendation: Option<Recommendation>,
    #[serde(rename = "full_response")]
    pub raw_reply: String,
}

impl ReviewResult {
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the fields the parser could not extract, in reply order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.score.is_none() {
            missing.push("score");
        }
        if self.explanation.is_none() {
            missing.push("explanation");
        }
        if self.recommendation.is_none() {
            missing.push("recommendation");
        }
        missing
    }
}
