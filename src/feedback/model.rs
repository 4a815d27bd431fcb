use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Survey order of the rating scale. Reports render labels in exactly this
/// order, never alphabetized or ranked by frequency.
pub const RATING_LABELS: [&str; 5] = ["Poor", "Fair", "Very Good", "Good", "Excellent"];

/// Exact, case-sensitive membership check against [`RATING_LABELS`].
pub fn is_canonical_rating(value: &str) -> bool {
    RATING_LABELS.contains(&value)
}

/// A stored feedback entry. Immutable once inserted.
///
/// JSON field names follow the documents the survey form submits
/// (`user`, `name`, `suggestions`, `date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FeedbackRecord {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub submitter: String,
    pub category: String,
    #[serde(rename = "name")]
    pub subject_name: String,
    pub faculty: String,
    pub rating: Option<String>,
    #[serde(rename = "suggestions")]
    pub suggestion: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "date")]
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn from_new(feedback: NewFeedback, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            submitter: feedback.submitter,
            category: feedback.category,
            subject_name: feedback.subject_name,
            faculty: feedback.faculty,
            rating: feedback.rating,
            suggestion: feedback.suggestion,
            department: feedback.department,
            year: feedback.year,
            submitted_at: feedback.submitted_at.unwrap_or(now),
        }
    }
}

/// Submission payload. The store assigns `id`, and `submitted_at` when the
/// caller leaves it out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFeedback {
    #[serde(rename = "user")]
    pub submitter: String,
    pub category: String,
    #[serde(rename = "name", default)]
    pub subject_name: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(rename = "suggestions", default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(rename = "date", default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rating {0:?} is not one of Poor, Fair, Very Good, Good, Excellent")]
pub struct InvalidRating(pub String);

impl NewFeedback {
    /// Boundary check applied once before a submission reaches the store.
    ///
    /// Empty optional strings become `None`. A non-empty rating must match a
    /// canonical label exactly; no trimming or case folding is applied.
    pub fn validate(mut self) -> Result<Self, InvalidRating> {
        self.rating = non_empty(self.rating);
        self.suggestion = non_empty(self.suggestion);
        self.department = non_empty(self.department);
        self.year = non_empty(self.year);

        if let Some(rating) = self.rating.as_deref() {
            if !is_canonical_rating(rating) {
                return Err(InvalidRating(rating.to_string()));
            }
        }

        Ok(self)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.is_empty())
}
