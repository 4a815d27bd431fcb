use serde::Serialize;
use sqlx::FromRow;

use super::model::FeedbackRecord;

/// Review projection of a record: rating, faculty, category and timestamp are
/// left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SuggestionView {
    #[serde(rename = "user")]
    pub submitter: String,
    #[serde(rename = "name")]
    pub subject_name: String,
    #[serde(rename = "suggestions")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl From<FeedbackRecord> for SuggestionView {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            submitter: record.submitter,
            subject_name: record.subject_name,
            suggestion: record.suggestion,
            department: record.department,
            year: record.year,
        }
    }
}

/// Preserves the order the store returned.
pub fn project_suggestions(records: Vec<FeedbackRecord>) -> Vec<SuggestionView> {
    records.into_iter().map(SuggestionView::from).collect()
}
