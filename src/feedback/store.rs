use async_trait::async_trait;
use thiserror::Error;

use super::{
    filter::FeedbackPredicate,
    model::{FeedbackRecord, NewFeedback},
    suggestions::{SuggestionView, project_suggestions},
};

/// The only error kind the feedback core produces. Never retried here.
#[derive(Debug, Error)]
#[error("feedback storage unavailable: {message}")]
pub struct StorageUnavailable {
    message: String,
}

impl StorageUnavailable {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StorageUnavailable {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StorageUnavailable>;

/// Durable collection of feedback records.
///
/// Backends implement insert, filtered find and submitter lookup; the reduced
/// projections default to projecting the full records and may be overridden
/// to fetch fewer columns.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persists a record, stamping `submitted_at` with the insertion time when
    /// the caller did not supply one.
    async fn insert(&self, feedback: NewFeedback) -> StoreResult<FeedbackRecord>;

    /// Records matching `predicate`. Order is unspecified.
    async fn find(&self, predicate: &FeedbackPredicate) -> StoreResult<Vec<FeedbackRecord>>;

    /// Records of one submitter, newest `submitted_at` first.
    async fn find_by_submitter(&self, submitter: &str) -> StoreResult<Vec<FeedbackRecord>>;

    async fn find_suggestions(
        &self,
        predicate: &FeedbackPredicate,
    ) -> StoreResult<Vec<SuggestionView>> {
        Ok(project_suggestions(self.find(predicate).await?))
    }

    async fn find_ratings(&self, predicate: &FeedbackPredicate) -> StoreResult<Vec<Option<String>>> {
        let records = self.find(predicate).await?;
        Ok(records.into_iter().map(|record| record.rating).collect())
    }

    async fn close(&self) {}
}
