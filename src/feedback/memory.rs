use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    filter::FeedbackPredicate,
    history::newest_first,
    model::{FeedbackRecord, NewFeedback},
    store::{FeedbackStore, StoreResult},
};

/// Process-local backend for demos and tests. Contents vanish on shutdown.
#[derive(Default)]
pub struct MemoryFeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> StoreResult<FeedbackRecord> {
        let record = FeedbackRecord::from_new(feedback, Uuid::new_v4(), Utc::now());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find(&self, predicate: &FeedbackPredicate) -> StoreResult<Vec<FeedbackRecord>> {
        let guard = self.records.read().await;
        Ok(guard
            .iter()
            .filter(|record| predicate.matches(record))
            .cloned()
            .collect())
    }

    async fn find_by_submitter(&self, submitter: &str) -> StoreResult<Vec<FeedbackRecord>> {
        let mut records: Vec<_> = {
            let guard = self.records.read().await;
            guard
                .iter()
                .filter(|record| record.submitter == submitter)
                .cloned()
                .collect()
        };
        records.sort_by(newest_first);
        Ok(records)
    }
}
