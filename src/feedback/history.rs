use std::cmp::Ordering;

use super::{
    model::FeedbackRecord,
    store::{FeedbackStore, StoreResult},
};

/// Newest `submitted_at` first; equal timestamps fall back to descending id so
/// every backend yields the same order.
pub fn newest_first(a: &FeedbackRecord, b: &FeedbackRecord) -> Ordering {
    b.submitted_at
        .cmp(&a.submitted_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Past submissions of one identity. The identity is not checked against the
/// credential store, so an unknown submitter simply has no history.
pub async fn submitter_history(
    store: &dyn FeedbackStore,
    submitter: &str,
) -> StoreResult<Vec<FeedbackRecord>> {
    store.find_by_submitter(submitter).await
}
