use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::{
    filter::{FeedbackFilters, build_predicate},
    history,
    model::{FeedbackRecord, InvalidRating, NewFeedback},
    stats::{RatingDistribution, compute_distribution},
    store::{FeedbackStore, StorageUnavailable, StoreResult},
    suggestions::SuggestionView,
};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error(transparent)]
    InvalidRating(#[from] InvalidRating),
    #[error(transparent)]
    Storage(#[from] StorageUnavailable),
}

/// Entry point for request handlers. Holds no state beyond the injected store.
#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn FeedbackStore>,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn FeedbackStore {
        self.store.as_ref()
    }

    pub async fn submit_feedback(
        &self,
        feedback: NewFeedback,
    ) -> Result<FeedbackRecord, FeedbackError> {
        let feedback = feedback.validate()?;
        let record = self.store.insert(feedback).await?;
        info!(
            id = %record.id,
            category = %record.category,
            submitter = %record.submitter,
            "feedback saved"
        );
        Ok(record)
    }

    pub async fn get_distribution(
        &self,
        category: &str,
        filters: &FeedbackFilters,
    ) -> StoreResult<RatingDistribution> {
        let predicate = build_predicate(category, filters);
        let ratings = self.store.find_ratings(&predicate).await?;
        Ok(compute_distribution(&ratings))
    }

    pub async fn get_suggestions(
        &self,
        category: &str,
        filters: &FeedbackFilters,
    ) -> StoreResult<Vec<SuggestionView>> {
        let predicate = build_predicate(category, filters);
        self.store.find_suggestions(&predicate).await
    }

    pub async fn get_history(&self, submitter: &str) -> StoreResult<Vec<FeedbackRecord>> {
        history::submitter_history(self.store(), submitter).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::feedback::{
        filter::FeedbackPredicate, memory::MemoryFeedbackStore, model::RATING_LABELS,
    };

    /// Store double whose every call fails as if the database were down.
    pub(crate) struct UnavailableStore;

    #[async_trait]
    impl FeedbackStore for UnavailableStore {
        async fn insert(&self, _feedback: NewFeedback) -> StoreResult<FeedbackRecord> {
            Err(StorageUnavailable::new("connection refused"))
        }

        async fn find(&self, _predicate: &FeedbackPredicate) -> StoreResult<Vec<FeedbackRecord>> {
            Err(StorageUnavailable::new("connection refused"))
        }

        async fn find_by_submitter(&self, _submitter: &str) -> StoreResult<Vec<FeedbackRecord>> {
            Err(StorageUnavailable::new("connection refused"))
        }
    }

    fn service() -> FeedbackService {
        FeedbackService::new(Arc::new(MemoryFeedbackStore::default()))
    }

    fn submission(category: &str, rating: &str) -> NewFeedback {
        NewFeedback {
            submitter: "alice".to_string(),
            category: category.to_string(),
            subject_name: "Data Structures".to_string(),
            faculty: "Dr. Rao".to_string(),
            rating: Some(rating.to_string()),
            ..NewFeedback::default()
        }
    }

    fn in_department(mut feedback: NewFeedback, department: &str) -> NewFeedback {
        feedback.department = Some(department.to_string());
        feedback
    }

    #[tokio::test]
    async fn distribution_for_cs101_scenario() {
        let service = service();
        for rating in ["Poor", "Excellent", "Excellent"] {
            service
                .submit_feedback(submission("CS101", rating))
                .await
                .unwrap();
        }
        service
            .submit_feedback(submission("CS102", "Fair"))
            .await
            .unwrap();

        let distribution = service
            .get_distribution("CS101", &FeedbackFilters::default())
            .await
            .unwrap();

        assert_eq!(distribution.total, 3);
        assert_eq!(distribution.percentage_of("Excellent"), Some(66.7));
        assert_eq!(distribution.percentage_of("Poor"), Some(33.3));
        assert_eq!(distribution.percentage_of("Fair"), Some(0.0));
    }

    #[tokio::test]
    async fn distribution_without_matches_is_all_zero() {
        let service = service();
        service
            .submit_feedback(submission("CS101", "Good"))
            .await
            .unwrap();

        let distribution = service
            .get_distribution("NOPE", &FeedbackFilters::default())
            .await
            .unwrap();

        assert_eq!(distribution.total, 0);
        let labels: Vec<_> = distribution.stats.iter().map(|share| share.label).collect();
        assert_eq!(labels, RATING_LABELS.to_vec());
        assert!(distribution.stats.iter().all(|share| share.percentage == 0.0));
    }

    #[tokio::test]
    async fn distribution_tolerates_legacy_ratings_already_stored() {
        let store = Arc::new(MemoryFeedbackStore::default());
        for rating in ["Good", "Good", "Unknown", "Good"] {
            store.insert(submission("CS101", rating)).await.unwrap();
        }
        let service = FeedbackService::new(store);

        let distribution = service
            .get_distribution("CS101", &FeedbackFilters::default())
            .await
            .unwrap();
        assert_eq!(distribution.total, 4);
        assert_eq!(distribution.percentage_of("Good"), Some(75.0));
    }

    #[tokio::test]
    async fn distribution_is_idempotent() {
        let service = service();
        for rating in ["Fair", "Very Good", "Good"] {
            service
                .submit_feedback(submission("CS101", rating))
                .await
                .unwrap();
        }

        let filters = FeedbackFilters::default();
        let first = service.get_distribution("CS101", &filters).await.unwrap();
        let second = service.get_distribution("CS101", &filters).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distribution_honours_department_and_year() {
        let service = service();
        let mut tagged = in_department(submission("CS101", "Poor"), "CSE");
        tagged.year = Some("2024".to_string());
        service.submit_feedback(tagged).await.unwrap();
        service
            .submit_feedback(in_department(submission("CS101", "Good"), "CSE"))
            .await
            .unwrap();
        service
            .submit_feedback(submission("CS101", "Excellent"))
            .await
            .unwrap();

        let filters = FeedbackFilters {
            department: Some("CSE".to_string()),
            year: Some("2024".to_string()),
        };
        let distribution = service.get_distribution("CS101", &filters).await.unwrap();
        assert_eq!(distribution.total, 1);
        assert_eq!(distribution.percentage_of("Poor"), Some(100.0));

        let empty_filters = FeedbackFilters {
            department: Some(String::new()),
            year: Some(String::new()),
        };
        let distribution = service
            .get_distribution("CS101", &empty_filters)
            .await
            .unwrap();
        assert_eq!(distribution.total, 3);
    }

    #[tokio::test]
    async fn suggestions_exclude_other_departments() {
        let service = service();
        let mut wanted = in_department(submission("CS101", "Good"), "CSE");
        wanted.suggestion = Some("More labs".to_string());
        service.submit_feedback(wanted).await.unwrap();
        service
            .submit_feedback(in_department(submission("CS101", "Fair"), "ECE"))
            .await
            .unwrap();
        service
            .submit_feedback(in_department(submission("CS102", "Fair"), "CSE"))
            .await
            .unwrap();

        let filters = FeedbackFilters {
            department: Some("CSE".to_string()),
            year: None,
        };
        let suggestions = service.get_suggestions("CS101", &filters).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggestion.as_deref(), Some("More labs"));
        assert_eq!(suggestions[0].department.as_deref(), Some("CSE"));
    }

    #[tokio::test]
    async fn history_is_reverse_chronological() {
        let service = service();
        let now = Utc::now();
        let mut ids = Vec::new();
        for offset in [3, 2, 1] {
            let mut feedback = submission("CS101", "Good");
            feedback.submitted_at = Some(now - Duration::hours(offset));
            ids.push(service.submit_feedback(feedback).await.unwrap().id);
        }

        let history = service.get_history("alice").await.unwrap();
        let listed: Vec<_> = history.iter().map(|record| record.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn submit_rejects_non_canonical_rating() {
        let service = service();
        let err = service
            .submit_feedback(submission("CS101", "Superb"))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedbackError::InvalidRating(_)));

        let history = service.get_history("alice").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn storage_failures_propagate_from_every_operation() {
        let service = FeedbackService::new(Arc::new(UnavailableStore));
        let filters = FeedbackFilters::default();

        assert!(matches!(
            service.submit_feedback(submission("CS101", "Good")).await,
            Err(FeedbackError::Storage(_))
        ));
        assert!(service.get_distribution("CS101", &filters).await.is_err());
        assert!(service.get_suggestions("CS101", &filters).await.is_err());
        assert!(service.get_history("alice").await.is_err());
    }
}
