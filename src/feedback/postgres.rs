use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use super::{
    filter::FeedbackPredicate,
    model::{FeedbackRecord, NewFeedback},
    store::{FeedbackStore, StoreResult},
    suggestions::SuggestionView,
};

const RECORD_COLUMNS: &str = "id, submitter, category, subject_name, faculty, rating, suggestion, department, year, submitted_at";
const SUGGESTION_COLUMNS: &str = "submitter, subject_name, suggestion, department, year";
const SUBMITTER_HISTORY_SQL: &str = "SELECT id, submitter, category, subject_name, faculty, rating, suggestion, department, year, submitted_at FROM feedback
             WHERE submitter = $1
             ORDER BY submitted_at DESC, id DESC";

#[derive(Clone)]
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_matching<'a>(columns: &str, predicate: &FeedbackPredicate) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {columns} FROM feedback WHERE "));
    for (idx, (column, value)) in predicate.fields().into_iter().enumerate() {
        if idx > 0 {
            builder.push(" AND ");
        }
        builder.push(column).push(" = ").push_bind(value.to_string());
    }
    builder
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn insert(&self, feedback: NewFeedback) -> StoreResult<FeedbackRecord> {
        let record = sqlx::query_as::<_, FeedbackRecord>(&format!(
            "INSERT INTO feedback (id, submitter, category, subject_name, faculty, rating, suggestion, department, year, submitted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, NOW()))
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&feedback.submitter)
        .bind(&feedback.category)
        .bind(&feedback.subject_name)
        .bind(&feedback.faculty)
        .bind(&feedback.rating)
        .bind(&feedback.suggestion)
        .bind(&feedback.department)
        .bind(&feedback.year)
        .bind(feedback.submitted_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find(&self, predicate: &FeedbackPredicate) -> StoreResult<Vec<FeedbackRecord>> {
        let records = select_matching(RECORD_COLUMNS, predicate)
            .build_query_as::<FeedbackRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_submitter(&self, submitter: &str) -> StoreResult<Vec<FeedbackRecord>> {
        let records = sqlx::query_as::<_, FeedbackRecord>(SUBMITTER_HISTORY_SQL)
            .bind(submitter)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_suggestions(
        &self,
        predicate: &FeedbackPredicate,
    ) -> StoreResult<Vec<SuggestionView>> {
        let views = select_matching(SUGGESTION_COLUMNS, predicate)
            .build_query_as::<SuggestionView>()
            .fetch_all(&self.pool)
            .await?;
        Ok(views)
    }

    async fn find_ratings(&self, predicate: &FeedbackPredicate) -> StoreResult<Vec<Option<String>>> {
        let rows = select_matching("rating", predicate)
            .build_query_as::<(Option<String>,)>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(rating,)| rating).collect())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("postgres pool closed");
    }
}
