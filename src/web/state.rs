use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::{
    config::{AppConfig, StorageBackend},
    credentials::{CredentialStore, MemoryCredentialStore, PgCredentialStore},
    feedback::{FeedbackService, FeedbackStore, MemoryFeedbackStore, PgFeedbackStore},
};

#[derive(Clone)]
pub struct AppState {
    feedback: FeedbackService,
    credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        match &config.storage {
            StorageBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let pool = PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(database_url)
                    .await
                    .context("failed to connect to Postgres")?;

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("failed to run database migrations")?;
                info!(max_connections, "connected to Postgres");

                Ok(Self::from_parts(
                    Arc::new(PgFeedbackStore::new(pool.clone())),
                    Arc::new(PgCredentialStore::new(pool)),
                ))
            }
            StorageBackend::Memory => Ok(Self::in_memory()),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryFeedbackStore::default()),
            Arc::new(MemoryCredentialStore::default()),
        )
    }

    pub fn from_parts(
        feedback_store: Arc<dyn FeedbackStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            feedback: FeedbackService::new(feedback_store),
            credentials,
        }
    }

    pub fn feedback(&self) -> &FeedbackService {
        &self.feedback
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    /// Releases the storage backend. Call once, after the server has drained.
    pub async fn close(&self) {
        self.feedback.store().close().await;
    }
}
