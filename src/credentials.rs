use std::collections::HashMap;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use rand_core::OsRng;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::feedback::{StorageUnavailable, StoreResult};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("identity already exists")]
    AlreadyExists,
    #[error("invalid credentials")]
    Invalid,
    #[error("failed to hash secret: {0}")]
    Hash(String),
    #[error(transparent)]
    Storage(#[from] StorageUnavailable),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns `false` when the identifier is already registered.
    async fn insert_credential(&self, identifier: &str, password_hash: &str) -> StoreResult<bool>;

    async fn fetch_password_hash(&self, identifier: &str) -> StoreResult<Option<String>>;
}

pub async fn register_credential(
    store: &dyn CredentialStore,
    identifier: &str,
    secret: &str,
) -> Result<(), CredentialError> {
    let password_hash =
        hash_password(secret).map_err(|err| CredentialError::Hash(err.to_string()))?;

    if store
        .insert_credential(identifier.trim(), &password_hash)
        .await?
    {
        Ok(())
    } else {
        Err(CredentialError::AlreadyExists)
    }
}

/// Returns the identity string that feedback records reference.
pub async fn verify_credential(
    store: &dyn CredentialStore,
    identifier: &str,
    secret: &str,
) -> Result<String, CredentialError> {
    let identifier = identifier.trim();
    let Some(password_hash) = store.fetch_password_hash(identifier).await? else {
        return Err(CredentialError::Invalid);
    };

    if verify_password(secret, &password_hash) {
        Ok(identifier.to_string())
    } else {
        Err(CredentialError::Invalid)
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert_credential(&self, identifier: &str, password_hash: &str) -> StoreResult<bool> {
        let result =
            sqlx::query("INSERT INTO users (id, identifier, password_hash) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4())
                .bind(identifier)
                .bind(password_hash)
                .execute(&self.pool)
                .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn fetch_password_hash(&self, identifier: &str) -> StoreResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM users WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hash)
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    hashes: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert_credential(&self, identifier: &str, password_hash: &str) -> StoreResult<bool> {
        let mut guard = self.hashes.write().await;
        if guard.contains_key(identifier) {
            return Ok(false);
        }
        guard.insert(identifier.to_string(), password_hash.to_string());
        Ok(true)
    }

    async fn fetch_password_hash(&self, identifier: &str) -> StoreResult<Option<String>> {
        Ok(self.hashes.read().await.get(identifier).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies_only_with_original_secret() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn register_then_verify_returns_identity() {
        let store = MemoryCredentialStore::default();
        register_credential(&store, " alice@example.edu ", "s3cret")
            .await
            .unwrap();

        let identity = verify_credential(&store, "alice@example.edu", "s3cret")
            .await
            .unwrap();
        assert_eq!(identity, "alice@example.edu");
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let store = MemoryCredentialStore::default();
        register_credential(&store, "alice@example.edu", "first")
            .await
            .unwrap();

        let err = register_credential(&store, "alice@example.edu", "second")
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::AlreadyExists));

        verify_credential(&store, "alice@example.edu", "first")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_secret_or_unknown_identity_is_invalid() {
        let store = MemoryCredentialStore::default();
        register_credential(&store, "alice@example.edu", "s3cret")
            .await
            .unwrap();

        assert!(matches!(
            verify_credential(&store, "alice@example.edu", "wrong").await,
            Err(CredentialError::Invalid)
        ));
        assert!(matches!(
            verify_credential(&store, "bob@example.edu", "s3cret").await,
            Err(CredentialError::Invalid)
        ));
    }
}
