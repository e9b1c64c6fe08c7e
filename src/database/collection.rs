use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A write would give two documents the same value in a unique field.
    #[error("Duplicate {field} in {collection}")]
    Duplicate {
        collection: &'static str,
        field: String,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A persisted document living in one named collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Top-level fields no two documents in the collection may share.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Storage capability for one document type. Listing operations return
/// newest documents first.
#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    async fn insert(&self, document: T) -> Result<T, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError>;

    async fn find_all(&self) -> Result<Vec<T>, StoreError>;

    /// Documents whose top-level serialized `field` equals `value` as a string.
    async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<T>, StoreError>;

    /// Overwrite an existing document. Returns `None` if the id is unknown.
    async fn replace(&self, document: T) -> Result<Option<T>, StoreError>;

    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn delete_by_field(&self, field: &str, value: &str) -> Result<u64, StoreError>;

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn ping(&self) -> Result<(), StoreError>;
}
