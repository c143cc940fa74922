//! Record store layer
//!
//! Persistence is an abstract key-value record store: the rest of the server
//! only sees the [`RecordStore`] trait and never knows whether records live in
//! a flat JSON file or a SQLite database. The concrete backend is chosen once
//! at startup from configuration.

pub mod json_file;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{StoreBackend, StoreConfig},
    error::AppResult,
    models::StoredRecord,
};

/// Abstract store of loan records, keyed by an opaque string identifier.
///
/// `upsert` semantics on an unknown id are backend-defined: a strict backend
/// fails with `AppError::NotFound`, a lenient one silently creates the record.
/// Callers must not rely on either behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every persisted record with its store key. An empty store yields an
    /// empty vector, never an error.
    async fn list_all(&self) -> AppResult<Vec<(String, StoredRecord)>>;

    /// Persist a new record and return its freshly assigned identifier
    async fn insert(&self, record: &StoredRecord) -> AppResult<String>;

    /// Replace the full content of the record identified by `record_id`
    async fn upsert(&self, record_id: &str, record: &StoredRecord) -> AppResult<()>;
}

/// Open the configured backend
pub async fn open_store(config: &StoreConfig) -> AppResult<Arc<dyn RecordStore>> {
    match config.backend {
        StoreBackend::File => {
            let store = json_file::JsonFileStore::open(&config.path).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Sqlite => {
            let store = sqlite::SqliteStore::connect(&config.url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
    }
}
