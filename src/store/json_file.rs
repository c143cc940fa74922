//! Flat-file JSON record store
//!
//! Records live in a single JSON object mapping record id to record content.
//! Every operation reads the file fresh and rewrites it through a temp-file
//! rename, so a successful return means the write hit disk. This backend is
//! strict: `upsert` on an unknown id fails with `NotFound`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::StoredRecord,
};

use super::RecordStore;

pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating parent directories. A missing file is
    /// an empty store.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };
        // Fail now rather than on first request if the file is unreadable
        store.read_map().await?;
        Ok(store)
    }

    async fn read_map(&self) -> AppResult<BTreeMap<String, StoredRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &BTreeMap<String, StoredRecord>) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list_all(&self) -> AppResult<Vec<(String, StoredRecord)>> {
        let map = self.read_map().await?;
        Ok(map.into_iter().collect())
    }

    async fn insert(&self, record: &StoredRecord) -> AppResult<String> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        let id = Uuid::new_v4().to_string();
        map.insert(id.clone(), record.clone());
        self.write_map(&map).await?;
        Ok(id)
    }

    async fn upsert(&self, record_id: &str, record: &StoredRecord) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        if !map.contains_key(record_id) {
            return Err(AppError::NotFound(format!(
                "No record with id {} in store",
                record_id
            )));
        }
        map.insert(record_id.to_string(), record.clone());
        self.write_map(&map).await?;
        Ok(())
    }
}
