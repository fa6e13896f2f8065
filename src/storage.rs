use crate::errors::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error};

/// The three independent records kept by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StoreKey {
    Activities,
    Goals,
    User,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Activities => "fitness_activities",
            StoreKey::Goals => "fitness_goals",
            StoreKey::User => "fitness_user",
        }
    }

    fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

/// Key-value persistence for the tracker's records. Every save rewrites the
/// whole record.
#[derive(Debug, Clone)]
pub struct Store {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    Directory(PathBuf),
    Memory(Arc<Mutex<BTreeMap<StoreKey, Vec<u8>>>>),
}

impl Store {
    /// Opens a directory-backed store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        Ok(Self {
            backend: Backend::Directory(dir),
        })
    }

    /// A store that lives only as long as its clones do.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::default()),
        }
    }

    /// Returns `None` when the record is absent or cannot be decoded.
    pub async fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let bytes = self.read(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                error!("failed to parse {}: {err}", key.as_str());
                None
            }
        }
    }

    pub async fn save<T: Serialize + ?Sized>(
        &self,
        key: StoreKey,
        value: &T,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode {
            key: key.as_str(),
            source,
        })?;

        match &self.backend {
            Backend::Directory(dir) => {
                fs::write(dir.join(key.file_name()), payload)
                    .await
                    .map_err(|source| StoreError::Write {
                        key: key.as_str(),
                        source,
                    })?;
            }
            Backend::Memory(records) => {
                records.lock().await.insert(key, payload);
            }
        }

        debug!(key = key.as_str(), "saved record");
        Ok(())
    }

    async fn read(&self, key: StoreKey) -> Option<Vec<u8>> {
        match &self.backend {
            Backend::Directory(dir) => read_file(&dir.join(key.file_name())).await,
            Backend::Memory(records) => records.lock().await.get(&key).cloned(),
        }
    }
}

async fn read_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path).await {
        Ok(bytes) => Some(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            None
        }
    }
}
