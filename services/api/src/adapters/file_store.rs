//! services/api/src/adapters/file_store.rs
//!
//! Whole-file JSON implementation of the `Store` port. The entire dataset
//! lives in one document on disk; every mutation is a read-modify-write of
//! that document, serialized by an internal async mutex. Concurrent edits
//! of the same record across requests are last-write-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use reflections_core::domain::{ReflectionEntry, Subscriber};
use reflections_core::ports::{PortError, PortResult, Store};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A store adapter persisting everything into a single JSON file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`, writing an empty document first if the
    /// file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> PortResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };
        if fs::metadata(&store.path).await.is_err() {
            store.write(&DataFile::default()).await?;
        }
        Ok(store)
    }

    async fn read(&self) -> PortResult<DataFile> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PortError::Storage(format!("{} is not valid JSON: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DataFile::default()),
            Err(e) => Err(PortError::Storage(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write(&self, data: &DataFile) -> PortResult<()> {
        let json =
            serde_json::to_vec_pretty(data).map_err(|e| PortError::Storage(e.to_string()))?;
        fs::write(&self.path, json).await.map_err(|e| {
            PortError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

//=========================================================================================
// "Impure" On-Disk Record Structs
//=========================================================================================

/// The on-disk document: the whole dataset in one JSON object.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    reflections: Vec<ReflectionRecord>,
    #[serde(default)]
    subscribers: Vec<SubscriberRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReflectionRecord {
    id: String,
    title: String,
    body: String,
    date: String,
}

impl ReflectionRecord {
    fn from_domain(entry: ReflectionEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            body: entry.body,
            date: entry.date,
        }
    }

    fn to_domain(self) -> ReflectionEntry {
        ReflectionEntry {
            id: self.id,
            title: self.title,
            body: self.body,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubscriberRecord {
    email: String,
    date: String,
    #[serde(default)]
    selected: bool,
}

impl SubscriberRecord {
    fn from_domain(subscriber: Subscriber) -> Self {
        Self {
            email: subscriber.email,
            date: subscriber.date,
            selected: subscriber.selected,
        }
    }

    fn to_domain(self) -> Subscriber {
        Subscriber {
            email: self.email,
            date: self.date,
            selected: self.selected,
        }
    }
}

//=========================================================================================
// `Store` Trait Implementation
//=========================================================================================

#[async_trait]
impl Store for FileStore {
    async fn insert_reflection(&self, entry: ReflectionEntry) -> PortResult<ReflectionEntry> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        data.reflections
            .push(ReflectionRecord::from_domain(entry.clone()));
        self.write(&data).await?;
        Ok(entry)
    }

    async fn find_reflection(&self, id: &str) -> PortResult<Option<ReflectionEntry>> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(data
            .reflections
            .into_iter()
            .find(|r| r.id == id)
            .map(ReflectionRecord::to_domain))
    }

    async fn list_reflections(&self) -> PortResult<Vec<ReflectionEntry>> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(data
            .reflections
            .into_iter()
            .map(ReflectionRecord::to_domain)
            .collect())
    }

    async fn replace_reflection(
        &self,
        id: &str,
        entry: ReflectionEntry,
    ) -> PortResult<ReflectionEntry> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let slot = data
            .reflections
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Reflection {id} not found")))?;
        *slot = ReflectionRecord::from_domain(entry.clone());
        self.write(&data).await?;
        Ok(entry)
    }

    async fn delete_reflection(&self, id: &str) -> PortResult<bool> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let before = data.reflections.len();
        data.reflections.retain(|r| r.id != id);
        let removed = data.reflections.len() < before;
        if removed {
            self.write(&data).await?;
        }
        Ok(removed)
    }

    async fn insert_subscriber(&self, subscriber: Subscriber) -> PortResult<Subscriber> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        if data.subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(PortError::Duplicate(subscriber.email));
        }
        data.subscribers
            .push(SubscriberRecord::from_domain(subscriber.clone()));
        self.write(&data).await?;
        Ok(subscriber)
    }

    async fn find_subscriber(&self, email: &str) -> PortResult<Option<Subscriber>> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(data
            .subscribers
            .into_iter()
            .find(|s| s.email == email)
            .map(SubscriberRecord::to_domain))
    }

    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(data
            .subscribers
            .into_iter()
            .map(SubscriberRecord::to_domain)
            .collect())
    }

    async fn set_subscriber_selection(
        &self,
        emails: &[String],
        selected: bool,
    ) -> PortResult<u64> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let mut updated = 0;
        for subscriber in data.subscribers.iter_mut() {
            if emails.contains(&subscriber.email) {
                subscriber.selected = selected;
                updated += 1;
            }
        }
        if updated > 0 {
            self.write(&data).await?;
        }
        Ok(updated)
    }

    async fn delete_subscriber(&self, email: &str) -> PortResult<bool> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let before = data.subscribers.len();
        data.subscribers.retain(|s| s.email != email);
        let removed = data.subscribers.len() < before;
        if removed {
            self.write(&data).await?;
        }
        Ok(removed)
    }
}
