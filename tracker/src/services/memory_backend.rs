//! In-memory persistence backend
//!
//! Used for ephemeral runs and as the test double for the file backend.
//! Clones share the same storage, so a second store opened over a clone sees
//! what the first one saved, the same way a restarted process sees the disk.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::TrackerResult;
use crate::traits::PersistenceBackend;

#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the store
    pub async fn insert(&self, key: &str, value: &str) {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
    }

    /// Raw value currently held under `key`
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn load(&self, key: &str) -> TrackerResult<Option<String>> {
        Ok(self.get(key).await)
    }

    async fn save(&self, key: &str, value: &str) -> TrackerResult<()> {
        self.insert(key, value).await;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_storage() {
        let backend = MemoryBackend::new();
        let other = backend.clone();

        backend.save("tracked_leads", "{}").await.unwrap();

        assert_eq!(other.load("tracked_leads").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(other.load("missing").await.unwrap(), None);
    }
}
