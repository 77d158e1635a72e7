//! Embedded key-value storage for single-machine state.

use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A thread-safe handle to the embedded keyspace. Values are JSON blobs
/// addressed by (partition, key).
#[derive(Clone)]
pub struct LocalStore {
    keyspace: Arc<Keyspace>,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        debug!(path = %path.display(), "Opened local keyspace");
        Ok(LocalStore {
            keyspace: Arc::new(keyspace),
        })
    }

    fn partition(&self, name: &str) -> Result<PartitionHandle> {
        self.keyspace
            .open_partition(name, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open partition: {name}"))
    }

    pub fn get_json<T: DeserializeOwned>(&self, partition: &str, key: &str) -> Result<Option<T>> {
        let partition = self.partition(partition)?;
        match partition.get(key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt stored value for key: {key}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn put_json<T: Serialize>(&self, partition: &str, key: &str, value: &T) -> Result<()> {
        let partition = self.partition(partition)?;
        partition.insert(key, serde_json::to_vec(value)?)?;
        Ok(())
    }

    pub fn delete(&self, partition: &str, key: &str) -> Result<()> {
        let partition = self.partition(partition)?;
        partition.remove(key)?;
        Ok(())
    }

    /// All (key, value) pairs whose key starts with `prefix`, in key order.
    pub fn list_prefix(
        &self,
        partition: &str,
        prefix: &str,
    ) -> Result<Vec<(String, serde_json::Value)>> {
        let partition = self.partition(partition)?;
        let mut entries = Vec::new();
        for pair in partition.prefix(prefix) {
            let (key, bytes) = pair?;
            let key = String::from_utf8_lossy(&key).to_string();
            let value = serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupt stored value for key: {key}"))?;
            entries.push((key, value));
        }
        Ok(entries)
    }
}
