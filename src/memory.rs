//! PLC memory back-ends.
//!
//! The controller treats memory as an external collaborator behind the
//! [`PlcMemory`] trait and serializes every call itself; back-ends need
//! interior mutability but no ordering guarantees of their own.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, instrument};

/// Key-value memory contract used by the controller.
#[async_trait]
pub trait PlcMemory: Send + Sync + std::fmt::Debug {
    /// Fetch the entries for `keys`; keys with no entry are simply absent
    /// from the result.
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>>;

    /// Insert or overwrite every entry of `values`.
    async fn write(&self, values: HashMap<String, Value>) -> Result<()>;
}

/// Operation counters for an in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    pub entries: usize,
    pub reads: u64,
    pub writes: u64,
}

/// HashMap-backed memory, the default back-end.
#[derive(Debug, Default)]
pub struct InMemoryPlcMemory {
    entries: RwLock<HashMap<String, Value>>,
    stats: RwLock<MemoryStats>,
}

impl InMemoryPlcMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with `entries`.
    pub fn with_entries(entries: HashMap<String, Value>) -> Self {
        let stats = MemoryStats {
            entries: entries.len(),
            ..MemoryStats::default()
        };
        Self {
            entries: RwLock::new(entries),
            stats: RwLock::new(stats),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the full contents, for inspection and testing.
    pub fn snapshot(&self) -> Result<HashMap<String, Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire memory read lock: {}", e))?;

        Ok(entries.clone())
    }

    pub fn stats(&self) -> Result<MemoryStats> {
        let stats = self
            .stats
            .read()
            .map_err(|e| anyhow!("Failed to acquire stats read lock: {}", e))?;

        Ok(stats.clone())
    }
}

#[async_trait]
impl PlcMemory for InMemoryPlcMemory {
    #[instrument(skip(self, keys), fields(requested = keys.len()))]
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        let found: HashMap<String, Value> = {
            let entries = self
                .entries
                .read()
                .map_err(|e| anyhow!("Failed to acquire memory read lock: {}", e))?;

            keys.iter()
                .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
                .collect()
        };

        {
            let mut stats = self
                .stats
                .write()
                .map_err(|e| anyhow!("Failed to acquire stats write lock: {}", e))?;

            stats.reads += 1;
        }

        debug!(found = found.len(), "memory read");
        Ok(found)
    }

    #[instrument(skip(self, values), fields(count = values.len()))]
    async fn write(&self, values: HashMap<String, Value>) -> Result<()> {
        let total = {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| anyhow!("Failed to acquire memory write lock: {}", e))?;

            entries.extend(values);
            entries.len()
        };

        {
            let mut stats = self
                .stats
                .write()
                .map_err(|e| anyhow!("Failed to acquire stats write lock: {}", e))?;

            stats.writes += 1;
            stats.entries = total;
        }

        debug!(entries = total, "memory write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_read_returns_only_present_keys() {
        let memory = InMemoryPlcMemory::with_entries(mapping(&[("a", json!(1))]));

        let keys = vec!["a".to_string(), "missing".to_string()];
        let found = memory.read(&keys).await.unwrap();

        assert_eq!(found, mapping(&[("a", json!(1))]));
    }

    #[tokio::test]
    async fn test_write_inserts_and_overwrites() {
        let memory = InMemoryPlcMemory::new();

        memory.write(mapping(&[("a", json!(1))])).await.unwrap();
        memory
            .write(mapping(&[("a", json!(2)), ("b", json!(3))]))
            .await
            .unwrap();

        let snapshot = memory.snapshot().unwrap();
        assert_eq!(snapshot, mapping(&[("a", json!(2)), ("b", json!(3))]));
        assert_eq!(memory.len(), 2);
    }

    #[tokio::test]
    async fn test_stats_count_operations() {
        let memory = InMemoryPlcMemory::new();

        memory.write(mapping(&[("a", json!(1))])).await.unwrap();
        let keys = vec!["a".to_string()];
        memory.read(&keys).await.unwrap();
        memory.read(&keys).await.unwrap();

        let stats = memory.stats().unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.writes, 1);
    }

    #[tokio::test]
    async fn test_seeded_store_reports_entries() {
        let memory = InMemoryPlcMemory::with_entries(mapping(&[("a", json!(1)), ("b", json!(2))]));

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.stats().unwrap().entries, 2);
    }
}
