//! Per-agent weather lookup history
//!
//! The only stateful component of the service. Each agent gets an
//! append-only log of its lookups, keyed by the opaque agent identifier;
//! the key itself is the isolation boundary, so appends for one agent can
//! never touch another agent's log.

use crate::models::HistoryEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keyed collection of append-only lookup logs.
///
/// Cheap to clone; clones share the underlying map. Callers must never hold
/// the internal lock across external I/O — fetches complete before the store
/// is touched.
#[derive(Clone, Default)]
pub struct HistoryStore {
    histories: Arc<RwLock<HashMap<String, Vec<HistoryEntry>>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            histories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Append an entry to the agent's log, creating the log on first write.
    pub async fn append(&self, agent_id: &str, entry: HistoryEntry) {
        let mut histories = self.histories.write().await;
        histories
            .entry(agent_id.to_string())
            .or_insert_with(Vec::new)
            .push(entry);
    }

    /// Last `n` entries in original chronological order, or fewer if the log
    /// is shorter. An unknown agent yields an empty sequence, not an error.
    pub async fn recent(&self, agent_id: &str, n: usize) -> Vec<HistoryEntry> {
        let histories = self.histories.read().await;
        histories
            .get(agent_id)
            .map(|log| {
                let start = log.len().saturating_sub(n);
                log[start..].to_vec()
            })
            .unwrap_or_default()
    }

    /// Full log for the agent, empty if unknown.
    pub async fn all(&self, agent_id: &str) -> Vec<HistoryEntry> {
        let histories = self.histories.read().await;
        histories.get(agent_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(temperature: f64) -> HistoryEntry {
        HistoryEntry {
            timestamp_ms: 1_700_000_000_000,
            latitude: 52.52,
            longitude: 13.41,
            temperature,
            wind_speed: 9.1,
        }
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = HistoryStore::new();

        for i in 0..10 {
            store.append("a1", entry(i as f64)).await;
        }

        let all = store.all("a1").await;
        assert_eq!(all.len(), 10);
        for (i, e) in all.iter().enumerate() {
            assert_eq!(e.temperature, i as f64);
        }
    }

    #[tokio::test]
    async fn test_recent_returns_suffix_in_order() {
        let store = HistoryStore::new();

        for i in 0..8 {
            store.append("a1", entry(i as f64)).await;
        }

        let recent = store.recent("a1", 5).await;
        assert_eq!(recent.len(), 5);
        let temperatures: Vec<f64> = recent.iter().map(|e| e.temperature).collect();
        assert_eq!(temperatures, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[tokio::test]
    async fn test_recent_with_large_n_equals_all() {
        let store = HistoryStore::new();

        for i in 0..3 {
            store.append("a1", entry(i as f64)).await;
        }

        assert_eq!(store.recent("a1", 3).await, store.all("a1").await);
        assert_eq!(store.recent("a1", 100).await, store.all("a1").await);
    }

    #[tokio::test]
    async fn test_unknown_agent_is_empty_not_error() {
        let store = HistoryStore::new();
        assert!(store.all("nobody").await.is_empty());
        assert!(store.recent("nobody", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_key_isolation() {
        let store = HistoryStore::new();

        store.append("a1", entry(1.0)).await;
        let b_before = store.all("b2").await;

        store.append("a1", entry(2.0)).await;

        assert_eq!(store.all("b2").await, b_before);
        assert_eq!(store.all("a1").await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_appends_same_key() {
        let store = HistoryStore::new();

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append("a1", entry(i as f64)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.all("a1").await.len(), 20);
    }
}
