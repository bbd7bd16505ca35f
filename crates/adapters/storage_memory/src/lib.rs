//! # ladsim-adapter-storage-memory
//!
//! In-memory implementation of the `HistoryRepository` port.
//!
//! ## Responsibilities
//! - Keep one ordered buffer of [`HistoryRecord`]s per registered node
//! - Optionally cap each buffer, dropping the oldest records first
//!
//! ## Dependency rule
//! Depends on `ladsim-app` (for port traits) and `ladsim-domain` (for domain types).
//! Nothing survives a restart; use the `SQLite` adapter for durable history.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ladsim_app::ports::HistoryRepository;
use ladsim_domain::error::{HistoryError, LadsError};
use ladsim_domain::history::HistoryRecord;
use ladsim_domain::id::NodeId;
use ladsim_domain::time::Timestamp;

/// Historian holding every series in process memory.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    series: Mutex<HashMap<NodeId, VecDeque<HistoryRecord>>>,
    capacity: Option<usize>,
}

impl InMemoryHistoryRepository {
    /// Unbounded historian.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Historian keeping at most `capacity` records per series.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            series: Mutex::default(),
            capacity: Some(capacity),
        }
    }

    /// Number of records currently held for `node`.
    #[must_use]
    pub fn len(&self, node: NodeId) -> usize {
        self.lock().get(&node).map_or(0, VecDeque::len)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NodeId, VecDeque<HistoryRecord>>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistoryRepository for InMemoryHistoryRepository {
    async fn register(&self, node: NodeId) -> Result<(), LadsError> {
        self.lock().entry(node).or_default();
        tracing::debug!(%node, "series registered");
        Ok(())
    }

    async fn is_registered(&self, node: NodeId) -> Result<bool, LadsError> {
        Ok(self.lock().contains_key(&node))
    }

    async fn record(&self, record: HistoryRecord) -> Result<HistoryRecord, LadsError> {
        let mut series = self.lock();
        let buffer = series
            .get_mut(&record.node_id)
            .ok_or(HistoryError::NotRegistered(record.node_id))?;
        // Records arrive in commit order, so the buffer stays sorted.
        buffer.push_back(record.clone());
        if let Some(capacity) = self.capacity {
            while buffer.len() > capacity {
                buffer.pop_front();
            }
        }
        Ok(record)
    }

    async fn find_in_range(
        &self,
        node: NodeId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, LadsError> {
        let series = self.lock();
        let buffer = series.get(&node).ok_or(HistoryError::NotRegistered(node))?;
        Ok(buffer
            .iter()
            .filter(|r| from.is_none_or(|from| r.recorded_at >= from))
            .filter(|r| to.is_none_or(|to| r.recorded_at < to))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn purge_before(&self, before: Timestamp) -> Result<u64, LadsError> {
        let mut removed = 0;
        for buffer in self.lock().values_mut() {
            let len = buffer.len();
            buffer.retain(|r| r.recorded_at >= before);
            removed += len - buffer.len();
        }
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
