//! History port — retained time series of historizing variables.

use std::future::Future;
use std::sync::Arc;

use ladsim_domain::error::LadsError;
use ladsim_domain::history::HistoryRecord;
use ladsim_domain::id::NodeId;
use ladsim_domain::time::Timestamp;

/// Repository for registering series and appending/querying [`HistoryRecord`]s.
pub trait HistoryRepository: Send + Sync {
    /// Open a series for `node`. Registering twice is a no-op.
    fn register(&self, node: NodeId) -> impl Future<Output = Result<(), LadsError>> + Send;

    /// Whether a series exists for `node`.
    fn is_registered(&self, node: NodeId) -> impl Future<Output = Result<bool, LadsError>> + Send;

    /// Append a record to its node's series.
    ///
    /// Fails with [`HistoryError::NotRegistered`](ladsim_domain::error::HistoryError::NotRegistered)
    /// when the series was never registered.
    fn record(
        &self,
        record: HistoryRecord,
    ) -> impl Future<Output = Result<HistoryRecord, LadsError>> + Send;

    /// Records of `node` with `from <= recorded_at < to`, oldest first, at most `limit`.
    fn find_in_range(
        &self,
        node: NodeId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryRecord>, LadsError>> + Send;

    /// Drop every record older than `before`, returning how many were removed.
    fn purge_before(
        &self,
        before: Timestamp,
    ) -> impl Future<Output = Result<u64, LadsError>> + Send;
}

impl<R: HistoryRepository> HistoryRepository for Arc<R> {
    fn register(&self, node: NodeId) -> impl Future<Output = Result<(), LadsError>> + Send {
        self.as_ref().register(node)
    }

    fn is_registered(&self, node: NodeId) -> impl Future<Output = Result<bool, LadsError>> + Send {
        self.as_ref().is_registered(node)
    }

    fn record(
        &self,
        record: HistoryRecord,
    ) -> impl Future<Output = Result<HistoryRecord, LadsError>> + Send {
        self.as_ref().record(record)
    }

    fn find_in_range(
        &self,
        node: NodeId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryRecord>, LadsError>> + Send {
        self.as_ref().find_in_range(node, from, to, limit)
    }

    fn purge_before(
        &self,
        before: Timestamp,
    ) -> impl Future<Output = Result<u64, LadsError>> + Send {
        self.as_ref().purge_before(before)
    }
}
