//! In-process information-model host backed by a shared [`AddressSpace`].

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use ladsim_domain::address_space::{AddressSpace, Committed};
use ladsim_domain::error::{HistoryError, LadsError};
use ladsim_domain::history::HistoryRecord;
use ladsim_domain::id::NodeId;
use ladsim_domain::variant::DataValue;

use crate::ports::{AddressSpaceHost, HistoryRepository};

/// Host that keeps the node graph in memory and appends history through `R`.
///
/// The graph lock is never held across an `.await`. A write to a historizing
/// variable is appended to history first and only stored once the append
/// succeeded, so a failed or cancelled append leaves the previous value live.
pub struct InProcessHost<R> {
    space: RwLock<AddressSpace>,
    history: R,
}

impl<R: HistoryRepository> InProcessHost<R> {
    /// Create a host serving `space`, recording history into `history`.
    pub fn new(space: AddressSpace, history: R) -> Self {
        Self {
            space: RwLock::new(space),
            history,
        }
    }

    /// The historian this host appends to.
    pub fn history(&self) -> &R {
        &self.history
    }

    fn prepare(&self, node: NodeId, value: DataValue) -> Result<Committed, LadsError> {
        let space = self.space.read().unwrap_or_else(PoisonError::into_inner);
        Ok(space.prepare_write(node, value)?)
    }

    fn apply(&self, node: NodeId, write: &Committed) -> Result<(), LadsError> {
        let mut space = self.space.write().unwrap_or_else(PoisonError::into_inner);
        Ok(space.apply_write(node, write)?)
    }

    fn set_historizing(&self, node: NodeId, historizing: bool) -> Result<(), LadsError> {
        let mut space = self.space.write().unwrap_or_else(PoisonError::into_inner);
        Ok(space.set_historizing(node, historizing)?)
    }
}

impl<R: HistoryRepository> AddressSpaceHost for InProcessHost<R> {
    fn browse<T>(&self, f: impl FnOnce(&AddressSpace) -> T) -> T {
        let space = self.space.read().unwrap_or_else(PoisonError::into_inner);
        f(&space)
    }

    fn write_value(
        &self,
        node: NodeId,
        value: DataValue,
    ) -> impl Future<Output = Result<DataValue, LadsError>> + Send {
        async move {
            let write = self.prepare(node, value)?;
            if write.historizing {
                let record = HistoryRecord::builder()
                    .node_id(node)
                    .value(write.value.clone())
                    .build()?;
                self.history.record(record).await?;
            }
            self.apply(node, &write)?;
            Ok(write.value)
        }
    }

    fn install_history(&self, node: NodeId) -> impl Future<Output = Result<(), LadsError>> + Send {
        async move {
            self.set_historizing(node, true)?;
            if let Err(err) = self.history.register(node).await {
                self.set_historizing(node, false)?;
                tracing::warn!(%node, error = %err, "historian rejected registration");
                return Err(match err {
                    LadsError::History(history) => history.into(),
                    other => HistoryError::RegistrationRejected {
                        node,
                        reason: other.to_string(),
                    }
                    .into(),
                });
            }
            tracing::debug!(%node, "history installed");
            Ok(())
        }
    }

    fn remove_history(&self, node: NodeId) -> Result<(), LadsError> {
        self.set_historizing(node, false)?;
        tracing::debug!(%node, "history removed");
        Ok(())
    }
}
