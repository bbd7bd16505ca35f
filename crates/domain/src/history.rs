//! History — the retained time series of historizing variables.

use serde::{Deserialize, Serialize};

use crate::error::{LadsError, ValidationError};
use crate::id::{HistoryRecordId, NodeId};
use crate::time::Timestamp;
use crate::variant::DataValue;

/// One committed value of a historizing variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryRecordId,
    pub node_id: NodeId,
    pub value: DataValue,
    pub recorded_at: Timestamp,
}

impl HistoryRecord {
    /// Create a builder for constructing a [`HistoryRecord`].
    #[must_use]
    pub fn builder() -> HistoryRecordBuilder {
        HistoryRecordBuilder::default()
    }
}

/// Step-by-step builder for [`HistoryRecord`].
#[derive(Debug, Default)]
pub struct HistoryRecordBuilder {
    id: Option<HistoryRecordId>,
    node_id: Option<NodeId>,
    value: Option<DataValue>,
    recorded_at: Option<Timestamp>,
}

impl HistoryRecordBuilder {
    #[must_use]
    pub fn id(mut self, id: HistoryRecordId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn node_id(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    #[must_use]
    pub fn value(mut self, value: DataValue) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder and return a [`HistoryRecord`].
    ///
    /// `recorded_at` defaults to the value's server timestamp, then to now.
    ///
    /// # Errors
    ///
    /// Returns [`LadsError::Validation`] if `node_id` or `value` is missing.
    pub fn build(self) -> Result<HistoryRecord, LadsError> {
        let node_id = self.node_id.ok_or(ValidationError::MissingField("node_id"))?;
        let value = self.value.ok_or(ValidationError::MissingField("value"))?;
        let recorded_at = self
            .recorded_at
            .or(value.server_timestamp)
            .unwrap_or_else(crate::time::now);
        Ok(HistoryRecord {
            id: self.id.unwrap_or_default(),
            node_id,
            value,
            recorded_at,
        })
    }
}
