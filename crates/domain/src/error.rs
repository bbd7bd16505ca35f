//! Common error types used across the workspace.
//!
//! Each failure family has its own typed enum; [`LadsError`] aggregates them
//! through `#[from]` conversions so `?` works at every layer.

use std::time::Duration;

use crate::id::NodeId;
use crate::variant::{DataType, ValueRank};

/// Top-level error for every ladsim operation.
#[derive(Debug, thiserror::Error)]
pub enum LadsError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An instance reported as matching a type does not have the expected shape.
    #[error("projection failed")]
    Projection(#[from] ProjectionError),

    #[error("history error")]
    History(#[from] HistoryError),

    #[error("value synthesis failed")]
    Synthesis(#[from] SynthesisError),

    #[error("value write rejected")]
    Write(#[from] WriteError),

    /// A device tick did not complete within its time budget.
    #[error("tick timed out after {after:?}")]
    TickTimedOut { after: Duration },

    /// Setup finished without a single usable device of the target type.
    #[error("no usable device of type {type_name}")]
    NoDevices { type_name: String },

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations on domain values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("browse name must not be empty")]
    EmptyBrowseName,

    #[error("node {parent} already has a child named {name}")]
    DuplicateBrowseName { parent: NodeId, name: String },

    #[error("node {0} cannot own children of this class")]
    InvalidParent(NodeId),

    #[error("node {0} is not a type definition")]
    NotATypeDefinition(NodeId),

    #[error("invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid namespace index {0}")]
    InvalidNamespace(u16),

    #[error("address space is full")]
    CapacityExceeded,

    #[error("missing required field {0}")]
    MissingField(&'static str),
}

/// A looked-up resource does not exist.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A node does not conform to the shape it is being projected into.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {node} has no child {child}")]
    MissingChild { node: NodeId, child: &'static str },

    #[error("node {node} is not {expected}")]
    WrongNodeClass {
        node: NodeId,
        expected: &'static str,
    },

    #[error("node {node} has type {actual}, expected {expected}")]
    WrongTypeDefinition {
        node: NodeId,
        expected: &'static str,
        actual: String,
    },

    #[error("variable {node} is {actual:?}/{actual_rank:?}, expected {expected:?}/{expected_rank:?}")]
    WrongDataType {
        node: NodeId,
        expected: DataType,
        expected_rank: ValueRank,
        actual: DataType,
        actual_rank: ValueRank,
    },
    #[error("variable {node} holds {actual:?} elements, expected {expected}")]
    WrongArrayLength {
        node: NodeId,
        expected: usize,
        actual: Option<usize>,
    },
}

/// Historian registration and storage failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryError {
    /// History was already enabled for this slot; it must be configured once.
    #[error("history already configured for node {0}")]
    AlreadyConfigured(NodeId),

    #[error("historian rejected registration of node {node}: {reason}")]
    RegistrationRejected { node: NodeId, reason: String },

    #[error("node {0} is not registered for history")]
    NotRegistered(NodeId),

    #[error("node {0} is not a variable")]
    NotAVariable(NodeId),
}

/// Failures of a value-generation model.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SynthesisError {
    #[error("generator produced {actual} wells, expected {expected}")]
    WellCount { expected: usize, actual: usize },

    #[error("generator produced a non-finite value")]
    NonFinite,

    #[error("generator failed: {0}")]
    Generator(String),
}

/// A write to a variable was refused by the node graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is not a variable")]
    NotAVariable(NodeId),

    #[error("variable {node} expects {expected:?}/{expected_rank:?}, got {actual:?}/{actual_rank:?}")]
    TypeMismatch {
        node: NodeId,
        expected: DataType,
        expected_rank: ValueRank,
        actual: DataType,
        actual_rank: ValueRank,
    },

    #[error("variable {node} expects {expected} elements, got {actual}")]
    ArrayLength {
        node: NodeId,
        expected: usize,
        actual: usize,
    },

    #[error("host rejected write to node {node}: {reason}")]
    Rejected { node: NodeId, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_projection_error_into_lads_error() {
        let err: LadsError = ProjectionError::UnknownNode(NodeId::from_index(3)).into();
        assert!(matches!(err, LadsError::Projection(_)));
    }

    #[test]
    fn should_describe_missing_child() {
        let err = ProjectionError::MissingChild {
            node: NodeId::from_index(7),
            child: "FunctionSet",
        };
        assert_eq!(err.to_string(), "node i=7 has no child FunctionSet");
    }

    #[test]
    fn should_describe_not_found() {
        let err = NotFoundError {
            entity: "Node",
            id: "i=12".to_string(),
        };
        assert_eq!(err.to_string(), "Node i=12 not found");
    }
}
