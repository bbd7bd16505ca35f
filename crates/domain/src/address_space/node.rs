//! Nodes stored in the address space arena.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::variant::{DataType, DataValue, ValueRank};

/// Browse name: a namespace index plus a name unique among siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name)
    }
}

/// Class of a node, derived from its [`NodeBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    ObjectType,
    VariableType,
}

impl NodeClass {
    /// Whether nodes of this class are type definitions.
    #[must_use]
    pub fn is_type(self) -> bool {
        matches!(self, Self::ObjectType | Self::VariableType)
    }
}

/// Attributes carried by every variable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAttributes {
    pub data_type: DataType,
    pub value_rank: ValueRank,
    /// Fixed length for one-dimensional variables, `None` when unbounded.
    pub array_length: Option<usize>,
    pub value: DataValue,
    pub historizing: bool,
}

impl VariableAttributes {
    /// A scalar variable with no value yet.
    #[must_use]
    pub fn scalar(data_type: DataType) -> Self {
        Self {
            data_type,
            value_rank: ValueRank::Scalar,
            array_length: None,
            value: DataValue::waiting_for_initial_data(),
            historizing: false,
        }
    }

    /// A one-dimensional variable, optionally of fixed length.
    #[must_use]
    pub fn array(data_type: DataType, array_length: Option<usize>) -> Self {
        Self {
            data_type,
            value_rank: ValueRank::OneDimension,
            array_length,
            value: DataValue::waiting_for_initial_data(),
            historizing: false,
        }
    }

    /// Replace the initial value.
    #[must_use]
    pub fn with_value(mut self, value: DataValue) -> Self {
        self.value = value;
        self
    }
}

/// Class-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Object,
    Variable(VariableAttributes),
    ObjectType { supertype: Option<NodeId> },
    VariableType { supertype: Option<NodeId> },
}

/// One entry of the address space arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Type definition of an object or variable; `None` for type nodes.
    pub type_definition: Option<NodeId>,
    pub body: NodeBody,
}

impl Node {
    #[must_use]
    pub fn node_class(&self) -> NodeClass {
        match self.body {
            NodeBody::Object => NodeClass::Object,
            NodeBody::Variable(_) => NodeClass::Variable,
            NodeBody::ObjectType { .. } => NodeClass::ObjectType,
            NodeBody::VariableType { .. } => NodeClass::VariableType,
        }
    }

    /// Variable attributes, when this node is a variable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&VariableAttributes> {
        match &self.body {
            NodeBody::Variable(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub(crate) fn as_variable_mut(&mut self) -> Option<&mut VariableAttributes> {
        match &mut self.body {
            NodeBody::Variable(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Supertype of a type node.
    #[must_use]
    pub fn supertype(&self) -> Option<NodeId> {
        match self.body {
            NodeBody::ObjectType { supertype } | NodeBody::VariableType { supertype } => supertype,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_qualified_name_with_namespace() {
        assert_eq!(QualifiedName::new(3, "SensorValue").to_string(), "3:SensorValue");
    }

    #[test]
    fn should_derive_class_from_body() {
        let node = Node {
            id: NodeId::from_index(0),
            browse_name: QualifiedName::new(0, "X"),
            display_name: "X".to_string(),
            parent: None,
            children: vec![],
            type_definition: None,
            body: NodeBody::Variable(VariableAttributes::scalar(DataType::Double)),
        };
        assert_eq!(node.node_class(), NodeClass::Variable);
        assert!(node.as_variable().is_some());
        assert!(!node.node_class().is_type());
    }

    #[test]
    fn should_build_fixed_length_array_attributes() {
        let attrs = VariableAttributes::array(DataType::Double, Some(96));
        assert_eq!(attrs.value_rank, ValueRank::OneDimension);
        assert_eq!(attrs.array_length, Some(96));
        assert!(!attrs.historizing);
    }
}
