//! Address space — the generic, dynamically-typed node graph.
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to each other by
//! [`NodeId`] handles. The graph knows nothing about devices or sensors; the
//! [`view`](crate::view) module layers typed shapes on top of it.
//!
//! A fresh address space contains the base types of namespace 0 and the
//! `Objects` folder. Everything else is added by whoever loads definitions.

mod node;

pub use node::{Node, NodeBody, NodeClass, QualifiedName, VariableAttributes};

use crate::error::{HistoryError, LadsError, NotFoundError, ValidationError, WriteError};
use crate::id::NodeId;
use crate::time::now;
use crate::variant::{DataValue, Variant};

/// URI of namespace 0.
pub const OPC_UA_NAMESPACE: &str = "http://opcfoundation.org/UA/";

/// A checked variable write, stamped with its server timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    /// The value to store, including its server timestamp.
    pub value: DataValue,
    /// Whether the variable is historizing and the value must be appended.
    pub historizing: bool,
}

/// Arena of nodes plus the namespace table.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    namespaces: Vec<String>,
    nodes: Vec<Node>,
    base_object_type: NodeId,
    folder_type: NodeId,
    base_variable_type: NodeId,
    base_data_variable_type: NodeId,
    property_type: NodeId,
    objects_folder: NodeId,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    /// Create an address space holding only namespace 0 base nodes.
    #[must_use]
    pub fn new() -> Self {
        let mut space = Self {
            namespaces: vec![OPC_UA_NAMESPACE.to_string()],
            nodes: Vec::new(),
            base_object_type: NodeId::from_index(0),
            folder_type: NodeId::from_index(0),
            base_variable_type: NodeId::from_index(0),
            base_data_variable_type: NodeId::from_index(0),
            property_type: NodeId::from_index(0),
            objects_folder: NodeId::from_index(0),
        };

        space.base_object_type =
            space.push_root("BaseObjectType", NodeBody::ObjectType { supertype: None }, None);
        space.folder_type = space.push_root(
            "FolderType",
            NodeBody::ObjectType {
                supertype: Some(space.base_object_type),
            },
            None,
        );
        space.base_variable_type = space.push_root(
            "BaseVariableType",
            NodeBody::VariableType { supertype: None },
            None,
        );
        space.base_data_variable_type = space.push_root(
            "BaseDataVariableType",
            NodeBody::VariableType {
                supertype: Some(space.base_variable_type),
            },
            None,
        );
        space.property_type = space.push_root(
            "PropertyType",
            NodeBody::VariableType {
                supertype: Some(space.base_variable_type),
            },
            None,
        );
        space.objects_folder =
            space.push_root("Objects", NodeBody::Object, Some(space.folder_type));
        space
    }

    fn push_root(
        &mut self,
        name: &str,
        body: NodeBody,
        type_definition: Option<NodeId>,
    ) -> NodeId {
        // Namespace 0 bootstrap: a handful of nodes, never near u32::MAX.
        let id = NodeId::from_index(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX - 1));
        self.nodes.push(Node {
            id,
            browse_name: QualifiedName::new(0, name),
            display_name: name.to_string(),
            parent: None,
            children: Vec::new(),
            type_definition,
            body,
        });
        id
    }

    // ── Namespaces ─────────────────────────────────────────────────

    /// Register a namespace URI, returning its index. Idempotent.
    pub fn register_namespace(&mut self, uri: &str) -> u16 {
        if let Some(index) = self.namespace_index(uri) {
            return index;
        }
        self.namespaces.push(uri.to_string());
        u16::try_from(self.namespaces.len() - 1).unwrap_or(u16::MAX)
    }

    /// Index of a registered namespace URI.
    #[must_use]
    pub fn namespace_index(&self, uri: &str) -> Option<u16> {
        self.namespaces
            .iter()
            .position(|ns| ns == uri)
            .and_then(|pos| u16::try_from(pos).ok())
    }

    /// The namespace table, in index order.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    // ── Well-known nodes ───────────────────────────────────────────

    #[must_use]
    pub fn objects_folder(&self) -> NodeId {
        self.objects_folder
    }

    #[must_use]
    pub fn base_object_type(&self) -> NodeId {
        self.base_object_type
    }

    #[must_use]
    pub fn folder_type(&self) -> NodeId {
        self.folder_type
    }

    #[must_use]
    pub fn base_data_variable_type(&self) -> NodeId {
        self.base_data_variable_type
    }

    #[must_use]
    pub fn property_type(&self) -> NodeId {
        self.property_type
    }

    // ── Construction ───────────────────────────────────────────────

    /// Add an object type deriving from `supertype`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, an unknown namespace or
    /// a `supertype` that is not an object type.
    pub fn add_object_type(
        &mut self,
        name: QualifiedName,
        supertype: NodeId,
    ) -> Result<NodeId, LadsError> {
        self.expect_class(supertype, NodeClass::ObjectType)?;
        self.insert(
            None,
            name,
            None,
            NodeBody::ObjectType {
                supertype: Some(supertype),
            },
        )
    }

    /// Add a variable type deriving from `supertype`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, an unknown namespace or
    /// a `supertype` that is not a variable type.
    pub fn add_variable_type(
        &mut self,
        name: QualifiedName,
        supertype: NodeId,
    ) -> Result<NodeId, LadsError> {
        self.expect_class(supertype, NodeClass::VariableType)?;
        self.insert(
            None,
            name,
            None,
            NodeBody::VariableType {
                supertype: Some(supertype),
            },
        )
    }

    /// Add an object below `parent`, typed by the object type `type_definition`.
    ///
    /// # Errors
    ///
    /// Returns [`LadsError::NotFound`] for an unknown parent, or a validation
    /// error for a duplicate browse name or a wrong type definition.
    pub fn add_object(
        &mut self,
        parent: NodeId,
        name: QualifiedName,
        type_definition: NodeId,
    ) -> Result<NodeId, LadsError> {
        self.expect_class(type_definition, NodeClass::ObjectType)?;
        self.insert(Some(parent), name, Some(type_definition), NodeBody::Object)
    }

    /// Add a variable below `parent`, typed by the variable type `type_definition`.
    ///
    /// # Errors
    ///
    /// Returns [`LadsError::NotFound`] for an unknown parent, or a validation
    /// error for a duplicate browse name or a wrong type definition.
    pub fn add_variable(
        &mut self,
        parent: NodeId,
        name: QualifiedName,
        type_definition: NodeId,
        attributes: VariableAttributes,
    ) -> Result<NodeId, LadsError> {
        self.expect_class(type_definition, NodeClass::VariableType)?;
        self.insert(
            Some(parent),
            name,
            Some(type_definition),
            NodeBody::Variable(attributes),
        )
    }

    /// Add a property (a `PropertyType` variable holding a constant).
    ///
    /// # Errors
    ///
    /// Same as [`add_variable`](Self::add_variable).
    pub fn add_property(
        &mut self,
        parent: NodeId,
        name: QualifiedName,
        attributes: VariableAttributes,
    ) -> Result<NodeId, LadsError> {
        let property_type = self.property_type;
        self.add_variable(parent, name, property_type, attributes)
    }

    fn expect_class(&self, id: NodeId, class: NodeClass) -> Result<(), LadsError> {
        let node = self.try_node(id)?;
        if node.node_class() == class {
            Ok(())
        } else {
            Err(ValidationError::NotATypeDefinition(id).into())
        }
    }

    fn try_node(&self, id: NodeId) -> Result<&Node, NotFoundError> {
        self.node(id).ok_or_else(|| NotFoundError {
            entity: "Node",
            id: id.to_string(),
        })
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        browse_name: QualifiedName,
        type_definition: Option<NodeId>,
        body: NodeBody,
    ) -> Result<NodeId, LadsError> {
        if browse_name.name.is_empty() {
            return Err(ValidationError::EmptyBrowseName.into());
        }
        if usize::from(browse_name.namespace_index) >= self.namespaces.len() {
            return Err(ValidationError::InvalidNamespace(browse_name.namespace_index).into());
        }
        if let Some(parent_id) = parent {
            let parent_node = self.try_node(parent_id)?;
            if parent_node.node_class().is_type() {
                return Err(ValidationError::InvalidParent(parent_id).into());
            }
            if self.child(parent_id, &browse_name.name).is_some() {
                return Err(ValidationError::DuplicateBrowseName {
                    parent: parent_id,
                    name: browse_name.name,
                }
                .into());
            }
        }

        let index = u32::try_from(self.nodes.len())
            .ok()
            .filter(|index| *index < u32::MAX)
            .ok_or(ValidationError::CapacityExceeded)?;
        let id = NodeId::from_index(index);
        self.nodes.push(Node {
            id,
            display_name: browse_name.name.clone(),
            browse_name,
            parent,
            children: Vec::new(),
            type_definition,
            body,
        });
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.node_mut(parent_id) {
                parent_node.children.push(id);
            }
        }
        Ok(id)
    }

    // ── Navigation ─────────────────────────────────────────────────

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index() as usize)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `id` in insertion order (empty for unknown nodes).
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.node(*child))
    }

    /// Child of `id` whose browse name is `name` (namespace ignored).
    #[must_use]
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .find(|child| child.browse_name.name == name)
            .map(|child| child.id)
    }

    /// Follow a chain of browse names starting at `start`.
    #[must_use]
    pub fn browse_path(&self, start: NodeId, path: &[&str]) -> Option<NodeId> {
        path.iter().try_fold(start, |current, name| self.child(current, name))
    }

    /// Browse name of the node's type definition.
    #[must_use]
    pub fn type_definition_name(&self, id: NodeId) -> Option<&str> {
        let type_id = self.node(id)?.type_definition?;
        self.node(type_id).map(|ty| ty.browse_name.name.as_str())
    }

    /// Find a type node by browse name.
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|node| node.node_class().is_type() && node.browse_name.name == name)
            .map(|node| node.id)
    }

    /// Whether `ty` is `base` or derives from it.
    #[must_use]
    pub fn is_subtype_of(&self, ty: NodeId, base: NodeId) -> bool {
        let mut current = Some(ty);
        while let Some(id) = current {
            if id == base {
                return true;
            }
            current = self.node(id).and_then(Node::supertype);
        }
        false
    }

    /// Current value of a variable.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&DataValue> {
        self.node(id)?.as_variable().map(|attrs| &attrs.value)
    }

    // ── Mutation of variables ──────────────────────────────────────

    /// Check `value` against the declared data type, value rank and fixed
    /// array length of variable `id`, and stamp it with the server time
    /// without storing it.
    ///
    /// An empty variant is accepted for any variable (used for bad-status
    /// values). The returned write carries the `historizing` flag so a host
    /// can append the value to history before making it visible with
    /// [`AddressSpace::apply_write`].
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] when the node is unknown, not a variable, or
    /// the value does not fit.
    pub fn prepare_write(&self, id: NodeId, mut value: DataValue) -> Result<Committed, WriteError> {
        let attrs = self.variable(id)?;
        check_fit(id, attrs, &value)?;
        value.server_timestamp = Some(now());
        Ok(Committed {
            value,
            historizing: attrs.historizing,
        })
    }

    /// Store a value returned by [`AddressSpace::prepare_write`], keeping its
    /// server timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] and leaves the variable untouched when the
    /// value no longer fits the variable.
    pub fn apply_write(&mut self, id: NodeId, write: &Committed) -> Result<(), WriteError> {
        let node = self.node_mut(id).ok_or(WriteError::UnknownNode(id))?;
        let attrs = node.as_variable_mut().ok_or(WriteError::NotAVariable(id))?;
        check_fit(id, attrs, &write.value)?;
        attrs.value = write.value.clone();
        Ok(())
    }

    /// Check, stamp and store `value` in variable `id` in one step.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] and leaves the variable untouched when the
    /// node is unknown, not a variable, or the value does not fit.
    pub fn write_value(&mut self, id: NodeId, value: DataValue) -> Result<Committed, WriteError> {
        let write = self.prepare_write(id, value)?;
        self.apply_write(id, &write)?;
        Ok(write)
    }

    fn variable(&self, id: NodeId) -> Result<&VariableAttributes, WriteError> {
        self.node(id)
            .ok_or(WriteError::UnknownNode(id))?
            .as_variable()
            .ok_or(WriteError::NotAVariable(id))
    }

    /// Set the `historizing` attribute of a variable.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NotAVariable`] for unknown or non-variable nodes.
    pub fn set_historizing(
        &mut self,
        id: NodeId,
        historizing: bool,
    ) -> Result<(), HistoryError> {
        let attrs = self
            .node_mut(id)
            .and_then(Node::as_variable_mut)
            .ok_or(HistoryError::NotAVariable(id))?;
        attrs.historizing = historizing;
        Ok(())
    }
}

fn check_fit(id: NodeId, attrs: &VariableAttributes, value: &DataValue) -> Result<(), WriteError> {
    let Some(actual) = value.value.data_type() else {
        return Ok(());
    };
    let actual_rank = value.value.value_rank();
    if actual != attrs.data_type || actual_rank != attrs.value_rank {
        return Err(WriteError::TypeMismatch {
            node: id,
            expected: attrs.data_type,
            expected_rank: attrs.value_rank,
            actual,
            actual_rank,
        });
    }
    if let (Some(expected), Variant::Array(array)) = (attrs.array_length, &value.value)
        && array.len() != expected
    {
        return Err(WriteError::ArrayLength {
            node: id,
            expected,
            actual: array.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{DataType, StatusCode};

    fn space_with_sensor() -> (AddressSpace, NodeId, NodeId) {
        let mut space = AddressSpace::new();
        let ns = space.register_namespace("urn:test");
        let device_type = space
            .add_object_type(
                QualifiedName::new(ns, "TestDeviceType"),
                space.base_object_type(),
            )
            .unwrap();
        let device = space
            .add_object(
                space.objects_folder(),
                QualifiedName::new(ns, "Device1"),
                device_type,
            )
            .unwrap();
        let dv_type = space.base_data_variable_type();
        let array = space
            .add_variable(
                device,
                QualifiedName::new(ns, "Wells"),
                dv_type,
                VariableAttributes::array(DataType::Double, Some(3)),
            )
            .unwrap();
        (space, device, array)
    }

    #[test]
    fn should_bootstrap_namespace_zero() {
        let space = AddressSpace::new();
        assert_eq!(space.namespaces(), [OPC_UA_NAMESPACE.to_string()]);
        assert_eq!(
            space.type_definition_name(space.objects_folder()),
            Some("FolderType")
        );
        assert!(space.is_subtype_of(space.folder_type(), space.base_object_type()));
    }

    #[test]
    fn should_register_namespace_once() {
        let mut space = AddressSpace::new();
        let a = space.register_namespace("urn:a");
        let again = space.register_namespace("urn:a");
        assert_eq!(a, 1);
        assert_eq!(again, 1);
    }

    #[test]
    fn should_find_children_by_browse_name() {
        let (space, device, array) = space_with_sensor();
        assert_eq!(space.child(device, "Wells"), Some(array));
        assert_eq!(
            space.browse_path(space.objects_folder(), &["Device1", "Wells"]),
            Some(array)
        );
        assert_eq!(space.child(device, "Missing"), None);
    }

    #[test]
    fn should_reject_duplicate_sibling_names() {
        let (mut space, device, _) = space_with_sensor();
        let ty = space.base_data_variable_type();
        let err = space
            .add_variable(
                device,
                QualifiedName::new(1, "Wells"),
                ty,
                VariableAttributes::scalar(DataType::Double),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LadsError::Validation(ValidationError::DuplicateBrowseName { .. })
        ));
    }

    #[test]
    fn should_reject_unknown_namespace() {
        let mut space = AddressSpace::new();
        let err = space
            .add_object_type(QualifiedName::new(9, "X"), space.base_object_type())
            .unwrap_err();
        assert!(matches!(
            err,
            LadsError::Validation(ValidationError::InvalidNamespace(9))
        ));
    }

    #[test]
    fn should_reject_object_typed_by_variable_type() {
        let mut space = AddressSpace::new();
        let ty = space.property_type();
        let err = space
            .add_object(space.objects_folder(), QualifiedName::new(0, "Bad"), ty)
            .unwrap_err();
        assert!(matches!(
            err,
            LadsError::Validation(ValidationError::NotATypeDefinition(_))
        ));
    }

    #[test]
    fn should_start_variables_waiting_for_initial_data() {
        let (space, _, array) = space_with_sensor();
        assert_eq!(
            space.value(array).unwrap().status,
            StatusCode::BadWaitingForInitialData
        );
    }

    #[test]
    fn should_write_matching_value_and_stamp_server_time() {
        let (mut space, _, array) = space_with_sensor();
        let value = Variant::from(vec![1.0, 2.0, 3.0]);
        let committed = space
            .write_value(array, DataValue::from_source(value.clone()))
            .unwrap();
        assert!(!committed.historizing);
        assert!(committed.value.server_timestamp.is_some());
        assert_eq!(space.value(array).unwrap().value, value);
    }

    #[test]
    fn should_reject_scalar_written_to_array() {
        let (mut space, _, array) = space_with_sensor();
        let err = space
            .write_value(array, DataValue::from_source(Variant::Double(1.0)))
            .unwrap_err();
        assert!(matches!(err, WriteError::TypeMismatch { .. }));
        assert!(space.value(array).unwrap().value.is_empty());
    }

    #[test]
    fn should_reject_array_of_wrong_length() {
        let (mut space, _, array) = space_with_sensor();
        let err = space
            .write_value(array, DataValue::from_source(Variant::from(vec![1.0])))
            .unwrap_err();
        assert_eq!(
            err,
            WriteError::ArrayLength {
                node: array,
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn should_reject_write_to_object() {
        let (mut space, device, _) = space_with_sensor();
        let err = space
            .write_value(device, DataValue::from_source(Variant::Double(1.0)))
            .unwrap_err();
        assert_eq!(err, WriteError::NotAVariable(device));
    }

    #[test]
    fn should_report_historizing_after_flag_is_set() {
        let (mut space, _, array) = space_with_sensor();
        space.set_historizing(array, true).unwrap();
        let committed = space
            .write_value(array, DataValue::from_source(Variant::from(vec![0.0; 3])))
            .unwrap();
        assert!(committed.historizing);
    }

    #[test]
    fn should_prepare_write_without_storing_it() {
        let (mut space, _, array) = space_with_sensor();
        space.set_historizing(array, true).unwrap();

        let write = space
            .prepare_write(array, DataValue::from_source(Variant::from(vec![4.0; 3])))
            .unwrap();

        assert!(write.historizing);
        assert!(space.value(array).unwrap().value.is_empty());
        space.apply_write(array, &write).unwrap();
        assert_eq!(space.value(array), Some(&write.value));
    }

    #[test]
    fn should_refuse_historizing_on_object() {
        let (mut space, device, _) = space_with_sensor();
        assert_eq!(
            space.set_historizing(device, true),
            Err(HistoryError::NotAVariable(device))
        );
    }
}
