//! Typed views — statically-known shapes projected onto the generic node graph.
//!
//! A view is a plain struct of [`NodeId`] handles that were checked once,
//! when the view was projected, against the shape it claims. Navigating a
//! projected view never fails and never touches the graph; only reading or
//! writing the value behind a slot does.
//!
//! Two techniques compose the shapes:
//!
//! - **Capability narrowing** — every shape lists the children it requires
//!   by browse name and projects each of them into its own shape. Typed
//!   leaves ([`Property`], [`AnalogUnitRange`]) check the variable's data
//!   type and value rank against their Rust type parameter.
//! - **Field override** — generic shapes take the field a specialization
//!   needs to narrow as a type parameter with a generic default
//!   (`Device<U = FunctionalUnitSet>`, `FunctionalUnit<F = FunctionSet>`).
//!   The absorbance reader substitutes its own set types instead of
//!   inheriting the map-shaped generic ones.

mod absorbance;
mod analog;
mod device;
mod function;
mod property;

#[cfg(test)]
pub(crate) mod fixture;

pub use absorbance::{
    AbsorbanceReaderDevice, AbsorbanceReaderFunctionSet, AbsorbanceReaderFunctionalUnitSet,
    WELL_COUNT,
};
pub use analog::AnalogUnitRange;
pub use device::{Device, FunctionalUnit, FunctionalUnitSet, Identification};
pub use function::{
    AnalogController, AnalogControllerParameterSet, AnalogSensor, Function, FunctionKind,
    FunctionSet,
};
pub use property::{Property, SlotValue};

use crate::address_space::{AddressSpace, Node, NodeClass};
use crate::error::ProjectionError;
use crate::id::NodeId;

/// A statically-known shape that a node can be projected into.
pub trait Shape: Sized {
    /// Check `node` against the shape and capture the handles of its parts.
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectionError`] naming the first part that does not
    /// conform.
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError>;

    /// Handle of the node this view was projected from.
    fn node_id(&self) -> NodeId;
}

/// Project `node` into shape `S`.
///
/// # Errors
///
/// Returns a [`ProjectionError`] when the node does not conform to `S`.
pub fn project<S: Shape>(space: &AddressSpace, node: NodeId) -> Result<S, ProjectionError> {
    S::project(space, node)
}

pub(crate) fn expect_node(
    space: &AddressSpace,
    node: NodeId,
    class: NodeClass,
) -> Result<&Node, ProjectionError> {
    let found = space.node(node).ok_or(ProjectionError::UnknownNode(node))?;
    if found.node_class() != class {
        return Err(ProjectionError::WrongNodeClass {
            node,
            expected: match class {
                NodeClass::Object => "an object",
                NodeClass::Variable => "a variable",
                NodeClass::ObjectType => "an object type",
                NodeClass::VariableType => "a variable type",
            },
        });
    }
    Ok(found)
}

pub(crate) fn required_child(
    space: &AddressSpace,
    node: NodeId,
    name: &'static str,
) -> Result<NodeId, ProjectionError> {
    space
        .child(node, name)
        .ok_or(ProjectionError::MissingChild { node, child: name })
}

pub(crate) fn project_child<S: Shape>(
    space: &AddressSpace,
    node: NodeId,
    name: &'static str,
) -> Result<S, ProjectionError> {
    S::project(space, required_child(space, node, name)?)
}

pub(crate) fn project_optional_child<S: Shape>(
    space: &AddressSpace,
    node: NodeId,
    name: &str,
) -> Result<Option<S>, ProjectionError> {
    space
        .child(node, name)
        .map(|child| S::project(space, child))
        .transpose()
}

/// Fail with [`ProjectionError::WrongTypeDefinition`] unless `node` is typed
/// by `type_name` or a subtype of it.
pub(crate) fn require_type(
    space: &AddressSpace,
    node: NodeId,
    type_name: &'static str,
) -> Result<(), ProjectionError> {
    if has_type(space, node, type_name) {
        return Ok(());
    }
    Err(ProjectionError::WrongTypeDefinition {
        node,
        expected: type_name,
        actual: space
            .type_definition_name(node)
            .unwrap_or("<none>")
            .to_string(),
    })
}

/// Whether the node's type definition is `type_name` or one of its subtypes.
pub(crate) fn has_type(space: &AddressSpace, node: NodeId, type_name: &str) -> bool {
    let mut current = space.node(node).and_then(|n| n.type_definition);
    while let Some(ty) = current.and_then(|id| space.node(id)) {
        if ty.browse_name.name == type_name {
            return true;
        }
        current = ty.supertype();
    }
    false
}
