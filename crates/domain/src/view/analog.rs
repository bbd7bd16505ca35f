//! `AnalogUnitRange` — a measurement slot with engineering units and range.

use std::fmt;
use std::marker::PhantomData;

use crate::address_space::AddressSpace;
use crate::browse_names::{ENGINEERING_UNITS, EU_RANGE};
use crate::error::ProjectionError;
use crate::id::NodeId;
use crate::variant::{DataValue, EuInformation, Range};

use super::property::{SlotValue, expect_variable_of};
use super::{Property, Shape, project_child};

/// Value slot holding a `T` (scalar or array) plus its unit descriptors.
pub struct AnalogUnitRange<T> {
    node: NodeId,
    engineering_units: Property<EuInformation>,
    eu_range: Property<Range>,
    _value: PhantomData<fn() -> T>,
}

impl<T: SlotValue> AnalogUnitRange<T> {
    /// Current value, `None` until the first good write.
    #[must_use]
    pub fn current(&self, space: &AddressSpace) -> Option<T> {
        space
            .value(self.node)
            .and_then(|dv| T::from_variant(&dv.value))
    }

    /// Full data value as stored, including status and timestamps.
    #[must_use]
    pub fn data_value_in<'a>(&self, space: &'a AddressSpace) -> Option<&'a DataValue> {
        space.value(self.node)
    }

    /// Wrap `value` into a source-stamped data value tagged with `T`'s type.
    #[must_use]
    pub fn data_value(&self, value: T) -> DataValue {
        DataValue::from_source(value.into_variant())
    }

    #[must_use]
    pub fn engineering_units(&self, space: &AddressSpace) -> Option<EuInformation> {
        self.engineering_units.get(space)
    }

    #[must_use]
    pub fn eu_range(&self, space: &AddressSpace) -> Option<Range> {
        self.eu_range.get(space)
    }

    /// Fixed element count declared by the variable, if any.
    #[must_use]
    pub fn array_length(&self, space: &AddressSpace) -> Option<usize> {
        space
            .node(self.node)
            .and_then(|node| node.as_variable())
            .and_then(|attrs| attrs.array_length)
    }

    #[must_use]
    pub fn is_historizing(&self, space: &AddressSpace) -> bool {
        space
            .node(self.node)
            .and_then(|node| node.as_variable())
            .is_some_and(|attrs| attrs.historizing)
    }
}

impl<T: SlotValue> Shape for AnalogUnitRange<T> {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_variable_of::<T>(space, node)?;
        Ok(Self {
            node,
            engineering_units: project_child(space, node, ENGINEERING_UNITS)?,
            eu_range: project_child(space, node, EU_RANGE)?,
            _value: PhantomData,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

impl<T> Clone for AnalogUnitRange<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AnalogUnitRange<T> {}

impl<T> PartialEq for AnalogUnitRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> fmt::Debug for AnalogUnitRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalogUnitRange")
            .field("node", &self.node)
            .field("engineering_units", &self.engineering_units)
            .field("eu_range", &self.eu_range)
            .finish()
    }
}
