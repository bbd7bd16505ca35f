//! Device, functional unit set and functional unit shapes.
//!
//! The narrowable field of each shape is a type parameter defaulting to its
//! generic, map-shaped form.

use std::collections::BTreeMap;

use crate::address_space::{AddressSpace, NodeClass};
use crate::browse_names::{
    DEVICE_TYPE, FUNCTION_SET, FUNCTIONAL_UNIT_SET, FUNCTIONAL_UNIT_TYPE, MANUFACTURER, MODEL,
    SERIAL_NUMBER,
};
use crate::error::ProjectionError;
use crate::id::NodeId;

use super::{
    FunctionSet, Property, Shape, expect_node, project_child, project_optional_child,
    require_type,
};

/// Optional DI identification properties of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Identification {
    manufacturer: Option<Property<String>>,
    model: Option<Property<String>>,
    serial_number: Option<Property<String>>,
}

impl Identification {
    fn project(space: &AddressSpace, device: NodeId) -> Result<Self, ProjectionError> {
        Ok(Self {
            manufacturer: project_optional_child(space, device, MANUFACTURER)?,
            model: project_optional_child(space, device, MODEL)?,
            serial_number: project_optional_child(space, device, SERIAL_NUMBER)?,
        })
    }

    #[must_use]
    pub fn manufacturer(&self, space: &AddressSpace) -> Option<String> {
        self.manufacturer.and_then(|p| p.get(space))
    }

    #[must_use]
    pub fn model(&self, space: &AddressSpace) -> Option<String> {
        self.model.and_then(|p| p.get(space))
    }

    #[must_use]
    pub fn serial_number(&self, space: &AddressSpace) -> Option<String> {
        self.serial_number.and_then(|p| p.get(space))
    }
}

/// Root entity of one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Device<U = FunctionalUnitSet> {
    node: NodeId,
    functional_unit_set: U,
    identification: Identification,
}

impl<U> Device<U> {
    #[must_use]
    pub fn functional_unit_set(&self) -> &U {
        &self.functional_unit_set
    }

    #[must_use]
    pub fn identification(&self) -> &Identification {
        &self.identification
    }
}

impl<U: Shape> Shape for Device<U> {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        require_type(space, node, DEVICE_TYPE)?;
        Ok(Self {
            node,
            functional_unit_set: project_child(space, node, FUNCTIONAL_UNIT_SET)?,
            identification: Identification::project(space, node)?,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

/// Generic functional unit set: role name to functional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalUnitSet {
    node: NodeId,
    units: BTreeMap<String, FunctionalUnit>,
}

impl FunctionalUnitSet {
    #[must_use]
    pub fn units(&self) -> &BTreeMap<String, FunctionalUnit> {
        &self.units
    }

    #[must_use]
    pub fn get(&self, role: &str) -> Option<&FunctionalUnit> {
        self.units.get(role)
    }
}

impl Shape for FunctionalUnitSet {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        let units = space
            .children(node)
            .filter(|child| child.node_class() == NodeClass::Object)
            .map(|child| {
                FunctionalUnit::project(space, child.id)
                    .map(|unit| (child.browse_name.name.clone(), unit))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { node, units })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

/// A functional unit owning exactly one function set.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalUnit<F = FunctionSet> {
    node: NodeId,
    function_set: F,
}

impl<F> FunctionalUnit<F> {
    #[must_use]
    pub fn function_set(&self) -> &F {
        &self.function_set
    }
}

impl<F: Shape> Shape for FunctionalUnit<F> {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        require_type(space, node, FUNCTIONAL_UNIT_TYPE)?;
        Ok(Self {
            node,
            function_set: project_child(space, node, FUNCTION_SET)?,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse_names::{ABSORBANCE_READER_UNIT, THERMOSTAT_UNIT};
    use crate::view::{FunctionKind, fixture};

    #[test]
    fn should_project_generic_device_with_map_shaped_sets() {
        let fx = fixture::reader();
        let device: Device = Device::project(&fx.space, fx.device).unwrap();
        let unit = device
            .functional_unit_set()
            .get(ABSORBANCE_READER_UNIT)
            .unwrap();
        assert_eq!(unit.node_id(), fx.unit);
        assert_eq!(unit.function_set().functions().len(), 2);
    }

    #[test]
    fn should_read_identification_properties() {
        let fx = fixture::reader();
        let device: Device = Device::project(&fx.space, fx.device).unwrap();
        let id = device.identification();
        assert_eq!(id.serial_number(&fx.space).as_deref(), Some("SN-0001"));
        assert_eq!(id.manufacturer(&fx.space).as_deref(), Some("ladsim"));
        assert_eq!(id.model(&fx.space), None);
    }

    #[test]
    fn should_reject_object_that_is_not_a_device() {
        let fx = fixture::reader();
        let err = Device::<FunctionalUnitSet>::project(&fx.space, fx.unit).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::WrongTypeDefinition {
                expected: DEVICE_TYPE,
                ..
            }
        ));
    }

    #[test]
    fn should_project_thermostat_as_generic_device() {
        let fx = fixture::thermostat();
        let device: Device = Device::project(&fx.space, fx.device).unwrap();
        let unit = device.functional_unit_set().get(THERMOSTAT_UNIT).unwrap();
        assert!(
            unit.function_set()
                .functions()
                .values()
                .all(|f| matches!(f, FunctionKind::Controller(_)))
        );
    }
}
