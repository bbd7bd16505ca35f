//! Type system of the built-in nodeset.
//!
//! Each companion model lives in its own namespace, registered in the order
//! DI, LADS, AbsorbanceReader, Thermostat (indices 1 to 4).

use ladsim_domain::address_space::{AddressSpace, QualifiedName};
use ladsim_domain::browse_names as bn;
use ladsim_domain::error::LadsError;
use ladsim_domain::id::NodeId;

/// Namespace indices of the companion models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespaces {
    pub di: u16,
    pub lads: u16,
    pub absorbance_reader: u16,
    pub thermostat: u16,
}

/// Handles of the installed type definitions.
#[derive(Debug, Clone, Copy)]
pub struct TypeSystem {
    pub namespaces: Namespaces,
    pub folder: NodeId,
    pub device: NodeId,
    pub lads_device: NodeId,
    pub functional_unit_set: NodeId,
    pub functional_unit: NodeId,
    pub function_set: NodeId,
    pub function: NodeId,
    pub scalar_sensor: NodeId,
    pub array_sensor: NodeId,
    pub controller: NodeId,
    pub parameter_set: NodeId,
    pub analog_unit_range: NodeId,
    pub absorbance_reader_device: NodeId,
    pub thermostat_device: NodeId,
}

impl TypeSystem {
    /// Register the namespaces and add every type definition to `space`.
    ///
    /// # Errors
    ///
    /// Propagates construction errors of the address space.
    pub fn install(space: &mut AddressSpace) -> Result<Self, LadsError> {
        let namespaces = Namespaces {
            di: space.register_namespace(bn::DI_NAMESPACE),
            lads: space.register_namespace(bn::LADS_NAMESPACE),
            absorbance_reader: space.register_namespace(bn::ABSORBANCE_READER_NAMESPACE),
            thermostat: space.register_namespace(bn::THERMOSTAT_NAMESPACE),
        };
        let base = space.base_object_type();
        let folder = space.folder_type();

        let device =
            space.add_object_type(QualifiedName::new(namespaces.di, bn::DEVICE_TYPE), base)?;
        let lads = |name: &str| QualifiedName::new(namespaces.lads, name);
        let lads_device = space.add_object_type(lads(bn::LADS_DEVICE_TYPE), device)?;
        let functional_unit_set = space.add_object_type(lads(bn::FUNCTIONAL_UNIT_SET_TYPE), base)?;
        let functional_unit = space.add_object_type(lads(bn::FUNCTIONAL_UNIT_TYPE), base)?;
        let function_set = space.add_object_type(lads(bn::FUNCTION_SET_TYPE), base)?;
        let function = space.add_object_type(lads(bn::FUNCTION_TYPE), base)?;
        let scalar_sensor =
            space.add_object_type(lads(bn::ANALOG_SCALAR_SENSOR_FUNCTION_TYPE), function)?;
        let array_sensor =
            space.add_object_type(lads(bn::ANALOG_ARRAY_SENSOR_FUNCTION_TYPE), function)?;
        let controller = space.add_object_type(lads(bn::ANALOG_CONTROL_FUNCTION_TYPE), function)?;
        let parameter_set = space.add_object_type(lads(bn::PARAMETER_SET_TYPE), base)?;
        let data_variable = space.base_data_variable_type();
        let analog_unit_range =
            space.add_variable_type(lads(bn::ANALOG_UNIT_RANGE_TYPE), data_variable)?;

        let absorbance_reader_device = space.add_object_type(
            QualifiedName::new(
                namespaces.absorbance_reader,
                bn::ABSORBANCE_READER_DEVICE_TYPE,
            ),
            lads_device,
        )?;
        let thermostat_device = space.add_object_type(
            QualifiedName::new(namespaces.thermostat, bn::THERMOSTAT_DEVICE_TYPE),
            lads_device,
        )?;

        Ok(Self {
            namespaces,
            folder,
            device,
            lads_device,
            functional_unit_set,
            functional_unit,
            function_set,
            function,
            scalar_sensor,
            array_sensor,
            controller,
            parameter_set,
            analog_unit_range,
            absorbance_reader_device,
            thermostat_device,
        })
    }
}
