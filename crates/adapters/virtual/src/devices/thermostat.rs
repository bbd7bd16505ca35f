//! Thermostat: one functional unit with a temperature controller. Present in
//! the nodeset but not a target of the simulation.

use ladsim_domain::address_space::VariableAttributes;
use ladsim_domain::browse_names as bn;
use ladsim_domain::error::LadsError;
use ladsim_domain::id::NodeId;
use ladsim_domain::variant::{DataType, EuInformation, Range};

use super::{DeviceDefinition, Instantiator};

pub(super) fn instantiate(
    builder: &mut Instantiator<'_>,
    device_set: NodeId,
    definition: &DeviceDefinition,
) -> Result<NodeId, LadsError> {
    let types = builder.types;
    let ns = types.namespaces.thermostat;
    let lads = types.namespaces.lads;

    let device = builder.object(device_set, ns, &definition.name, types.thermostat_device)?;
    builder.identification(device, "Thermostat-1", definition.serial_number.as_deref())?;
    let functions = builder.functional_unit(device, bn::THERMOSTAT_UNIT)?;

    let controller = builder.object(functions, ns, bn::TEMPERATURE_CONTROLLER, types.controller)?;
    builder.property(controller, lads, bn::IS_ENABLED, false)?;
    let parameters = builder.object(controller, lads, bn::PARAMETER_SET, types.parameter_set)?;
    for name in [bn::TARGET_VALUE, bn::CURRENT_VALUE] {
        builder.analog_slot(
            parameters,
            name,
            VariableAttributes::scalar(DataType::Double),
            EuInformation::degree_celsius(),
            Range::new(-20.0, 120.0),
        )?;
    }

    Ok(device)
}
