//! Absorbance reader: one functional unit with a temperature sensor and a
//! 96-well absorbance sensor.

use ladsim_domain::address_space::VariableAttributes;
use ladsim_domain::browse_names as bn;
use ladsim_domain::error::LadsError;
use ladsim_domain::id::NodeId;
use ladsim_domain::variant::{DataType, EuInformation, Range};
use ladsim_domain::view::WELL_COUNT;

use super::{DeviceDefinition, Instantiator};

pub(super) fn instantiate(
    builder: &mut Instantiator<'_>,
    device_set: NodeId,
    definition: &DeviceDefinition,
) -> Result<NodeId, LadsError> {
    let types = builder.types;
    let ns = types.namespaces.absorbance_reader;
    let lads = types.namespaces.lads;

    let device = builder.object(
        device_set,
        ns,
        &definition.name,
        types.absorbance_reader_device,
    )?;
    builder.identification(
        device,
        "AbsorbanceReader-96",
        definition.serial_number.as_deref(),
    )?;
    let functions = builder.functional_unit(device, bn::ABSORBANCE_READER_UNIT)?;

    let temperature = builder.object(functions, ns, bn::TEMPERATURE_SENSOR, types.scalar_sensor)?;
    builder.property(temperature, lads, bn::IS_ENABLED, true)?;
    builder.analog_slot(
        temperature,
        bn::SENSOR_VALUE,
        VariableAttributes::scalar(DataType::Double),
        EuInformation::degree_celsius(),
        Range::new(0.0, 100.0),
    )?;

    let absorbance = builder.object(functions, ns, bn::ABSORBANCE_SENSOR, types.array_sensor)?;
    builder.property(absorbance, lads, bn::IS_ENABLED, true)?;
    builder.analog_slot(
        absorbance,
        bn::SENSOR_VALUE,
        VariableAttributes::array(DataType::Double, Some(WELL_COUNT)),
        EuInformation::absorbance_unit(),
        Range::new(0.0, 10_000.0),
    )?;

    Ok(device)
}
