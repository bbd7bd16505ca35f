//! Small hand-built address spaces for view tests.

use crate::address_space::{AddressSpace, QualifiedName, VariableAttributes};
use crate::browse_names as bn;
use crate::id::NodeId;
use crate::variant::{DataType, DataValue, EuInformation, Range};

pub(crate) struct ReaderFixture {
    pub space: AddressSpace,
    pub device: NodeId,
    pub unit: NodeId,
    pub function_set: NodeId,
    pub temperature_sensor: NodeId,
    pub temperature_value: NodeId,
    pub absorbance_sensor: NodeId,
    pub absorbance_value: NodeId,
}

pub(crate) struct ThermostatFixture {
    pub space: AddressSpace,
    pub device: NodeId,
    pub controller: NodeId,
}

struct Types {
    ns: u16,
    reader_device: NodeId,
    thermostat_device: NodeId,
    functional_unit: NodeId,
    scalar_sensor: NodeId,
    array_sensor: NodeId,
    controller: NodeId,
    analog_unit_range: NodeId,
}

fn install_types(space: &mut AddressSpace) -> Types {
    let ns = space.register_namespace(bn::LADS_NAMESPACE);
    let object_type = |space: &mut AddressSpace, name: &str, supertype: NodeId| {
        space
            .add_object_type(QualifiedName::new(ns, name), supertype)
            .unwrap()
    };
    let base = space.base_object_type();
    let device = object_type(space, bn::DEVICE_TYPE, base);
    let lads_device = object_type(space, bn::LADS_DEVICE_TYPE, device);
    let function = object_type(space, bn::FUNCTION_TYPE, base);
    let analog_unit_range = space
        .add_variable_type(
            QualifiedName::new(ns, bn::ANALOG_UNIT_RANGE_TYPE),
            space.base_data_variable_type(),
        )
        .unwrap();
    Types {
        ns,
        reader_device: object_type(space, bn::ABSORBANCE_READER_DEVICE_TYPE, lads_device),
        thermostat_device: object_type(space, bn::THERMOSTAT_DEVICE_TYPE, lads_device),
        functional_unit: object_type(space, bn::FUNCTIONAL_UNIT_TYPE, base),
        scalar_sensor: object_type(space, bn::ANALOG_SCALAR_SENSOR_FUNCTION_TYPE, function),
        array_sensor: object_type(space, bn::ANALOG_ARRAY_SENSOR_FUNCTION_TYPE, function),
        controller: object_type(space, bn::ANALOG_CONTROL_FUNCTION_TYPE, function),
        analog_unit_range,
    }
}

fn object(space: &mut AddressSpace, parent: NodeId, ns: u16, name: &str, ty: NodeId) -> NodeId {
    space
        .add_object(parent, QualifiedName::new(ns, name), ty)
        .unwrap()
}

fn property(space: &mut AddressSpace, parent: NodeId, ns: u16, name: &str, value: DataValue) {
    let data_type = value.value.data_type().unwrap();
    space
        .add_property(
            parent,
            QualifiedName::new(ns, name),
            VariableAttributes::scalar(data_type).with_value(value),
        )
        .unwrap();
}

fn analog_slot(
    space: &mut AddressSpace,
    types: &Types,
    parent: NodeId,
    name: &str,
    attributes: VariableAttributes,
    units: EuInformation,
    range: Range,
) -> NodeId {
    let slot = space
        .add_variable(
            parent,
            QualifiedName::new(types.ns, name),
            types.analog_unit_range,
            attributes,
        )
        .unwrap();
    property(
        space,
        slot,
        0,
        bn::ENGINEERING_UNITS,
        DataValue::constant(units),
    );
    property(space, slot, 0, bn::EU_RANGE, DataValue::constant(range));
    slot
}

fn sensor(
    space: &mut AddressSpace,
    types: &Types,
    parent: NodeId,
    name: &str,
    sensor_type: NodeId,
) -> NodeId {
    let sensor = object(space, parent, types.ns, name, sensor_type);
    property(
        space,
        sensor,
        types.ns,
        bn::IS_ENABLED,
        DataValue::constant(true),
    );
    sensor
}

fn build_reader(wells: usize, with_temperature_value: bool) -> ReaderFixture {
    let mut space = AddressSpace::new();
    let types = install_types(&mut space);
    let ns = types.ns;
    let folder = space.folder_type();

    let root = space.objects_folder();
    let device = object(&mut space, root, ns, "Reader1", types.reader_device);
    property(
        &mut space,
        device,
        ns,
        bn::SERIAL_NUMBER,
        DataValue::constant("SN-0001"),
    );
    property(
        &mut space,
        device,
        ns,
        bn::MANUFACTURER,
        DataValue::constant("ladsim"),
    );
    let units = object(&mut space, device, ns, bn::FUNCTIONAL_UNIT_SET, folder);
    let unit = object(
        &mut space,
        units,
        ns,
        bn::ABSORBANCE_READER_UNIT,
        types.functional_unit,
    );
    let function_set = object(&mut space, unit, ns, bn::FUNCTION_SET, folder);

    let temperature_sensor = sensor(
        &mut space,
        &types,
        function_set,
        bn::TEMPERATURE_SENSOR,
        types.scalar_sensor,
    );
    let temperature_value = if with_temperature_value {
        analog_slot(
            &mut space,
            &types,
            temperature_sensor,
            bn::SENSOR_VALUE,
            VariableAttributes::scalar(DataType::Double),
            EuInformation::degree_celsius(),
            Range::new(0.0, 100.0),
        )
    } else {
        temperature_sensor
    };

    let absorbance_sensor = sensor(
        &mut space,
        &types,
        function_set,
        bn::ABSORBANCE_SENSOR,
        types.array_sensor,
    );
    let absorbance_value = analog_slot(
        &mut space,
        &types,
        absorbance_sensor,
        bn::SENSOR_VALUE,
        VariableAttributes::array(DataType::Double, Some(wells)),
        EuInformation::absorbance_unit(),
        Range::new(0.0, 10_000.0),
    );

    ReaderFixture {
        space,
        device,
        unit,
        function_set,
        temperature_sensor,
        temperature_value,
        absorbance_sensor,
        absorbance_value,
    }
}

/// A conforming absorbance reader below `Objects`.
pub(crate) fn reader() -> ReaderFixture {
    build_reader(96, true)
}

/// A reader whose absorbance array has `wells` elements.
pub(crate) fn reader_with_wells(wells: usize) -> ReaderFixture {
    build_reader(wells, true)
}

/// A reader whose temperature sensor lacks its `SensorValue`.
pub(crate) fn reader_without_sensor_value() -> ReaderFixture {
    build_reader(96, false)
}

/// A thermostat with a disabled temperature controller.
pub(crate) fn thermostat() -> ThermostatFixture {
    let mut space = AddressSpace::new();
    let types = install_types(&mut space);
    let ns = types.ns;
    let folder = space.folder_type();
    let base = space.base_object_type();

    let root = space.objects_folder();
    let device = object(&mut space, root, ns, "Thermostat1", types.thermostat_device);
    let units = object(&mut space, device, ns, bn::FUNCTIONAL_UNIT_SET, folder);
    let unit = object(
        &mut space,
        units,
        ns,
        bn::THERMOSTAT_UNIT,
        types.functional_unit,
    );
    let function_set = object(&mut space, unit, ns, bn::FUNCTION_SET, folder);
    let controller = object(
        &mut space,
        function_set,
        ns,
        bn::TEMPERATURE_CONTROLLER,
        types.controller,
    );
    property(
        &mut space,
        controller,
        ns,
        bn::IS_ENABLED,
        DataValue::constant(false),
    );
    let parameters = object(&mut space, controller, ns, bn::PARAMETER_SET, base);
    for name in [bn::TARGET_VALUE, bn::CURRENT_VALUE] {
        analog_slot(
            &mut space,
            &types,
            parameters,
            name,
            VariableAttributes::scalar(DataType::Double),
            EuInformation::degree_celsius(),
            Range::new(-20.0, 120.0),
        );
    }

    ThermostatFixture {
        space,
        device,
        controller,
    }
}
