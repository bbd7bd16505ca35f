//! Namespace URIs, type names and browse names of the LADS information model
//! used by the absorbance reader.

/// OPC UA Devices (DI) companion specification.
pub const DI_NAMESPACE: &str = "http://opcfoundation.org/UA/DI/";
/// Laboratory and Analytical Device Standard.
pub const LADS_NAMESPACE: &str = "http://opcfoundation.org/UA/LADS/";
/// Vendor model of the absorbance reader.
pub const ABSORBANCE_READER_NAMESPACE: &str = "http://spectaris.de/AbsorbanceReader/";
/// Vendor model of the thermostat.
pub const THERMOSTAT_NAMESPACE: &str = "http://spectaris.de/Thermostat/";

// Type definitions
pub const DEVICE_TYPE: &str = "DeviceType";
pub const LADS_DEVICE_TYPE: &str = "LADSDeviceType";
pub const FUNCTIONAL_UNIT_SET_TYPE: &str = "FunctionalUnitSetType";
pub const FUNCTIONAL_UNIT_TYPE: &str = "FunctionalUnitType";
pub const FUNCTION_SET_TYPE: &str = "FunctionSetType";
pub const FUNCTION_TYPE: &str = "FunctionType";
pub const ANALOG_SCALAR_SENSOR_FUNCTION_TYPE: &str = "AnalogScalarSensorFunctionType";
pub const ANALOG_ARRAY_SENSOR_FUNCTION_TYPE: &str = "AnalogArraySensorFunctionType";
pub const ANALOG_CONTROL_FUNCTION_TYPE: &str = "AnalogControlFunctionType";
pub const PARAMETER_SET_TYPE: &str = "ParameterSetType";
pub const ANALOG_UNIT_RANGE_TYPE: &str = "AnalogUnitRangeType";
pub const ABSORBANCE_READER_DEVICE_TYPE: &str = "AbsorbanceReaderDeviceType";
pub const THERMOSTAT_DEVICE_TYPE: &str = "ThermostatDeviceType";

// Instance browse names
pub const DEVICE_SET: &str = "DeviceSet";
pub const FUNCTIONAL_UNIT_SET: &str = "FunctionalUnitSet";
pub const FUNCTION_SET: &str = "FunctionSet";
pub const PARAMETER_SET: &str = "ParameterSet";
pub const ABSORBANCE_READER_UNIT: &str = "AbsorbanceReaderUnit";
pub const THERMOSTAT_UNIT: &str = "ThermostatUnit";
pub const TEMPERATURE_SENSOR: &str = "TemperatureSensor";
pub const ABSORBANCE_SENSOR: &str = "AbsorbanceSensor";
pub const TEMPERATURE_CONTROLLER: &str = "TemperatureController";
pub const SENSOR_VALUE: &str = "SensorValue";
pub const TARGET_VALUE: &str = "TargetValue";
pub const CURRENT_VALUE: &str = "CurrentValue";
pub const IS_ENABLED: &str = "IsEnabled";
pub const ENGINEERING_UNITS: &str = "EngineeringUnits";
pub const EU_RANGE: &str = "EURange";
pub const MANUFACTURER: &str = "Manufacturer";
pub const MODEL: &str = "Model";
pub const SERIAL_NUMBER: &str = "SerialNumber";
