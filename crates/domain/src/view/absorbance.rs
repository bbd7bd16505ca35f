//! Absorbance reader shapes.
//!
//! The reader narrows the generic sets of [`Device`] and [`FunctionalUnit`]
//! to fixed, named fields.

use crate::address_space::{AddressSpace, NodeClass};
use crate::browse_names::{ABSORBANCE_READER_UNIT, ABSORBANCE_SENSOR, TEMPERATURE_SENSOR};
use crate::error::ProjectionError;
use crate::id::NodeId;

use super::{
    AnalogSensor, AnalogUnitRange, Device, FunctionalUnit, Shape, expect_node, project_child,
};

/// Number of wells of the simulated microplate.
pub const WELL_COUNT: usize = 96;

/// An absorbance reader: a [`Device`] whose unit set is narrowed.
pub type AbsorbanceReaderDevice = Device<AbsorbanceReaderFunctionalUnitSet>;

impl AbsorbanceReaderDevice {
    /// The single functional unit of the reader.
    #[must_use]
    pub fn unit(&self) -> &FunctionalUnit<AbsorbanceReaderFunctionSet> {
        self.functional_unit_set().absorbance_reader_unit()
    }

    /// Shortcut to the temperature value slot.
    #[must_use]
    pub fn temperature(&self) -> AnalogUnitRange<f64> {
        self.unit().function_set().temperature_sensor().sensor_value()
    }

    /// Shortcut to the absorbance value slot.
    #[must_use]
    pub fn absorbance(&self) -> AnalogUnitRange<Vec<f64>> {
        self.unit().function_set().absorbance_sensor().sensor_value()
    }
}

/// Functional unit set holding exactly the `AbsorbanceReaderUnit`.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsorbanceReaderFunctionalUnitSet {
    node: NodeId,
    absorbance_reader_unit: FunctionalUnit<AbsorbanceReaderFunctionSet>,
}

impl AbsorbanceReaderFunctionalUnitSet {
    #[must_use]
    pub fn absorbance_reader_unit(&self) -> &FunctionalUnit<AbsorbanceReaderFunctionSet> {
        &self.absorbance_reader_unit
    }
}

impl Shape for AbsorbanceReaderFunctionalUnitSet {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        Ok(Self {
            node,
            absorbance_reader_unit: project_child(space, node, ABSORBANCE_READER_UNIT)?,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

/// Function set of the reader: a scalar temperature sensor and a
/// [`WELL_COUNT`]-element absorbance sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorbanceReaderFunctionSet {
    node: NodeId,
    temperature_sensor: AnalogSensor<f64>,
    absorbance_sensor: AnalogSensor<Vec<f64>>,
}

impl AbsorbanceReaderFunctionSet {
    #[must_use]
    pub fn temperature_sensor(&self) -> AnalogSensor<f64> {
        self.temperature_sensor
    }

    #[must_use]
    pub fn absorbance_sensor(&self) -> AnalogSensor<Vec<f64>> {
        self.absorbance_sensor
    }
}

impl Shape for AbsorbanceReaderFunctionSet {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        let absorbance_sensor: AnalogSensor<Vec<f64>> =
            project_child(space, node, ABSORBANCE_SENSOR)?;
        let wells = absorbance_sensor.sensor_value();
        let length = wells.array_length(space);
        if length != Some(WELL_COUNT) {
            return Err(ProjectionError::WrongArrayLength {
                node: wells.node_id(),
                expected: WELL_COUNT,
                actual: length,
            });
        }
        Ok(Self {
            node,
            temperature_sensor: project_child(space, node, TEMPERATURE_SENSOR)?,
            absorbance_sensor,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}
