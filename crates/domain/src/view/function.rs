//! Function shapes: sensors, controllers and the set that groups them.

use std::collections::BTreeMap;

use crate::address_space::{AddressSpace, NodeClass};
use crate::browse_names::{
    ANALOG_ARRAY_SENSOR_FUNCTION_TYPE, ANALOG_CONTROL_FUNCTION_TYPE,
    ANALOG_SCALAR_SENSOR_FUNCTION_TYPE, CURRENT_VALUE, IS_ENABLED, PARAMETER_SET, SENSOR_VALUE,
    TARGET_VALUE,
};
use crate::error::ProjectionError;
use crate::id::NodeId;
use crate::variant::ValueRank;

use super::property::SlotValue;
use super::{AnalogUnitRange, Property, Shape, expect_node, has_type, project_child, require_type};

/// Capabilities every function exposes.
pub trait Function: Shape {
    /// The `IsEnabled` flag of the function.
    fn is_enabled(&self) -> Property<bool>;
}

/// An analog sensor publishing a single `SensorValue` slot of type `T`.
///
/// `f64` selects a scalar sensor, `Vec<f64>` an array sensor.
pub struct AnalogSensor<T> {
    node: NodeId,
    is_enabled: Property<bool>,
    sensor_value: AnalogUnitRange<T>,
}

impl<T> AnalogSensor<T> {
    #[must_use]
    pub fn sensor_value(&self) -> AnalogUnitRange<T> {
        self.sensor_value
    }
}

impl<T: SlotValue> Shape for AnalogSensor<T> {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        let type_name = match T::VALUE_RANK {
            ValueRank::Scalar => ANALOG_SCALAR_SENSOR_FUNCTION_TYPE,
            ValueRank::OneDimension => ANALOG_ARRAY_SENSOR_FUNCTION_TYPE,
        };
        require_type(space, node, type_name)?;
        Ok(Self {
            node,
            is_enabled: project_child(space, node, IS_ENABLED)?,
            sensor_value: project_child(space, node, SENSOR_VALUE)?,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

impl<T: SlotValue> Function for AnalogSensor<T> {
    fn is_enabled(&self) -> Property<bool> {
        self.is_enabled
    }
}

impl<T> Clone for AnalogSensor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AnalogSensor<T> {}

impl<T> PartialEq for AnalogSensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> std::fmt::Debug for AnalogSensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalogSensor")
            .field("node", &self.node)
            .field("sensor_value", &self.sensor_value)
            .finish_non_exhaustive()
    }
}

/// `TargetValue` / `CurrentValue` pair of an analog controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogControllerParameterSet {
    node: NodeId,
    target_value: AnalogUnitRange<f64>,
    current_value: AnalogUnitRange<f64>,
}

impl AnalogControllerParameterSet {
    #[must_use]
    pub fn target_value(&self) -> AnalogUnitRange<f64> {
        self.target_value
    }

    #[must_use]
    pub fn current_value(&self) -> AnalogUnitRange<f64> {
        self.current_value
    }
}

impl Shape for AnalogControllerParameterSet {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        Ok(Self {
            node,
            target_value: project_child(space, node, TARGET_VALUE)?,
            current_value: project_child(space, node, CURRENT_VALUE)?,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

/// An analog control function (e.g. a thermostat's temperature controller).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogController {
    node: NodeId,
    is_enabled: Property<bool>,
    parameter_set: AnalogControllerParameterSet,
}

impl AnalogController {
    #[must_use]
    pub fn parameter_set(&self) -> AnalogControllerParameterSet {
        self.parameter_set
    }
}

impl Shape for AnalogController {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        require_type(space, node, ANALOG_CONTROL_FUNCTION_TYPE)?;
        Ok(Self {
            node,
            is_enabled: project_child(space, node, IS_ENABLED)?,
            parameter_set: project_child(space, node, PARAMETER_SET)?,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

impl Function for AnalogController {
    fn is_enabled(&self) -> Property<bool> {
        self.is_enabled
    }
}

/// A function of a generic function set, narrowed by its type definition.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionKind {
    ScalarSensor(AnalogSensor<f64>),
    ArraySensor(AnalogSensor<Vec<f64>>),
    Controller(AnalogController),
    /// A function whose type has no known shape.
    Other(NodeId),
}

impl Shape for FunctionKind {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        if has_type(space, node, ANALOG_SCALAR_SENSOR_FUNCTION_TYPE) {
            Ok(Self::ScalarSensor(AnalogSensor::project(space, node)?))
        } else if has_type(space, node, ANALOG_ARRAY_SENSOR_FUNCTION_TYPE) {
            Ok(Self::ArraySensor(AnalogSensor::project(space, node)?))
        } else if has_type(space, node, ANALOG_CONTROL_FUNCTION_TYPE) {
            Ok(Self::Controller(AnalogController::project(space, node)?))
        } else {
            expect_node(space, node, NodeClass::Object)?;
            Ok(Self::Other(node))
        }
    }

    fn node_id(&self) -> NodeId {
        match self {
            Self::ScalarSensor(sensor) => sensor.node_id(),
            Self::ArraySensor(sensor) => sensor.node_id(),
            Self::Controller(controller) => controller.node_id(),
            Self::Other(node) => *node,
        }
    }
}

/// Generic function set: role name to function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSet {
    node: NodeId,
    functions: BTreeMap<String, FunctionKind>,
}

impl FunctionSet {
    #[must_use]
    pub fn functions(&self) -> &BTreeMap<String, FunctionKind> {
        &self.functions
    }

    #[must_use]
    pub fn get(&self, role: &str) -> Option<&FunctionKind> {
        self.functions.get(role)
    }
}

impl Shape for FunctionSet {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_node(space, node, NodeClass::Object)?;
        let functions = space
            .children(node)
            .filter(|child| child.node_class() == NodeClass::Object)
            .map(|child| {
                FunctionKind::project(space, child.id)
                    .map(|function| (child.browse_name.name.clone(), function))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { node, functions })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}
