//! Simulated device instances — absorbance readers and thermostats.
//!
//! Every instance is created below `Objects/DeviceSet` with the full LADS
//! role path its type requires, so it projects cleanly into its typed view.

mod reader;
mod thermostat;

use serde::{Deserialize, Serialize};

use ladsim_domain::address_space::{AddressSpace, QualifiedName, VariableAttributes};
use ladsim_domain::browse_names as bn;
use ladsim_domain::error::{LadsError, ValidationError};
use ladsim_domain::id::NodeId;
use ladsim_domain::variant::{DataValue, EuInformation, Range, Variant};

use crate::types::TypeSystem;

/// Kind of simulated instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    AbsorbanceReader,
    Thermostat,
}

/// One device to instantiate in the nodeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDefinition {
    pub name: String,
    pub kind: DeviceKind,
    #[serde(default)]
    pub serial_number: Option<String>,
}

impl DeviceDefinition {
    #[must_use]
    pub fn absorbance_reader(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeviceKind::AbsorbanceReader,
            serial_number: None,
        }
    }

    #[must_use]
    pub fn thermostat(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeviceKind::Thermostat,
            serial_number: None,
        }
    }

    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

/// Adds nodes of one device, namespaced by the device's companion model.
pub(crate) struct Instantiator<'a> {
    pub space: &'a mut AddressSpace,
    pub types: &'a TypeSystem,
}

impl Instantiator<'_> {
    /// Create `definition` below `device_set`, returning the device node.
    pub(crate) fn instantiate(
        &mut self,
        device_set: NodeId,
        definition: &DeviceDefinition,
    ) -> Result<NodeId, LadsError> {
        let device = match definition.kind {
            DeviceKind::AbsorbanceReader => reader::instantiate(self, device_set, definition)?,
            DeviceKind::Thermostat => thermostat::instantiate(self, device_set, definition)?,
        };
        tracing::debug!(device = %definition.name, kind = ?definition.kind, "device instantiated");
        Ok(device)
    }

    fn object(
        &mut self,
        parent: NodeId,
        namespace: u16,
        name: &str,
        ty: NodeId,
    ) -> Result<NodeId, LadsError> {
        self.space
            .add_object(parent, QualifiedName::new(namespace, name), ty)
    }

    fn property(
        &mut self,
        parent: NodeId,
        namespace: u16,
        name: &str,
        value: impl Into<Variant>,
    ) -> Result<NodeId, LadsError> {
        let value = DataValue::constant(value);
        let data_type = value
            .value
            .data_type()
            .ok_or(ValidationError::MissingField("value"))?;
        self.space.add_property(
            parent,
            QualifiedName::new(namespace, name),
            VariableAttributes::scalar(data_type).with_value(value),
        )
    }

    /// DI identification of a device.
    fn identification(
        &mut self,
        device: NodeId,
        model: &str,
        serial_number: Option<&str>,
    ) -> Result<(), LadsError> {
        let di = self.types.namespaces.di;
        self.property(device, di, bn::MANUFACTURER, "ladsim")?;
        self.property(device, di, bn::MODEL, model)?;
        if let Some(serial_number) = serial_number {
            self.property(device, di, bn::SERIAL_NUMBER, serial_number)?;
        }
        Ok(())
    }

    /// An `AnalogUnitRangeType` variable with its units and range.
    fn analog_slot(
        &mut self,
        parent: NodeId,
        name: &str,
        attributes: VariableAttributes,
        units: EuInformation,
        range: Range,
    ) -> Result<NodeId, LadsError> {
        let lads = self.types.namespaces.lads;
        let slot = self.space.add_variable(
            parent,
            QualifiedName::new(lads, name),
            self.types.analog_unit_range,
            attributes,
        )?;
        self.property(slot, 0, bn::ENGINEERING_UNITS, units)?;
        self.property(slot, 0, bn::EU_RANGE, range)?;
        Ok(slot)
    }

    /// The `FunctionalUnitSet/<unit>/FunctionSet` chain, returning the set.
    fn functional_unit(&mut self, device: NodeId, unit_name: &str) -> Result<NodeId, LadsError> {
        let lads = self.types.namespaces.lads;
        let types = self.types;
        let units = self.object(device, lads, bn::FUNCTIONAL_UNIT_SET, types.functional_unit_set)?;
        let unit = self.object(units, lads, unit_name, types.functional_unit)?;
        self.object(unit, lads, bn::FUNCTION_SET, types.function_set)
    }
}
