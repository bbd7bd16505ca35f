//! # ladsim-adapter-virtual
//!
//! Built-in nodeset: the LADS type system plus simulated device instances,
//! materialized into an [`AddressSpace`] at startup.
//!
//! ## Provided devices
//!
//! | Kind | Type definition | Simulated |
//! |------|-----------------|-----------|
//! | Absorbance reader | `AbsorbanceReaderDeviceType` | yes, temperature and 96 wells |
//! | Thermostat | `ThermostatDeviceType` | no, skipped by discovery |
//!
//! ## Dependency rule
//!
//! Depends on `ladsim-domain` only.

mod devices;
mod types;

pub use devices::{DeviceDefinition, DeviceKind};
pub use types::{Namespaces, TypeSystem};

use ladsim_domain::address_space::{AddressSpace, QualifiedName};
use ladsim_domain::browse_names as bn;
use ladsim_domain::error::LadsError;

use devices::Instantiator;

/// Static definitions of the simulated information model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNodeset {
    devices: Vec<DeviceDefinition>,
}

impl Default for VirtualNodeset {
    fn default() -> Self {
        Self::new(vec![
            DeviceDefinition::absorbance_reader("AbsorbanceReader1").with_serial_number("AR-0001"),
            DeviceDefinition::thermostat("Thermostat1").with_serial_number("TH-0001"),
        ])
    }
}

impl VirtualNodeset {
    #[must_use]
    pub fn new(devices: Vec<DeviceDefinition>) -> Self {
        Self { devices }
    }

    #[must_use]
    pub fn devices(&self) -> &[DeviceDefinition] {
        &self.devices
    }

    /// Build a fresh address space holding the types, `Objects/DeviceSet`
    /// and one instance per definition, in definition order.
    ///
    /// # Errors
    ///
    /// Fails when two definitions share a name.
    pub fn build(&self) -> Result<AddressSpace, LadsError> {
        let mut space = AddressSpace::new();
        let types = TypeSystem::install(&mut space)?;
        let objects = space.objects_folder();
        let device_set = space.add_object(
            objects,
            QualifiedName::new(types.namespaces.di, bn::DEVICE_SET),
            types.folder,
        )?;

        let mut builder = Instantiator {
            space: &mut space,
            types: &types,
        };
        for definition in &self.devices {
            builder.instantiate(device_set, definition)?;
        }
        tracing::info!(
            devices = self.devices.len(),
            nodes = space.len(),
            "nodeset loaded"
        );
        Ok(space)
    }
}
