//! Test doubles shared by the unit tests of this crate.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use ladsim_domain::address_space::{AddressSpace, QualifiedName, VariableAttributes};
use ladsim_domain::browse_names as bn;
use ladsim_domain::error::{HistoryError, LadsError};
use ladsim_domain::history::HistoryRecord;
use ladsim_domain::id::NodeId;
use ladsim_domain::time::Timestamp;
use ladsim_domain::variant::{DataType, DataValue, EuInformation, Range};

use crate::ports::HistoryRepository;

/// Historian keeping everything in a vector.
#[derive(Default)]
pub(crate) struct InMemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
    registered: Mutex<HashSet<NodeId>>,
    reject: bool,
    append: Append,
}

/// How [`InMemoryHistory::record`] behaves.
#[derive(Default, Clone, Copy)]
pub(crate) enum Append {
    #[default]
    Store,
    Fail,
    Stall(Duration),
}

impl InMemoryHistory {
    /// A historian refusing every registration.
    pub(crate) fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// A historian accepting registrations but appending with `append`.
    pub(crate) fn appending(append: Append) -> Self {
        Self {
            append,
            ..Self::default()
        }
    }

    pub(crate) fn all(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl HistoryRepository for InMemoryHistory {
    fn register(&self, node: NodeId) -> impl Future<Output = Result<(), LadsError>> + Send {
        let result = if self.reject {
            Err(HistoryError::RegistrationRejected {
                node,
                reason: "historian offline".to_string(),
            }
            .into())
        } else {
            self.registered.lock().unwrap().insert(node);
            Ok(())
        };
        async { result }
    }

    fn is_registered(&self, node: NodeId) -> impl Future<Output = Result<bool, LadsError>> + Send {
        let found = self.registered.lock().unwrap().contains(&node);
        async move { Ok(found) }
    }

    fn record(
        &self,
        record: HistoryRecord,
    ) -> impl Future<Output = Result<HistoryRecord, LadsError>> + Send {
        let append = self.append;
        async move {
            match append {
                Append::Store => {}
                Append::Fail => return Err(LadsError::Storage("disk full".into())),
                Append::Stall(delay) => tokio::time::sleep(delay).await,
            }
            if self.registered.lock().unwrap().contains(&record.node_id) {
                self.records.lock().unwrap().push(record.clone());
                Ok(record)
            } else {
                Err(HistoryError::NotRegistered(record.node_id).into())
            }
        }
    }

    fn find_in_range(
        &self,
        node: NodeId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryRecord>, LadsError>> + Send {
        let found: Vec<HistoryRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.node_id == node)
            .filter(|r| from.is_none_or(|from| r.recorded_at >= from))
            .filter(|r| to.is_none_or(|to| r.recorded_at < to))
            .take(limit)
            .cloned()
            .collect();
        async { Ok(found) }
    }

    fn purge_before(
        &self,
        before: Timestamp,
    ) -> impl Future<Output = Result<u64, LadsError>> + Send {
        let mut records = self.records.lock().unwrap();
        let len = records.len();
        records.retain(|r| r.recorded_at >= before);
        let removed = (len - records.len()) as u64;
        async move { Ok(removed) }
    }
}

/// Address space with a `DeviceSet` folder and the LADS types needed to
/// instantiate readers and thermostats below it.
pub(crate) struct TestSpace {
    pub space: AddressSpace,
    pub device_set: NodeId,
    ns: u16,
    reader_type: NodeId,
    thermostat_type: NodeId,
    unit_type: NodeId,
    scalar_sensor_type: NodeId,
    array_sensor_type: NodeId,
    slot_type: NodeId,
}

impl TestSpace {
    pub(crate) fn new() -> Self {
        let mut space = AddressSpace::new();
        let ns = space.register_namespace(bn::LADS_NAMESPACE);
        let base = space.base_object_type();
        let object_type = |space: &mut AddressSpace, name: &str, supertype: NodeId| {
            space
                .add_object_type(QualifiedName::new(ns, name), supertype)
                .unwrap()
        };
        let device = object_type(&mut space, bn::DEVICE_TYPE, base);
        let lads_device = object_type(&mut space, bn::LADS_DEVICE_TYPE, device);
        let function = object_type(&mut space, bn::FUNCTION_TYPE, base);
        let reader_type = object_type(&mut space, bn::ABSORBANCE_READER_DEVICE_TYPE, lads_device);
        let thermostat_type = object_type(&mut space, bn::THERMOSTAT_DEVICE_TYPE, lads_device);
        let unit_type = object_type(&mut space, bn::FUNCTIONAL_UNIT_TYPE, base);
        let scalar_sensor_type =
            object_type(&mut space, bn::ANALOG_SCALAR_SENSOR_FUNCTION_TYPE, function);
        let array_sensor_type =
            object_type(&mut space, bn::ANALOG_ARRAY_SENSOR_FUNCTION_TYPE, function);
        let data_variable = space.base_data_variable_type();
        let slot_type = space
            .add_variable_type(QualifiedName::new(ns, bn::ANALOG_UNIT_RANGE_TYPE), data_variable)
            .unwrap();
        let folder = space.folder_type();
        let objects = space.objects_folder();
        let device_set = space
            .add_object(objects, QualifiedName::new(ns, bn::DEVICE_SET), folder)
            .unwrap();
        Self {
            space,
            device_set,
            ns,
            reader_type,
            thermostat_type,
            unit_type,
            scalar_sensor_type,
            array_sensor_type,
            slot_type,
        }
    }

    fn object(&mut self, parent: NodeId, name: &str, ty: NodeId) -> NodeId {
        self.space
            .add_object(parent, QualifiedName::new(self.ns, name), ty)
            .unwrap()
    }

    fn property(&mut self, parent: NodeId, name: &str, value: DataValue) {
        let data_type = value.value.data_type().unwrap();
        self.space
            .add_property(
                parent,
                QualifiedName::new(self.ns, name),
                VariableAttributes::scalar(data_type).with_value(value),
            )
            .unwrap();
    }

    fn sensor(
        &mut self,
        parent: NodeId,
        name: &str,
        ty: NodeId,
        attributes: VariableAttributes,
        units: EuInformation,
    ) {
        let sensor = self.object(parent, name, ty);
        self.property(sensor, bn::IS_ENABLED, DataValue::constant(true));
        let slot_type = self.slot_type;
        let slot = self
            .space
            .add_variable(
                sensor,
                QualifiedName::new(self.ns, bn::SENSOR_VALUE),
                slot_type,
                attributes,
            )
            .unwrap();
        self.property(slot, bn::ENGINEERING_UNITS, DataValue::constant(units));
        self.property(
            slot,
            bn::EU_RANGE,
            DataValue::constant(Range::new(0.0, 10_000.0)),
        );
    }

    /// Add a conforming absorbance reader.
    pub(crate) fn add_reader(&mut self, name: &str) -> NodeId {
        self.add_reader_with_wells(name, 96)
    }

    /// Add a reader whose plate has `wells` wells.
    pub(crate) fn add_reader_with_wells(&mut self, name: &str, wells: usize) -> NodeId {
        let folder = self.space.folder_type();
        let device = self.object(self.device_set, name, self.reader_type);
        let units = self.object(device, bn::FUNCTIONAL_UNIT_SET, folder);
        let unit = self.object(units, bn::ABSORBANCE_READER_UNIT, self.unit_type);
        let functions = self.object(unit, bn::FUNCTION_SET, folder);
        self.sensor(
            functions,
            bn::TEMPERATURE_SENSOR,
            self.scalar_sensor_type,
            VariableAttributes::scalar(DataType::Double),
            EuInformation::degree_celsius(),
        );
        self.sensor(
            functions,
            bn::ABSORBANCE_SENSOR,
            self.array_sensor_type,
            VariableAttributes::array(DataType::Double, Some(wells)),
            EuInformation::absorbance_unit(),
        );
        device
    }

    /// Add a thermostat: a device of another type, with no functional units.
    pub(crate) fn add_thermostat(&mut self, name: &str) -> NodeId {
        let folder = self.space.folder_type();
        let device = self.object(self.device_set, name, self.thermostat_type);
        self.object(device, bn::FUNCTIONAL_UNIT_SET, folder);
        device
    }
}

/// A space holding a single reader, returned with the reader's node.
pub(crate) fn reader_space() -> (AddressSpace, NodeId) {
    let mut test = TestSpace::new();
    let reader = test.add_reader("Reader1");
    (test.space, reader)
}
