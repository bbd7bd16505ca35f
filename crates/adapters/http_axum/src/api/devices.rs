//! JSON handlers for the simulated readers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use ladsim_app::ports::{AddressSpaceHost, HistoryRepository};
use ladsim_domain::address_space::AddressSpace;
use ladsim_domain::error::NotFoundError;
use ladsim_domain::id::NodeId;
use ladsim_domain::time::Timestamp;
use ladsim_domain::variant::{Range, StatusCode};
use ladsim_domain::view::{AbsorbanceReaderDevice, AnalogUnitRange, Shape, SlotValue};

use crate::error::ApiError;
use crate::state::AppState;

/// Snapshot of one value slot.
#[derive(Debug, Serialize)]
pub struct SlotView<T> {
    pub node_id: NodeId,
    pub value: Option<T>,
    pub status: Option<StatusCode>,
    pub source_timestamp: Option<Timestamp>,
    pub unit: Option<String>,
    pub range: Option<Range>,
    pub historizing: bool,
}

impl<T: SlotValue> SlotView<T> {
    fn read(space: &AddressSpace, slot: &AnalogUnitRange<T>) -> Self {
        let stored = slot.data_value_in(space);
        Self {
            node_id: slot.node_id(),
            value: slot.current(space),
            status: stored.map(|dv| dv.status),
            source_timestamp: stored.and_then(|dv| dv.source_timestamp),
            unit: slot.engineering_units(space).map(|eu| eu.display_name),
            range: slot.eu_range(space),
            historizing: slot.is_historizing(space),
        }
    }
}

/// Snapshot of one reader with its current readings.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub node_id: NodeId,
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub temperature: SlotView<f64>,
    pub absorbance: SlotView<Vec<f64>>,
}

impl DeviceView {
    fn read(space: &AddressSpace, device: &AbsorbanceReaderDevice) -> Self {
        let identification = device.identification();
        Self {
            node_id: device.node_id(),
            name: space
                .node(device.node_id())
                .map(|node| node.browse_name.name.clone())
                .unwrap_or_default(),
            manufacturer: identification.manufacturer(space),
            model: identification.model(space),
            serial_number: identification.serial_number(space),
            temperature: SlotView::read(space, &device.temperature()),
            absorbance: SlotView::read(space, &device.absorbance()),
        }
    }
}

/// `GET /api/devices`
pub async fn list<H, R>(State(state): State<AppState<H, R>>) -> Json<Vec<DeviceView>>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    let views = state.host.browse(|space| {
        state
            .devices
            .iter()
            .map(|device| DeviceView::read(space, device))
            .collect()
    });
    Json(views)
}

/// `GET /api/devices/{id}`
pub async fn get<H, R>(
    State(state): State<AppState<H, R>>,
    Path(id): Path<String>,
) -> Result<Json<DeviceView>, ApiError>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    let node = super::parse_node_id(&id)?;
    let device = state
        .devices
        .iter()
        .find(|device| device.node_id() == node)
        .ok_or_else(|| NotFoundError {
            entity: "Device",
            id: node.to_string(),
        })?;
    Ok(Json(
        state.host.browse(|space| DeviceView::read(space, device)),
    ))
}
