//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod history;
#[allow(clippy::missing_errors_doc)]
pub mod nodes;

use axum::Router;
use axum::routing::get;

use ladsim_app::ports::{AddressSpaceHost, HistoryRepository};
use ladsim_domain::error::ValidationError;
use ladsim_domain::id::NodeId;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H, R>() -> Router<AppState<H, R>>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    Router::new()
        // Devices
        .route("/devices", get(devices::list::<H, R>))
        .route("/devices/{id}", get(devices::get::<H, R>))
        // Nodes
        .route("/nodes", get(nodes::root::<H, R>))
        .route("/nodes/{id}", get(nodes::get::<H, R>))
        .route("/nodes/{id}/history", get(history::list::<H, R>))
}

/// Parse a node id path segment (`i=42` or `42`).
fn parse_node_id(raw: &str) -> Result<NodeId, ValidationError> {
    raw.parse()
}
