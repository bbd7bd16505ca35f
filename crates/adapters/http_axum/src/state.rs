//! Shared application state for axum handlers.

use std::sync::Arc;

use ladsim_app::ports::{AddressSpaceHost, HistoryRepository};
use ladsim_domain::view::AbsorbanceReaderDevice;

/// Application state shared across all axum handlers.
///
/// Generic over the host and the historian to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<H, R> {
    /// Host serving the node graph.
    pub host: Arc<H>,
    /// Historian queried by the history endpoint.
    pub history: Arc<R>,
    /// Readers configured for simulation, in discovery order.
    pub devices: Arc<Vec<AbsorbanceReaderDevice>>,
}

impl<H, R> Clone for AppState<H, R> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            history: Arc::clone(&self.history),
            devices: Arc::clone(&self.devices),
        }
    }
}

impl<H, R> AppState<H, R>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    /// Create a new application state from shared components.
    pub fn new(host: Arc<H>, history: Arc<R>, devices: Vec<AbsorbanceReaderDevice>) -> Self {
        Self {
            host,
            history,
            devices: Arc::new(devices),
        }
    }
}
