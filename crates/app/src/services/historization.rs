//! Historization configurator — enables history on value slots, once each.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use ladsim_domain::error::{HistoryError, LadsError};
use ladsim_domain::id::NodeId;
use ladsim_domain::view::{AbsorbanceReaderDevice, AnalogUnitRange, Shape, SlotValue};

use crate::ports::AddressSpaceHost;

/// Application service turning value slots into historized series.
///
/// Keeps the set of slots it has configured and refuses a second request
/// for the same slot without contacting the host.
pub struct HistorizationConfigurator<H> {
    host: H,
    configured: Mutex<HashSet<NodeId>>,
}

impl<H: AddressSpaceHost> HistorizationConfigurator<H> {
    /// Create a configurator installing history through `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            configured: Mutex::new(HashSet::new()),
        }
    }

    /// Set `historizing` on `slot` and register it with the historian.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::AlreadyConfigured`] when the slot was already
    /// configured by this service, or the host's error when registration is
    /// rejected. A rejected slot may be configured again later.
    #[tracing::instrument(skip(self, slot), fields(node = %slot.node_id()))]
    pub async fn enable_history<T: SlotValue>(
        &self,
        slot: &AnalogUnitRange<T>,
    ) -> Result<(), LadsError> {
        let node = slot.node_id();
        if !self.lock().insert(node) {
            return Err(HistoryError::AlreadyConfigured(node).into());
        }
        if let Err(err) = self.host.install_history(node).await {
            self.lock().remove(&node);
            return Err(err);
        }
        tracing::debug!("history enabled");
        Ok(())
    }

    /// Enable history on both sensor slots of a reader, absorbance first.
    ///
    /// A device is configured completely or not at all: when the temperature
    /// slot is rejected, the absorbance slot stops historizing and is
    /// released again.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first slot's error.
    #[tracing::instrument(skip(self, device), fields(device = %device.node_id()))]
    pub async fn configure_device(&self, device: &AbsorbanceReaderDevice) -> Result<(), LadsError> {
        let absorbance = device.absorbance();
        self.enable_history(&absorbance).await?;
        if let Err(err) = self.enable_history(&device.temperature()).await {
            let node = absorbance.node_id();
            if let Err(undo) = self.host.remove_history(node) {
                tracing::warn!(%node, error = %undo, "cannot stop historizing");
            }
            self.lock().remove(&node);
            return Err(err);
        }
        Ok(())
    }

    /// Whether `node` has been configured by this service.
    #[must_use]
    pub fn is_configured(&self, node: NodeId) -> bool {
        self.lock().contains(&node)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<NodeId>> {
        self.configured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
