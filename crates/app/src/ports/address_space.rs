//! Address space port — access to the node graph served by the host.

use std::future::Future;
use std::sync::Arc;

use ladsim_domain::address_space::AddressSpace;
use ladsim_domain::error::LadsError;
use ladsim_domain::id::NodeId;
use ladsim_domain::variant::DataValue;

/// The information-model host that owns the node graph.
///
/// Reads go through [`browse`](Self::browse) with a short-lived borrow of the
/// graph; writes and historian registration go through the host so it can
/// enforce variable types and append history.
pub trait AddressSpaceHost: Send + Sync {
    /// Run `f` against a consistent view of the node graph.
    fn browse<T>(&self, f: impl FnOnce(&AddressSpace) -> T) -> T;

    /// Commit `value` to variable `node` and return the stored value.
    ///
    /// When the variable is historizing, the value is appended to its
    /// series before it is stored. A failed or cancelled append leaves the
    /// previous value in place.
    fn write_value(
        &self,
        node: NodeId,
        value: DataValue,
    ) -> impl Future<Output = Result<DataValue, LadsError>> + Send;

    /// Mark `node` as historizing and register it with the historian.
    fn install_history(&self, node: NodeId) -> impl Future<Output = Result<(), LadsError>> + Send;

    /// Clear the `historizing` flag of `node`. Its series is kept but no
    /// longer appended to.
    fn remove_history(&self, node: NodeId) -> Result<(), LadsError>;
}

impl<H: AddressSpaceHost> AddressSpaceHost for Arc<H> {
    fn browse<T>(&self, f: impl FnOnce(&AddressSpace) -> T) -> T {
        self.as_ref().browse(f)
    }

    fn write_value(
        &self,
        node: NodeId,
        value: DataValue,
    ) -> impl Future<Output = Result<DataValue, LadsError>> + Send {
        self.as_ref().write_value(node, value)
    }

    fn install_history(&self, node: NodeId) -> impl Future<Output = Result<(), LadsError>> + Send {
        self.as_ref().install_history(node)
    }

    fn remove_history(&self, node: NodeId) -> Result<(), LadsError> {
        self.as_ref().remove_history(node)
    }
}
