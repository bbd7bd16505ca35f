//! # ladsim-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `AddressSpaceHost` — read access to the node graph, value commits,
//!     history installation
//!   - `HistoryRepository` — registration and storage of historized values
//! - Provide the **use-case services**:
//!   - device discovery below `Objects/DeviceSet`
//!   - `HistorizationConfigurator` — enables history on sensor slots once
//!   - `SynthesisEngine` — computes and commits readings through typed views
//!   - `SimulationScheduler` — the periodic task ticking every device
//! - Provide **in-process infrastructure** (`InProcessHost`) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `ladsim-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod host;
pub mod ports;
pub mod scheduler;
pub mod services;

#[cfg(test)]
mod testing;
