//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod address_space;
pub mod history;

pub use address_space::AddressSpaceHost;
pub use history::HistoryRepository;
