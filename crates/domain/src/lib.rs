//! # ladsim-domain
//!
//! Pure domain model for the simulated LADS absorbance reader.
//!
//! ## Responsibilities
//! - Foundational types: node handles, record ids, error conventions, timestamps
//! - Define the **address space** (generic node graph: objects, variables, types)
//! - Define **variants** and **data values** carried by variables
//! - Define the **typed views** (device → functional unit → function → value slot)
//!   and the projection that checks a node against them
//! - Define **history records** for historizing variables
//! - Contain all invariant enforcement (type-checked writes, shape checks)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod address_space;
pub mod browse_names;
pub mod history;
pub mod variant;
pub mod view;
