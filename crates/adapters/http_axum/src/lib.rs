//! # ladsim-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **read-only JSON API** for inspecting the simulation
//!   (`/api/devices`, `/api/nodes/{id}`, `/api/nodes/{id}/history`)
//! - Map application results and errors into HTTP responses
//!
//! This is an inspection surface only; it does not speak OPC UA and never
//! writes to the node graph.
//!
//! ## Dependency rule
//! Depends on `ladsim-app` (for port traits) and `ladsim-domain` (for domain
//! types used in response mapping). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
