//! Solar Company OS webhook gateway.
//!
//! Umbrella crate re-exporting the workspace libraries.

pub use solaros_api as api;
pub use solaros_core as core;
pub use solaros_db as db;
pub use solaros_n8n as n8n;
