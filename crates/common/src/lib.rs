//! Shared types for the shipment tracking workspace.

pub mod types;

pub use types::{ShipmentEventId, ShipmentId};
