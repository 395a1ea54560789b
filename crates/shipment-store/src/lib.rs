//! Entity repository for shipment tracking.
//!
//! Defines the [`ShipmentRepository`] contract the tracking core reads
//! through, the raw records it returns, and two adapters:
//! - [`InMemoryShipmentStore`] for tests and fixture-backed runs
//! - [`PostgresShipmentStore`] for a relational backing store

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{ShipmentEventId, ShipmentId};
pub use error::{Result, StoreError};
pub use memory::InMemoryShipmentStore;
pub use postgres::PostgresShipmentStore;
pub use record::{AddressRecord, ShipmentEventRecord, ShipmentEventRecordBuilder, ShipmentRecord};
pub use store::ShipmentRepository;
