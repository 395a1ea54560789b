//! Tracking resolution and timeline reconstruction.
//!
//! This crate turns a user-supplied tracking code into a single outcome:
//! - [`ShipmentResolver`] looks the code up and enforces uniqueness
//! - [`TimelineBuilder`] orders and de-duplicates a shipment's event history
//! - [`TrackingService`] composes both into a [`TrackingQueryResult`]
//!
//! All reads go through a [`shipment_store::ShipmentRepository`]. Nothing is
//! cached between calls.

pub mod error;
pub mod outcome;
pub mod resolver;
pub mod service;
pub mod shipment;
pub mod timeline;

pub use error::{AddressSide, Result, TrackingError};
pub use outcome::TrackingQueryResult;
pub use resolver::{Resolution, ShipmentResolver};
pub use service::TrackingService;
pub use shipment::{Address, Shipment, TrackingCode};
pub use timeline::{Timeline, TimelineBuilder, TimelineEntry, TimelineMarker, build_timeline};
