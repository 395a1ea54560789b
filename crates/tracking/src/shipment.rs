//! Validated shipment entities.

use chrono::{DateTime, NaiveDate, Utc};
use common::ShipmentId;
use serde::Serialize;
use shipment_store::{AddressRecord, ShipmentRecord};

use crate::error::{AddressSide, TrackingError};
use crate::timeline::Timeline;

/// A tracking code that is known to be non-empty after trimming.
///
/// Matching against the store is exact and case-sensitive; no other
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Trims `raw` and returns `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TrackingCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A postal address on either end of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    pub province: String,
    pub country: String,
}

impl Address {
    /// Short "country, province" form used for route summaries.
    pub fn region(&self) -> String {
        format!("{}, {}", self.country, self.province)
    }
}

impl From<AddressRecord> for Address {
    fn from(record: AddressRecord) -> Self {
        Self {
            street: record.street,
            province: record.province,
            country: record.country,
        }
    }
}

/// A shipment whose origin and destination are both known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub tracking_code: String,
    pub status: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub origin: Address,
    pub destination: Address,
}

impl Shipment {
    /// Returns the calendar date of the estimated delivery, if any.
    pub fn estimated_delivery_date(&self) -> Option<NaiveDate> {
        self.estimated_delivery.map(|at| at.date_naive())
    }

    /// Status to display: the most recent timeline entry, or the
    /// shipment's own stored status when there is no history yet.
    pub fn current_status<'a>(&'a self, timeline: &'a Timeline) -> &'a str {
        timeline.current_status(&self.status)
    }
}

impl TryFrom<ShipmentRecord> for Shipment {
    type Error = TrackingError;

    fn try_from(record: ShipmentRecord) -> Result<Self, Self::Error> {
        let (origin, destination) = match (record.origin, record.destination) {
            (Some(origin), Some(destination)) => (origin, destination),
            (origin, destination) => {
                let missing = match (origin.is_none(), destination.is_none()) {
                    (true, true) => AddressSide::Both,
                    (true, false) => AddressSide::Origin,
                    _ => AddressSide::Destination,
                };
                return Err(TrackingError::IncompleteShipment {
                    tracking_code: record.tracking_code,
                    missing,
                });
            }
        };

        Ok(Self {
            id: record.id,
            tracking_code: record.tracking_code,
            status: record.status,
            estimated_delivery: record.estimated_delivery,
            origin: origin.into(),
            destination: destination.into(),
        })
    }
}
