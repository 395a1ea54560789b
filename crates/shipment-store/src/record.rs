use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ShipmentEventId, ShipmentId};

/// A postal address as stored on a warehouse or branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub street: String,
    pub province: String,
    pub country: String,
}

impl AddressRecord {
    /// Creates a new address record.
    pub fn new(
        street: impl Into<String>,
        province: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            province: province.into(),
            country: country.into(),
        }
    }
}

/// A shipment row with its origin and destination joined in.
///
/// A join that found nothing is represented as `None`. Whether that is
/// acceptable is decided by the caller, not the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Unique identifier for this shipment.
    pub id: ShipmentId,

    /// User-facing tracking code. Case-sensitive.
    pub tracking_code: String,

    /// Free-text status code as last written upstream.
    pub status: String,

    /// Estimated delivery time, if one has been promised.
    pub estimated_delivery: Option<DateTime<Utc>>,

    /// Origin warehouse address.
    pub origin: Option<AddressRecord>,

    /// Destination branch address.
    pub destination: Option<AddressRecord>,
}

impl ShipmentRecord {
    /// Creates a shipment record with a fresh ID and no joined addresses.
    pub fn new(tracking_code: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: ShipmentId::new(),
            tracking_code: tracking_code.into(),
            status: status.into(),
            estimated_delivery: None,
            origin: None,
            destination: None,
        }
    }

    /// Sets the shipment ID.
    pub fn with_id(mut self, id: ShipmentId) -> Self {
        self.id = id;
        self
    }

    /// Sets the origin address.
    pub fn with_origin(mut self, origin: AddressRecord) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Sets the destination address.
    pub fn with_destination(mut self, destination: AddressRecord) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Sets the estimated delivery time.
    pub fn with_estimated_delivery(mut self, at: DateTime<Utc>) -> Self {
        self.estimated_delivery = Some(at);
        self
    }
}

/// A single status event in a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentEventRecord {
    /// Unique identifier for this event.
    pub id: ShipmentEventId,

    /// The shipment this event refers to.
    pub shipment_id: ShipmentId,

    /// Status code recorded with the event (e.g., "in_transit").
    pub status: String,

    /// When the status change happened.
    pub timestamp: DateTime<Utc>,

    /// Where the status change happened.
    pub location: String,

    /// Optional human-readable note.
    pub note: Option<String>,
}

impl ShipmentEventRecord {
    /// Creates a new event record builder.
    pub fn builder() -> ShipmentEventRecordBuilder {
        ShipmentEventRecordBuilder::default()
    }
}

/// Builder for constructing event records.
#[derive(Debug, Default)]
pub struct ShipmentEventRecordBuilder {
    id: Option<ShipmentEventId>,
    shipment_id: Option<ShipmentId>,
    status: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    location: Option<String>,
    note: Option<String>,
}

impl ShipmentEventRecordBuilder {
    /// Sets the event ID. If not set, a new ID will be generated.
    pub fn id(mut self, id: ShipmentEventId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the owning shipment.
    pub fn shipment_id(mut self, id: ShipmentId) -> Self {
        self.shipment_id = Some(id);
        self
    }

    /// Sets the status code.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the timestamp. If not set, the current time will be used.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the note.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Builds the event record.
    ///
    /// # Panics
    ///
    /// Panics if required fields (shipment_id, status, location) are not set.
    pub fn build(self) -> ShipmentEventRecord {
        ShipmentEventRecord {
            id: self.id.unwrap_or_default(),
            shipment_id: self.shipment_id.expect("shipment_id is required"),
            status: self.status.expect("status is required"),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            location: self.location.expect("location is required"),
            note: self.note,
        }
    }

    /// Tries to build the event record, returning None if required fields are missing.
    pub fn try_build(self) -> Option<ShipmentEventRecord> {
        Some(ShipmentEventRecord {
            id: self.id.unwrap_or_default(),
            shipment_id: self.shipment_id?,
            status: self.status?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            location: self.location?,
            note: self.note,
        })
    }
}
