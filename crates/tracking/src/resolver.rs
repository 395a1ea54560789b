//! Tracking code to shipment resolution.

use shipment_store::ShipmentRepository;

use crate::Result;
use crate::shipment::{Shipment, TrackingCode};

/// What a tracking code lookup found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one shipment matched and both addresses were present.
    Resolved(Shipment),
    /// No shipment carries this code.
    NotFound,
    /// More than one shipment carries this code.
    Ambiguous { matches: usize },
}

/// Resolves tracking codes to a single validated [`Shipment`].
///
/// Never picks among duplicates: two or more matches are reported as
/// [`Resolution::Ambiguous`]. A single match with a missing address join
/// is an error rather than a shipment with blank fields.
pub struct ShipmentResolver<R: ShipmentRepository> {
    repository: R,
}

impl<R: ShipmentRepository> ShipmentResolver<R> {
    /// Creates a new resolver reading from `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Looks up `code` exactly as given.
    #[tracing::instrument(skip(self), fields(tracking_code = %code))]
    pub async fn resolve(&self, code: &TrackingCode) -> Result<Resolution> {
        let mut records = self
            .repository
            .find_shipments_by_code(code.as_str())
            .await?;

        if records.len() > 1 {
            return Ok(Resolution::Ambiguous {
                matches: records.len(),
            });
        }

        match records.pop() {
            None => Ok(Resolution::NotFound),
            Some(record) => Ok(Resolution::Resolved(Shipment::try_from(record)?)),
        }
    }
}
