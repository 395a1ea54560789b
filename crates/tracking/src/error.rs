//! Tracking error types.

use shipment_store::StoreError;
use thiserror::Error;

/// Which joined address a shipment record was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSide {
    Origin,
    Destination,
    Both,
}

impl std::fmt::Display for AddressSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressSide::Origin => write!(f, "origin"),
            AddressSide::Destination => write!(f, "destination"),
            AddressSide::Both => write!(f, "origin and destination"),
        }
    }
}

/// Retryable failures raised while answering a tracking query.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The shipment store failed. Carried through unchanged.
    #[error("Shipment store error: {0}")]
    Store(#[from] StoreError),

    /// A single shipment matched but its address joins came back empty.
    #[error("Shipment {tracking_code} is missing its {missing} address")]
    IncompleteShipment {
        tracking_code: String,
        missing: AddressSide,
    },
}

/// Result type for tracking operations.
pub type Result<T> = std::result::Result<T, TrackingError>;
