//! The caller-facing result of a tracking query.

use crate::error::TrackingError;
use crate::shipment::Shipment;
use crate::timeline::Timeline;

/// Everything a tracking query can produce.
///
/// This is the only value returned across the tracking boundary; store
/// errors are wrapped in [`TrackingQueryResult::TransientFailure`] rather
/// than escaping on their own.
#[derive(Debug)]
pub enum TrackingQueryResult {
    /// One shipment matched. The timeline may be empty.
    Found {
        shipment: Shipment,
        timeline: Timeline,
    },

    /// The code was empty or whitespace-only. The store was not queried.
    InvalidInput,

    /// No shipment carries this code.
    NotFound,

    /// More than one shipment carries a code that should be unique.
    ///
    /// This points at an upstream data bug, not at the user.
    Ambiguous { tracking_code: String, matches: usize },

    /// The store failed or returned an inconsistent join. Safe to retry.
    TransientFailure { cause: TrackingError },
}

impl TrackingQueryResult {
    /// Stable snake_case name, used for log fields and metric labels.
    pub fn outcome_name(&self) -> &'static str {
        match self {
            TrackingQueryResult::Found { .. } => "found",
            TrackingQueryResult::InvalidInput => "invalid_input",
            TrackingQueryResult::NotFound => "not_found",
            TrackingQueryResult::Ambiguous { .. } => "ambiguous",
            TrackingQueryResult::TransientFailure { .. } => "transient_failure",
        }
    }

    /// Returns true if repeating the same query might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrackingQueryResult::TransientFailure { .. })
    }

    /// Returns true for [`TrackingQueryResult::Found`].
    pub fn is_found(&self) -> bool {
        matches!(self, TrackingQueryResult::Found { .. })
    }
}
