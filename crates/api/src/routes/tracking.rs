//! Tracking lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipment_store::ShipmentRepository;
use tracking::{Address, Shipment, Timeline, TrackingQueryResult, TrackingService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<R: ShipmentRepository + Clone> {
    pub tracking: TrackingService<R>,
    pub backend: &'static str,
}

// -- Request types --

#[derive(Deserialize)]
pub struct TrackingParams {
    pub code: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct TrackingResponse {
    pub tracking_code: String,
    pub status: String,
    pub current_status: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub origin: AddressResponse,
    pub destination: AddressResponse,
    pub timeline: Vec<TimelineEntryResponse>,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub street: String,
    pub province: String,
    pub country: String,
    pub region: String,
}

#[derive(Serialize)]
pub struct TimelineEntryResponse {
    pub id: String,
    pub status: String,
    pub label: String,
    pub location: String,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub current: bool,
}

impl From<&Address> for AddressResponse {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            province: address.province.clone(),
            country: address.country.clone(),
            region: address.region(),
        }
    }
}

impl TrackingResponse {
    fn new(shipment: &Shipment, timeline: &Timeline) -> Self {
        Self {
            tracking_code: shipment.tracking_code.clone(),
            status: shipment.status.clone(),
            current_status: shipment.current_status(timeline).to_string(),
            estimated_delivery: shipment.estimated_delivery,
            origin: (&shipment.origin).into(),
            destination: (&shipment.destination).into(),
            timeline: timeline
                .iter()
                .map(|entry| TimelineEntryResponse {
                    id: entry.event_id.to_string(),
                    status: entry.status.clone(),
                    label: entry.label().to_string(),
                    location: entry.location.clone(),
                    note: entry.note.clone(),
                    timestamp: entry.timestamp,
                    current: entry.is_current(),
                })
                .collect(),
        }
    }
}

fn respond(result: TrackingQueryResult) -> Result<Json<TrackingResponse>, ApiError> {
    match result {
        TrackingQueryResult::Found { shipment, timeline } => {
            Ok(Json(TrackingResponse::new(&shipment, &timeline)))
        }
        TrackingQueryResult::InvalidInput => Err(ApiError::InvalidInput),
        TrackingQueryResult::NotFound => Err(ApiError::NotFound),
        TrackingQueryResult::Ambiguous {
            tracking_code,
            matches,
        } => Err(ApiError::Ambiguous {
            tracking_code,
            matches,
        }),
        TrackingQueryResult::TransientFailure { cause } => {
            Err(ApiError::Unavailable(cause.to_string()))
        }
    }
}

// -- Handlers --

/// GET /tracking?code= — look up a shipment by query parameter.
///
/// A missing `code` parameter is treated like an empty one.
#[tracing::instrument(skip(state, params))]
pub async fn by_query<R: ShipmentRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<TrackingParams>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let code = params.code.unwrap_or_default();
    respond(state.tracking.resolve_tracking(&code).await)
}

/// GET /tracking/:code — look up a shipment by path segment.
#[tracing::instrument(skip(state))]
pub async fn by_path<R: ShipmentRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(code): Path<String>,
) -> Result<Json<TrackingResponse>, ApiError> {
    respond(state.tracking.resolve_tracking(&code).await)
}
