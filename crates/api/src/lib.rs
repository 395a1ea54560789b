//! HTTP API server with observability for shipment tracking.
//!
//! Exposes the tracking query over REST, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use shipment_store::ShipmentRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracking::TrackingService;

use routes::tracking::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: ShipmentRepository + Clone + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health::<R>))
        .route("/tracking", get(routes::tracking::by_query::<R>))
        .route("/tracking/{code}", get(routes::tracking::by_path::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over a shipment repository.
///
/// `backend` names the store for the health endpoint (e.g. "postgres").
pub fn create_state<R: ShipmentRepository + Clone + 'static>(
    repository: R,
    backend: &'static str,
) -> Arc<AppState<R>> {
    Arc::new(AppState {
        tracking: TrackingService::new(repository),
        backend,
    })
}
