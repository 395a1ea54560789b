//! Tracking query orchestration.

use std::time::Instant;

use shipment_store::ShipmentRepository;

use crate::outcome::TrackingQueryResult;
use crate::resolver::{Resolution, ShipmentResolver};
use crate::shipment::TrackingCode;
use crate::timeline::TimelineBuilder;

/// Answers tracking queries by resolving the code, then building the
/// shipment's timeline.
///
/// The two store reads are sequential: events are fetched by the resolved
/// shipment ID, never speculatively by code. The service holds no
/// per-request state, so one instance can serve any number of concurrent
/// queries. It does not retry or cancel; both are left to the caller.
pub struct TrackingService<R: ShipmentRepository + Clone> {
    resolver: ShipmentResolver<R>,
    timeline_builder: TimelineBuilder<R>,
}

impl<R: ShipmentRepository + Clone> TrackingService<R> {
    /// Creates a new tracking service over `repository`.
    pub fn new(repository: R) -> Self {
        Self {
            resolver: ShipmentResolver::new(repository.clone()),
            timeline_builder: TimelineBuilder::new(repository),
        }
    }

    /// Returns a reference to the underlying resolver.
    pub fn resolver(&self) -> &ShipmentResolver<R> {
        &self.resolver
    }

    /// Returns a reference to the underlying timeline builder.
    pub fn timeline_builder(&self) -> &TimelineBuilder<R> {
        &self.timeline_builder
    }

    /// Resolves a raw, possibly untrimmed tracking code.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_tracking(&self, raw_code: &str) -> TrackingQueryResult {
        let started = Instant::now();
        let result = self.run(raw_code).await;

        metrics::counter!("tracking_queries_total", "outcome" => result.outcome_name())
            .increment(1);
        metrics::histogram!("tracking_query_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            TrackingQueryResult::Found { shipment, timeline } => {
                tracing::info!(
                    shipment_id = %shipment.id,
                    entries = timeline.len(),
                    "tracking query resolved"
                );
            }
            TrackingQueryResult::InvalidInput => {
                tracing::debug!("blank tracking code rejected");
            }
            TrackingQueryResult::NotFound => {
                tracing::debug!("no shipment for tracking code");
            }
            TrackingQueryResult::Ambiguous {
                tracking_code,
                matches,
            } => {
                tracing::error!(
                    %tracking_code,
                    matches,
                    "tracking code matched more than one shipment"
                );
            }
            TrackingQueryResult::TransientFailure { cause } => {
                tracing::warn!(error = %cause, "tracking query failed");
            }
        }

        result
    }

    async fn run(&self, raw_code: &str) -> TrackingQueryResult {
        let Some(code) = TrackingCode::parse(raw_code) else {
            return TrackingQueryResult::InvalidInput;
        };

        let shipment = match self.resolver.resolve(&code).await {
            Ok(Resolution::Resolved(shipment)) => shipment,
            Ok(Resolution::NotFound) => return TrackingQueryResult::NotFound,
            Ok(Resolution::Ambiguous { matches }) => {
                return TrackingQueryResult::Ambiguous {
                    tracking_code: code.to_string(),
                    matches,
                };
            }
            Err(cause) => return TrackingQueryResult::TransientFailure { cause },
        };

        match self.timeline_builder.build(shipment.id).await {
            Ok(timeline) => TrackingQueryResult::Found { shipment, timeline },
            Err(cause) => TrackingQueryResult::TransientFailure { cause },
        }
    }
}
