use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Result, ShipmentEventRecord, ShipmentId, ShipmentRecord, StoreError, store::ShipmentRepository,
};

#[derive(Debug, Default)]
struct InMemoryState {
    shipments: Vec<ShipmentRecord>,
    events: Vec<ShipmentEventRecord>,
    unavailable: bool,
    shipment_lookups: usize,
    event_lookups: usize,
}

/// In-memory shipment store for tests and fixture-backed runs.
///
/// Records are kept in insertion order and returned exactly as stored:
/// duplicates are not collapsed and events are not sorted, which matches
/// what the PostgreSQL adapter guarantees (nothing). Every call is counted
/// so tests can assert whether the store was consulted at all.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShipmentStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryShipmentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a shipment record. Duplicate tracking codes are allowed.
    pub async fn insert_shipment(&self, shipment: ShipmentRecord) {
        self.state.write().await.shipments.push(shipment);
    }

    /// Stores a single event record.
    pub async fn insert_event(&self, event: ShipmentEventRecord) {
        self.state.write().await.events.push(event);
    }

    /// Stores several event records in the given order.
    pub async fn insert_events(&self, events: impl IntoIterator<Item = ShipmentEventRecord>) {
        self.state.write().await.events.extend(events);
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Returns the number of stored shipment records.
    pub async fn shipment_count(&self) -> usize {
        self.state.read().await.shipments.len()
    }

    /// Returns the number of stored event records.
    pub async fn event_count(&self) -> usize {
        self.state.read().await.events.len()
    }

    /// Returns how many times `find_shipments_by_code` has been called.
    pub async fn shipment_lookup_count(&self) -> usize {
        self.state.read().await.shipment_lookups
    }

    /// Returns how many times `list_events_for_shipment` has been called.
    pub async fn event_lookup_count(&self) -> usize {
        self.state.read().await.event_lookups
    }

    /// Clears all records, counters and the outage flag.
    pub async fn clear(&self) {
        *self.state.write().await = InMemoryState::default();
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentStore {
    async fn find_shipments_by_code(&self, code: &str) -> Result<Vec<ShipmentRecord>> {
        let mut state = self.state.write().await;
        state.shipment_lookups += 1;

        if state.unavailable {
            return Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }

        Ok(state
            .shipments
            .iter()
            .filter(|s| s.tracking_code == code)
            .cloned()
            .collect())
    }

    async fn list_events_for_shipment(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<Vec<ShipmentEventRecord>> {
        let mut state = self.state.write().await;
        state.event_lookups += 1;

        if state.unavailable {
            return Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }

        Ok(state
            .events
            .iter()
            .filter(|e| e.shipment_id == shipment_id)
            .cloned()
            .collect())
    }
}
