use async_trait::async_trait;

use crate::{Result, ShipmentEventRecord, ShipmentId, ShipmentRecord};

/// Read-only access to externally owned shipment data.
///
/// Implementations must be thread-safe (Send + Sync). Neither operation
/// promises any ordering or de-duplication of what it returns, and an
/// empty result is not an error.
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Finds every shipment whose tracking code equals `code` exactly.
    ///
    /// Origin and destination addresses are joined in; a join that found
    /// nothing is returned as `None` rather than failing the lookup.
    async fn find_shipments_by_code(&self, code: &str) -> Result<Vec<ShipmentRecord>>;

    /// Lists all status events recorded for a shipment.
    async fn list_events_for_shipment(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<Vec<ShipmentEventRecord>>;
}

#[async_trait]
impl<T: ShipmentRepository + ?Sized> ShipmentRepository for std::sync::Arc<T> {
    async fn find_shipments_by_code(&self, code: &str) -> Result<Vec<ShipmentRecord>> {
        (**self).find_shipments_by_code(code).await
    }

    async fn list_events_for_shipment(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<Vec<ShipmentEventRecord>> {
        (**self).list_events_for_shipment(shipment_id).await
    }
}
