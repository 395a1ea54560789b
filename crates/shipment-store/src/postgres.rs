use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};
use uuid::Uuid;

use crate::{
    AddressRecord, Result, ShipmentEventId, ShipmentEventRecord, ShipmentId, ShipmentRecord,
    store::ShipmentRepository,
};

/// PostgreSQL-backed shipment store.
///
/// Reads `global_shipments`, joining the origin address from `warehouses`
/// and the destination address from `branches`, and reads event history
/// from `global_shipment_history`.
#[derive(Clone)]
pub struct PostgresShipmentStore {
    pool: PgPool,
}

impl PostgresShipmentStore {
    /// Creates a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    // An absent join and a JSON `null` address both mean "no address".
    fn decode_address(value: Option<serde_json::Value>) -> Result<Option<AddressRecord>> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    fn row_to_shipment(row: PgRow) -> Result<ShipmentRecord> {
        Ok(ShipmentRecord {
            id: ShipmentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            tracking_code: row.try_get("tracking_number")?,
            status: row.try_get("status")?,
            estimated_delivery: row.try_get("estimated_delivery")?,
            origin: Self::decode_address(row.try_get("origin_address")?)?,
            destination: Self::decode_address(row.try_get("destination_address")?)?,
        })
    }

    fn row_to_event(row: PgRow) -> Result<ShipmentEventRecord> {
        Ok(ShipmentEventRecord {
            id: ShipmentEventId::from_uuid(row.try_get::<Uuid, _>("id")?),
            shipment_id: ShipmentId::from_uuid(row.try_get::<Uuid, _>("shipment_id")?),
            status: row.try_get("status")?,
            timestamp: row.try_get("updated_at")?,
            location: row.try_get("location")?,
            note: row.try_get("note")?,
        })
    }
}

#[async_trait]
impl ShipmentRepository for PostgresShipmentStore {
    #[tracing::instrument(skip(self))]
    async fn find_shipments_by_code(&self, code: &str) -> Result<Vec<ShipmentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.tracking_number, s.status, s.estimated_delivery,
                   w.address AS origin_address, b.address AS destination_address
            FROM global_shipments s
            LEFT JOIN warehouses w ON w.id = s.warehouse_id
            LEFT JOIN branches b ON b.id = s.branch_id
            WHERE s.tracking_number = $1
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_shipment).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn list_events_for_shipment(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<Vec<ShipmentEventRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, shipment_id, status, updated_at, location, note
            FROM global_shipment_history
            WHERE shipment_id = $1
            "#,
        )
        .bind(shipment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }
}
