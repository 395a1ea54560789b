//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p shipment-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use shipment_store::{PostgresShipmentStore, ShipmentId, ShipmentRepository, StoreError};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_shipment_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresShipmentStore {
    let info = get_container_info().await;

    let store = PostgresShipmentStore::connect(&info.connection_string, 5)
        .await
        .unwrap();

    sqlx::query(
        "TRUNCATE TABLE global_shipment_history, global_shipments, warehouses, branches CASCADE",
    )
    .execute(store.pool())
    .await
    .unwrap();

    store
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
}

async fn insert_warehouse(pool: &PgPool, address: serde_json::Value) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO warehouses (id, address) VALUES ($1, $2)")
        .bind(id)
        .bind(address)
        .execute(pool)
        .await
        .unwrap();
    id
}

async fn insert_branch(pool: &PgPool, address: serde_json::Value) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO branches (id, address) VALUES ($1, $2)")
        .bind(id)
        .bind(address)
        .execute(pool)
        .await
        .unwrap();
    id
}

async fn insert_shipment(
    pool: &PgPool,
    code: &str,
    warehouse_id: Option<Uuid>,
    branch_id: Option<Uuid>,
) -> ShipmentId {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO global_shipments (id, tracking_number, status, estimated_delivery, warehouse_id, branch_id)
        VALUES ($1, $2, 'in_transit', $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(code)
    .bind(at(18))
    .bind(warehouse_id)
    .bind(branch_id)
    .execute(pool)
    .await
    .unwrap();
    ShipmentId::from_uuid(id)
}

async fn insert_history(pool: &PgPool, shipment_id: ShipmentId, status: &str, hour: u32) {
    sqlx::query(
        r#"
        INSERT INTO global_shipment_history (id, shipment_id, status, updated_at, location, note)
        VALUES ($1, $2, $3, $4, 'Dar es Salaam', NULL)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(shipment_id.as_uuid())
    .bind(status)
    .bind(at(hour))
    .execute(pool)
    .await
    .unwrap();
}

fn dar_es_salaam() -> serde_json::Value {
    serde_json::json!({"street": "1 Dock Rd", "province": "Dar es Salaam", "country": "Tanzania"})
}

fn arusha() -> serde_json::Value {
    serde_json::json!({"street": "9 Market St", "province": "Arusha", "country": "Tanzania"})
}

#[tokio::test]
async fn find_shipment_with_joined_addresses() {
    let store = get_test_store().await;
    let warehouse = insert_warehouse(store.pool(), dar_es_salaam()).await;
    let branch = insert_branch(store.pool(), arusha()).await;
    let id = insert_shipment(store.pool(), "TZP-001", Some(warehouse), Some(branch)).await;

    let found = store.find_shipments_by_code("TZP-001").await.unwrap();
    assert_eq!(found.len(), 1);

    let shipment = &found[0];
    assert_eq!(shipment.id, id);
    assert_eq!(shipment.tracking_code, "TZP-001");
    assert_eq!(shipment.estimated_delivery, Some(at(18)));
    assert_eq!(shipment.origin.as_ref().unwrap().province, "Dar es Salaam");
    assert_eq!(shipment.destination.as_ref().unwrap().province, "Arusha");
}

#[tokio::test]
async fn find_unknown_code_returns_no_rows() {
    let store = get_test_store().await;

    let found = store.find_shipments_by_code("UNKNOWN-999").await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn find_duplicate_code_returns_every_row() {
    let store = get_test_store().await;
    let warehouse = insert_warehouse(store.pool(), dar_es_salaam()).await;
    let branch = insert_branch(store.pool(), arusha()).await;
    insert_shipment(store.pool(), "DUP-1", Some(warehouse), Some(branch)).await;
    insert_shipment(store.pool(), "DUP-1", Some(warehouse), Some(branch)).await;

    let found = store.find_shipments_by_code("DUP-1").await.unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn missing_branch_yields_absent_destination() {
    let store = get_test_store().await;
    let warehouse = insert_warehouse(store.pool(), dar_es_salaam()).await;
    insert_shipment(store.pool(), "TZP-002", Some(warehouse), None).await;

    let found = store.find_shipments_by_code("TZP-002").await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].origin.is_some());
    assert!(found[0].destination.is_none());
}

#[tokio::test]
async fn malformed_address_is_a_serialization_error() {
    let store = get_test_store().await;
    let warehouse = insert_warehouse(store.pool(), serde_json::json!({"street": 1})).await;
    let branch = insert_branch(store.pool(), arusha()).await;
    insert_shipment(store.pool(), "TZP-003", Some(warehouse), Some(branch)).await;

    let result = store.find_shipments_by_code("TZP-003").await;
    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

#[tokio::test]
async fn list_events_for_shipment_only() {
    let store = get_test_store().await;
    let warehouse = insert_warehouse(store.pool(), dar_es_salaam()).await;
    let branch = insert_branch(store.pool(), arusha()).await;
    let ours = insert_shipment(store.pool(), "TZP-001", Some(warehouse), Some(branch)).await;
    let theirs = insert_shipment(store.pool(), "TZP-009", Some(warehouse), Some(branch)).await;

    insert_history(store.pool(), ours, "picked_up", 10).await;
    insert_history(store.pool(), ours, "in_transit", 11).await;
    insert_history(store.pool(), theirs, "picked_up", 9).await;

    let mut events = store.list_events_for_shipment(ours).await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.shipment_id == ours));

    events.sort_by_key(|e| e.timestamp);
    assert_eq!(events[0].status, "picked_up");
    assert_eq!(events[1].status, "in_transit");
    assert!(events[1].note.is_none());
}

#[tokio::test]
async fn closed_pool_is_a_database_error() {
    let store = get_test_store().await;
    store.pool().close().await;

    let result = store.find_shipments_by_code("TZP-001").await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}
