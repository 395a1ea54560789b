use thiserror::Error;

/// Errors that can occur when reading from a shipment store.
///
/// "No rows" is never an error at this layer; lookups return an empty
/// collection instead. Every variant here is retryable from the caller's
/// point of view.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Shipment store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored JSON column could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for shipment store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
