/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use sensormon_storage::error::StorageError;
///
/// let err = StorageError::NotFound {
///     entity: "sensor",
///     id: "sensor-99".to_string(),
/// };
/// assert!(err.to_string().contains("sensor"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// A sensor carried bounds that violate the ordering invariant;
    /// nothing was written.
    #[error("Storage: {0}")]
    Bounds(#[from] sensormon_common::types::BoundsError),

    /// An underlying SQLite error.
    #[error("Storage: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Generic storage error for cases not covered by other variants.
    #[error("Storage: {0}")]
    Other(String),
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
