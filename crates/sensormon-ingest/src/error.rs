use sensormon_storage::error::StorageError;

/// Errors surfaced to callers of the ingest operation.
///
/// Fan-out delivery failures are deliberately absent: they are logged and
/// never fail an ingest.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The reading value is NaN or infinite; nothing was written.
    #[error("Ingest: invalid value: {0} is not a finite number")]
    InvalidValue(f64),

    /// The referenced sensor does not exist in the store.
    #[error("Ingest: unknown sensor '{0}'")]
    UnknownSensor(String),

    /// A store lookup or write failed; the ingest failed as a whole and may
    /// be retried.
    #[error("Ingest: storage failure: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound {
                entity: "sensor",
                id,
            } => Self::UnknownSensor(id),
            other => Self::Storage(other),
        }
    }
}

/// Convenience `Result` alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
