//! Persistence boundaries for the sensor dashboard.
//!
//! [`ReadingStore`] owns the sensor registry and the append-only reading
//! log; [`AlertStore`] owns alert records. The default implementation
//! ([`engine::SqliteStore`]) keeps both in a single SQLite database with
//! WAL mode for concurrent reads.

pub mod engine;
pub mod error;


use chrono::{DateTime, Utc};
use error::Result;
use sensormon_common::types::{Alert, Reading, Sensor};
use std::collections::HashMap;

/// Sensor registry plus the append-only reading log.
///
/// Implementations must be safe to share across threads (`Send + Sync`):
/// the store is hit by the ingest path and dashboard queries concurrently.
/// Updates to a single sensor are expected to be serialized by the caller
/// (at most one in-flight ingest per sensor, or last-writer-wins).
pub trait ReadingStore: Send + Sync {
    /// Creates a sensor. Rejects bounds that are not ordered.
    fn create_sensor(&self, sensor: &Sensor) -> Result<()>;

    /// Fetches a sensor by ID. Missing sensors are a
    /// [`error::StorageError::NotFound`].
    fn get_sensor(&self, sensor_id: &str) -> Result<Sensor>;

    /// Looks up a sensor by its (unique) name. Import upserts match on name.
    fn find_sensor_by_name(&self, name: &str) -> Result<Option<Sensor>>;

    /// Persists the sensor's mutated fields (value, status, last_update,
    /// bounds, metadata). Rejects bounds that are not ordered.
    fn save_sensor(&self, sensor: &Sensor) -> Result<()>;

    /// Lists all sensors, ordered by name.
    fn list_sensors(&self) -> Result<Vec<Sensor>>;

    /// Deletes a sensor and, with it, its readings and alerts.
    /// Returns false when the sensor does not exist.
    fn delete_sensor(&self, sensor_id: &str) -> Result<bool>;

    /// Appends an immutable reading record.
    fn append_reading(&self, reading: &Reading) -> Result<()>;

    /// Returns the latest `limit` readings for a sensor, newest first.
    fn recent_readings(&self, sensor_id: &str, limit: usize) -> Result<Vec<Reading>>;

    /// Sensor counts grouped by status, for the dashboard header.
    fn status_summary(&self) -> Result<HashMap<String, u64>>;
}

/// Alert record persistence.
pub trait AlertStore: Send + Sync {
    /// Persists a newly raised alert.
    fn create_alert(&self, alert: &Alert) -> Result<()>;

    /// Resolves an alert by ID. Returns false when the alert does not exist
    /// or is already resolved; an already resolved alert keeps its original
    /// resolution time.
    fn resolve_alert(&self, alert_id: &str, now: DateTime<Utc>) -> Result<bool>;

    /// Fetches a single alert by ID.
    fn get_alert(&self, alert_id: &str) -> Result<Option<Alert>>;

    /// Returns the latest `limit` alerts for a sensor, newest first.
    fn recent_alerts(&self, sensor_id: &str, limit: usize) -> Result<Vec<Alert>>;

    /// Returns unresolved alerts across all sensors, newest first.
    fn unresolved_alerts(&self, limit: usize) -> Result<Vec<Alert>>;

    /// Count of unresolved alerts.
    fn count_unresolved(&self) -> Result<u64>;
}
