use crate::error::{IngestError, Result};
use chrono::{DateTime, Utc};
use sensormon_alert::evaluator::{self, EvalError};
use sensormon_alert::lifecycle;
use sensormon_common::types::{Reading, SensorEvent, Status};
use sensormon_notify::hub::DASHBOARD_GROUP;
use sensormon_notify::Publisher;
use sensormon_storage::{AlertStore, ReadingStore};
use std::sync::Arc;

/// Result of a successful ingest, echoed back to the caller.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestOutcome {
    pub sensor_id: String,
    pub value: f64,
    pub status: Status,
    pub status_changed: bool,
    /// ID of the alert raised by this reading, if any.
    pub alert_id: Option<String>,
}

/// Sequences the ingest path: validate, evaluate, persist, raise, publish.
///
/// Holds no state beyond its injected collaborators. Callers are expected to
/// serialize ingests per sensor (or accept last-writer-wins on the sensor
/// row; readings themselves are append-only either way).
pub struct IngestService {
    store: Arc<dyn ReadingStore>,
    alerts: Arc<dyn AlertStore>,
    publisher: Arc<dyn Publisher>,
    group: String,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn ReadingStore>,
        alerts: Arc<dyn AlertStore>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            store,
            alerts,
            publisher,
            group: DASHBOARD_GROUP.to_string(),
        }
    }

    /// Override the fan-out group key (default [`DASHBOARD_GROUP`]).
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Ingest one reading for `sensor_id`.
    ///
    /// The reading and the sensor update must both land before the event is
    /// published; any store failure aborts the operation and nothing is
    /// published. An alert is raised only when the status changed into
    /// `warning` or `alert`. Publication is fire-and-forget: delivery is
    /// never awaited and never fails the ingest.
    pub async fn ingest(
        &self,
        sensor_id: &str,
        value: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<IngestOutcome> {
        if !value.is_finite() {
            return Err(IngestError::InvalidValue(value));
        }
        let now = timestamp.unwrap_or_else(Utc::now);

        let mut sensor = self.store.get_sensor(sensor_id)?;
        let outcome = evaluator::apply_reading(&mut sensor, value, now).map_err(|e| match e {
            EvalError::InvalidValue(v) => IngestError::InvalidValue(v),
        })?;

        let reading = Reading {
            id: sensormon_common::id::next_id(),
            sensor_id: sensor.id.clone(),
            value,
            timestamp: now,
            created_at: now,
        };
        self.store.append_reading(&reading)?;
        self.store.save_sensor(&sensor)?;

        let mut alert_id = None;
        if outcome.status_changed {
            if let Some(alert) = lifecycle::build_alert(&sensor, now) {
                self.alerts.create_alert(&alert)?;
                tracing::info!(
                    sensor_id = %sensor.id,
                    severity = %alert.severity,
                    message = %alert.message,
                    "Alert raised"
                );
                alert_id = Some(alert.id);
            }
        }

        // Both writes are durable from here; hand the event to fan-out
        // without waiting on delivery.
        let event = SensorEvent {
            sensor_id: sensor.id.clone(),
            sensor_name: sensor.name.clone(),
            value,
            unit: sensor.unit.clone(),
            status: sensor.status,
            timestamp: now,
        };
        let publisher = Arc::clone(&self.publisher);
        let group = self.group.clone();
        tokio::spawn(async move {
            if let Err(e) = publisher.publish(&group, &event).await {
                tracing::warn!(error = %e, "Failed to deliver sensor event");
            }
        });

        tracing::debug!(
            sensor_id,
            value,
            status = %outcome.status,
            changed = outcome.status_changed,
            "Reading ingested"
        );

        Ok(IngestOutcome {
            sensor_id: sensor.id,
            value,
            status: outcome.status,
            status_changed: outcome.status_changed,
            alert_id,
        })
    }

    /// Explicitly resolve an alert (operator-driven). Returns false when the
    /// alert does not exist or is already resolved.
    pub fn resolve_alert(&self, alert_id: &str, now: DateTime<Utc>) -> Result<bool> {
        Ok(self.alerts.resolve_alert(alert_id, now)?)
    }
}
