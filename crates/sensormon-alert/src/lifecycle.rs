use chrono::{DateTime, Utc};
use sensormon_common::types::{Alert, Sensor, Severity, Status};

/// Severity of the alert raised for a status. `None` for statuses that never
/// raise alerts.
pub fn severity_for(status: Status) -> Option<Severity> {
    match status {
        Status::Warning => Some(Severity::Warning),
        Status::Alert => Some(Severity::Critical),
        _ => None,
    }
}

/// Build the alert record for a sensor that just transitioned into
/// `warning` or `alert`. Returns `None` for any other status.
///
/// Callers invoke this only on a status change; repeated readings in the
/// same status create no further alerts. The alert records the crossing
/// (current state lives on the sensor row) and stays unresolved until
/// [`resolve`] is called explicitly, regardless of later readings.
pub fn build_alert(sensor: &Sensor, now: DateTime<Utc>) -> Option<Alert> {
    let severity = severity_for(sensor.status)?;
    Some(Alert {
        id: sensormon_common::id::next_id(),
        sensor_id: sensor.id.clone(),
        message: alert_message(sensor),
        severity,
        timestamp: now,
        is_resolved: false,
        resolved_at: None,
        created_at: now,
        updated_at: now,
    })
}

fn alert_message(sensor: &Sensor) -> String {
    let bounds = &sensor.bounds;
    let detail = if sensor.value < bounds.min_value {
        format!("below minimum {:.1}", bounds.min_value)
    } else if sensor.value > bounds.max_value {
        format!("above maximum {:.1}", bounds.max_value)
    } else if sensor.value < bounds.warning_min {
        format!("below warning threshold {:.1}", bounds.warning_min)
    } else {
        format!("above warning threshold {:.1}", bounds.warning_max)
    };
    let unit = sensor.unit.as_deref().unwrap_or("");
    format!(
        "{}: value {:.1}{} is {}",
        sensor.name, sensor.value, unit, detail
    )
}

/// Explicitly resolve an alert (operator- or collaborator-driven).
/// Idempotent: an already resolved alert keeps its original resolution time.
pub fn resolve(alert: &mut Alert, now: DateTime<Utc>) {
    if alert.is_resolved {
        return;
    }
    alert.is_resolved = true;
    alert.resolved_at = Some(now);
    alert.updated_at = now;
}
