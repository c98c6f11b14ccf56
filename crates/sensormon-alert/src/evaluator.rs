use chrono::{DateTime, Utc};
use sensormon_common::types::{Sensor, SensorBounds, Status};

/// A reading was rejected before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// The value is NaN or infinite. The sensor is left untouched.
    #[error("invalid reading value: {0} is not a finite number")]
    InvalidValue(f64),
}

/// Classify a value against a sensor's bounds.
///
/// Precedence: outside `[min_value, max_value]` is `Alert`; otherwise
/// outside `[warning_min, warning_max]` is `Warning`; otherwise `Normal`.
/// All comparisons are strict, so a value equal to `min_value` or
/// `max_value` never alerts, and a value equal to `warning_min` or
/// `warning_max` never warns.
///
/// Pure and deterministic. Bounds are assumed ordered
/// ([`SensorBounds::validate`]); callers reject non-finite values up front.
///
/// # Examples
///
/// ```
/// use sensormon_alert::evaluator::evaluate;
/// use sensormon_common::types::{SensorBounds, Status};
///
/// let bounds = SensorBounds::new(10.0, 20.0, 80.0, 90.0).unwrap();
/// assert_eq!(evaluate(&bounds, 50.0), Status::Normal);
/// assert_eq!(evaluate(&bounds, 85.0), Status::Warning);
/// assert_eq!(evaluate(&bounds, 95.0), Status::Alert);
/// ```
pub fn evaluate(bounds: &SensorBounds, value: f64) -> Status {
    if value < bounds.min_value || value > bounds.max_value {
        Status::Alert
    } else if value < bounds.warning_min || value > bounds.warning_max {
        Status::Warning
    } else {
        Status::Normal
    }
}

/// What [`apply_reading`] did to the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingOutcome {
    pub status: Status,
    /// True iff the new status differs from the sensor's status immediately
    /// before this call.
    pub status_changed: bool,
}

/// Apply a new reading to the sensor: recompute status via [`evaluate`],
/// set the current value and `last_update` to `now`, and report whether the
/// status changed.
///
/// Rejects non-finite values before any mutation. Does not persist the
/// reading or create an alert; the caller sequences those writes.
pub fn apply_reading(
    sensor: &mut Sensor,
    value: f64,
    now: DateTime<Utc>,
) -> Result<ReadingOutcome, EvalError> {
    if !value.is_finite() {
        return Err(EvalError::InvalidValue(value));
    }

    let previous = sensor.status;
    let status = evaluate(&sensor.bounds, value);

    sensor.value = value;
    sensor.status = status;
    sensor.last_update = now;
    sensor.updated_at = now;

    Ok(ReadingOutcome {
        status,
        status_changed: status != previous,
    })
}
