use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current severity classification of a sensor, recomputed on every reading.
///
/// The threshold evaluator only ever produces `Normal`, `Warning`, or
/// `Alert`. `Disconnected` and `Error` originate from connectivity
/// monitoring and are carried on the sensor record untouched.
///
/// # Examples
///
/// ```
/// use sensormon_common::types::Status;
///
/// let status: Status = "warning".parse().unwrap();
/// assert_eq!(status, Status::Warning);
/// assert_eq!(status.to_string(), "warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
    Alert,
    Disconnected,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Normal => write!(f, "normal"),
            Status::Warning => write!(f, "warning"),
            Status::Alert => write!(f, "alert"),
            Status::Disconnected => write!(f, "disconnected"),
            Status::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Status::Normal),
            "warning" => Ok(Status::Warning),
            "alert" => Ok(Status::Alert),
            "disconnected" => Ok(Status::Disconnected),
            "error" => Ok(Status::Error),
            _ => Err(format!("unknown status: {s}")),
        }
    }
}

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use sensormon_common::types::Severity;
///
/// let sev: Severity = "critical".parse().unwrap();
/// assert_eq!(sev, Severity::Critical);
/// assert!(Severity::Critical > Severity::Warning);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// The four bounds are not ordered `min <= warning_min <= warning_max <= max`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error(
    "sensor bounds out of order: expected min <= warning_min <= warning_max <= max, \
     got ({min_value}, {warning_min}, {warning_max}, {max_value})"
)]
pub struct BoundsError {
    pub min_value: f64,
    pub warning_min: f64,
    pub warning_max: f64,
    pub max_value: f64,
}

/// Threshold configuration of a sensor.
///
/// The evaluator assumes `min_value <= warning_min <= warning_max <=
/// max_value`; [`SensorBounds::validate`] enforces it at configuration time.
/// NaN bounds fail the ordering comparison and are rejected as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorBounds {
    pub min_value: f64,
    pub warning_min: f64,
    pub warning_max: f64,
    pub max_value: f64,
}

impl SensorBounds {
    pub fn new(
        min_value: f64,
        warning_min: f64,
        warning_max: f64,
        max_value: f64,
    ) -> Result<Self, BoundsError> {
        let bounds = Self {
            min_value,
            warning_min,
            warning_max,
            max_value,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks the ordering invariant. Stores call this before persisting a
    /// sensor so the evaluator only ever sees ordered bounds.
    pub fn validate(&self) -> Result<(), BoundsError> {
        let ordered = self.min_value <= self.warning_min
            && self.warning_min <= self.warning_max
            && self.warning_max <= self.max_value;
        if ordered {
            Ok(())
        } else {
            Err(BoundsError {
                min_value: self.min_value,
                warning_min: self.warning_min,
                warning_max: self.warning_max,
                max_value: self.max_value,
            })
        }
    }
}

impl Default for SensorBounds {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            warning_min: 20.0,
            warning_max: 80.0,
            max_value: 100.0,
        }
    }
}

/// A monitored sensor: identity, current value and status, and its
/// configured bounds. Mutated by the evaluator on every accepted reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub sensor_type: Option<String>,
    pub unit: Option<String>,
    pub value: f64,
    pub status: Status,
    pub bounds: SensorBounds,
    pub last_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable historical reading, appended once per observed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub sensor_id: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A persisted boundary crossing. Distinct from [`Status`], which is
/// continuously recomputed: alerts record the event and stay unresolved
/// until an explicit resolve operation, regardless of later readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub sensor_id: String,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Live-update payload handed to the fan-out boundary on every reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorEvent {
    pub sensor_id: String,
    pub sensor_name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}
