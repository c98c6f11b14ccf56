use crate::error::{Result, StorageError};
use crate::{AlertStore, ReadingStore};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use sensormon_common::types::{Alert, Reading, Sensor, SensorBounds, Severity, Status};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sensors (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    location    TEXT,
    sensor_type TEXT,
    unit        TEXT,
    value       REAL NOT NULL,
    status      TEXT NOT NULL,
    min_value   REAL NOT NULL,
    warning_min REAL NOT NULL,
    warning_max REAL NOT NULL,
    max_value   REAL NOT NULL,
    last_update INTEGER NOT NULL,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS readings (
    id         TEXT PRIMARY KEY,
    sensor_id  TEXT NOT NULL REFERENCES sensors(id) ON DELETE CASCADE,
    value      REAL NOT NULL,
    timestamp  INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_readings_sensor_ts ON readings (sensor_id, timestamp DESC);

CREATE TABLE IF NOT EXISTS alerts (
    id          TEXT PRIMARY KEY,
    sensor_id   TEXT NOT NULL REFERENCES sensors(id) ON DELETE CASCADE,
    message     TEXT NOT NULL,
    severity    TEXT NOT NULL,
    timestamp   INTEGER NOT NULL,
    is_resolved INTEGER NOT NULL DEFAULT 0,
    resolved_at INTEGER,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_alerts_sensor_ts ON alerts (sensor_id, timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_alerts_unresolved ON alerts (is_resolved, timestamp DESC);
";

/// SQLite-backed implementation of both store boundaries.
///
/// One database file holds the sensor registry, the reading log, and alert
/// records; readings and alerts are owned by their sensor via
/// `ON DELETE CASCADE`. WAL mode allows dashboard reads concurrent with the
/// ingest writer.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Other(format!("failed to create data dir: {e}")))?;
        }
        let store = Self::init(Connection::open(path)?)?;
        tracing::info!(path = %path.display(), "Opened sensor store");
        Ok(store)
    }

    /// In-memory database, used by tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn ts_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn sensor_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Sensor> {
    let status: String = row.get(6)?;
    Ok(Sensor {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        sensor_type: row.get(3)?,
        unit: row.get(4)?,
        value: row.get(5)?,
        status: status.parse().unwrap_or(Status::Error),
        bounds: SensorBounds {
            min_value: row.get(7)?,
            warning_min: row.get(8)?,
            warning_max: row.get(9)?,
            max_value: row.get(10)?,
        },
        last_update: from_millis(row.get(11)?),
        created_at: from_millis(row.get(12)?),
        updated_at: from_millis(row.get(13)?),
    })
}

fn alert_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Alert> {
    let severity: String = row.get(3)?;
    let resolved_at: Option<i64> = row.get(6)?;
    Ok(Alert {
        id: row.get(0)?,
        sensor_id: row.get(1)?,
        message: row.get(2)?,
        severity: severity.parse().unwrap_or(Severity::Info),
        timestamp: from_millis(row.get(4)?),
        is_resolved: row.get(5)?,
        resolved_at: resolved_at.map(from_millis),
        created_at: from_millis(row.get(7)?),
        updated_at: from_millis(row.get(8)?),
    })
}

const SENSOR_COLUMNS: &str = "id, name, location, sensor_type, unit, value, status, \
     min_value, warning_min, warning_max, max_value, last_update, created_at, updated_at";

const ALERT_COLUMNS: &str =
    "id, sensor_id, message, severity, timestamp, is_resolved, resolved_at, created_at, updated_at";

impl ReadingStore for SqliteStore {
    fn create_sensor(&self, sensor: &Sensor) -> Result<()> {
        sensor.bounds.validate()?;
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO sensors (id, name, location, sensor_type, unit, value, status,
                 min_value, warning_min, warning_max, max_value, last_update, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )?;
        stmt.execute(rusqlite::params![
            &sensor.id,
            &sensor.name,
            &sensor.location,
            &sensor.sensor_type,
            &sensor.unit,
            sensor.value,
            sensor.status.to_string(),
            sensor.bounds.min_value,
            sensor.bounds.warning_min,
            sensor.bounds.warning_max,
            sensor.bounds.max_value,
            ts_millis(sensor.last_update),
            ts_millis(sensor.created_at),
            ts_millis(sensor.updated_at),
        ])?;
        Ok(())
    }

    fn get_sensor(&self, sensor_id: &str) -> Result<Sensor> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {SENSOR_COLUMNS} FROM sensors WHERE id = ?1"))?;
        stmt.query_row([sensor_id], sensor_from_row)
            .optional()?
            .ok_or_else(|| StorageError::NotFound {
                entity: "sensor",
                id: sensor_id.to_string(),
            })
    }

    fn find_sensor_by_name(&self, name: &str) -> Result<Option<Sensor>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {SENSOR_COLUMNS} FROM sensors WHERE name = ?1"))?;
        Ok(stmt.query_row([name], sensor_from_row).optional()?)
    }

    fn save_sensor(&self, sensor: &Sensor) -> Result<()> {
        sensor.bounds.validate()?;
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "UPDATE sensors SET name = ?2, location = ?3, sensor_type = ?4, unit = ?5,
                 value = ?6, status = ?7, min_value = ?8, warning_min = ?9, warning_max = ?10,
                 max_value = ?11, last_update = ?12, updated_at = ?13
             WHERE id = ?1",
        )?;
        let updated = stmt.execute(rusqlite::params![
            &sensor.id,
            &sensor.name,
            &sensor.location,
            &sensor.sensor_type,
            &sensor.unit,
            sensor.value,
            sensor.status.to_string(),
            sensor.bounds.min_value,
            sensor.bounds.warning_min,
            sensor.bounds.warning_max,
            sensor.bounds.max_value,
            ts_millis(sensor.last_update),
            ts_millis(sensor.updated_at),
        ])?;
        if updated == 0 {
            return Err(StorageError::NotFound {
                entity: "sensor",
                id: sensor.id.clone(),
            });
        }
        Ok(())
    }

    fn list_sensors(&self) -> Result<Vec<Sensor>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {SENSOR_COLUMNS} FROM sensors ORDER BY name"))?;
        let rows = stmt.query_map([], sensor_from_row)?;
        let mut sensors = Vec::new();
        for row in rows {
            sensors.push(row?);
        }
        Ok(sensors)
    }

    fn delete_sensor(&self, sensor_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM sensors WHERE id = ?1", [sensor_id])?;
        Ok(deleted > 0)
    }

    fn append_reading(&self, reading: &Reading) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO readings (id, sensor_id, value, timestamp, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(rusqlite::params![
            &reading.id,
            &reading.sensor_id,
            reading.value,
            ts_millis(reading.timestamp),
            ts_millis(reading.created_at),
        ])?;
        Ok(())
    }

    fn recent_readings(&self, sensor_id: &str, limit: usize) -> Result<Vec<Reading>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, sensor_id, value, timestamp, created_at FROM readings
             WHERE sensor_id = ?1 ORDER BY timestamp DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![sensor_id, limit as i64], |row| {
            Ok(Reading {
                id: row.get(0)?,
                sensor_id: row.get(1)?,
                value: row.get(2)?,
                timestamp: from_millis(row.get(3)?),
                created_at: from_millis(row.get(4)?),
            })
        })?;
        let mut readings = Vec::new();
        for row in rows {
            readings.push(row?);
        }
        Ok(readings)
    }

    fn status_summary(&self) -> Result<HashMap<String, u64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached("SELECT status, COUNT(*) FROM sensors GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut summary = HashMap::new();
        for row in rows {
            let (status, count) = row?;
            summary.insert(status, count as u64);
        }
        Ok(summary)
    }
}

impl AlertStore for SqliteStore {
    fn create_alert(&self, alert: &Alert) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO alerts (id, sensor_id, message, severity, timestamp,
                 is_resolved, resolved_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        stmt.execute(rusqlite::params![
            &alert.id,
            &alert.sensor_id,
            &alert.message,
            alert.severity.to_string(),
            ts_millis(alert.timestamp),
            alert.is_resolved,
            alert.resolved_at.map(ts_millis),
            ts_millis(alert.created_at),
            ts_millis(alert.updated_at),
        ])?;
        Ok(())
    }

    fn resolve_alert(&self, alert_id: &str, now: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE alerts SET is_resolved = 1, resolved_at = ?2, updated_at = ?2
             WHERE id = ?1 AND is_resolved = 0",
            rusqlite::params![alert_id, ts_millis(now)],
        )?;
        Ok(updated > 0)
    }

    fn get_alert(&self, alert_id: &str) -> Result<Option<Alert>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?1"))?;
        Ok(stmt.query_row([alert_id], alert_from_row).optional()?)
    }

    fn recent_alerts(&self, sensor_id: &str, limit: usize) -> Result<Vec<Alert>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts
             WHERE sensor_id = ?1 ORDER BY timestamp DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(rusqlite::params![sensor_id, limit as i64], alert_from_row)?;
        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?);
        }
        Ok(alerts)
    }

    fn unresolved_alerts(&self, limit: usize) -> Result<Vec<Alert>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts
             WHERE is_resolved = 0 ORDER BY timestamp DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map([limit as i64], alert_from_row)?;
        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?);
        }
        Ok(alerts)
    }

    fn count_unresolved(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM alerts WHERE is_resolved = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
