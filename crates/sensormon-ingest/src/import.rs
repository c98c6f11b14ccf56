//! Delimited-text sensor import.
//!
//! One record per sensor: `id, name, location, type, value, unit, status,
//! last_update`. The first line is a header and is skipped. Import upserts
//! the sensor by name and pushes the value through the normal ingest path,
//! so the stored status is recomputed from the sensor's bounds rather than
//! trusted from the file.

use crate::service::IngestService;
use chrono::Utc;
use sensormon_common::types::{Sensor, SensorBounds, Status};
use sensormon_storage::ReadingStore;

/// Counts reported after an import run.
#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct ImportReport {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
}

/// Import a delimited-text file from disk.
pub async fn import_file(
    store: &dyn ReadingStore,
    service: &IngestService,
    path: &str,
) -> anyhow::Result<ImportReport> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read import file '{path}': {e}"))?;
    Ok(import_records(store, service, &content).await)
}

/// Import records from already-loaded text. Malformed rows are skipped with
/// a warning; a failed row never aborts the rest of the run.
pub async fn import_records(
    store: &dyn ReadingStore,
    service: &IngestService,
    content: &str,
) -> ImportReport {
    let mut report = ImportReport::default();

    for (lineno, line) in content.lines().enumerate() {
        if lineno == 0 || line.trim().is_empty() {
            continue;
        }

        let fields = split_record(line);
        if fields.len() < 4 {
            tracing::warn!(lineno, "Import row too short, skipping");
            report.skipped += 1;
            continue;
        }

        let name = fields[1].trim();
        if name.is_empty() {
            tracing::warn!(lineno, "Import row without a sensor name, skipping");
            report.skipped += 1;
            continue;
        }
        let location = non_empty(fields.get(2));
        let sensor_type = non_empty(fields.get(3));
        let value = fields
            .get(4)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        let unit = non_empty(fields.get(5));

        let (sensor_id, created) = match store.find_sensor_by_name(name) {
            Ok(Some(mut sensor)) => {
                sensor.location = location;
                sensor.sensor_type = sensor_type;
                sensor.unit = unit;
                sensor.updated_at = Utc::now();
                if let Err(e) = store.save_sensor(&sensor) {
                    tracing::warn!(sensor = name, error = %e, "Import row failed to save");
                    report.skipped += 1;
                    continue;
                }
                (sensor.id, false)
            }
            Ok(None) => {
                let now = Utc::now();
                let sensor = Sensor {
                    id: sensormon_common::id::next_id(),
                    name: name.to_string(),
                    location,
                    sensor_type,
                    unit,
                    value: 0.0,
                    status: Status::Normal,
                    bounds: SensorBounds::default(),
                    last_update: now,
                    created_at: now,
                    updated_at: now,
                };
                if let Err(e) = store.create_sensor(&sensor) {
                    tracing::warn!(sensor = name, error = %e, "Import row failed to create");
                    report.skipped += 1;
                    continue;
                }
                (sensor.id, true)
            }
            Err(e) => {
                tracing::warn!(sensor = name, error = %e, "Import row lookup failed");
                report.skipped += 1;
                continue;
            }
        };

        if let Err(e) = service.ingest(&sensor_id, value, None).await {
            tracing::warn!(sensor = name, error = %e, "Import row failed to ingest");
            report.skipped += 1;
            continue;
        }

        if created {
            report.created += 1;
        } else {
            report.updated += 1;
        }
    }

    tracing::info!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        "Import finished"
    );
    report
}

fn non_empty(field: Option<&String>) -> Option<String> {
    field
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

/// Split one comma-delimited record, honoring double-quoted fields with
/// `""` escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::IngestService;
    use sensormon_notify::hub::EventHub;
    use sensormon_storage::engine::SqliteStore;
    use sensormon_storage::{AlertStore, ReadingStore};
    use std::sync::Arc;

    const HEADER: &str = "ID,Name,Location,Type,Value,Unit,Status,Last Update";

    fn build_service() -> (Arc<SqliteStore>, IngestService) {
        sensormon_common::id::init(1, 1);
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let reading: Arc<dyn ReadingStore> = store.clone();
        let alerts: Arc<dyn AlertStore> = store.clone();
        let hub = Arc::new(EventHub::new(16));
        (store.clone(), IngestService::new(reading, alerts, hub))
    }

    #[test]
    fn split_record_handles_quotes() {
        assert_eq!(split_record("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_record("1,\"Temp, indoor\",Lab"),
            vec!["1", "Temp, indoor", "Lab"]
        );
        assert_eq!(split_record("x,\"say \"\"hi\"\"\""), vec!["x", "say \"hi\""]);
        assert_eq!(split_record("a,,c"), vec!["a", "", "c"]);
    }

    #[tokio::test]
    async fn import_creates_then_updates_by_name() {
        let (store, service) = build_service();

        let content = format!(
            "{HEADER}\n\
             ,Temp 01,Greenhouse,Temperature,25.5,°C,normal,\n\
             ,Hum 01,Greenhouse,Humidity,55.0,%,normal,\n"
        );
        let report = import_records(store.as_ref(), &service, &content).await;
        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 0);
        assert_eq!(report.skipped, 0);

        let sensor = store.find_sensor_by_name("Temp 01").unwrap().unwrap();
        assert_eq!(sensor.value, 25.5);
        assert_eq!(sensor.status, Status::Normal, "status recomputed");
        assert_eq!(sensor.unit.as_deref(), Some("°C"));

        // Re-import with a new value updates the existing sensor.
        let content = format!("{HEADER}\n,Temp 01,Greenhouse,Temperature,95.0,°C,normal,\n");
        let report = import_records(store.as_ref(), &service, &content).await;
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 1);

        let sensor = store.find_sensor_by_name("Temp 01").unwrap().unwrap();
        assert_eq!(sensor.value, 95.0);
        assert_eq!(
            sensor.status,
            Status::Warning,
            "status comes from the bounds, not the file"
        );
    }

    #[tokio::test]
    async fn short_rows_are_skipped_and_bad_values_default() {
        let (store, service) = build_service();

        let content = format!(
            "{HEADER}\n\
             too,short\n\
             ,Temp 02,Lab,Temperature,not-a-number,°C,normal,\n"
        );
        let report = import_records(store.as_ref(), &service, &content).await;
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);

        let sensor = store.find_sensor_by_name("Temp 02").unwrap().unwrap();
        assert_eq!(sensor.value, 0.0, "unparsable value falls back to 0.0");
    }
}
