//! Sensor table export, mirroring the import column set.

use sensormon_common::types::Sensor;

const EXPORT_HEADER: &str = "ID,Name,Location,Type,Value,Unit,Status,Last Update";

/// Render all sensors as delimited text.
pub fn to_csv(sensors: &[Sensor]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');
    for sensor in sensors {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            escape(&sensor.id),
            escape(&sensor.name),
            escape(sensor.location.as_deref().unwrap_or("")),
            escape(sensor.sensor_type.as_deref().unwrap_or("")),
            sensor.value,
            escape(sensor.unit.as_deref().unwrap_or("")),
            sensor.status,
            sensor.last_update.to_rfc3339(),
        ));
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[derive(serde::Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    location: Option<&'a str>,
    #[serde(rename = "type")]
    sensor_type: Option<&'a str>,
    value: f64,
    unit: Option<&'a str>,
    status: String,
    last_update: String,
}

/// Render all sensors as a JSON array.
pub fn to_json(sensors: &[Sensor]) -> serde_json::Result<String> {
    let rows: Vec<ExportRow<'_>> = sensors
        .iter()
        .map(|sensor| ExportRow {
            id: &sensor.id,
            name: &sensor.name,
            location: sensor.location.as_deref(),
            sensor_type: sensor.sensor_type.as_deref(),
            value: sensor.value,
            unit: sensor.unit.as_deref(),
            status: sensor.status.to_string(),
            last_update: sensor.last_update.to_rfc3339(),
        })
        .collect();
    serde_json::to_string(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sensormon_common::types::{Sensor, SensorBounds, Status};

    fn make_sensor(name: &str, location: Option<&str>) -> Sensor {
        let now = Utc::now();
        Sensor {
            id: "1234".to_string(),
            name: name.to_string(),
            location: location.map(str::to_string),
            sensor_type: Some("Temperature".to_string()),
            unit: Some("°C".to_string()),
            value: 23.5,
            status: Status::Normal,
            bounds: SensorBounds::default(),
            last_update: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let sensors = vec![make_sensor("Temp, indoor", Some("Lab"))];
        let csv = to_csv(&sensors);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Name,Location,Type,Value,Unit,Status,Last Update")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Temp, indoor\""));
        assert!(row.contains("normal"));
    }

    #[test]
    fn json_rows_carry_the_same_columns() {
        let sensors = vec![make_sensor("Temp 01", None)];
        let json = to_json(&sensors).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let row = &parsed[0];
        assert_eq!(row["name"], "Temp 01");
        assert_eq!(row["type"], "Temperature");
        assert_eq!(row["status"], "normal");
        assert!(row["location"].is_null());
    }
}
