//! Seeds sample sensors and drives readings through the ingest path,
//! printing the live events a dashboard subscriber would see.

use anyhow::{bail, Result};
use sensormon_common::types::{Sensor, SensorBounds, Status};
use sensormon_ingest::config::MonitorConfig;
use sensormon_ingest::service::IngestService;
use sensormon_notify::hub::EventHub;
use sensormon_storage::engine::SqliteStore;
use sensormon_storage::{AlertStore, ReadingStore};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scenario {
    Baseline,
    Warning,
    Alert,
    Recovery,
    All,
}

impl Scenario {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "baseline" => Ok(Self::Baseline),
            "warning" => Ok(Self::Warning),
            "alert" => Ok(Self::Alert),
            "recovery" => Ok(Self::Recovery),
            "all" => Ok(Self::All),
            _ => bail!("unknown scenario: {value}"),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Warning => "warning",
            Self::Alert => "alert",
            Self::Recovery => "recovery",
            Self::All => "all",
        }
    }
}

fn usage() {
    println!(
        "Usage:\n  sensormon-demo [options]\n\nOptions:\n  --config <path>      TOML config file (optional)\n  --scenario <name>    all|baseline|warning|alert|recovery (default: all)\n  -h, --help           show this help"
    );
}

struct Cli {
    config_path: Option<String>,
    scenario: Scenario,
}

fn parse_cli() -> Result<Option<Cli>> {
    let mut cli = Cli {
        config_path: None,
        scenario: Scenario::All,
    };
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => {
                cli.config_path = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("missing value for --config"))?,
                );
            }
            "--scenario" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --scenario"))?;
                cli.scenario = Scenario::parse(&value)?;
            }
            _ => bail!("unknown argument: {arg}"),
        }
    }
    Ok(Some(cli))
}

fn seed_sensors(store: &dyn ReadingStore) -> Result<Vec<Sensor>> {
    let samples = [
        ("Greenhouse Temp 01", "Greenhouse", "Temperature", "°C", (10.0, 18.0, 30.0, 40.0)),
        ("Greenhouse Hum 01", "Greenhouse", "Humidity", "%", (20.0, 40.0, 70.0, 90.0)),
        ("Server Room Temp", "Server Room", "Temperature", "°C", (5.0, 15.0, 27.0, 35.0)),
    ];

    let mut sensors = Vec::new();
    for (name, location, sensor_type, unit, (min, wmin, wmax, max)) in samples {
        if let Some(existing) = store.find_sensor_by_name(name)? {
            sensors.push(existing);
            continue;
        }
        let now = chrono::Utc::now();
        let sensor = Sensor {
            id: sensormon_common::id::next_id(),
            name: name.to_string(),
            location: Some(location.to_string()),
            sensor_type: Some(sensor_type.to_string()),
            unit: Some(unit.to_string()),
            value: 0.0,
            status: Status::Normal,
            bounds: SensorBounds::new(min, wmin, wmax, max)?,
            last_update: now,
            created_at: now,
            updated_at: now,
        };
        store.create_sensor(&sensor)?;
        tracing::info!(name, "Seeded sensor");
        sensors.push(sensor);
    }
    Ok(sensors)
}

/// Reading sequences per scenario, applied to the first seeded sensor
/// (bounds 10 / 18 / 30 / 40).
fn scenario_values(scenario: Scenario) -> Vec<(Scenario, f64)> {
    match scenario {
        Scenario::Baseline => vec![
            (Scenario::Baseline, 21.0),
            (Scenario::Baseline, 22.5),
            (Scenario::Baseline, 24.0),
        ],
        Scenario::Warning => vec![(Scenario::Warning, 33.0)],
        Scenario::Alert => vec![(Scenario::Alert, 45.0)],
        Scenario::Recovery => vec![(Scenario::Recovery, 45.0), (Scenario::Recovery, 22.0)],
        Scenario::All => {
            let mut values = scenario_values(Scenario::Baseline);
            values.extend(scenario_values(Scenario::Warning));
            values.extend(scenario_values(Scenario::Recovery));
            values
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sensormon=info".parse()?))
        .init();

    let Some(cli) = parse_cli()? else {
        usage();
        return Ok(());
    };

    let config = match &cli.config_path {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    sensormon_common::id::init(config.machine_id, config.node_id);

    let store = Arc::new(SqliteStore::open(Path::new(&config.db_path))?);
    let hub = Arc::new(EventHub::new(config.event_capacity));
    let reading: Arc<dyn ReadingStore> = store.clone();
    let alerts: Arc<dyn AlertStore> = store.clone();
    let service = IngestService::new(reading, alerts, hub.clone())
        .with_group(config.dashboard_group.clone());

    let sensors = seed_sensors(store.as_ref())?;
    let target = &sensors[0];
    let mut events = hub.subscribe(&config.dashboard_group);

    println!(
        "[demo] scenario={} sensor={} db={}",
        cli.scenario.as_str(),
        target.name,
        config.db_path
    );

    for (scenario, value) in scenario_values(cli.scenario) {
        let outcome = service.ingest(&target.id, value, None).await?;
        println!(
            "[demo][{}] value={value} status={} changed={} alert={}",
            scenario.as_str(),
            outcome.status,
            outcome.status_changed,
            outcome.alert_id.as_deref().unwrap_or("-"),
        );
    }

    // Give the fire-and-forget publishes a moment to land, then drain the
    // live updates a dashboard client would have received.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    while let Ok(event) = events.try_recv() {
        println!(
            "[demo][event] {} {} {}{} -> {}",
            event.timestamp.to_rfc3339(),
            event.sensor_name,
            event.value,
            event.unit.as_deref().unwrap_or(""),
            event.status
        );
    }

    let summary = store.status_summary()?;
    let unresolved = store.count_unresolved()?;
    println!("[demo] status_summary={summary:?} unresolved_alerts={unresolved}");
    Ok(())
}
