use serde::{Deserialize, Serialize};

/// Runtime configuration for the monitoring core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// SQLite database file, created on first use.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Broadcast capacity per fan-out group; subscribers that fall further
    /// behind lose the oldest events.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Group key dashboard subscribers listen on.
    #[serde(default = "default_dashboard_group")]
    pub dashboard_group: String,

    /// Snowflake machine / node identifiers (0-31 each).
    #[serde(default = "default_machine_id")]
    pub machine_id: i32,
    #[serde(default = "default_node_id")]
    pub node_id: i32,
}

fn default_db_path() -> String {
    "data/sensormon.db".to_string()
}

fn default_event_capacity() -> usize {
    256
}

fn default_dashboard_group() -> String {
    "dashboard".to_string()
}

fn default_machine_id() -> i32 {
    1
}

fn default_node_id() -> i32 {
    1
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            event_capacity: default_event_capacity(),
            dashboard_group: default_dashboard_group(),
            machine_id: default_machine_id(),
            node_id: default_node_id(),
        }
    }
}

impl MonitorConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
