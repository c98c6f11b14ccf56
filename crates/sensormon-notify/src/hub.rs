use crate::error::Result;
use crate::Publisher;
use async_trait::async_trait;
use sensormon_common::types::SensorEvent;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Group key dashboard sessions subscribe to.
pub const DASHBOARD_GROUP: &str = "dashboard";

/// In-process pub/sub hub with one broadcast channel per group key.
///
/// Publishing to a group with no subscribers is a no-op; subscribers that
/// fall more than `capacity` events behind lose the oldest events
/// ([`tokio::sync::broadcast`] lagging semantics). The store remains the
/// authoritative state either way.
pub struct EventHub {
    capacity: usize,
    groups: Mutex<HashMap<String, broadcast::Sender<SensorEvent>>>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            groups: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to a group's events, creating the group on first use.
    pub fn subscribe(&self, group: &str) -> broadcast::Receiver<SensorEvent> {
        let mut groups = self.groups.lock().unwrap();
        groups
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of live subscribers for a group.
    pub fn subscriber_count(&self, group: &str) -> usize {
        let groups = self.groups.lock().unwrap();
        groups.get(group).map_or(0, |tx| tx.receiver_count())
    }
}

#[async_trait]
impl Publisher for EventHub {
    async fn publish(&self, group: &str, event: &SensorEvent) -> Result<()> {
        let sender = {
            let groups = self.groups.lock().unwrap();
            groups.get(group).cloned()
        };

        match sender {
            Some(tx) => {
                // send() only errors when no receiver is left; a dropped
                // live-update is acceptable.
                if tx.send(event.clone()).is_err() {
                    tracing::debug!(group, sensor_id = %event.sensor_id, "No live subscribers");
                }
            }
            None => {
                tracing::debug!(group, sensor_id = %event.sensor_id, "Unknown group, event dropped");
            }
        }
        Ok(())
    }

    fn publisher_name(&self) -> &str {
        "broadcast"
    }
}
