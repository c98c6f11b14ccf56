use crate::hub::{EventHub, DASHBOARD_GROUP};
use crate::Publisher;
use chrono::Utc;
use sensormon_common::types::{SensorEvent, Status};
use tokio::sync::broadcast::error::TryRecvError;

fn make_event(sensor_id: &str, value: f64, status: Status) -> SensorEvent {
    SensorEvent {
        sensor_id: sensor_id.to_string(),
        sensor_name: format!("Sensor {sensor_id}"),
        value,
        unit: Some("°C".to_string()),
        status,
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn subscribers_receive_published_events() {
    let hub = EventHub::new(16);
    let mut rx = hub.subscribe(DASHBOARD_GROUP);

    let event = make_event("s-1", 85.0, Status::Warning);
    hub.publish(DASHBOARD_GROUP, &event).await.unwrap();

    let received = rx.recv().await.unwrap();
    assert_eq!(received.sensor_id, "s-1");
    assert_eq!(received.value, 85.0);
    assert_eq!(received.status, Status::Warning);
}

#[tokio::test]
async fn publish_without_subscribers_is_a_noop() {
    let hub = EventHub::new(16);

    // Unknown group entirely.
    hub.publish("nobody-listening", &make_event("s-1", 1.0, Status::Normal))
        .await
        .unwrap();

    // Known group whose only subscriber went away.
    let rx = hub.subscribe(DASHBOARD_GROUP);
    drop(rx);
    hub.publish(DASHBOARD_GROUP, &make_event("s-1", 2.0, Status::Normal))
        .await
        .unwrap();
}

#[tokio::test]
async fn groups_are_isolated() {
    let hub = EventHub::new(16);
    let mut dashboard = hub.subscribe(DASHBOARD_GROUP);
    let mut ops = hub.subscribe("ops");

    hub.publish("ops", &make_event("s-9", 42.0, Status::Normal))
        .await
        .unwrap();

    assert_eq!(ops.recv().await.unwrap().sensor_id, "s-9");
    assert!(matches!(dashboard.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn every_reading_fans_out_not_only_status_changes() {
    let hub = EventHub::new(16);
    let mut rx = hub.subscribe(DASHBOARD_GROUP);

    for value in [50.0, 51.0, 52.0] {
        hub.publish(DASHBOARD_GROUP, &make_event("s-1", value, Status::Normal))
            .await
            .unwrap();
    }

    assert_eq!(rx.recv().await.unwrap().value, 50.0);
    assert_eq!(rx.recv().await.unwrap().value, 51.0);
    assert_eq!(rx.recv().await.unwrap().value, 52.0);
}

#[tokio::test]
async fn slow_subscriber_loses_oldest_events() {
    let hub = EventHub::new(2);
    let mut rx = hub.subscribe(DASHBOARD_GROUP);

    for value in [1.0, 2.0, 3.0, 4.0] {
        hub.publish(DASHBOARD_GROUP, &make_event("s-1", value, Status::Normal))
            .await
            .unwrap();
    }

    // Capacity 2: the subscriber lagged, then catches up on the newest two.
    assert!(matches!(
        rx.try_recv(),
        Err(TryRecvError::Lagged(_))
    ));
    assert_eq!(rx.recv().await.unwrap().value, 3.0);
    assert_eq!(rx.recv().await.unwrap().value, 4.0);
}

#[tokio::test]
async fn subscriber_count_tracks_receivers() {
    let hub = EventHub::new(16);
    assert_eq!(hub.subscriber_count(DASHBOARD_GROUP), 0);

    let rx1 = hub.subscribe(DASHBOARD_GROUP);
    let rx2 = hub.subscribe(DASHBOARD_GROUP);
    assert_eq!(hub.subscriber_count(DASHBOARD_GROUP), 2);

    drop(rx1);
    drop(rx2);
    assert_eq!(hub.subscriber_count(DASHBOARD_GROUP), 0);
}
