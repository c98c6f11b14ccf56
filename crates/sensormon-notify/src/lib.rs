//! Best-effort fan-out of live sensor events.
//!
//! The ingest path hands every reading's event to a [`Publisher`]; the
//! default implementation ([`hub::EventHub`]) broadcasts per group key to
//! any number of subscribers (typically dashboard sessions). Delivery is
//! lossy: a slow or absent subscriber never blocks or fails ingest, and a
//! dropped live-update is recoverable by polling the store.

pub mod error;
pub mod hub;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use sensormon_common::types::SensorEvent;

/// Destination for live sensor events.
///
/// `publish` carries no acknowledgement contract: callers treat it as
/// fire-and-forget and only log failures.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Delivers the event to all current subscribers of `group`.
    async fn publish(&self, group: &str, event: &SensorEvent) -> error::Result<()>;

    /// Returns the publisher type name (e.g., `"broadcast"`).
    fn publisher_name(&self) -> &str;
}
