//! Analytics recording handle passed to services.

use std::sync::Arc;

use serde_json::Value;

use crate::bus::{EventBus, SiteEvent};

/// Records analytics events. Recording never fails and never blocks.
pub trait Analytics: Send + Sync {
    fn track(&self, name: &str, params: Value);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl Analytics for NoopAnalytics {
    fn track(&self, _name: &str, _params: Value) {}
}

/// Publishes events on the [`EventBus`]; persistence and any other consumers
/// subscribe there.
#[derive(Clone)]
pub struct BusAnalytics {
    bus: Arc<EventBus>,
}

impl BusAnalytics {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl Analytics for BusAnalytics {
    fn track(&self, name: &str, params: Value) {
        tracing::debug!(event = name, "Analytics event");
        self.bus.publish(SiteEvent::new(name).with_params(params));
    }
}
