//! Fan-out of analytics events to in-process consumers.
//!
//! Publishing never blocks and never fails. With no subscriber the event is
//! simply discarded; a subscriber that falls more than [`CHANNEL_CAPACITY`]
//! events behind loses the oldest ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;

pub const CHANNEL_CAPACITY: usize = 512;

/// One analytics event, e.g. `chatbot_lead_captured` with its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteEvent {
    pub name: String,
    /// Snake_case keys, always a JSON object.
    pub params: Value,
    pub timestamp: DateTime<Utc>,
}

impl SiteEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Value::Object(Map::new()),
            timestamp: Utc::now(),
        }
    }

    /// Replace the parameters. Non-object values are wrapped as `{"value": ..}`.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = match params {
            Value::Object(_) => params,
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                Value::Object(map)
            }
        };
        self
    }
}

pub struct EventBus {
    sender: broadcast::Sender<SiteEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    pub fn publish(&self, event: SiteEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    #[test]
    fn every_subscriber_sees_each_event() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(SiteEvent::new("project_search").with_params(json!({"search_term": "clinic"})));

        for rx in [&mut first, &mut second] {
            let event = rx.try_recv().unwrap();
            assert_eq!(event.name, "project_search");
            assert_eq!(event.params["search_term"], "clinic");
        }
    }

    #[test]
    fn events_without_subscribers_are_discarded() {
        let bus = EventBus::default();
        bus.publish(SiteEvent::new("chatbot_opened"));

        let mut late = bus.subscribe();
        assert_matches::assert_matches!(late.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn slow_subscribers_lag_past_capacity() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for name in ["a", "b", "c"] {
            bus.publish(SiteEvent::new(name));
        }
        assert_matches::assert_matches!(rx.try_recv(), Err(TryRecvError::Lagged(1)));
        assert_eq!(rx.try_recv().unwrap().name, "b");
    }

    #[test]
    fn params_are_always_an_object() {
        assert_eq!(SiteEvent::new("x").params, json!({}));
        assert_eq!(SiteEvent::new("x").with_params(json!(3)).params, json!({"value": 3}));
    }
}
