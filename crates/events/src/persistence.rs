//! Durable analytics persistence.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every received [`SiteEvent`] to `analytics_events`. It runs as
//! a long-lived background task and stops when the bus is dropped.

use std::sync::Arc;

use mhc_gateway::repositories::AnalyticsRepo;
use mhc_gateway::DocumentStore;
use tokio::sync::broadcast;

use crate::bus::SiteEvent;

pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop until the channel closes.
    pub async fn run(store: Arc<dyn DocumentStore>, mut receiver: broadcast::Receiver<SiteEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) =
                        AnalyticsRepo::record(store.as_ref(), &event.name, &event.params, event.timestamp)
                            .await
                    {
                        tracing::error!(
                            error = %e,
                            event = %event.name,
                            "Failed to persist analytics event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Analytics persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, analytics persistence shutting down");
                    break;
                }
            }
        }
    }
}
