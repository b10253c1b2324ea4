//! Repository for the `analytics_events` collection.

use mhc_core::collections::ANALYTICS_EVENTS;
use mhc_core::types::{DocId, Timestamp};
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::query::Fields;
use crate::store::DocumentStore;

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Store one analytics event with its parameters.
    pub async fn record(
        store: &dyn DocumentStore,
        name: &str,
        params: &Value,
        occurred_at: Timestamp,
    ) -> Result<DocId, GatewayError> {
        let mut fields = Fields::new();
        fields.insert("name".into(), json!(name));
        fields.insert("params".into(), params.clone());
        fields.insert("timestamp".into(), json!(occurred_at));
        store.add_document(ANALYTICS_EVENTS, fields).await
    }
}
