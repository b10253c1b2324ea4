//! Sales-team notifications for captured leads and contact requests.
//!
//! A [`Notification`] is a subject line plus the JSON payload the hosted
//! `sendContactEmail` function expects. Failures are reported to the caller,
//! which logs them; a failed notification never undoes a stored record.

use std::sync::Arc;

use async_trait::async_trait;
use mhc_core::chat::lead::LeadRecord;
use mhc_core::contact::ContactSubmission;
use mhc_core::types::DocId;
use mhc_gateway::{CloudFunctions, GatewayError};
use serde_json::{json, Value};

use crate::delivery::email::{EmailDelivery, EmailError};

/// Callable function that emails the sales team.
pub const SEND_CONTACT_EMAIL: &str = "sendContactEmail";

const NOTIFICATION_TYPE_CONTACT: &str = "contact_form";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub subject: String,
    pub payload: Value,
}

impl Notification {
    pub fn lead(lead: &LeadRecord) -> Self {
        Self {
            subject: lead.notification_subject(),
            payload: lead.notification_payload(),
        }
    }

    /// Contact request stored as `inquiry_id`.
    pub fn contact(submission: &ContactSubmission, inquiry_id: &DocId) -> Self {
        let subject = format!(
            "New Contact Request: {} - {}",
            submission.form.name, submission.form.project_type
        );
        let mut payload = serde_json::to_value(submission).unwrap_or_else(|_| json!({}));
        if let Some(map) = payload.as_object_mut() {
            map.insert("inquiryId".into(), json!(inquiry_id));
            map.insert("type".into(), json!(NOTIFICATION_TYPE_CONTACT));
            map.insert("subject".into(), json!(subject));
        }
        Self { subject, payload }
    }

    /// Plain-text rendering for email channels.
    pub fn body(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Used when no channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::debug!(subject = %notification.subject, "No notifier configured, skipping");
        Ok(())
    }
}

/// Sends through the hosted `sendContactEmail` callable function.
pub struct FunctionNotifier {
    functions: Arc<dyn CloudFunctions>,
}

impl FunctionNotifier {
    pub fn new(functions: Arc<dyn CloudFunctions>) -> Self {
        Self { functions }
    }
}

#[async_trait]
impl Notifier for FunctionNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.functions
            .call(SEND_CONTACT_EMAIL, notification.payload.clone())
            .await?;
        tracing::info!(subject = %notification.subject, "Notification sent");
        Ok(())
    }
}

/// Sends directly over SMTP to a fixed recipient.
pub struct EmailNotifier {
    delivery: EmailDelivery,
    to: String,
}

impl EmailNotifier {
    pub fn new(delivery: EmailDelivery, to: impl Into<String>) -> Self {
        Self {
            delivery,
            to: to.into(),
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.delivery
            .send(&self.to, &notification.subject, notification.body())
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
