//! Contact page submissions.

use std::sync::Arc;

use mhc_core::analytics::{CONTACT_FORM_ERROR, CONTACT_FORM_SUBMITTED};
use mhc_core::contact::{
    contact_failure_message, ContactForm, ContactSubmission, CONTACT_SUCCESS_MESSAGE,
};
use mhc_core::types::DocId;
use mhc_events::{Analytics, Notification, Notifier};
use mhc_gateway::repositories::ContactRepo;
use mhc_gateway::DocumentStore;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::services::fallback::ContactFallback;

#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub id: DocId,
    pub message: &'static str,
}

pub struct ContactService {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn Analytics>,
    fallback: ContactFallback,
    fallback_phone: String,
}

impl ContactService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        analytics: Arc<dyn Analytics>,
        fallback: ContactFallback,
        fallback_phone: String,
    ) -> Self {
        Self {
            store,
            notifier,
            analytics,
            fallback,
            fallback_phone,
        }
    }

    /// Validate and store a contact request, then notify the team.
    ///
    /// Invalid forms are rejected before anything is written. When the store
    /// write fails the submission is stashed locally and the visitor is asked
    /// to call instead.
    pub async fn submit(
        &self,
        mut form: ContactForm,
        user_agent: Option<String>,
        page_url: Option<String>,
    ) -> AppResult<ContactReceipt> {
        form.check()?;
        let submission = ContactSubmission::new(form, user_agent, page_url);

        match ContactRepo::create(self.store.as_ref(), &submission).await {
            Ok(id) => {
                tracing::info!(inquiry_id = %id, "Contact form stored");
                if let Err(e) = self.notifier.notify(&Notification::contact(&submission, &id)).await {
                    tracing::warn!(inquiry_id = %id, error = %e, "Contact stored but notification failed");
                }
                self.analytics.track(
                    CONTACT_FORM_SUBMITTED,
                    json!({
                        "project_type": submission.form.project_type,
                        "source": submission.source,
                    }),
                );
                Ok(ContactReceipt {
                    id,
                    message: CONTACT_SUCCESS_MESSAGE,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to store contact form");
                match self.fallback.stash(&submission).await {
                    Ok(path) => {
                        tracing::warn!(path = %path.display(), "Contact form stashed locally")
                    }
                    Err(io) => tracing::error!(
                        dir = %self.fallback.dir().display(),
                        error = %io,
                        "Failed to stash contact form"
                    ),
                }
                self.analytics
                    .track(CONTACT_FORM_ERROR, json!({ "error_message": e.to_string() }));
                Err(AppError::ServiceUnavailable(contact_failure_message(
                    &self.fallback_phone,
                )))
            }
        }
    }
}
