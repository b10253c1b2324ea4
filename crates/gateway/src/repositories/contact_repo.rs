//! Repository for the `contact_forms` collection.

use mhc_core::collections::CONTACT_FORMS;
use mhc_core::contact::ContactSubmission;
use mhc_core::types::DocId;

use crate::error::GatewayError;
use crate::query::to_fields;
use crate::store::DocumentStore;

pub struct ContactRepo;

impl ContactRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        submission: &ContactSubmission,
    ) -> Result<DocId, GatewayError> {
        store.add_document(CONTACT_FORMS, to_fields(submission)?).await
    }
}
