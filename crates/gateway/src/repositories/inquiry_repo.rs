//! Repository for the `project_inquiries` collection.

use mhc_core::chat::lead::LeadRecord;
use mhc_core::collections::PROJECT_INQUIRIES;
use mhc_core::types::DocId;

use crate::error::GatewayError;
use crate::query::to_fields;
use crate::store::DocumentStore;

pub struct InquiryRepo;

impl InquiryRepo {
    /// Store a captured lead. Every call creates a new document.
    pub async fn create_lead(
        store: &dyn DocumentStore,
        lead: &LeadRecord,
    ) -> Result<DocId, GatewayError> {
        store.add_document(PROJECT_INQUIRIES, to_fields(lead)?).await
    }
}

#[cfg(test)]
mod tests {
    use mhc_core::chat::lead::{LeadForm, REASON_COST_ESTIMATE};

    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn create_lead_writes_camel_case_record() {
        let store = MemoryStore::new();
        let form = LeadForm {
            name: "Jane".into(),
            phone: "5095551234".into(),
            email: "jane@x.com".into(),
            ..Default::default()
        };
        let lead = LeadRecord::from_form(&form, REASON_COST_ESTIMATE, "conv_1");
        let id = InquiryRepo::create_lead(&store, &lead).await.unwrap();

        let doc = store.get_document(PROJECT_INQUIRIES, &id).await.unwrap().unwrap();
        assert_eq!(doc.get("source").and_then(|v| v.as_str()), Some("chatbot"));
        assert_eq!(doc.get("reason").and_then(|v| v.as_str()), Some(REASON_COST_ESTIMATE));
        assert_eq!(doc.get("conversationId").and_then(|v| v.as_str()), Some("conv_1"));
    }
}
