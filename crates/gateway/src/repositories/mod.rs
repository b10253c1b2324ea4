//! Typed access to the site's collections.
//!
//! Each repository is a zero-sized struct whose associated functions take the
//! store handle as their first argument.

pub mod analytics_repo;
pub mod contact_repo;
pub mod content_repo;
pub mod conversation_repo;
pub mod inquiry_repo;

pub use analytics_repo::AnalyticsRepo;
pub use contact_repo::ContactRepo;
pub use content_repo::ContentRepo;
pub use conversation_repo::ConversationRepo;
pub use inquiry_repo::InquiryRepo;

use serde::de::DeserializeOwned;

use crate::query::Document;

/// Decode documents into models, skipping (and logging) malformed ones so a
/// single bad document does not blank a whole list.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match doc.into_typed() {
                Ok(model) => Some(model),
                Err(e) => {
                    tracing::warn!(collection, id = %id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}
