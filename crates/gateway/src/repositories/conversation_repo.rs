//! Repository for the `chatbot_conversations` collection.

use mhc_core::chat::session::ConversationRecord;
use mhc_core::collections::CHATBOT_CONVERSATIONS;

use crate::error::GatewayError;
use crate::query::to_fields;
use crate::store::DocumentStore;

pub struct ConversationRepo;

impl ConversationRepo {
    /// Write the full conversation under its own id, replacing any earlier
    /// snapshot.
    pub async fn save(
        store: &dyn DocumentStore,
        record: &ConversationRecord,
    ) -> Result<(), GatewayError> {
        let fields = to_fields(record)?;
        store
            .set_document(CHATBOT_CONVERSATIONS, &record.conversation_id, fields)
            .await
    }
}

#[cfg(test)]
mod tests {
    use mhc_core::chat::message::Message;

    use super::*;
    use crate::memory::MemoryStore;

    fn record(messages: Vec<Message>) -> ConversationRecord {
        ConversationRecord {
            conversation_id: "conv_abc".into(),
            messages,
            lead_captured: false,
            page_url: Some("https://mhc-gc.com/".into()),
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn save_upserts_by_conversation_id() {
        let store = MemoryStore::new();
        ConversationRepo::save(&store, &record(vec![Message::bot("Hi!")]))
            .await
            .unwrap();
        ConversationRepo::save(&store, &record(vec![Message::bot("Hi!"), Message::user("cost?")]))
            .await
            .unwrap();

        let docs = store.documents(CHATBOT_CONVERSATIONS);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "conv_abc");
        assert_eq!(docs[0].get("messages").and_then(|m| m.as_array()).map(Vec::len), Some(2));
        assert_eq!(docs[0].get("conversationId").and_then(|v| v.as_str()), Some("conv_abc"));
    }
}
