//! Where chatbot replies come from.
//!
//! The hosted `processChatbotQuery` function answers when a Firebase project
//! is configured. The chat service falls back to the local rule table when
//! the remote call fails or returns something unusable.

use std::sync::Arc;

use async_trait::async_trait;
use mhc_core::chat::responder::{BotReply, Responder};
use mhc_core::chat::session::AssistantContext;
use mhc_gateway::{CloudFunctions, GatewayError};
use serde_json::json;

/// Callable function that answers chatbot messages.
pub const PROCESS_CHATBOT_QUERY: &str = "processChatbotQuery";

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, text: &str, context: &AssistantContext) -> Result<BotReply, GatewayError>;
}

/// Answers from the built-in rule table. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAssistant {
    responder: Responder,
}

impl LocalAssistant {
    pub fn new(responder: Responder) -> Self {
        Self { responder }
    }
}

#[async_trait]
impl Assistant for LocalAssistant {
    async fn reply(&self, text: &str, _context: &AssistantContext) -> Result<BotReply, GatewayError> {
        Ok(self.responder.respond(text))
    }
}

/// Answers through the hosted assistant function.
pub struct RemoteAssistant {
    functions: Arc<dyn CloudFunctions>,
}

impl RemoteAssistant {
    pub fn new(functions: Arc<dyn CloudFunctions>) -> Self {
        Self { functions }
    }
}

#[async_trait]
impl Assistant for RemoteAssistant {
    async fn reply(&self, text: &str, context: &AssistantContext) -> Result<BotReply, GatewayError> {
        let payload = json!({
            "message": text,
            "conversationId": context.conversation_id,
            "context": context,
            "timestamp": chrono::Utc::now(),
        });
        let result = self.functions.call(PROCESS_CHATBOT_QUERY, payload).await?;
        let reply: BotReply = serde_json::from_value(result)?;
        if reply.message.trim().is_empty() {
            return Err(GatewayError::Decode("assistant returned an empty message".into()));
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use mhc_core::chat::responder::BotAction;
    use mhc_gateway::MemoryStore;

    use super::*;

    fn context() -> AssistantContext {
        AssistantContext {
            conversation_id: "conv_1".into(),
            message_count: 2,
            lead_captured: false,
            business_hours: true,
            page_url: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn remote_reply_is_parsed() {
        let memory = Arc::new(MemoryStore::new());
        memory.set_function_result(
            PROCESS_CHATBOT_QUERY,
            json!({"message": "Remote answer", "action": {"type": "show_projects"}, "type": "general"}),
        );
        let assistant = RemoteAssistant::new(memory.clone());

        let reply = assistant.reply("hello", &context()).await.unwrap();
        assert_eq!(reply.message, "Remote answer");
        assert_eq!(reply.action, Some(BotAction::ShowProjects));

        let calls = memory.function_calls();
        assert_eq!(calls[0].payload["message"], "hello");
        assert_eq!(calls[0].payload["context"]["messageCount"], 2);
    }

    #[tokio::test]
    async fn unusable_remote_reply_is_an_error() {
        let memory = Arc::new(MemoryStore::new());
        let assistant = RemoteAssistant::new(memory);
        // No configured result: the function returns null.
        assert!(assistant.reply("hello", &context()).await.is_err());
    }

    #[tokio::test]
    async fn local_assistant_uses_rules() {
        let reply = LocalAssistant::default()
            .reply("How long will it take?", &context())
            .await
            .unwrap();
        assert!(reply.action.is_some());
    }
}
