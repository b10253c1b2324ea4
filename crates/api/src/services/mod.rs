//! Stateful services behind the HTTP handlers.
//!
//! Each service receives its gateway, analytics and notifier handles at
//! construction; nothing here reads global state.

pub mod assistant;
pub mod chat;
pub mod contact;
pub mod content;
pub mod fallback;

pub use assistant::{Assistant, LocalAssistant, RemoteAssistant};
pub use chat::ChatService;
pub use contact::ContactService;
pub use content::ContentService;
pub use fallback::ContactFallback;
