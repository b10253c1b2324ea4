//! Chatbot domain: messages, the rule-based responder, the conversation
//! session state machine, and the lead capture sub-flow.

pub mod lead;
pub mod message;
pub mod responder;
pub mod session;

/// Fallback phone number offered whenever the bot cannot complete a request.
pub const DEFAULT_FALLBACK_PHONE: &str = "(509) 308-6489";
