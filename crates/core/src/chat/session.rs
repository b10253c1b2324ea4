//! Conversation session state machine.
//!
//! A session owns the append-only message history of one chatbot
//! conversation and tracks two independent pieces of state:
//!
//! - the turn state, `Idle -> AwaitingResponse -> Idle`, which serializes
//!   submissions so a second message cannot interleave with a pending reply;
//! - the lead form state, which moves from `Hidden` to `Scheduled` when a
//!   `capture_lead` action fires, to `Presented` once its delay elapses, to
//!   `Submitting` while the inquiry write is in flight, and finally to
//!   `Closed` once the lead is captured.
//!
//! Time is passed in by the caller so the scheduling logic stays pure.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::lead::{lead_failure_message, LeadForm, LeadRecord};
use super::message::Message;
use super::responder::{
    BotAction, BotReply, Responder, DEFAULT_QUICK_REPLIES, PROJECTS_MESSAGE,
    SERVICES_QUICK_REPLIES, SERVICE_AREAS_MESSAGE,
};
use crate::error::CoreError;

/// Prefix of every generated conversation id.
pub const CONVERSATION_ID_PREFIX: &str = "conv_";

/// Default delay between a `capture_lead` action and the form appearing.
pub const DEFAULT_LEAD_FORM_DELAY: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the visitor opened the chatbot from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub page_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadFormState {
    Hidden,
    Scheduled { reason: String, due_at: Instant },
    Presented { reason: String },
    Submitting { reason: String },
    Closed,
}

impl LeadFormState {
    /// Whether a form is already on its way or visible.
    fn in_flight(&self) -> bool {
        matches!(
            self,
            LeadFormState::Scheduled { .. }
                | LeadFormState::Presented { .. }
                | LeadFormState::Submitting { .. }
        )
    }
}

/// Why a submission was refused. Neither case changes session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnRejected {
    #[error("A response is still pending for this conversation")]
    Busy,
    #[error("Message text is empty")]
    EmptyText,
}

impl From<TurnRejected> for CoreError {
    fn from(err: TurnRejected) -> Self {
        match err {
            TurnRejected::Busy => CoreError::Conflict(err.to_string()),
            TurnRejected::EmptyText => CoreError::Validation(err.to_string()),
        }
    }
}

/// Everything a completed turn added to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Bot messages appended by this turn, in order.
    pub messages: Vec<Message>,
    /// Quick-reply menu to offer, if any.
    pub quick_replies: &'static [&'static str],
    /// Set when this turn scheduled the lead form.
    pub lead_form_due_at: Option<Instant>,
}

// ---------------------------------------------------------------------------
// Persisted shapes
// ---------------------------------------------------------------------------

/// Conversation document stored in `chatbot_conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub conversation_id: String,
    pub messages: Vec<Message>,
    pub lead_captured: bool,
    pub page_url: Option<String>,
    pub user_agent: Option<String>,
}

/// Context forwarded to the remote assistant alongside each message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    pub conversation_id: String,
    pub message_count: usize,
    pub lead_captured: bool,
    pub business_hours: bool,
    pub page_url: Option<String>,
    pub user_agent: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: String,
    messages: Vec<Message>,
    lead_captured: bool,
    metadata: SessionMetadata,
    turn: TurnState,
    lead_form: LeadFormState,
}

impl ConversationSession {
    /// Open a session with a fresh id and the given greeting messages.
    pub fn start(metadata: SessionMetadata, greeting: &[&str]) -> Self {
        let id = format!("{CONVERSATION_ID_PREFIX}{}", uuid::Uuid::new_v4().simple());
        Self {
            id,
            messages: greeting.iter().map(|text| Message::bot(*text)).collect(),
            lead_captured: false,
            metadata,
            turn: TurnState::Idle,
            lead_form: LeadFormState::Hidden,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn lead_captured(&self) -> bool {
        self.lead_captured
    }

    pub fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    pub fn lead_form(&self) -> &LeadFormState {
        &self.lead_form
    }

    // -- turns --

    /// Accept a user message and mark the session busy.
    ///
    /// Returns the trimmed text that should be answered. On rejection the
    /// session is left exactly as it was.
    pub fn begin_turn(&mut self, text: &str) -> Result<String, TurnRejected> {
        if self.turn == TurnState::AwaitingResponse {
            return Err(TurnRejected::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnRejected::EmptyText);
        }
        self.messages.push(Message::user(text));
        self.turn = TurnState::AwaitingResponse;
        Ok(text.to_string())
    }

    /// Append the reply to the pending turn, apply its action and go idle.
    pub fn complete_turn(&mut self, reply: BotReply, now: Instant, delay: Duration) -> TurnOutcome {
        let mut outcome = TurnOutcome {
            messages: vec![Message::bot(reply.message)],
            quick_replies: &[],
            lead_form_due_at: None,
        };

        match reply.action {
            Some(BotAction::CaptureLead { reason }) => {
                if !self.lead_captured && !self.lead_form.in_flight() {
                    let due_at = now + delay;
                    self.lead_form = LeadFormState::Scheduled {
                        reason: reason.into_owned(),
                        due_at,
                    };
                    outcome.lead_form_due_at = Some(due_at);
                }
            }
            Some(BotAction::ShowServices { .. }) => {
                outcome.quick_replies = SERVICES_QUICK_REPLIES;
            }
            Some(BotAction::ShowQuickReplies) => {
                outcome.quick_replies = DEFAULT_QUICK_REPLIES;
            }
            Some(BotAction::ShowProjects) => {
                outcome.messages.push(Message::bot(PROJECTS_MESSAGE));
            }
            Some(BotAction::ShowServiceAreas) => {
                outcome.messages.push(Message::bot(SERVICE_AREAS_MESSAGE));
            }
            None => {}
        }

        self.messages.extend(outcome.messages.iter().cloned());
        self.turn = TurnState::Idle;
        outcome
    }

    /// Release a pending turn without a reply.
    pub fn abandon_turn(&mut self) {
        self.turn = TurnState::Idle;
    }

    /// One full turn answered by a local responder.
    pub fn submit(
        &mut self,
        text: &str,
        responder: &Responder,
        now: Instant,
        delay: Duration,
    ) -> Result<TurnOutcome, TurnRejected> {
        let text = self.begin_turn(text)?;
        let reply = responder.respond(&text);
        Ok(self.complete_turn(reply, now, delay))
    }

    // -- lead form --

    /// Present a scheduled form once its delay has elapsed.
    ///
    /// Returns `true` while a form is visible to the visitor.
    pub fn poll_lead_form(&mut self, now: Instant) -> bool {
        if let LeadFormState::Scheduled { reason, due_at } = &self.lead_form {
            if now >= *due_at {
                self.lead_form = LeadFormState::Presented {
                    reason: reason.clone(),
                };
            }
        }
        matches!(self.lead_form, LeadFormState::Presented { .. })
    }

    /// Validate a submitted form and move to `Submitting`.
    ///
    /// The returned record must be written by the caller, which then reports
    /// back through [`record_lead_captured`](Self::record_lead_captured) or
    /// [`record_lead_failed`](Self::record_lead_failed).
    pub fn begin_lead_submission(&mut self, form: &LeadForm) -> Result<LeadRecord, CoreError> {
        if self.lead_captured {
            return Err(CoreError::Conflict(
                "Lead already captured for this conversation".into(),
            ));
        }
        let reason = match &self.lead_form {
            LeadFormState::Presented { reason } => reason.clone(),
            LeadFormState::Submitting { .. } => {
                return Err(CoreError::Conflict("Lead submission already in progress".into()))
            }
            _ => {
                return Err(CoreError::Conflict(
                    "No lead form is open for this conversation".into(),
                ))
            }
        };

        form.validate()?;

        let record = LeadRecord::from_form(form, &reason, &self.id);
        self.lead_form = LeadFormState::Submitting { reason };
        Ok(record)
    }

    /// The inquiry was stored. Closes the form and appends the confirmation.
    pub fn record_lead_captured(&mut self, record: &LeadRecord) -> Message {
        self.lead_captured = true;
        self.lead_form = LeadFormState::Closed;
        let message = Message::bot(record.confirmation_message());
        self.messages.push(message.clone());
        message
    }

    /// The inquiry write failed. The form is shown again so the visitor can
    /// retry, and a call-us message is appended.
    pub fn record_lead_failed(&mut self, phone: &str) -> Message {
        if let LeadFormState::Submitting { reason } = &self.lead_form {
            self.lead_form = LeadFormState::Presented {
                reason: reason.clone(),
            };
        }
        let message = Message::bot(lead_failure_message(phone));
        self.messages.push(message.clone());
        message
    }

    // -- views --

    pub fn context(&self, business_hours: bool) -> AssistantContext {
        AssistantContext {
            conversation_id: self.id.clone(),
            message_count: self.messages.len(),
            lead_captured: self.lead_captured,
            business_hours,
            page_url: self.metadata.page_url.clone(),
            user_agent: self.metadata.user_agent.clone(),
        }
    }

    pub fn snapshot(&self) -> ConversationRecord {
        ConversationRecord {
            conversation_id: self.id.clone(),
            messages: self.messages.clone(),
            lead_captured: self.lead_captured,
            page_url: self.metadata.page_url.clone(),
            user_agent: self.metadata.user_agent.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
