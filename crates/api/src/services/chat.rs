//! Chatbot conversations held in memory and mirrored to the store.
//!
//! Sessions live in a registry, each behind its own async mutex. A turn locks
//! the session only to update it: the remote assistant call and all store
//! writes happen with the lock released, while the session's busy state keeps
//! a second message from interleaving. Turns and lead submissions run on a
//! spawned task so a dropped request cannot leave a session stuck busy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mhc_core::analytics::{CHATBOT_LEAD_CAPTURED, CHATBOT_MESSAGE_SENT, CHATBOT_OPENED};
use mhc_core::business_hours::BusinessHours;
use mhc_core::chat::lead::{LeadForm, LeadRecord, ProjectType, Timeline};
use mhc_core::chat::message::Message;
use mhc_core::chat::responder::{BotAction, Responder};
use mhc_core::chat::session::{
    ConversationRecord, ConversationSession, LeadFormState, SessionMetadata, TurnOutcome,
    TurnState,
};
use mhc_core::error::CoreError;
use mhc_events::{Analytics, Notification, Notifier};
use mhc_gateway::repositories::{ConversationRepo, InquiryRepo};
use mhc_gateway::DocumentStore;
use serde::Serialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, AppResult};
use crate::services::assistant::Assistant;

type SessionHandle = Arc<Mutex<ConversationSession>>;

/// Timing and contact settings for chatbot sessions.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub business_hours: BusinessHours,
    pub lead_form_delay: Duration,
    pub fallback_phone: String,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub value: &'static str,
    pub label: &'static str,
}

/// The lead form as shown to the visitor.
#[derive(Debug, Clone, Serialize)]
pub struct LeadFormView {
    pub reason: String,
    pub project_types: Vec<ChoiceView>,
    pub timelines: Vec<ChoiceView>,
}

impl LeadFormView {
    fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
            project_types: ProjectType::ALL
                .iter()
                .map(|p| ChoiceView {
                    value: p.as_str(),
                    label: p.label(),
                })
                .collect(),
            timelines: Timeline::ALL
                .iter()
                .map(|t| ChoiceView {
                    value: t.as_str(),
                    label: t.label(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub conversation_id: String,
    pub messages: Vec<Message>,
    pub lead_captured: bool,
    pub awaiting_response: bool,
    /// Present while the lead form is visible.
    pub lead_form: Option<LeadFormView>,
    /// Milliseconds until a scheduled lead form appears.
    pub lead_form_due_in_ms: Option<u64>,
}

impl SessionView {
    fn new(session: &ConversationSession, now: Instant) -> Self {
        let (lead_form, lead_form_due_in_ms) = match session.lead_form() {
            LeadFormState::Presented { reason } => (Some(LeadFormView::new(reason)), None),
            LeadFormState::Scheduled { due_at, .. } => {
                (None, Some(due_in_ms(*due_at, now)))
            }
            _ => (None, None),
        };
        Self {
            conversation_id: session.id().to_string(),
            messages: session.messages().to_vec(),
            lead_captured: session.lead_captured(),
            awaiting_response: session.turn_state() == TurnState::AwaitingResponse,
            lead_form,
            lead_form_due_in_ms,
        }
    }
}

/// What one turn added.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub messages: Vec<Message>,
    pub quick_replies: &'static [&'static str],
    pub lead_form_due_in_ms: Option<u64>,
}

impl TurnView {
    fn new(outcome: TurnOutcome, now: Instant) -> Self {
        Self {
            messages: outcome.messages,
            quick_replies: outcome.quick_replies,
            lead_form_due_in_ms: outcome.lead_form_due_at.map(|due| due_in_ms(due, now)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadView {
    pub lead_captured: bool,
    pub message: Message,
}

fn due_in_ms(due_at: Instant, now: Instant) -> u64 {
    due_at.saturating_duration_since(now).as_millis() as u64
}

/// Clock shared with tokio so paused-time tests drive the lead form delay.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn action_kind(action: Option<&BotAction>) -> &'static str {
    match action {
        Some(BotAction::ShowServices { .. }) => "show_services",
        Some(BotAction::CaptureLead { .. }) => "capture_lead",
        Some(BotAction::ShowServiceAreas) => "show_service_areas",
        Some(BotAction::ShowProjects) => "show_projects",
        Some(BotAction::ShowQuickReplies) => "show_quick_replies",
        None => "general",
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct ChatService {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    store: Arc<dyn DocumentStore>,
    assistant: Arc<dyn Assistant>,
    responder: Responder,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn Analytics>,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        assistant: Arc<dyn Assistant>,
        notifier: Arc<dyn Notifier>,
        analytics: Arc<dyn Analytics>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            store,
            assistant,
            responder: Responder::default(),
            notifier,
            analytics,
            settings,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn session(&self, id: &str) -> AppResult<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "Conversation",
                    id: id.to_string(),
                })
            })
    }

    /// Best-effort write of the full conversation. Failures are logged only.
    async fn persist(&self, record: &ConversationRecord) {
        if let Err(e) = ConversationRepo::save(self.store.as_ref(), record).await {
            tracing::warn!(
                session_id = %record.conversation_id,
                error = %e,
                "Failed to persist conversation"
            );
        }
    }

    // -- start / view --

    /// Open a new conversation with the greeting for the current time.
    pub async fn start(&self, metadata: SessionMetadata) -> SessionView {
        let greeting = self.settings.business_hours.greeting_at(chrono::Utc::now());
        let session = ConversationSession::start(metadata, greeting);
        let id = session.id().to_string();
        let view = SessionView::new(&session, now());
        let record = session.snapshot();

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        tracing::info!(session_id = %id, "Chat session started");

        self.persist(&record).await;
        self.analytics.track(CHATBOT_OPENED, json!({ "conversation_id": id }));
        view
    }

    /// Current state, presenting the lead form if its delay has elapsed.
    pub async fn view(&self, id: &str) -> AppResult<SessionView> {
        let handle = self.session(id).await?;
        let mut session = handle.lock().await;
        let now = now();
        session.poll_lead_form(now);
        Ok(SessionView::new(&session, now))
    }

    // -- turns --

    /// Answer one visitor message.
    ///
    /// Rejected with a conflict while another reply is pending and with a
    /// validation error for blank text; neither changes the session.
    pub async fn send_message(self: &Arc<Self>, id: &str, text: String) -> AppResult<TurnView> {
        let handle = self.session(id).await?;
        let service = Arc::clone(self);
        tokio::spawn(async move { service.run_turn(handle, text).await })
            .await
            .map_err(|e| AppError::InternalError(format!("chat turn task failed: {e}")))?
    }

    async fn run_turn(&self, handle: SessionHandle, text: String) -> AppResult<TurnView> {
        let (session_id, text, context) = {
            let mut session = handle.lock().await;
            let text = session.begin_turn(&text).map_err(CoreError::from)?;
            let open = self.settings.business_hours.is_open_at(chrono::Utc::now());
            (session.id().to_string(), text, session.context(open))
        };

        let reply = match self.assistant.reply(&text, &context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Assistant unavailable, answering locally"
                );
                self.responder.respond(&text)
            }
        };
        let response_type = action_kind(reply.action.as_ref());

        let (outcome, record, now) = {
            let mut session = handle.lock().await;
            let now = now();
            let outcome = session.complete_turn(reply, now, self.settings.lead_form_delay);
            (outcome, session.snapshot(), now)
        };
        tracing::debug!(session_id = %session_id, response_type, "Chat turn complete");

        self.persist(&record).await;
        self.analytics.track(
            CHATBOT_MESSAGE_SENT,
            json!({
                "conversation_id": session_id,
                "message_length": text.chars().count(),
                "response_type": response_type,
            }),
        );
        Ok(TurnView::new(outcome, now))
    }

    // -- lead capture --

    /// Store the visitor's contact details for this conversation.
    ///
    /// Validation failures and submissions without an open form are
    /// rejected. A failed write is not an error: the visitor sees the call-us
    /// message and may submit again.
    pub async fn submit_lead(self: &Arc<Self>, id: &str, form: LeadForm) -> AppResult<LeadView> {
        let handle = self.session(id).await?;
        let service = Arc::clone(self);
        tokio::spawn(async move { service.run_lead_submission(handle, form).await })
            .await
            .map_err(|e| AppError::InternalError(format!("lead submission task failed: {e}")))?
    }

    async fn run_lead_submission(&self, handle: SessionHandle, form: LeadForm) -> AppResult<LeadView> {
        let lead = {
            let mut session = handle.lock().await;
            session.poll_lead_form(now());
            session.begin_lead_submission(&form)?
        };

        match InquiryRepo::create_lead(self.store.as_ref(), &lead).await {
            Ok(inquiry_id) => {
                let (message, record) = {
                    let mut session = handle.lock().await;
                    (session.record_lead_captured(&lead), session.snapshot())
                };
                tracing::info!(
                    session_id = %lead.conversation_id,
                    inquiry_id = %inquiry_id,
                    reason = %lead.reason,
                    "Chatbot lead captured"
                );
                self.persist(&record).await;
                self.notify(&lead).await;
                self.analytics.track(
                    CHATBOT_LEAD_CAPTURED,
                    json!({
                        "project_type": lead.project_type,
                        "timeline": lead.timeline,
                        "source": lead.source,
                    }),
                );
                Ok(LeadView {
                    lead_captured: true,
                    message,
                })
            }
            Err(e) => {
                tracing::error!(
                    session_id = %lead.conversation_id,
                    error = %e,
                    "Failed to store chatbot lead"
                );
                let (message, record) = {
                    let mut session = handle.lock().await;
                    (
                        session.record_lead_failed(&self.settings.fallback_phone),
                        session.snapshot(),
                    )
                };
                self.persist(&record).await;
                Ok(LeadView {
                    lead_captured: false,
                    message,
                })
            }
        }
    }

    async fn notify(&self, lead: &LeadRecord) {
        if let Err(e) = self.notifier.notify(&Notification::lead(lead)).await {
            tracing::warn!(
                session_id = %lead.conversation_id,
                error = %e,
                "Lead stored but notification failed"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
