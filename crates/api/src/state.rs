use std::sync::Arc;
use std::time::Duration;

use mhc_events::{Analytics, BusAnalytics, EventBus, Notifier};
use mhc_gateway::{
    CachedStore, CloudFunctions, DocumentStore, FileStorage, FirestoreClient, MemoryStore,
};

use crate::config::{ServerConfig, SiteConfig};
use crate::services::chat::ChatSettings;
use crate::services::{Assistant, ChatService, ContactFallback, ContactService, ContentService};

/// Handles to the Remote Data Gateway's three capabilities.
#[derive(Clone)]
pub struct Gateway {
    pub store: Arc<dyn DocumentStore>,
    pub files: Arc<dyn FileStorage>,
    pub functions: Arc<dyn CloudFunctions>,
    /// Which backend is in use (`firebase` or `memory`), reported by `/health`.
    pub backend: &'static str,
}

impl Gateway {
    /// Every capability served by one in-process store.
    pub fn memory(memory: Arc<MemoryStore>) -> Self {
        Self {
            store: memory.clone(),
            files: memory.clone(),
            functions: memory,
            backend: "memory",
        }
    }

    /// The hosted Firebase backend. Collection queries go through the read
    /// cache; uploads and callable functions go straight to the client.
    pub fn firebase(client: FirestoreClient, cache_ttl: Duration, cache_enabled: bool) -> Self {
        Self {
            store: Arc::new(CachedStore::new(client.clone(), cache_ttl, cache_enabled)),
            files: Arc::new(client.clone()),
            functions: Arc::new(client),
            backend: "firebase",
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (every field is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub site: Arc<SiteConfig>,
    pub gateway: Gateway,
    pub chat: Arc<ChatService>,
    pub contact: Arc<ContactService>,
    pub content: Arc<ContentService>,
    /// Analytics sink publishing onto the event bus.
    pub analytics: Arc<dyn Analytics>,
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Wire the services to the gateway, the assistant and the notifier.
    pub fn new(
        config: ServerConfig,
        site: SiteConfig,
        gateway: Gateway,
        assistant: Arc<dyn Assistant>,
        notifier: Arc<dyn Notifier>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let analytics: Arc<dyn Analytics> = Arc::new(BusAnalytics::new(Arc::clone(&event_bus)));

        let chat = ChatService::new(
            Arc::clone(&gateway.store),
            assistant,
            Arc::clone(&notifier),
            Arc::clone(&analytics),
            ChatSettings {
                business_hours: site.business_hours,
                lead_form_delay: site.lead_form_delay,
                fallback_phone: site.fallback_phone.clone(),
            },
        );
        let contact = ContactService::new(
            Arc::clone(&gateway.store),
            notifier,
            Arc::clone(&analytics),
            ContactFallback::new(site.contact_fallback_dir.clone()),
            site.fallback_phone.clone(),
        );
        let content = ContentService::new(
            Arc::clone(&gateway.store),
            Arc::clone(&analytics),
            site.sample_portfolio_fallback,
        );

        Self {
            config: Arc::new(config),
            site: Arc::new(site),
            gateway,
            chat: Arc::new(chat),
            contact: Arc::new(contact),
            content: Arc::new(content),
            analytics,
            event_bus,
        }
    }
}
