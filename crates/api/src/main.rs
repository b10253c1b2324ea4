use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mhc_api::config::{ServerConfig, SiteConfig};
use mhc_api::router::build_app_router;
use mhc_api::services::{Assistant, LocalAssistant, RemoteAssistant};
use mhc_api::state::{AppState, Gateway};
use mhc_events::{
    EmailConfig, EmailDelivery, EmailNotifier, EventBus, EventPersistence, FunctionNotifier,
    NoopNotifier, Notifier,
};
use mhc_gateway::{FirebaseConfig, FirestoreClient, MemoryStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mhc_api=debug,mhc_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let site = SiteConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Remote data gateway ---
    let firebase = FirebaseConfig::from_env();
    let gateway = match &firebase {
        Some(firebase) => {
            let client = FirestoreClient::new(firebase.clone())
                .expect("Failed to build Firebase client");
            tracing::info!(project_id = %firebase.project_id, "Using Firebase backend");
            Gateway::firebase(client, site.content_cache_ttl, site.content_cache)
        }
        None => {
            tracing::warn!("FIREBASE_PROJECT_ID not set, using in-memory store (data is not persisted)");
            Gateway::memory(Arc::new(MemoryStore::new()))
        }
    };

    // --- Assistant ---
    let assistant: Arc<dyn Assistant> = if firebase.is_some() {
        Arc::new(RemoteAssistant::new(Arc::clone(&gateway.functions)))
    } else {
        Arc::new(LocalAssistant::default())
    };

    // --- Notifications ---
    let notifier: Arc<dyn Notifier> = match (EmailConfig::from_env(), site.notify_email_to.clone()) {
        (Some(email), Some(to)) => {
            let delivery = EmailDelivery::new(&email).expect("Invalid SMTP configuration");
            tracing::info!(smtp_host = %email.host, "Sending notifications by email");
            Arc::new(EmailNotifier::new(delivery, to))
        }
        _ if firebase.is_some() => {
            tracing::info!("Sending notifications through the hosted email function");
            Arc::new(FunctionNotifier::new(Arc::clone(&gateway.functions)))
        }
        _ => {
            tracing::warn!("No notification channel configured");
            Arc::new(NoopNotifier)
        }
    };

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let persistence_handle = tokio::spawn(EventPersistence::run(
        Arc::clone(&gateway.store),
        event_bus.subscribe(),
    ));
    tracing::info!("Event persistence started");

    // --- App state ---
    let state = AppState::new(
        config.clone(),
        site,
        gateway,
        assistant,
        notifier,
        Arc::clone(&event_bus),
    );
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The router (and with it every other bus handle) is gone once `serve`
    // returns; dropping this last sender closes the channel.
    drop(event_bus);
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(shutdown_timeout, persistence_handle)
        .await
        .is_err()
    {
        tracing::warn!("Event persistence did not drain before the shutdown timeout");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
