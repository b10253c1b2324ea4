//! Site event bus, analytics and notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`SiteEvent`]: a named analytics event with its parameters.
//! - [`Analytics`]: what services call to record an event. The bus-backed
//!   implementation publishes; the no-op one discards.
//! - [`EventPersistence`]: background subscriber that writes every event to
//!   `analytics_events`.
//! - [`Notifier`]: sales-team notifications for leads and contact requests,
//!   sent through a callable function, SMTP or nowhere.

pub mod analytics;
pub mod bus;
pub mod delivery;
pub mod notify;
pub mod persistence;

pub use analytics::{Analytics, BusAnalytics, NoopAnalytics};
pub use bus::{EventBus, SiteEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notify::{EmailNotifier, FunctionNotifier, NoopNotifier, Notification, Notifier, NotifyError};
pub use persistence::EventPersistence;
