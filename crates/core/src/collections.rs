//! Well-known document store collection names.
//!
//! These must match the collection ids used by the hosted store and by the
//! admin tooling that publishes content into it.

pub const PROJECTS: &str = "projects";
pub const TESTIMONIALS: &str = "testimonials";
pub const BLOG_POSTS: &str = "blog_posts";
pub const CONTACT_FORMS: &str = "contact_forms";
pub const CHATBOT_CONVERSATIONS: &str = "chatbot_conversations";
pub const PROJECT_INQUIRIES: &str = "project_inquiries";
pub const TEAM_MEMBERS: &str = "team_members";
pub const SERVICES: &str = "services";
pub const AWARDS: &str = "awards";
pub const CLIENT_LOGOS: &str = "client_logos";

/// Analytics events persisted by the event recorder.
pub const ANALYTICS_EVENTS: &str = "analytics_events";
