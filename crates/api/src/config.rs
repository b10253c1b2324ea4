use std::path::PathBuf;
use std::time::Duration;

use mhc_core::business_hours::{
    BusinessHours, DEFAULT_END_HOUR, DEFAULT_START_HOUR, DEFAULT_TIMEZONE,
};
use mhc_core::chat::session::DEFAULT_LEAD_FORM_DELAY;
use mhc_core::chat::DEFAULT_FALLBACK_PHONE;
use mhc_gateway::cache::DEFAULT_TTL;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on waiting for background tasks after the listener closes.
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `CORS_ORIGINS` (comma-separated),
    /// `REQUEST_TIMEOUT_SECS` and `SHUTDOWN_TIMEOUT_SECS`, falling back to
    /// [`ServerConfig::default`] for each unset variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cors_origins = match non_empty_env("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.cors_origins,
        };

        Self {
            host: non_empty_env("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", defaults.shutdown_timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.into()],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}

/// Site behaviour settings: business hours, chatbot timing, content
/// fallbacks and the admin token.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub business_hours: BusinessHours,
    /// Delay between a lead-capture reply and the form appearing.
    pub lead_form_delay: Duration,
    /// Number shown in every "please call us" message.
    pub fallback_phone: String,
    pub content_cache: bool,
    pub content_cache_ttl: Duration,
    /// Where failed contact submissions are stashed for manual recovery.
    pub contact_fallback_dir: PathBuf,
    /// Bearer token for `/admin` routes. Admin routes are disabled when unset.
    pub admin_token: Option<String>,
    /// Serve the built-in sample portfolio when the store has no projects.
    pub sample_portfolio_fallback: bool,
    /// Recipient for SMTP notifications.
    pub notify_email_to: Option<String>,
}

impl SiteConfig {
    /// Load site settings from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `BUSINESS_HOURS_START`      | `8`                        |
    /// | `BUSINESS_HOURS_END`        | `17`                       |
    /// | `BUSINESS_TIMEZONE`         | `America/Los_Angeles`      |
    /// | `LEAD_FORM_DELAY_MS`        | `1000`                     |
    /// | `FALLBACK_PHONE`            | `(509) 308-6489`           |
    /// | `CONTENT_CACHE`             | `true`                     |
    /// | `CONTENT_CACHE_TTL_SECS`    | `300`                      |
    /// | `CONTACT_FALLBACK_DIR`      | `./data/contact-fallback`  |
    /// | `ADMIN_TOKEN`               | unset                      |
    /// | `SAMPLE_PORTFOLIO_FALLBACK` | `true`                     |
    /// | `NOTIFY_EMAIL_TO`           | unset                      |
    pub fn from_env() -> Self {
        let start: u32 = env_parse("BUSINESS_HOURS_START", DEFAULT_START_HOUR);
        let end: u32 = env_parse("BUSINESS_HOURS_END", DEFAULT_END_HOUR);
        let timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(name) => BusinessHours::parse_timezone(&name)
                .expect("BUSINESS_TIMEZONE must be an IANA timezone name"),
            Err(_) => DEFAULT_TIMEZONE,
        };
        let business_hours = BusinessHours::new(start, end, timezone)
            .expect("BUSINESS_HOURS_START must be before BUSINESS_HOURS_END");

        let lead_form_delay_ms: u64 =
            env_parse("LEAD_FORM_DELAY_MS", DEFAULT_LEAD_FORM_DELAY.as_millis() as u64);
        let cache_ttl_secs: u64 = env_parse("CONTENT_CACHE_TTL_SECS", DEFAULT_TTL.as_secs());

        Self {
            business_hours,
            lead_form_delay: Duration::from_millis(lead_form_delay_ms),
            fallback_phone: std::env::var("FALLBACK_PHONE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_PHONE.into()),
            content_cache: env_parse("CONTENT_CACHE", true),
            content_cache_ttl: Duration::from_secs(cache_ttl_secs),
            contact_fallback_dir: std::env::var("CONTACT_FALLBACK_DIR")
                .unwrap_or_else(|_| "./data/contact-fallback".into())
                .into(),
            admin_token: non_empty_env("ADMIN_TOKEN"),
            sample_portfolio_fallback: env_parse("SAMPLE_PORTFOLIO_FALLBACK", true),
            notify_email_to: non_empty_env("NOTIFY_EMAIL_TO"),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            business_hours: BusinessHours::default(),
            lead_form_delay: DEFAULT_LEAD_FORM_DELAY,
            fallback_phone: DEFAULT_FALLBACK_PHONE.into(),
            content_cache: true,
            content_cache_ttl: DEFAULT_TTL,
            contact_fallback_dir: PathBuf::from("./data/contact-fallback"),
            admin_token: None,
            sample_portfolio_fallback: true,
            notify_email_to: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} has an invalid value: {raw}")),
        Err(_) => default,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
