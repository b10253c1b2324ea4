//! MH Construction site API library.
//!
//! Exposes config, state, error handling, services and routes so the binary
//! entrypoint and the integration tests build the same application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
