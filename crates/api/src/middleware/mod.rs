//! Request extractors guarding protected routes.
//!
//! - [`admin::RequireAdmin`] -- Requires the configured admin Bearer token.

pub mod admin;
