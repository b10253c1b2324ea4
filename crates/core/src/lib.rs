//! Domain logic for the MH Construction site backend.
//!
//! Everything in this crate is pure: no network, no storage, no clocks beyond
//! the values callers pass in. The gateway, events and API crates build on
//! these types.

pub mod analytics;
pub mod business_hours;
pub mod catalog;
pub mod chat;
pub mod collections;
pub mod contact;
pub mod content;
pub mod error;
pub mod types;
pub mod widgets;
