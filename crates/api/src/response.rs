//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Collection reads that
//! degrade to an empty result add a `notice` next to `data`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "notice": ... }` for reads that may have fallen back.
#[derive(Debug, Serialize)]
pub struct NoticeResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}
