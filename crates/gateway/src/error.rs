/// Errors raised by the Remote Data Gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-2xx status.
    #[error("Remote service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A document or response body did not have the expected shape.
    #[error("Failed to decode remote data: {0}")]
    Decode(String),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The backend is switched off or not configured.
    #[error("Remote data service unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}
