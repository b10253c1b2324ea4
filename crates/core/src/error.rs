use std::collections::BTreeMap;

/// Field name -> human-readable violation, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// One or more form fields failed validation. Each entry annotates the
    /// offending field so the caller can highlight it.
    #[error("Validation failed for fields: {}", field_names(.0))]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn field_names(errors: &FieldErrors) -> String {
    errors.keys().cloned().collect::<Vec<_>>().join(", ")
}
