/// Domain-level errors shared by every layer above `core`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `key` is whatever identified the lookup (an id or a slug).
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a not-found error keyed by a numeric id.
    pub fn not_found_id(entity: &'static str, id: crate::types::DbId) -> Self {
        Self::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}
