use std::fmt::Display;

/// Domain error taxonomy shared by every layer.
///
/// Repositories wrap it together with database errors; the HTTP layer maps
/// each variant to a status code and a stable error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed or out-of-range input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A quantity outside the range an operation accepts.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// The operation is not legal for the target (e.g. partial feed of a collection site).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A resource with the same key already exists under a different product.
    #[error("Resource existed: {0}")]
    ResourceExisted(String),

    /// A row lock could not be acquired (NOWAIT failure or lock timeout).
    #[error("Lock contention: {0}")]
    LockContention(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] with any displayable key.
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
