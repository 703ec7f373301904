use models::Entity;
use thiserror::Error;

/// Infrastructure failures raised by an entity store. Never a business rule.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(String),
    #[error("storage serialization error: {0}")]
    Serialization(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} with {field} '{key}' already exists")]
    AlreadyExists { kind: &'static str, field: &'static str, key: String },
    #[error("{kind} not found by {by}: {lookup}")]
    NotFound { kind: &'static str, by: &'static str, lookup: String },
    #[error("{kind} {field} cannot be changed")]
    ImmutableFieldViolation { kind: &'static str, field: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn already_exists<E: Entity>(key: impl Into<String>) -> Self {
        Self::AlreadyExists { kind: E::KIND, field: E::NATURAL_KEY_FIELD, key: key.into() }
    }

    pub fn not_found_by_id<E: Entity>(id: impl Into<String>) -> Self {
        Self::NotFound { kind: E::KIND, by: "id", lookup: id.into() }
    }

    pub fn not_found_by_key<E: Entity>(key: impl Into<String>) -> Self {
        Self::NotFound { kind: E::KIND, by: E::NATURAL_KEY_FIELD, lookup: key.into() }
    }

    pub fn immutable_key<E: Entity>() -> Self {
        Self::ImmutableFieldViolation { kind: E::KIND, field: E::NATURAL_KEY_FIELD }
    }

    /// Stable message key for external mapping/logging, e.g. `employee.not-found-by-document`.
    pub fn code(&self) -> String {
        match self {
            ServiceError::AlreadyExists { kind, .. } => format!("{kind}.existent"),
            ServiceError::NotFound { kind, by, .. } => format!("{kind}.not-found-by-{by}"),
            ServiceError::ImmutableFieldViolation { kind, field } => format!("{kind}.cant-change-{field}"),
            ServiceError::Store(_) => "store.failure".to_string(),
        }
    }
}
