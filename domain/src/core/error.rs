//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant here is a configuration or invariant violation. Backend
/// failures during a discussion are not domain errors; they are absorbed
/// by the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No personas configured")]
    EmptyRoster,

    #[error("No backend bindings configured")]
    EmptyPool,

    #[error("Duplicate persona id: {0}")]
    DuplicatePersona(String),

    #[error("Duplicate backend binding id: {0}")]
    DuplicateBinding(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("No persona at roster position {0}")]
    MissingPersona(usize),

    #[error("No backend binding for persona {0}")]
    MissingBinding(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Refusing to append a {0} record with empty content")]
    EmptyRecord(&'static str),

    #[error("Transcript already has a topic")]
    TopicAlreadySet,

    #[error("Transcript has no topic yet")]
    TopicMissing,

    #[error("Invalid schedule transition from {0}")]
    InvalidTransition(String),
}

impl DomainError {
    /// Check if this error means the session could not be configured
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyRoster
                | DomainError::EmptyPool
                | DomainError::DuplicatePersona(_)
                | DomainError::DuplicateBinding(_)
                | DomainError::UnknownProvider(_)
                | DomainError::MissingPersona(_)
                | DomainError::MissingBinding(_)
                | DomainError::InvalidSchedule(_)
        )
    }
}
