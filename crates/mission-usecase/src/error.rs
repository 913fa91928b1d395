//! Errors raised by editor use cases

use mission_domain::{RepositoryError, StateMachineError};

/// Why an editor operation was refused or failed.
///
/// A failed operation leaves the session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The state machine refused the mutation
    Model(StateMachineError),
    /// Loading or saving failed
    Repository(RepositoryError),
    /// A mission type with this id is already stored
    AlreadyExists { id: String },
    /// Name contains characters other than ASCII letters, digits, underscores
    InvalidMissionTypeName { name: String },
    /// The interaction deleted a placeholder or connected one
    PlaceholderEdit { node_id: String },
    /// A new edge refers to a node that is not on the canvas
    UnknownNode { node_id: String },
    UnknownConditionTemplate { name: String },
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::Model(e) => write!(f, "{}", e),
            SessionError::Repository(e) => write!(f, "{}", e),
            SessionError::AlreadyExists { id } => write!(f, "Mission type '{}' already exists", id),
            SessionError::InvalidMissionTypeName { name } => write!(
                f,
                "Invalid mission type name '{}' - use letters, numbers, underscores",
                name
            ),
            SessionError::PlaceholderEdit { node_id } => write!(
                f,
                "'{}' is a placeholder for an undefined state; create the state before editing it",
                node_id
            ),
            SessionError::UnknownNode { node_id } => write!(f, "Node '{}' is not on the canvas", node_id),
            SessionError::UnknownConditionTemplate { name } => {
                write!(f, "Unknown condition template '{}'", name)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Model(e) => Some(e),
            SessionError::Repository(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StateMachineError> for SessionError {
    fn from(e: StateMachineError) -> Self {
        SessionError::Model(e)
    }
}

impl From<RepositoryError> for SessionError {
    fn from(e: RepositoryError) -> Self {
        SessionError::Repository(e)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
