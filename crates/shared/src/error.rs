//! Error types for the mission type editor

use thiserror::Error;

/// Error thrown when a mission type is not stored
#[derive(Debug, Error)]
#[error("Mission type '{name}' not found. Available mission types: {}", available.join(", "))]
pub struct MissionTypeNotFoundError {
    pub name: String,
    pub available: Vec<String>,
}

/// Error thrown when a stored record cannot be decoded
#[derive(Debug, Error)]
#[error("Mission type file '{path}' is malformed: {reason}")]
pub struct MalformedRecordError {
    pub path: String,
    pub reason: String,
}

/// General editor error type
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    MissionTypeNotFound(#[from] MissionTypeNotFoundError),

    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
