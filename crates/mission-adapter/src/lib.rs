//! # Mission Type Adapter Layer
//!
//! Persistence implementations of the mission-domain ports
//! (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `repository/file_system` - YAML/JSON files, one per mission type
//! - `repository/in_memory` - Shared map for tests and scratch sessions
//! - `repository/document` - Serialized record shape and domain mapping

pub mod repository;

pub use repository::{Encoding, FileMissionTypeRepository, InMemoryMissionTypeRepository, MissionTypeDocument};
