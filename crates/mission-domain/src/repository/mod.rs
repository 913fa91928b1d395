//! Repository Traits - Persistence ports
//!
//! These are interfaces only. Implementations live in mission-adapter.

pub mod mission_type_repository;
