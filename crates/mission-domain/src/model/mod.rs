//! Domain Model - Entities and Value Objects

pub mod graph;
pub mod layout;
pub mod mission_type;
pub mod state;
pub mod state_machine;
