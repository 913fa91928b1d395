//! Persistence Adapters - Repository implementations
//!
//! These implement `MissionTypeRepository` from mission-domain.

pub mod defaults;
pub mod document;
pub mod encoding;
pub mod file_system;
pub mod in_memory;

pub use document::MissionTypeDocument;
pub use encoding::Encoding;
pub use file_system::FileMissionTypeRepository;
pub use in_memory::InMemoryMissionTypeRepository;
