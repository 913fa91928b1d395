//! Mission Type Repository - Abstract persistence for mission types
//!
//! The domain states what it needs: load the logical spec, load the layout
//! sidecar, save both together. How they are encoded on disk is not our
//! concern here.

use crate::model::layout::LayoutMetadata;
use crate::model::mission_type::{MissionTypeId, MissionTypeSpec};

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Mission type not found
    NotFound { id: String, available: Vec<String> },
    /// Stored record could not be decoded
    InvalidDocument { id: String, message: String },
    /// Failed to persist
    PersistenceError { message: String },
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::NotFound { id, available } => {
                write!(f, "Mission type '{}' not found. Available: {}", id, available.join(", "))
            }
            RepositoryError::InvalidDocument { id, message } => {
                write!(f, "Mission type '{}' could not be read: {}", id, message)
            }
            RepositoryError::PersistenceError { message } => {
                write!(f, "Persistence error: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Mission Type Repository Trait
///
/// This is a PORT in hexagonal architecture. Saving is last-writer-wins;
/// there is no locking across sessions.
pub trait MissionTypeRepository {
    /// Load the logical spec. Layout metadata is never part of it.
    fn load_spec(&self, id: &MissionTypeId) -> Result<MissionTypeSpec, RepositoryError>;

    /// Load the editor-only layout sidecar (empty when none is stored)
    fn load_layout(&self, id: &MissionTypeId) -> Result<LayoutMetadata, RepositoryError>;

    /// Save a spec under its id together with its layout sidecar
    fn save_spec(&mut self, spec: &MissionTypeSpec, layout: &LayoutMetadata) -> Result<(), RepositoryError>;

    /// All stored mission type ids, sorted
    fn list_ids(&self) -> Result<Vec<MissionTypeId>, RepositoryError>;

    /// Delete a mission type; returns whether anything was removed
    fn delete(&mut self, id: &MissionTypeId) -> Result<bool, RepositoryError>;

    /// Check if a mission type exists
    fn exists(&self, id: &MissionTypeId) -> Result<bool, RepositoryError> {
        Ok(self.list_ids()?.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory implementation for testing
    #[derive(Default)]
    struct InMemoryRepo {
        records: BTreeMap<MissionTypeId, (MissionTypeSpec, LayoutMetadata)>,
    }

    impl InMemoryRepo {
        fn not_found(&self, id: &MissionTypeId) -> RepositoryError {
            RepositoryError::NotFound {
                id: id.to_string(),
                available: self.records.keys().map(|k| k.to_string()).collect(),
            }
        }
    }

    impl MissionTypeRepository for InMemoryRepo {
        fn load_spec(&self, id: &MissionTypeId) -> Result<MissionTypeSpec, RepositoryError> {
            self.records
                .get(id)
                .map(|(spec, _)| spec.clone())
                .ok_or_else(|| self.not_found(id))
        }

        fn load_layout(&self, id: &MissionTypeId) -> Result<LayoutMetadata, RepositoryError> {
            self.records
                .get(id)
                .map(|(_, layout)| layout.clone())
                .ok_or_else(|| self.not_found(id))
        }

        fn save_spec(&mut self, spec: &MissionTypeSpec, layout: &LayoutMetadata) -> Result<(), RepositoryError> {
            self.records
                .insert(spec.id().clone(), (spec.clone(), layout.clone()));
            Ok(())
        }

        fn list_ids(&self) -> Result<Vec<MissionTypeId>, RepositoryError> {
            Ok(self.records.keys().cloned().collect())
        }

        fn delete(&mut self, id: &MissionTypeId) -> Result<bool, RepositoryError> {
            Ok(self.records.remove(id).is_some())
        }
    }

    #[test]
    fn test_in_memory_repo() {
        let mut repo = InMemoryRepo::default();
        let id = MissionTypeId::new("locate_and_report");

        repo.save_spec(
            &MissionTypeSpec::new(id.clone(), "Locate the target"),
            &LayoutMetadata::new(),
        )
        .unwrap();

        assert!(repo.exists(&id).unwrap());
        assert_eq!(repo.load_spec(&id).unwrap().description(), "Locate the target");

        let missing = repo.load_spec(&MissionTypeId::new("nope")).unwrap_err();
        assert_eq!(
            missing.to_string(),
            "Mission type 'nope' not found. Available: locate_and_report"
        );
    }
}
