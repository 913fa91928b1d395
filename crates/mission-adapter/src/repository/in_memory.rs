//! In-Memory Repository
//!
//! Keeps mission types in a shared map. Useful for testing and for editing
//! sessions that should not touch the disk.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use mission_domain::{LayoutMetadata, MissionTypeId, MissionTypeRepository, MissionTypeSpec, RepositoryError};

/// In-memory mission type repository
///
/// Thread-safe implementation using RwLock. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMissionTypeRepository {
    records: Arc<RwLock<HashMap<String, (MissionTypeSpec, LayoutMetadata)>>>,
}

impl InMemoryMissionTypeRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Repository pre-filled with the given mission types and no layout
    pub fn with_specs(specs: impl IntoIterator<Item = MissionTypeSpec>) -> Self {
        let records = specs
            .into_iter()
            .map(|spec| (spec.id().to_string(), (spec, LayoutMetadata::new())))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    fn read_lock_error() -> RepositoryError {
        RepositoryError::PersistenceError {
            message: "Failed to acquire read lock".to_string(),
        }
    }

    fn write_lock_error() -> RepositoryError {
        RepositoryError::PersistenceError {
            message: "Failed to acquire write lock".to_string(),
        }
    }

    fn record(&self, id: &MissionTypeId) -> Result<(MissionTypeSpec, LayoutMetadata), RepositoryError> {
        let records = self.records.read().map_err(|_| Self::read_lock_error())?;
        match records.get(id.as_str()) {
            Some(record) => Ok(record.clone()),
            None => {
                let mut available: Vec<String> = records.keys().cloned().collect();
                available.sort();
                Err(RepositoryError::NotFound {
                    id: id.to_string(),
                    available,
                })
            }
        }
    }
}

impl MissionTypeRepository for InMemoryMissionTypeRepository {
    fn load_spec(&self, id: &MissionTypeId) -> Result<MissionTypeSpec, RepositoryError> {
        self.record(id).map(|(spec, _)| spec)
    }

    fn load_layout(&self, id: &MissionTypeId) -> Result<LayoutMetadata, RepositoryError> {
        self.record(id).map(|(_, layout)| layout)
    }

    fn save_spec(&mut self, spec: &MissionTypeSpec, layout: &LayoutMetadata) -> Result<(), RepositoryError> {
        let mut records = self.records.write().map_err(|_| Self::write_lock_error())?;
        records.insert(spec.id().to_string(), (spec.clone(), layout.clone()));
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<MissionTypeId>, RepositoryError> {
        let records = self.records.read().map_err(|_| Self::read_lock_error())?;
        let mut ids: Vec<MissionTypeId> = records.keys().cloned().map(MissionTypeId::new).collect();
        ids.sort();
        Ok(ids)
    }

    fn delete(&mut self, id: &MissionTypeId) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().map_err(|_| Self::write_lock_error())?;
        Ok(records.remove(id.as_str()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_domain::Position;

    #[test]
    fn test_mission_type_repository() {
        let mut repo = InMemoryMissionTypeRepository::new();
        let spec = MissionTypeSpec::new(MissionTypeId::new("survey"), "Survey the field");
        let mut layout = LayoutMetadata::new();
        layout.set_position("scan", Position::new(100.0, 80.0));

        repo.save_spec(&spec, &layout).unwrap();

        assert_eq!(repo.load_spec(spec.id()).unwrap(), spec);
        assert_eq!(repo.load_layout(spec.id()).unwrap(), layout);
        assert!(repo.exists(spec.id()).unwrap());
    }

    #[test]
    fn test_clones_share_storage() {
        let repo = InMemoryMissionTypeRepository::with_specs([
            MissionTypeSpec::new(MissionTypeId::new("b"), "B"),
            MissionTypeSpec::new(MissionTypeId::new("a"), "A"),
        ]);
        let mut other = repo.clone();

        assert!(other.delete(&MissionTypeId::new("b")).unwrap());

        assert_eq!(repo.list_ids().unwrap(), [MissionTypeId::new("a")]);
        let err = repo.load_spec(&MissionTypeId::new("b")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { available, .. } if available == ["a"]));
    }
}
