//! File-system Repository
//!
//! One file per mission type in a flat directory: `<id>.yaml`, `<id>.yml`
//! or `<id>.json`. The encoding a mission type was stored with is kept on
//! every save; new mission types are written as YAML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mission_domain::{LayoutMetadata, MissionTypeId, MissionTypeRepository, MissionTypeSpec, RepositoryError};
use shared::{EditorError, MalformedRecordError, MissionTypeNotFoundError, Result};
use tracing::{debug, info, warn};

use super::defaults::default_documents;
use super::document::MissionTypeDocument;
use super::encoding::Encoding;

/// Extensions probed for a record, in order of preference
const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Mission types stored as YAML/JSON files
#[derive(Debug, Clone)]
pub struct FileMissionTypeRepository {
    dir: PathBuf,
}

impl FileMissionTypeRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open a directory. A directory that does not exist yet is created and
    /// seeded with the default mission types; an existing one is left as is.
    pub fn open_or_seed(dir: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self::new(dir);
        if !repo.dir.exists() {
            std::fs::create_dir_all(&repo.dir)?;
            repo.seed_defaults()?;
        }
        Ok(repo)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the built-in mission types that have no record yet; returns
    /// how many were written
    pub fn seed_defaults(&self) -> Result<usize> {
        let mut written = 0;
        for (id, document) in &default_documents()? {
            if self.existing_path(id).is_some() {
                debug!(mission_type = %id, "Keeping existing record over default");
                continue;
            }
            self.write_document(id, document)?;
            written += 1;
        }
        info!(dir = %self.dir.display(), count = written, "Seeded default mission types");
        Ok(written)
    }

    /// Record file per mission type id. YAML wins when both encodings exist.
    fn record_files(&self) -> Result<BTreeMap<String, PathBuf>> {
        let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
        for ext in EXTENSIONS {
            let pattern = self.dir.join(format!("*.{}", ext));
            for path in glob::glob(&pattern.to_string_lossy())?.flatten() {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                // Probed in preference order: the first hit per stem stays
                found.entry(stem.to_string()).or_insert(path);
            }
        }
        Ok(found)
    }

    fn path_for(&self, id: &MissionTypeId, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id.as_str(), ext))
    }

    /// Existing record file for an id, preferring YAML
    fn existing_path(&self, id: &MissionTypeId) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.path_for(id, ext))
            .find(|path| path.exists())
    }

    /// Encoding a mission type is currently stored with
    pub fn encoding_of(&self, id: &MissionTypeId) -> Option<Encoding> {
        self.existing_path(id).as_deref().and_then(Encoding::from_path)
    }

    fn not_found(&self, id: &MissionTypeId) -> EditorError {
        let available = self
            .record_files()
            .map(|files| files.into_keys().collect())
            .unwrap_or_default();
        MissionTypeNotFoundError {
            name: id.to_string(),
            available,
        }
        .into()
    }

    /// Read and decode the full record, sidecar included
    pub fn read_document(&self, id: &MissionTypeId) -> Result<MissionTypeDocument> {
        let path = self.existing_path(id).ok_or_else(|| self.not_found(id))?;
        let encoding = Encoding::from_path(&path).unwrap_or_default();
        let text = std::fs::read_to_string(&path)?;

        let malformed = |reason: String| -> EditorError {
            MalformedRecordError {
                path: path.display().to_string(),
                reason,
            }
            .into()
        };
        let value = encoding.parse(&text).map_err(|e| malformed(e.to_string()))?;
        let document = MissionTypeDocument::from_value(id, value).map_err(|e| malformed(e.to_string()))?;
        debug!(mission_type = %id, path = %path.display(), "Loaded mission type");
        Ok(document)
    }

    /// Write a record, keeping the encoding already used for this id.
    ///
    /// YAML records (`.yaml` or `.yml`) stay YAML and a stale JSON twin is
    /// removed. JSON records stay JSON. New records are YAML.
    pub fn write_document(&self, id: &MissionTypeId, document: &MissionTypeDocument) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let yaml = self.path_for(id, "yaml");
        let yml = self.path_for(id, "yml");
        let json = self.path_for(id, "json");

        let (path, encoding) = if yaml.exists() {
            (yaml, Encoding::Yaml)
        } else if yml.exists() {
            (yml, Encoding::Yaml)
        } else if json.exists() {
            (json.clone(), Encoding::Json)
        } else {
            (yaml, Encoding::Yaml)
        };

        std::fs::write(&path, encoding.render(document)?)?;

        if encoding == Encoding::Yaml && json.exists() {
            warn!(path = %json.display(), "Removing JSON record shadowed by YAML");
            std::fs::remove_file(&json)?;
        }
        debug!(mission_type = %id, path = %path.display(), "Saved mission type");
        Ok(path)
    }

    /// Record as an execution runtime should see it: no editor sidecar
    pub fn export_runtime(&self, id: &MissionTypeId, encoding: Option<Encoding>) -> Result<String> {
        let document = self.read_document(id)?.without_ui_metadata();
        let encoding = encoding
            .or_else(|| self.encoding_of(id))
            .unwrap_or_default();
        encoding.render(&document)
    }

    /// Remove every file stored for an id
    pub fn remove(&self, id: &MissionTypeId) -> Result<bool> {
        let mut removed = false;
        for ext in EXTENSIONS {
            let path = self.path_for(id, ext);
            if path.exists() {
                std::fs::remove_file(&path)?;
                removed = true;
            }
        }
        if removed {
            info!(mission_type = %id, "Deleted mission type");
        }
        Ok(removed)
    }
}

fn to_repository_error(error: EditorError) -> RepositoryError {
    match error {
        EditorError::MissionTypeNotFound(e) => RepositoryError::NotFound {
            id: e.name,
            available: e.available,
        },
        EditorError::MalformedRecord(e) => RepositoryError::InvalidDocument {
            id: e.path,
            message: e.reason,
        },
        other => RepositoryError::PersistenceError {
            message: other.to_string(),
        },
    }
}

impl MissionTypeRepository for FileMissionTypeRepository {
    fn load_spec(&self, id: &MissionTypeId) -> std::result::Result<MissionTypeSpec, RepositoryError> {
        let document = self.read_document(id).map_err(to_repository_error)?;
        Ok(document.to_spec(id))
    }

    fn load_layout(&self, id: &MissionTypeId) -> std::result::Result<LayoutMetadata, RepositoryError> {
        let document = self.read_document(id).map_err(to_repository_error)?;
        Ok(document.to_layout())
    }

    fn save_spec(
        &mut self,
        spec: &MissionTypeSpec,
        layout: &LayoutMetadata,
    ) -> std::result::Result<(), RepositoryError> {
        // Keys the model does not interpret survive from the stored record
        let previous = self.read_document(spec.id()).ok();
        let document = MissionTypeDocument::from_spec(spec, Some(layout), previous.as_ref());
        self.write_document(spec.id(), &document)
            .map(|_| ())
            .map_err(to_repository_error)
    }

    fn list_ids(&self) -> std::result::Result<Vec<MissionTypeId>, RepositoryError> {
        let files = self.record_files().map_err(to_repository_error)?;
        Ok(files.into_keys().map(MissionTypeId::new).collect())
    }

    fn delete(&mut self, id: &MissionTypeId) -> std::result::Result<bool, RepositoryError> {
        self.remove(id).map_err(to_repository_error)
    }

    fn exists(&self, id: &MissionTypeId) -> std::result::Result<bool, RepositoryError> {
        Ok(self.existing_path(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_domain::{Position, State, StateMachine, Transition};
    use tempfile::TempDir;

    fn spec(id: &str) -> MissionTypeSpec {
        let machine = StateMachine::from_parts(
            "search",
            [
                State::new("search")
                    .with_prompt("Find the red car.\nReport when found.")
                    .with_tools(["next_goal"])
                    .with_observations(["current_location", "thermal_feed"])
                    .with_transition(Transition::new("{next_goal} == 'ground'", "report"))
                    .with_transition(Transition::new("else", "search"))
                    .with_error_transition("error"),
                State::new("report").with_transition(Transition::always("end")),
            ],
        );
        MissionTypeSpec::with_state_machine(MissionTypeId::new(id), "Find and report", machine)
    }

    #[test]
    fn test_new_records_are_yaml_and_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());
        let original = spec("find_car");
        let mut layout = LayoutMetadata::new();
        layout.set_position("search", Position::new(120.0, 90.0));

        repo.save_spec(&original, &layout).unwrap();

        assert!(dir.path().join("find_car.yaml").exists());
        assert_eq!(repo.encoding_of(original.id()), Some(Encoding::Yaml));
        assert_eq!(repo.load_spec(original.id()).unwrap(), original);
        assert_eq!(repo.load_layout(original.id()).unwrap(), layout);

        // Saving what was loaded changes nothing
        let loaded = repo.load_spec(original.id()).unwrap();
        let before = std::fs::read_to_string(dir.path().join("find_car.yaml")).unwrap();
        repo.save_spec(&loaded, &layout).unwrap();
        let after = std::fs::read_to_string(dir.path().join("find_car.yaml")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_json_records_stay_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("legacy.json"),
            r#"{"description": "Legacy", "default_state": {"initial_state": "a", "states": {"a": {}}}}"#,
        )
        .unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());
        let id = MissionTypeId::new("legacy");

        let mut loaded = repo.load_spec(&id).unwrap();
        loaded.set_description("Legacy, edited");
        repo.save_spec(&loaded, &LayoutMetadata::new()).unwrap();

        assert!(!dir.path().join("legacy.yaml").exists());
        let text = std::fs::read_to_string(dir.path().join("legacy.json")).unwrap();
        assert!(text.contains("\"description\": \"Legacy, edited\""));
    }

    #[test]
    fn test_yaml_wins_over_json_twin() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("twin.json"), r#"{"description": "from json"}"#).unwrap();
        std::fs::write(dir.path().join("twin.yaml"), "description: from yaml\n").unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());
        let id = MissionTypeId::new("twin");

        let loaded = repo.load_spec(&id).unwrap();
        assert_eq!(loaded.description(), "from yaml");
        assert_eq!(repo.list_ids().unwrap(), [id.clone()]);

        repo.save_spec(&loaded, &LayoutMetadata::new()).unwrap();
        assert!(!dir.path().join("twin.json").exists());
    }

    #[test]
    fn test_uninterpreted_keys_survive_save() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("track.yml"),
            "description: Track\ndefault_state:\n  image_resolution:\n    width: 640\n  states:\n    a:\n      output_keys: [x]\n",
        )
        .unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());
        let id = MissionTypeId::new("track");

        let loaded = repo.load_spec(&id).unwrap();
        repo.save_spec(&loaded, &LayoutMetadata::new()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("track.yml")).unwrap();
        assert!(text.contains("image_resolution"));
        assert!(text.contains("output_keys"));
    }

    #[test]
    fn test_runtime_export_strips_layout() {
        let dir = TempDir::new().unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());
        let original = spec("find_car");
        let mut layout = LayoutMetadata::new();
        layout.set_position("report", Position::new(400.0, 80.0));
        repo.save_spec(&original, &layout).unwrap();

        let stored = std::fs::read_to_string(dir.path().join("find_car.yaml")).unwrap();
        assert!(stored.contains("ui_metadata"));

        let exported = repo.export_runtime(original.id(), Some(Encoding::Json)).unwrap();
        assert!(!exported.contains("ui_metadata"));
        assert!(exported.contains("\"initial_state\": \"search\""));
    }

    #[test]
    fn test_open_or_seed_populates_new_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("mission_types");

        let repo = FileMissionTypeRepository::open_or_seed(&root).unwrap();

        let ids: Vec<_> = repo.list_ids().unwrap().into_iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, ["locate_and_land_safely", "locate_and_report", "locate_and_track"]);

        // A second open leaves existing records alone
        std::fs::remove_file(root.join("locate_and_report.yaml")).unwrap();
        let repo = FileMissionTypeRepository::open_or_seed(&root).unwrap();
        assert_eq!(repo.list_ids().unwrap().len(), 2);
    }

    #[test]
    fn test_open_or_seed_keeps_existing_empty_dir_empty() {
        let dir = TempDir::new().unwrap();

        let repo = FileMissionTypeRepository::open_or_seed(dir.path()).unwrap();

        assert!(repo.list_ids().unwrap().is_empty());
    }

    #[test]
    fn test_seed_defaults_keeps_edited_records() {
        let dir = TempDir::new().unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());
        assert_eq!(repo.seed_defaults().unwrap(), 3);

        let id = MissionTypeId::new("locate_and_track");
        let mut edited = repo.load_spec(&id).unwrap();
        edited.set_description("Edited by hand");
        repo.save_spec(&edited, &LayoutMetadata::new()).unwrap();

        assert_eq!(repo.seed_defaults().unwrap(), 0);
        assert_eq!(repo.load_spec(&id).unwrap().description(), "Edited by hand");
    }

    #[test]
    fn test_missing_and_malformed_records() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let mut repo = FileMissionTypeRepository::new(dir.path());

        let missing = repo.load_spec(&MissionTypeId::new("nope")).unwrap_err();
        assert!(matches!(missing, RepositoryError::NotFound { ref available, .. } if available == &["broken"]));

        let broken = repo.load_spec(&MissionTypeId::new("broken")).unwrap_err();
        assert!(matches!(broken, RepositoryError::InvalidDocument { .. }));

        assert!(repo.delete(&MissionTypeId::new("broken")).unwrap());
        assert!(repo.list_ids().unwrap().is_empty());
    }
}
