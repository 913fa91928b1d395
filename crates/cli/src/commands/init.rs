//! mission-types init command

use clap::Args;
use mission_adapter::FileMissionTypeRepository;
use shared::EditorConfig;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Create the mission type directory without the default mission types
    #[arg(long)]
    pub minimal: bool,
}

impl InitCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        println!("Initializing mission type project in {:?}", self.directory);

        let config = EditorConfig::default();
        let missions_dir = self.directory.join(&config.mission_types_dir);
        std::fs::create_dir_all(&missions_dir)?;

        let config_path = self.directory.join("config.json");
        if config_path.exists() {
            println!("config.json already exists, leaving it untouched");
        } else {
            config.write_to(&config_path)?;
        }

        if !self.minimal {
            self.seed(&missions_dir)?;
        }

        println!("✓ Mission type project initialized");
        Ok(())
    }

    fn seed(&self, missions_dir: &Path) -> anyhow::Result<()> {
        let repository = FileMissionTypeRepository::new(missions_dir);
        let count = repository.seed_defaults()?;
        info!(count, "Wrote default mission types");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use mission_domain::{LayoutMetadata, MissionTypeId, MissionTypeRepository};
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config_and_defaults() {
        let root = TempDir::new().unwrap();
        let command = InitCommand {
            directory: root.path().to_path_buf(),
            minimal: false,
        };

        command.run().unwrap();

        let config = EditorConfig::from_file(&root.path().join("config.json")).unwrap();
        let repository = FileMissionTypeRepository::new(root.path().join(config.mission_types_dir));
        assert_eq!(repository.list_ids().unwrap().len(), 3);
    }

    #[test]
    fn test_minimal_init_leaves_directory_empty() {
        let root = TempDir::new().unwrap();
        let command = InitCommand {
            directory: root.path().to_path_buf(),
            minimal: true,
        };

        command.run().unwrap();

        let repository = FileMissionTypeRepository::new(root.path().join(shared::DEFAULT_MISSION_TYPES_DIR));
        assert!(repository.list_ids().unwrap().is_empty());

        // Later commands open the directory without seeding it
        let context = Context::load(&root.path().join("config.json"), None, false).unwrap();
        assert!(context.repository.list_ids().unwrap().is_empty());
    }

    #[test]
    fn test_init_again_keeps_edited_mission_types() {
        let root = TempDir::new().unwrap();
        let command = InitCommand {
            directory: root.path().to_path_buf(),
            minimal: false,
        };
        command.run().unwrap();

        let mut repository = FileMissionTypeRepository::new(root.path().join(shared::DEFAULT_MISSION_TYPES_DIR));
        let id = MissionTypeId::new("locate_and_track");
        let mut spec = repository.load_spec(&id).unwrap();
        spec.set_description("Track the blue truck");
        repository.save_spec(&spec, &LayoutMetadata::new()).unwrap();

        command.run().unwrap();

        assert_eq!(repository.load_spec(&id).unwrap().description(), "Track the blue truck");
        assert_eq!(repository.list_ids().unwrap().len(), 3);
    }
}
