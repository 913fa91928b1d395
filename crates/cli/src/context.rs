//! Everything a command needs: configuration and the mission type store

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use mission_adapter::FileMissionTypeRepository;
use mission_domain::MissionTypeId;
use mission_usecase::EditorSession;
use shared::EditorConfig;
use tracing::debug;

/// Loaded configuration plus the repository it points at
pub struct Context {
    pub config: EditorConfig,
    pub repository: FileMissionTypeRepository,
    /// Print machine-readable JSON instead of styled text
    pub json: bool,
}

impl Context {
    /// Load `config_path` (defaults when absent) and open the mission type
    /// directory, seeding it when it does not exist yet. `dir` overrides the
    /// configured one.
    pub fn load(config_path: &Path, dir: Option<PathBuf>, json: bool) -> anyhow::Result<Self> {
        let config = EditorConfig::load_or_default(config_path)
            .with_context(|| format!("Failed to read configuration {}", config_path.display()))?;

        let dir = match dir {
            Some(dir) => dir,
            None => resolve_relative(config_path, &config.mission_types_dir),
        };
        debug!(dir = %dir.display(), "Using mission type directory");

        let repository = FileMissionTypeRepository::open_or_seed(&dir)
            .with_context(|| format!("Failed to open mission type directory {}", dir.display()))?;

        Ok(Self {
            config,
            repository,
            json,
        })
    }

    /// Open an editing session on a stored mission type
    pub fn session(&self, name: &str) -> anyhow::Result<EditorSession<FileMissionTypeRepository>> {
        Ok(EditorSession::open(self.repository.clone(), &MissionTypeId::new(name))?)
    }
}

/// Relative directories in a config file are relative to that file
fn resolve_relative(config_path: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() || !config_path.exists() {
        return dir.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) => parent.join(dir),
        None => dir.to_path_buf(),
    }
}
