//! Configuration types for the mission type editor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory mission types are stored in when nothing else is configured
pub const DEFAULT_MISSION_TYPES_DIR: &str = "configs/mission_types";

/// Tools and observations offered by the execution environment.
///
/// The catalog is open-world: states may use identifiers outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityCatalog {
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub observations: Vec<String>,
}

impl Default for CapabilityCatalog {
    fn default() -> Self {
        Self {
            tools: vec!["next_goal".to_string(), "report_final_conclusion".to_string()],
            observations: vec![
                "current_location".to_string(),
                "plan".to_string(),
                "locations_to_be_visited".to_string(),
                "past_locations".to_string(),
                "waypoint".to_string(),
            ],
        }
    }
}

impl CapabilityCatalog {
    /// Tool options for a state: catalog tools, then any extra ones in use
    pub fn tool_options(&self, in_use: &[String]) -> Vec<String> {
        merge_options(&self.tools, in_use)
    }

    /// Observation options for a state: catalog entries, then extras in use
    pub fn observation_options(&self, in_use: &[String]) -> Vec<String> {
        merge_options(&self.observations, in_use)
    }

    pub fn is_known_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }

    pub fn is_known_observation(&self, observation: &str) -> bool {
        self.observations.iter().any(|o| o == observation)
    }
}

fn merge_options(catalog: &[String], in_use: &[String]) -> Vec<String> {
    let mut options = catalog.to_vec();
    for id in in_use {
        if !options.contains(id) {
            options.push(id.clone());
        }
    }
    options
}

/// Editor configuration file (config.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Where mission type files live
    #[serde(default = "default_mission_types_dir")]
    pub mission_types_dir: PathBuf,

    /// Capabilities of the execution environment
    #[serde(default)]
    pub capabilities: CapabilityCatalog,
}

fn default_mission_types_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MISSION_TYPES_DIR)
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mission_types_dir: default_mission_types_dir(),
            capabilities: CapabilityCatalog::default(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write configuration as pretty JSON
    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse() {
        let json = r#"{
            "missionTypesDir": "/srv/missions",
            "capabilities": {
                "tools": ["next_goal", "land"]
            }
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mission_types_dir, PathBuf::from("/srv/missions"));
        assert!(config.capabilities.is_known_tool("land"));
        assert!(config.capabilities.observations.is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.mission_types_dir, PathBuf::from(DEFAULT_MISSION_TYPES_DIR));
        assert!(config.capabilities.is_known_observation("waypoint"));
    }

    #[test]
    fn test_options_accept_extra_identifiers() {
        let catalog = CapabilityCatalog::default();
        let in_use = vec!["report_final_conclusion".to_string(), "thermal_camera".to_string()];

        assert_eq!(
            catalog.tool_options(&in_use),
            ["next_goal", "report_final_conclusion", "thermal_camera"]
        );

        let in_use = vec!["thermal_feed".to_string(), "thermal_feed".to_string()];
        let options = catalog.observation_options(&in_use);
        assert_eq!(options.len(), 6);
        assert_eq!(options.last().map(String::as_str), Some("thermal_feed"));
    }
}
