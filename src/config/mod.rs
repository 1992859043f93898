use crate::report::ReportId;
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Reports written when none are requested on the command line.
    #[serde(default = "default_outputs")]
    pub outputs: Vec<ReportId>,
    #[serde(default = "default_compress_matrices")]
    pub compress_matrices: bool,
    /// Suffix identifying per-tree mutation assignment files.
    #[serde(default = "default_mutation_assignment_ext")]
    pub mutation_assignment_ext: String,
}

fn default_outputs() -> Vec<ReportId> {
    ReportId::ALL.to_vec()
}

fn default_compress_matrices() -> bool {
    true
}

fn default_mutation_assignment_ext() -> String {
    crate::ensemble::json::DEFAULT_ASSIGNMENT_EXT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outputs: default_outputs(),
            compress_matrices: default_compress_matrices(),
            mutation_assignment_ext: default_mutation_assignment_ext(),
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "phylo-consensus", "phylo-consensus")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Reads the user config, falling back to defaults when it is absent or invalid.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match fs::read_to_string(&config_path) {
                    Ok(content) => match Self::from_toml(&content) {
                        Ok(config) => return config,
                        Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                    },
                    Err(e) => warn!("Could not read {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Writes this config to the user config path and returns that path.
    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path =
            Self::config_path().ok_or("Failed to determine project directories")?;
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let config = Config::from_toml("compress_matrices = false\n").unwrap();
        assert!(!config.compress_matrices);
        assert_eq!(config.outputs, ReportId::ALL.to_vec());
        assert_eq!(config.mutation_assignment_ext, "json");
    }

    #[test]
    fn test_outputs_by_code() {
        let config = Config::from_toml("outputs = [\"1A\", \"2B\"]\n").unwrap();
        assert_eq!(
            config.outputs,
            vec![ReportId::Cellularity, ReportId::Coassignment]
        );
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&content).unwrap(), config);
    }
}
