//! # Settings Module
//!
//! ## Purpose
//! Holds the parameters of an analysis run that are not given on the command line: where the
//! energy database is, where arrays are written, how unknown species are treated, the
//! community-detection parameters and what the printed report leaves out.
//!
//! ## Configuration File
//! Settings live in `network_config.json` in the working directory. A missing or unreadable
//! file gives the defaults; a file with some keys missing takes the defaults for those keys.
//! ```json
//! {
//!   "energy_database": "databaseStateEnergyHe.txt",
//!   "output_dir": "network_output",
//!   "unknown_species": "Reject",
//!   "community": { "resolution": 1.0, "seed": null, "threshold": 1e-7, "max_levels": null },
//!   "display_excluded": ["e"],
//!   "histogram_bins": 50,
//!   "histogram_range": [0.0, 100.0]
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust, ignore
//! let config = AnalysisConfig::load_or_default("network_config.json");
//! config.save("network_config.json")?;
//! ```
use crate::ReactionNetwork::community::CommunityConfig;
use crate::ReactionNetwork::network_errors::NetworkError;
use crate::ReactionNetwork::reaction_set::UnknownSpeciesPolicy;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "network_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub energy_database: PathBuf,
    pub output_dir: PathBuf,
    pub unknown_species: UnknownSpeciesPolicy,
    pub community: CommunityConfig,
    /// species left out of printed layers and tables (never out of the graphs)
    pub display_excluded: Vec<String>,
    pub histogram_bins: usize,
    pub histogram_range: (f64, f64),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            energy_database: PathBuf::from("databaseStateEnergyHe.txt"),
            output_dir: PathBuf::from("network_output"),
            unknown_species: UnknownSpeciesPolicy::Reject,
            community: CommunityConfig::default(),
            display_excluded: vec!["e".to_string()],
            histogram_bins: 50,
            histogram_range: (0.0, 100.0),
        }
    }
}

impl AnalysisConfig {
    /// reads the configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// configuration from file, defaults when the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("no {} found, using default settings", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("settings loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} ignored ({}), using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| NetworkError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.unknown_species, UnknownSpeciesPolicy::Reject);
        assert_eq!(config.community.resolution, 1.0);
        assert_eq!(config.community.seed, None);
        assert_eq!(config.display_excluded, vec!["e".to_string()]);
        assert_eq!(config.histogram_bins, 50);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = AnalysisConfig::default();
        config.community.seed = Some(7);
        config.unknown_species = UnknownSpeciesPolicy::Ignore;
        config.save(&path).unwrap();
        assert_eq!(AnalysisConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"output_dir": "arrays", "community": {"seed": 3}}"#).unwrap();
        let config = AnalysisConfig::load_or_default(&path);
        assert_eq!(config.output_dir, PathBuf::from("arrays"));
        assert_eq!(config.community.seed, Some(3));
        assert_eq!(config.community.resolution, 1.0);
        assert_eq!(config.histogram_range, (0.0, 100.0));
    }

    #[test]
    fn test_invalid_or_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(AnalysisConfig::load_or_default(&path), AnalysisConfig::default());
        fs::write(&path, "not json").unwrap();
        assert_eq!(AnalysisConfig::load_or_default(&path), AnalysisConfig::default());
    }
}
