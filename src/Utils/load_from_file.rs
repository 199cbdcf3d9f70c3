//! Input side of the analysis: where the reaction set and the energy database come from.
//! The pipeline only sees the `InputSource` trait, paths are resolved by whoever builds the
//! source.
use crate::ReactionNetwork::network_errors::NetworkError;
use crate::ReactionNetwork::reaction_set::ReactionSet;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// provider of the two inputs of a run
pub trait InputSource {
    /// species list and reaction records (Input A)
    fn reaction_set(&self) -> Result<ReactionSet, NetworkError>;
    /// raw text of the energy database (Input B)
    fn energy_database(&self) -> Result<String, NetworkError>;
}

/// inputs read from files
pub struct LoadData {
    pub reactions_file: PathBuf,
    pub energy_file: PathBuf,
}

impl LoadData {
    pub fn new(reactions_file: impl Into<PathBuf>, energy_file: impl Into<PathBuf>) -> Self {
        LoadData {
            reactions_file: reactions_file.into(),
            energy_file: energy_file.into(),
        }
    }
}

impl InputSource for LoadData {
    fn reaction_set(&self) -> Result<ReactionSet, NetworkError> {
        load_reaction_set(&self.reactions_file)
    }
    fn energy_database(&self) -> Result<String, NetworkError> {
        read_text(&self.energy_file)
    }
}

/// reads a reaction set written as JSON by the chemistry parser
pub fn load_reaction_set(path: &Path) -> Result<ReactionSet, NetworkError> {
    let text = read_text(path)?;
    let set: ReactionSet = serde_json::from_str(&text).map_err(|e| {
        error!(
            "Error parsing reaction set '{}' at line {}, column {}: {}",
            path.display(),
            e.line(),
            e.column(),
            e
        );
        NetworkError::Json(e)
    })?;
    if set.reactions.is_empty() {
        warn!("reaction set '{}' contains no reactions", path.display());
    }
    info!(
        "Loaded reaction set from '{}': {} species, {} reactions",
        path.display(),
        set.species.len(),
        set.reactions.len()
    );
    Ok(set)
}

fn read_text(path: &Path) -> Result<String, NetworkError> {
    fs::read_to_string(path).map_err(|e| {
        error!("Failed to read '{}': {}", path.display(), e);
        NetworkError::io(path, e)
    })
}

/// inputs already held in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    pub reactions: ReactionSet,
    pub energies: String,
}

impl InputSource for InMemorySource {
    fn reaction_set(&self) -> Result<ReactionSet, NetworkError> {
        Ok(self.reactions.clone())
    }
    fn energy_database(&self) -> Result<String, NetworkError> {
        Ok(self.energies.clone())
    }
}
