//! # Errors and warnings of the reaction network analysis
//!
//! Only `NetworkError` stops a run. Recoverable problems (a malformed line of the energy
//! database, a species without an energy value) are logged with `warn!` and collected as
//! `NetworkWarning` so the caller can decide what to do with them.
use std::path::PathBuf;
use thiserror::Error;

/// fatal errors of the analysis
#[derive(Debug, Error)]
pub enum NetworkError {
    /// a reaction refers to a species that is not part of the species index
    #[error("reaction R{reaction} references unknown species '{species}'")]
    UnknownSpecies { reaction: usize, species: String },
    /// a species name asked for is not a node of the graph
    #[error("species '{0}' is not a node of the graph")]
    UnknownNode(String),
    /// a node of the graph was left without a community
    #[error("partition does not assign a community to node '{0}'")]
    IncompletePartition(String),
    /// a per-species vector whose length differs from the species index
    #[error("vector of length {found} given for {expected} species")]
    LengthMismatch { expected: usize, found: usize },
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetworkError::Io {
            path: path.into(),
            source,
        }
    }
}

/// non-fatal problems met during a run
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkWarning {
    /// line of the energy database that could not be parsed (1-based line number)
    Format { line: usize, content: String },
    /// species of the reaction set with no energy value
    Coverage { species: String },
}

impl std::fmt::Display for NetworkWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkWarning::Format { line, content } => {
                write!(f, "energy database line {} skipped: '{}'", line, content)
            }
            NetworkWarning::Coverage { species } => {
                write!(f, "species '{}' not found in energy data", species)
            }
        }
    }
}
