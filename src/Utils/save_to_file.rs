//! Output side of the analysis: named numeric arrays (matrices, degree vectors, species lists)
//! handed to an `OutputSink`. `JsonDirectory` writes one `<name>.json` file per array,
//! `MemorySink` keeps them for inspection.
use crate::ReactionNetwork::network_errors::NetworkError;
use log::info;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

/// one persisted array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArrayArtifact {
    /// row-major matrix
    Matrix {
        shape: (usize, usize),
        rows: Vec<Vec<f64>>,
    },
    Vector { values: Vec<f64> },
    Names { values: Vec<String> },
}

impl ArrayArtifact {
    pub fn matrix(m: &DMatrix<f64>) -> Self {
        ArrayArtifact::Matrix {
            shape: m.shape(),
            rows: m
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
        }
    }

    pub fn vector(v: &DVector<f64>) -> Self {
        ArrayArtifact::Vector {
            values: v.iter().copied().collect(),
        }
    }

    pub fn names(names: &[String]) -> Self {
        ArrayArtifact::Names {
            values: names.to_vec(),
        }
    }
}

pub trait OutputSink {
    fn write_array(&mut self, name: &str, artifact: &ArrayArtifact) -> Result<(), NetworkError>;
}

/// writes every array as pretty JSON into a directory
pub struct JsonDirectory {
    pub dir: PathBuf,
}

impl JsonDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputSink for JsonDirectory {
    fn write_array(&mut self, name: &str, artifact: &ArrayArtifact) -> Result<(), NetworkError> {
        fs::create_dir_all(&self.dir).map_err(|e| NetworkError::io(&self.dir, e))?;
        let path = self.dir.join(format!("{}.json", name));
        let mut file = File::create(&path).map_err(|e| NetworkError::io(&path, e))?;
        file.write_all(serde_json::to_string_pretty(artifact)?.as_bytes())
            .map_err(|e| NetworkError::io(&path, e))?;
        info!("{} has been written to {}", name, path.display());
        Ok(())
    }
}

/// keeps the arrays in memory, by name
#[derive(Debug, Default)]
pub struct MemorySink {
    pub arrays: BTreeMap<String, ArrayArtifact>,
}

impl OutputSink for MemorySink {
    fn write_array(&mut self, name: &str, artifact: &ArrayArtifact) -> Result<(), NetworkError> {
        self.arrays.insert(name.to_string(), artifact.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_matrix_artifact_is_row_major() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        match ArrayArtifact::matrix(&m) {
            ArrayArtifact::Matrix { shape, rows } => {
                assert_eq!(shape, (2, 3));
                assert_eq!(rows, vec![vec![1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]);
            }
            other => panic!("unexpected artifact {:?}", other),
        }
    }

    #[test]
    fn test_json_directory_writes_files() {
        let dir = tempdir().unwrap();
        let mut sink = JsonDirectory::new(dir.path().join("out"));
        let artifact = ArrayArtifact::names(&["C".to_string(), "A".to_string()]);
        sink.write_array("ordered_species", &artifact).unwrap();
        let text = fs::read_to_string(dir.path().join("out").join("ordered_species.json")).unwrap();
        let back: ArrayArtifact = serde_json::from_str(&text).unwrap();
        assert_eq!(back, artifact);
        assert!(text.contains("\"kind\": \"names\""));
    }
}
