//! # Reaction set and species index
//!
//! ## Aim
//! Holds what the chemistry parser hands over: the ordered list of unique species and the
//! reaction records with their stoichiometric coefficients. Every other part of the analysis
//! reads species positions from `SpeciesIndex`, so the column order of all matrices is fixed here.
//!
//! ## Main Data Structures and Logic
//! - `ReactionRecord`: one reaction, reactants and products as parallel name/coefficient lists
//! - `ReactionSet`: species list plus reactions, (de)serializable from JSON
//! - `SpeciesIndex`: species list with a name -> position table built once
//! - `UnknownSpeciesPolicy`: what the builders do with a name missing from the index
//!
//! ## Usage
//! ```rust, ignore
//! let set: ReactionSet = serde_json::from_str(&text)?;
//! let index = SpeciesIndex::new(set.species.clone());
//! assert_eq!(index.position("He"), Some(1));
//! ```
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// one reaction as produced by the chemistry parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRecord {
    #[serde(rename = "lhsSpecies")]
    pub lhs_species: Vec<String>,
    #[serde(rename = "lhsStoichiometricCoeffs")]
    pub lhs_coeffs: Vec<f64>,
    #[serde(rename = "rhsSpecies")]
    pub rhs_species: Vec<String>,
    #[serde(rename = "rhsStoichiometricCoeffs")]
    pub rhs_coeffs: Vec<f64>,
}

impl ReactionRecord {
    pub fn new(
        lhs_species: Vec<&str>,
        lhs_coeffs: Vec<f64>,
        rhs_species: Vec<&str>,
        rhs_coeffs: Vec<f64>,
    ) -> Self {
        Self {
            lhs_species: lhs_species.iter().map(|s| s.to_string()).collect(),
            lhs_coeffs,
            rhs_species: rhs_species.iter().map(|s| s.to_string()).collect(),
            rhs_coeffs,
        }
    }
    /// (species, coefficient) pairs of the left-hand side
    pub fn reactants(&self) -> impl Iterator<Item = (&str, f64)> {
        self.lhs_species
            .iter()
            .map(|s| s.as_str())
            .zip(self.lhs_coeffs.iter().copied())
    }
    /// (species, coefficient) pairs of the right-hand side
    pub fn products(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rhs_species
            .iter()
            .map(|s| s.as_str())
            .zip(self.rhs_coeffs.iter().copied())
    }
    /// reactant pairs followed by product pairs
    pub fn participants(&self) -> impl Iterator<Item = (&str, f64)> {
        self.reactants().chain(self.products())
    }
    /// true if a species list and its coefficient list differ in length
    pub fn has_coefficient_mismatch(&self) -> bool {
        self.lhs_species.len() != self.lhs_coeffs.len()
            || self.rhs_species.len() != self.rhs_coeffs.len()
    }
}

/// species list and reactions of one reaction-set file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSet {
    #[serde(alias = "uniqueSpecies")]
    pub species: Vec<String>,
    pub reactions: Vec<ReactionRecord>,
}

/// behaviour of the matrix and graph builders when a reaction names a species
/// that is not in the species index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownSpeciesPolicy {
    /// abort with `NetworkError::UnknownSpecies`
    #[default]
    Reject,
    /// skip the pair
    Ignore,
}

/// canonical species order plus a name -> position table
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesIndex {
    species: Vec<String>,
    positions: HashMap<String, usize>,
}

impl SpeciesIndex {
    /// builds the lookup table once. If a name repeats, the first position wins and
    /// later columns of that name stay empty: callers must keep names unique.
    pub fn new(species: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(species.len());
        for (i, name) in species.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { species, positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.species
    }

    /// species names in index order, each name once
    pub fn unique_names(&self) -> Vec<String> {
        self.species
            .iter()
            .enumerate()
            .filter(|(i, name)| self.positions.get(name.as_str()) == Some(i))
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// names that occur more than once, in order of their second occurrence
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for name in &self.species {
            if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
                duplicates.push(name.clone());
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_record_from_parser_json() {
        let text = r#"{
            "uniqueSpecies": ["e", "He", "He(2S)"],
            "reactions": [
                {"lhsSpecies": ["e", "He"], "lhsStoichiometricCoeffs": [1, 1],
                 "rhsSpecies": ["e", "He(2S)"], "rhsStoichiometricCoeffs": [1, 1]}
            ]
        }"#;
        let set: ReactionSet = serde_json::from_str(text).unwrap();
        assert_eq!(set.species, vec!["e", "He", "He(2S)"]);
        assert_eq!(set.reactions.len(), 1);
        let reactants: Vec<(&str, f64)> = set.reactions[0].reactants().collect();
        assert_eq!(reactants, vec![("e", 1.0), ("He", 1.0)]);
        let all: Vec<&str> = set.reactions[0].participants().map(|(s, _)| s).collect();
        assert_eq!(all, vec!["e", "He", "e", "He(2S)"]);
    }

    #[test]
    fn test_pairs_follow_zip_semantics() {
        let r = ReactionRecord::new(vec!["A", "B"], vec![2.0], vec!["C"], vec![1.0]);
        assert!(r.has_coefficient_mismatch());
        let reactants: Vec<(&str, f64)> = r.reactants().collect();
        assert_eq!(reactants, vec![("A", 2.0)]);
    }

    #[test]
    fn test_species_index_positions() {
        let index = SpeciesIndex::new(vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.position("C"), Some(2));
        assert_eq!(index.position("D"), None);
        assert!(index.contains("A"));
        assert!(index.duplicate_names().is_empty());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_occurrence() {
        let index = SpeciesIndex::new(vec!["A".into(), "B".into(), "A".into(), "A".into()]);
        assert_eq!(index.position("A"), Some(0));
        assert_eq!(index.duplicate_names(), vec!["A".to_string()]);
        assert_eq!(index.unique_names(), vec!["A".to_string(), "B".to_string()]);
    }
}
