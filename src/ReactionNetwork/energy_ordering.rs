//! # Energy database and energy ordering of species
//!
//! ## Aim
//! Reads the plain-text state-energy database and orders the species of a reaction set by
//! their energy (eV), so that connectivity can be looked at as a function of energy.
//!
//! ## Main Data Structures and Logic
//! - `EnergyTable`: species -> energy map that remembers insertion order (ties in the
//!   ordering are broken by it)
//! - `EnergyParseReport`: the table plus every line that was skipped
//! - `EnergyOrdering`: species present both in the table and in the index, ascending in energy,
//!   and the species that had to be dropped for lack of an energy value
//!
//! ## Line format
//! `%` comments and blank lines are ignored. Any other line is split on whitespace: the last
//! token is the energy, the tokens before it joined by one space form the species name.
//! A line with fewer than two tokens or with a non-numeric energy is skipped and logged.
use crate::ReactionNetwork::network_errors::{NetworkError, NetworkWarning};
use crate::ReactionNetwork::reaction_set::SpeciesIndex;
use log::{info, warn};
use nalgebra::DVector;
use std::collections::HashMap;

/// species -> energy (eV) in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyTable {
    entries: Vec<(String, f64)>,
    positions: HashMap<String, usize>,
}

impl EnergyTable {
    pub fn new() -> Self {
        Self::default()
    }
    /// inserts a value; a species already present keeps its place and gets the new value.
    /// Returns the previous value if there was one
    pub fn insert(&mut self, species: &str, energy: f64) -> Option<f64> {
        match self.positions.get(species) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, energy)),
            None => {
                self.positions.insert(species.to_string(), self.entries.len());
                self.entries.push((species.to_string(), energy));
                None
            }
        }
    }

    pub fn get(&self, species: &str) -> Option<f64> {
        self.positions.get(species).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.positions.contains_key(species)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, e)| (s.as_str(), *e))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for EnergyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut table = EnergyTable::new();
        for (species, energy) in iter {
            table.insert(species, energy);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyParseReport {
    pub table: EnergyTable,
    /// `NetworkWarning::Format` for every rejected line
    pub skipped: Vec<NetworkWarning>,
}

/// parses the text of an energy database
pub fn parse_energy_database(text: &str) -> EnergyParseReport {
    let mut table = EnergyTable::new();
    let mut skipped = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        match parse_energy_line(line) {
            Some((species, energy)) => {
                if let Some(previous) = table.insert(&species, energy) {
                    warn!(
                        "species '{}' listed twice in energy database, {} eV replaced by {} eV",
                        species, previous, energy
                    );
                }
            }
            None => {
                warn!("energy database line {} ignored, unexpected format: {}", i + 1, line);
                skipped.push(NetworkWarning::Format {
                    line: i + 1,
                    content: line.to_string(),
                });
            }
        }
    }
    info!(
        "energy database parsed: {} species, {} lines skipped",
        table.len(),
        skipped.len()
    );
    EnergyParseReport { table, skipped }
}

fn parse_energy_line(line: &str) -> Option<(String, f64)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (last, name) = tokens.split_last()?;
    if name.is_empty() {
        return None;
    }
    let energy: f64 = last.parse().ok()?;
    if !energy.is_finite() {
        return None;
    }
    Some((name.join(" "), energy))
}

/// species of the reaction set sorted by energy
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyOrdering {
    pub ordered_species: Vec<String>,
    /// energies of `ordered_species`, non-decreasing
    pub energies: Vec<f64>,
    /// species of the index without an energy value, in index order
    pub dropped_species: Vec<String>,
}

impl EnergyOrdering {
    pub fn coverage_warnings(&self) -> Vec<NetworkWarning> {
        self.dropped_species
            .iter()
            .map(|s| NetworkWarning::Coverage { species: s.clone() })
            .collect()
    }
}

/// ascending stable sort of the table entries that belong to the index
pub fn order_by_energy(table: &EnergyTable, index: &SpeciesIndex) -> EnergyOrdering {
    let mut present: Vec<(&str, f64)> = table
        .iter()
        .filter(|(species, _)| index.contains(species))
        .collect();
    present.sort_by(|a, b| a.1.total_cmp(&b.1));

    let dropped_species: Vec<String> = index
        .unique_names()
        .into_iter()
        .filter(|s| !table.contains(s))
        .collect();
    for species in &dropped_species {
        warn!("species '{}' not found in energy data, left out of the ordering", species);
    }

    EnergyOrdering {
        ordered_species: present.iter().map(|(s, _)| s.to_string()).collect(),
        energies: present.iter().map(|(_, e)| *e).collect(),
        dropped_species,
    }
}

/// picks the values of `vector` (index order) for the species of `ordered`
pub fn reindex_to_order(
    vector: &DVector<f64>,
    index: &SpeciesIndex,
    ordered: &[String],
) -> Result<DVector<f64>, NetworkError> {
    if vector.len() != index.len() {
        return Err(NetworkError::LengthMismatch {
            expected: index.len(),
            found: vector.len(),
        });
    }
    let values = ordered
        .iter()
        .map(|species| {
            index
                .position(species)
                .and_then(|i| vector.get(i).copied())
                .ok_or_else(|| NetworkError::UnknownNode(species.clone()))
        })
        .collect::<Result<Vec<f64>, NetworkError>>()?;
    Ok(DVector::from_vec(values))
}
