//! # Incidence matrices and species connectivity
//!
//! ## Aim
//! Builds the reactions x species incidence matrices of the reactant side and the product side
//! and reduces them to per-species degree vectors.
//!
//! ## Main Data Structures and Logic
//! - `IncidenceMode`: `Binary` writes 1 for every species present on a side, `Weighted` writes its
//!   stoichiometric coefficient
//! - `IncidenceMatrices`: the reactant and product matrices of one mode, shape R x S, columns in
//!   species-index order
//! - `DegreePair`: column sums of both matrices
//!
//! Rows are written directly into a zeroed `DMatrix` using the position table of `SpeciesIndex`,
//! nothing is kept between reactions. If a species is repeated on one side the last coefficient
//! is kept, coefficients are never summed.
//!
//! ## Usage
//! ```rust, ignore
//! let binary = build_incidence(&index, &reactions, IncidenceMode::Binary, UnknownSpeciesPolicy::Reject)?;
//! let degrees = DegreePair::from_matrices(&binary);
//! ```
use crate::ReactionNetwork::network_errors::NetworkError;
use crate::ReactionNetwork::reaction_set::{ReactionRecord, SpeciesIndex, UnknownSpeciesPolicy};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidenceMode {
    Binary,
    Weighted,
}

impl IncidenceMode {
    /// suffix used for the names of persisted arrays
    pub fn suffix(&self) -> &'static str {
        match self {
            IncidenceMode::Binary => "",
            IncidenceMode::Weighted => "_w",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceMatrices {
    pub mode: IncidenceMode,
    pub reactants: DMatrix<f64>,
    pub products: DMatrix<f64>,
}

impl IncidenceMatrices {
    /// (number of reactions, number of species)
    pub fn shape(&self) -> (usize, usize) {
        self.reactants.shape()
    }
}

/// builds the reactant and product matrices of the given mode
pub fn build_incidence(
    index: &SpeciesIndex,
    reactions: &[ReactionRecord],
    mode: IncidenceMode,
    policy: UnknownSpeciesPolicy,
) -> Result<IncidenceMatrices, NetworkError> {
    let n_reactions = reactions.len();
    let n_species = index.len();
    let mut reactants = DMatrix::zeros(n_reactions, n_species);
    let mut products = DMatrix::zeros(n_reactions, n_species);

    for (i, reaction) in reactions.iter().enumerate() {
        if mode == IncidenceMode::Weighted && reaction.has_coefficient_mismatch() {
            warn!(
                "reaction R{}: species and coefficient lists differ in length, extra entries ignored",
                i
            );
        }
        write_side(&mut reactants, i, index, side_pairs(reaction, mode, Side::Reactants), policy)?;
        write_side(&mut products, i, index, side_pairs(reaction, mode, Side::Products), policy)?;
    }
    debug!(
        "{:?} incidence matrices built: {} reactions x {} species",
        mode, n_reactions, n_species
    );
    Ok(IncidenceMatrices {
        mode,
        reactants,
        products,
    })
}

#[derive(Clone, Copy)]
enum Side {
    Reactants,
    Products,
}

/// the (species, cell value) pairs of one side; binary mode ignores coefficients
fn side_pairs(
    reaction: &ReactionRecord,
    mode: IncidenceMode,
    side: Side,
) -> Box<dyn Iterator<Item = (&str, f64)> + '_> {
    match (mode, side) {
        (IncidenceMode::Binary, Side::Reactants) => {
            Box::new(reaction.lhs_species.iter().map(|s| (s.as_str(), 1.0)))
        }
        (IncidenceMode::Binary, Side::Products) => {
            Box::new(reaction.rhs_species.iter().map(|s| (s.as_str(), 1.0)))
        }
        (IncidenceMode::Weighted, Side::Reactants) => Box::new(reaction.reactants()),
        (IncidenceMode::Weighted, Side::Products) => Box::new(reaction.products()),
    }
}

fn write_side<'a>(
    matrix: &mut DMatrix<f64>,
    row: usize,
    index: &SpeciesIndex,
    pairs: impl Iterator<Item = (&'a str, f64)>,
    policy: UnknownSpeciesPolicy,
) -> Result<(), NetworkError> {
    for (species, value) in pairs {
        match index.position(species) {
            Some(col) => matrix[(row, col)] = value,
            None => match policy {
                UnknownSpeciesPolicy::Reject => {
                    return Err(NetworkError::UnknownSpecies {
                        reaction: row,
                        species: species.to_string(),
                    });
                }
                UnknownSpeciesPolicy::Ignore => {
                    debug!("reaction R{}: unknown species '{}' skipped", row, species)
                }
            },
        }
    }
    Ok(())
}

/// sum of every column: one connectivity value per species
pub fn column_degrees(matrix: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(matrix.ncols(), matrix.column_iter().map(|col| col.sum()))
}

/// degree vectors of the reactant and product matrices
#[derive(Debug, Clone, PartialEq)]
pub struct DegreePair {
    pub reactants: DVector<f64>,
    pub products: DVector<f64>,
}

impl DegreePair {
    pub fn from_matrices(matrices: &IncidenceMatrices) -> Self {
        Self {
            reactants: column_degrees(&matrices.reactants),
            products: column_degrees(&matrices.products),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> (SpeciesIndex, Vec<ReactionRecord>) {
        let index = SpeciesIndex::new(vec!["A".into(), "B".into(), "C".into()]);
        let reactions = vec![
            ReactionRecord::new(vec!["A", "B"], vec![1.0, 1.0], vec!["C"], vec![1.0]),
            ReactionRecord::new(vec!["C"], vec![1.0], vec!["A"], vec![1.0]),
        ];
        (index, reactions)
    }

    #[test]
    fn test_binary_matrices_and_degrees() {
        let (index, reactions) = scenario();
        let m = build_incidence(
            &index,
            &reactions,
            IncidenceMode::Binary,
            UnknownSpeciesPolicy::Reject,
        )
        .unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.products.shape(), (2, 3));
        assert_eq!(
            m.reactants,
            DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 0.0, 0.0, 0.0, 1.0])
        );
        assert_eq!(
            m.products,
            DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0])
        );
        let degrees = DegreePair::from_matrices(&m);
        assert_eq!(degrees.reactants, DVector::from_vec(vec![1.0, 1.0, 1.0]));
        assert_eq!(degrees.products, DVector::from_vec(vec![1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_weighted_matrices_keep_coefficients() {
        let index = SpeciesIndex::new(vec!["e".into(), "He".into(), "He2+".into()]);
        let reactions = vec![
            ReactionRecord::new(vec!["e", "He"], vec![1.0, 2.0], vec!["e", "He2+"], vec![2.0, 1.0]),
            ReactionRecord::new(vec!["He2+", "e"], vec![1.0, 1.0], vec!["He"], vec![2.0]),
        ];
        let m = build_incidence(
            &index,
            &reactions,
            IncidenceMode::Weighted,
            UnknownSpeciesPolicy::Reject,
        )
        .unwrap();
        assert_eq!(m.reactants[(0, 1)], 2.0);
        assert_eq!(m.products[(0, 0)], 2.0);
        assert_eq!(m.products[(1, 1)], 2.0);
        assert_eq!(m.reactants[(1, 1)], 0.0);
        let degrees = DegreePair::from_matrices(&m);
        // weighted degree sums equal the total coefficient mass of each side
        assert_eq!(degrees.reactants.sum(), 5.0);
        assert_eq!(degrees.products.sum(), 5.0);
        assert_eq!(degrees.reactants, DVector::from_vec(vec![2.0, 2.0, 1.0]));
    }

    #[test]
    fn test_repeated_species_overwrites() {
        let index = SpeciesIndex::new(vec!["A".into(), "B".into()]);
        let reactions = vec![ReactionRecord::new(
            vec!["A", "A"],
            vec![2.0, 3.0],
            vec!["B"],
            vec![1.0],
        )];
        let w = build_incidence(&index, &reactions, IncidenceMode::Weighted, Default::default())
            .unwrap();
        assert_eq!(w.reactants[(0, 0)], 3.0);
        let b = build_incidence(&index, &reactions, IncidenceMode::Binary, Default::default())
            .unwrap();
        assert_eq!(b.reactants[(0, 0)], 1.0);
    }

    #[test]
    fn test_unknown_species_is_rejected() {
        let (index, mut reactions) = scenario();
        reactions.push(ReactionRecord::new(vec!["A"], vec![1.0], vec!["X"], vec![1.0]));
        let result = build_incidence(
            &index,
            &reactions,
            IncidenceMode::Binary,
            UnknownSpeciesPolicy::Reject,
        );
        match result {
            Err(NetworkError::UnknownSpecies { reaction, species }) => {
                assert_eq!(reaction, 2);
                assert_eq!(species, "X");
            }
            other => panic!("expected UnknownSpecies, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_species_can_be_ignored() {
        let (index, mut reactions) = scenario();
        reactions.push(ReactionRecord::new(vec!["A"], vec![1.0], vec!["X"], vec![1.0]));
        let m = build_incidence(
            &index,
            &reactions,
            IncidenceMode::Binary,
            UnknownSpeciesPolicy::Ignore,
        )
        .unwrap();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.products.row(2).sum(), 0.0);
    }

    #[test]
    fn test_empty_matrix_gives_zero_degrees() {
        let m = DMatrix::<f64>::zeros(0, 4);
        assert_eq!(column_degrees(&m), DVector::from_vec(vec![0.0; 4]));
    }
}
