//! # Analysis pipeline
//!
//! ## Aim
//! Runs the whole analysis of one reaction set: the connectivity branch (incidence matrices,
//! degrees, energy ordering) and the graph branch (bipartite graph, species projection,
//! communities). Both branches start from the same species index and are otherwise independent.
//!
//! ## Key Methods
//! - `NetworkAnalysis::run()`: reads both inputs from an `InputSource`, computes everything,
//!   hands the arrays to an `OutputSink` and returns an `AnalysisReport`
//! - `NetworkAnalysis::analyse()`: the same on inputs already in memory, no persistence
//!
//! ## Persisted arrays
//! | name | content |
//! |------|---------|
//! | `reactantsMatrix`, `productsMatrix` | binary incidence matrices |
//! | `reactantsDegree`, `productsDegree` | their column sums |
//! | `reactantsMatrix_w`, `productsMatrix_w` | weighted incidence matrices |
//! | `reactantsDegree_w`, `productsDegree_w` | their column sums |
//! | `ordered_species` | species ascending in energy |
//! | `reactantsDegree_sorted`, `productsDegree_sorted` | binary degrees in energy order |
//! | `reactantsDegree_w_sorted`, `productsDegree_w_sorted` | weighted degrees in energy order |
//!
//! Only an unknown species (with `UnknownSpeciesPolicy::Reject`) or an I/O failure stops a run;
//! malformed energy lines and species without energy end up in `AnalysisReport::warnings`.
use crate::ReactionNetwork::bipartite::BipartiteGraph;
use crate::ReactionNetwork::community::{CommunityResult, detect_communities, modularity};
use crate::ReactionNetwork::energy_ordering::{
    EnergyOrdering, EnergyTable, order_by_energy, parse_energy_database, reindex_to_order,
};
use crate::ReactionNetwork::incidence::{
    DegreePair, IncidenceMatrices, IncidenceMode, build_incidence,
};
use crate::ReactionNetwork::network_errors::{NetworkError, NetworkWarning};
use crate::ReactionNetwork::projection::{ProjectedGraph, project_onto_species};
use crate::ReactionNetwork::reaction_set::{ReactionSet, SpeciesIndex};
use crate::Utils::load_from_file::InputSource;
use crate::Utils::save_to_file::{ArrayArtifact, OutputSink};
use crate::settings::AnalysisConfig;
use log::{info, warn};

/// everything one run produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub index: SpeciesIndex,
    pub binary: IncidenceMatrices,
    pub weighted: IncidenceMatrices,
    pub binary_degrees: DegreePair,
    pub weighted_degrees: DegreePair,
    pub energies: EnergyTable,
    pub ordering: EnergyOrdering,
    /// binary degrees reindexed to `ordering.ordered_species`
    pub binary_degrees_sorted: DegreePair,
    /// weighted degrees reindexed to `ordering.ordered_species`
    pub weighted_degrees_sorted: DegreePair,
    pub bipartite: BipartiteGraph,
    pub projected: ProjectedGraph,
    pub communities: CommunityResult,
    /// modularity of `communities.partition` evaluated on `projected`
    pub modularity: f64,
    pub warnings: Vec<NetworkWarning>,
}

pub struct NetworkAnalysis {
    pub config: AnalysisConfig,
}

impl NetworkAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// reads the inputs, analyses them and persists the arrays
    pub fn run(
        &self,
        source: &dyn InputSource,
        sink: &mut dyn OutputSink,
    ) -> Result<AnalysisReport, NetworkError> {
        let reaction_set = source.reaction_set()?;
        let energy_text = source.energy_database()?;
        let report = self.analyse(&reaction_set, &energy_text)?;
        persist(&report, sink)?;
        info!("analysis finished with {} warnings", report.warnings.len());
        Ok(report)
    }

    /// analysis of inputs already in memory
    pub fn analyse(
        &self,
        reaction_set: &ReactionSet,
        energy_text: &str,
    ) -> Result<AnalysisReport, NetworkError> {
        let policy = self.config.unknown_species;
        let index = SpeciesIndex::new(reaction_set.species.clone());
        let duplicates = index.duplicate_names();
        if !duplicates.is_empty() {
            warn!(
                "species listed more than once, first occurrence used: {}",
                duplicates.join(", ")
            );
        }
        let reactions = &reaction_set.reactions;
        info!(
            "analysing {} reactions over {} species",
            reactions.len(),
            index.len()
        );

        // connectivity branch
        let binary = build_incidence(&index, reactions, IncidenceMode::Binary, policy)?;
        let weighted = build_incidence(&index, reactions, IncidenceMode::Weighted, policy)?;
        let binary_degrees = DegreePair::from_matrices(&binary);
        let weighted_degrees = DegreePair::from_matrices(&weighted);

        let parsed = parse_energy_database(energy_text);
        let mut warnings = parsed.skipped.clone();
        let ordering = order_by_energy(&parsed.table, &index);
        warnings.extend(ordering.coverage_warnings());
        let ordered = &ordering.ordered_species;
        let sorted = |pair: &DegreePair| -> Result<DegreePair, NetworkError> {
            Ok(DegreePair {
                reactants: reindex_to_order(&pair.reactants, &index, ordered)?,
                products: reindex_to_order(&pair.products, &index, ordered)?,
            })
        };
        let binary_degrees_sorted = sorted(&binary_degrees)?;
        let weighted_degrees_sorted = sorted(&weighted_degrees)?;

        // graph branch
        let bipartite = BipartiteGraph::build(&index, reactions, policy)?;
        let projected = project_onto_species(&bipartite, &bipartite.species_names())?;
        let communities = detect_communities(&projected, &self.config.community);
        let modularity = modularity(&projected, &communities.partition.as_map())?;

        Ok(AnalysisReport {
            index,
            binary,
            weighted,
            binary_degrees,
            weighted_degrees,
            energies: parsed.table,
            ordering,
            binary_degrees_sorted,
            weighted_degrees_sorted,
            bipartite,
            projected,
            communities,
            modularity,
            warnings,
        })
    }
}

/// hands every array of the report to the sink
pub fn persist(report: &AnalysisReport, sink: &mut dyn OutputSink) -> Result<(), NetworkError> {
    for (matrices, degrees, sorted) in [
        (&report.binary, &report.binary_degrees, &report.binary_degrees_sorted),
        (&report.weighted, &report.weighted_degrees, &report.weighted_degrees_sorted),
    ] {
        let sfx = matrices.mode.suffix();
        sink.write_array(
            &format!("reactantsMatrix{}", sfx),
            &ArrayArtifact::matrix(&matrices.reactants),
        )?;
        sink.write_array(
            &format!("productsMatrix{}", sfx),
            &ArrayArtifact::matrix(&matrices.products),
        )?;
        sink.write_array(
            &format!("reactantsDegree{}", sfx),
            &ArrayArtifact::vector(&degrees.reactants),
        )?;
        sink.write_array(
            &format!("productsDegree{}", sfx),
            &ArrayArtifact::vector(&degrees.products),
        )?;
        sink.write_array(
            &format!("reactantsDegree{}_sorted", sfx),
            &ArrayArtifact::vector(&sorted.reactants),
        )?;
        sink.write_array(
            &format!("productsDegree{}_sorted", sfx),
            &ArrayArtifact::vector(&sorted.products),
        )?;
    }
    sink.write_array(
        "ordered_species",
        &ArrayArtifact::names(&report.ordering.ordered_species),
    )?;
    Ok(())
}
