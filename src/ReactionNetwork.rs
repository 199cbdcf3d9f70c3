/// species list and reaction records as produced by the chemistry parser, the canonical species
/// index and the policy for species missing from it
pub mod reaction_set;
/// reactant and product incidence matrices (reactions x species), binary or weighted by the
/// stoichiometric coefficients, and their column-sum degree vectors
pub mod incidence;
/// energy database parsing, ordering of species by state energy and reindexing of degree
/// vectors to that order
pub mod energy_ordering;
/// undirected bipartite graph of species and reaction nodes, edges weighted by the
/// stoichiometric coefficient
pub mod bipartite;
/// species-only graph: two species are linked when they take part in a common reaction
pub mod projection;
/// Louvain community detection on the species projection and the modularity of a partition
pub mod community;
/// connectivity against energy series, label selection and degree histograms
pub mod connectivity_energy;
/// fatal errors and recoverable warnings of the analysis
pub mod network_errors;
/// the whole analysis: input source -> arrays, graphs, communities -> output sink
pub mod pipeline;
/// printed tables of an analysis report
pub mod report;
