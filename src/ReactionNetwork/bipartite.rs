//! # Bipartite species-reaction graph
//!
//! ## Aim
//! Represents the reaction set as an undirected graph with two kinds of nodes: species and
//! reactions. A reaction node `R{i}` is linked to every species taking part in reaction `i`,
//! the edge weight is the stoichiometric coefficient.
//!
//! ## Main Data Structures and Logic
//! - `NodeRole`: `Species` or `Reaction`
//! - `NetworkNode`: node id plus role
//! - `BipartiteGraph`: `petgraph` `UnGraph<NetworkNode, f64>` with lookup tables for both layers
//!
//! Species nodes are added first in index order, then one node per reaction. Edges are added
//! reactants first, then products, with add-or-overwrite semantics: a species listed on both sides
//! of a reaction (or twice on one side) ends up with one edge carrying the last coefficient.
//! The incidence matrices keep the per-side values.
//!
//! ## Usage
//! ```rust, ignore
//! let graph = BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Reject)?;
//! let (species_layer, reaction_layer) = graph.display_layers(&["e".to_string()]);
//! ```
use crate::ReactionNetwork::network_errors::NetworkError;
use crate::ReactionNetwork::reaction_set::{ReactionRecord, SpeciesIndex, UnknownSpeciesPolicy};
use log::{debug, info};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Species,
    Reaction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub id: String,
    pub role: NodeRole,
}

/// id of the node of the i-th reaction
pub fn reaction_id(i: usize) -> String {
    format!("R{}", i)
}

#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    graph: UnGraph<NetworkNode, f64>,
    species_nodes: HashMap<String, NodeIndex>,
    /// species node indices in index order
    species_order: Vec<NodeIndex>,
    /// node of reaction i at position i
    reaction_nodes: Vec<NodeIndex>,
}

impl BipartiteGraph {
    pub fn build(
        index: &SpeciesIndex,
        reactions: &[ReactionRecord],
        policy: UnknownSpeciesPolicy,
    ) -> Result<Self, NetworkError> {
        let mut graph = UnGraph::with_capacity(index.len() + reactions.len(), 0);
        let mut species_nodes = HashMap::with_capacity(index.len());
        let mut species_order = Vec::with_capacity(index.len());
        for name in index.unique_names() {
            let node = graph.add_node(NetworkNode {
                id: name.clone(),
                role: NodeRole::Species,
            });
            species_nodes.insert(name, node);
            species_order.push(node);
        }

        let mut reaction_nodes = Vec::with_capacity(reactions.len());
        for (i, reaction) in reactions.iter().enumerate() {
            let r_node = graph.add_node(NetworkNode {
                id: reaction_id(i),
                role: NodeRole::Reaction,
            });
            reaction_nodes.push(r_node);
            for (species, coeff) in reaction.participants() {
                match species_nodes.get(species) {
                    Some(&s_node) => {
                        graph.update_edge(r_node, s_node, coeff);
                    }
                    None => match policy {
                        UnknownSpeciesPolicy::Reject => {
                            return Err(NetworkError::UnknownSpecies {
                                reaction: i,
                                species: species.to_string(),
                            });
                        }
                        UnknownSpeciesPolicy::Ignore => {
                            debug!("reaction R{}: unknown species '{}' skipped", i, species)
                        }
                    },
                }
            }
        }
        info!(
            "bipartite graph built: {} species nodes, {} reaction nodes, {} edges",
            species_order.len(),
            reaction_nodes.len(),
            graph.edge_count()
        );
        Ok(Self {
            graph,
            species_nodes,
            species_order,
            reaction_nodes,
        })
    }

    /// the underlying petgraph graph
    pub fn inner(&self) -> &UnGraph<NetworkNode, f64> {
        &self.graph
    }

    pub fn species_node(&self, species: &str) -> Option<NodeIndex> {
        self.species_nodes.get(species).copied()
    }

    pub fn reaction_node(&self, i: usize) -> Option<NodeIndex> {
        self.reaction_nodes.get(i).copied()
    }

    pub fn species_count(&self) -> usize {
        self.species_order.len()
    }

    pub fn reaction_count(&self) -> usize {
        self.reaction_nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// species names in index order
    pub fn species_names(&self) -> Vec<String> {
        self.species_order
            .iter()
            .map(|&n| self.graph[n].id.clone())
            .collect()
    }

    pub fn node(&self, node: NodeIndex) -> &NetworkNode {
        &self.graph[node]
    }

    /// weight of the edge between reaction i and a species
    pub fn edge_weight(&self, reaction: usize, species: &str) -> Option<f64> {
        let r = self.reaction_node(reaction)?;
        let s = self.species_node(species)?;
        self.graph
            .find_edge(r, s)
            .and_then(|e| self.graph.edge_weight(e).copied())
    }

    /// reaction nodes adjacent to a species
    pub fn reactions_of(&self, species: &str) -> Vec<NodeIndex> {
        match self.species_node(species) {
            Some(s) => self.graph.neighbors(s).collect(),
            None => Vec::new(),
        }
    }

    /// sum of the weights of all edges of a species node (renderers size nodes by it)
    pub fn species_strength(&self, species: &str) -> Option<f64> {
        let s = self.species_node(species)?;
        Some(self.graph.edges(s).map(|e| *e.weight()).sum())
    }

    /// species ids without the excluded ones, and reaction ids in order. The graph is not
    /// changed: this only selects what a drawing shows (the electron is usually left out)
    pub fn display_layers(&self, excluded: &[String]) -> (Vec<String>, Vec<String>) {
        let species = self
            .species_names()
            .into_iter()
            .filter(|s| !excluded.contains(s))
            .collect();
        let reactions = self
            .reaction_nodes
            .iter()
            .map(|&n| self.graph[n].id.clone())
            .collect();
        (species, reactions)
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
    fn test_nodes_and_edges() {
        let (index, reactions) = scenario();
        let g = BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Reject).unwrap();
        assert_eq!(g.species_count(), 3);
        assert_eq!(g.reaction_count(), 2);
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.node(g.reaction_node(1).unwrap()).id, "R1");
        assert_eq!(g.node(g.reaction_node(1).unwrap()).role, NodeRole::Reaction);
        assert_eq!(g.node(g.species_node("B").unwrap()).role, NodeRole::Species);
        for (r, s) in [(0, "A"), (0, "B"), (0, "C"), (1, "C"), (1, "A")] {
            assert_eq!(g.edge_weight(r, s), Some(1.0));
        }
        assert_eq!(g.edge_weight(1, "B"), None);
        // species nodes come first
        assert_eq!(g.species_node("A").unwrap().index(), 0);
        assert_eq!(g.reaction_node(0).unwrap().index(), 3);
    }

    #[test]
    fn test_species_on_both_sides_overwrites_weight() {
        let index = SpeciesIndex::new(vec!["e".into(), "He".into(), "He+".into()]);
        let reactions = vec![ReactionRecord::new(
            vec!["e", "He"],
            vec![1.0, 1.0],
            vec!["e", "He+"],
            vec![2.0, 1.0],
        )];
        let g = BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Reject).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edge_weight(0, "e"), Some(2.0));
        assert_eq!(g.species_strength("e"), Some(2.0));
        let (species, reactions) = g.display_layers(&["e".to_string()]);
        assert_eq!(species, vec!["He", "He+"]);
        assert_eq!(reactions, vec!["R0"]);
    }

    #[test]
    fn test_unknown_species_policy() {
        let (index, mut reactions) = scenario();
        reactions.push(ReactionRecord::new(vec!["A"], vec![1.0], vec!["Y"], vec![1.0]));
        assert!(matches!(
            BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Reject),
            Err(NetworkError::UnknownSpecies { reaction: 2, .. })
        ));
        let g = BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Ignore).unwrap();
        assert_eq!(g.reaction_count(), 3);
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.reactions_of("A").len(), 3);
    }

    #[test]
    fn test_isolated_species_keeps_its_node() {
        let index = SpeciesIndex::new(vec!["A".into(), "B".into(), "Z".into()]);
        let reactions = vec![ReactionRecord::new(vec!["A"], vec![1.0], vec!["B"], vec![1.0])];
        let g = BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Reject).unwrap();
        assert!(g.species_node("Z").is_some());
        assert_eq!(g.species_strength("Z"), Some(0.0));
        assert!(g.reactions_of("Z").is_empty());
    }
}
