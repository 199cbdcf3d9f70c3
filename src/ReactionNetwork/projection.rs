//! # Projection of the bipartite graph onto species
//!
//! Two species are linked in the projection when they are neighbours of at least one common
//! reaction node. Shared reactions are not counted: the projection is a simple unweighted graph
//! without self-loops. Species with no reaction stay in it as isolated nodes.
use crate::ReactionNetwork::bipartite::{BipartiteGraph, NodeRole};
use crate::ReactionNetwork::network_errors::NetworkError;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};

/// species-only graph
#[derive(Debug, Clone)]
pub struct ProjectedGraph {
    graph: UnGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl ProjectedGraph {
    pub fn inner(&self) -> &UnGraph<String, ()> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// species names in node order
    pub fn nodes(&self) -> Vec<String> {
        self.graph.node_weights().cloned().collect()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.nodes.contains_key(species)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(&x), Some(&y)) => self.graph.find_edge(x, y).is_some(),
            _ => false,
        }
    }

    pub fn degree(&self, species: &str) -> Option<usize> {
        self.nodes
            .get(species)
            .map(|&n| self.graph.neighbors(n).count())
    }

    pub fn neighbors(&self, species: &str) -> Vec<String> {
        match self.nodes.get(species) {
            Some(&n) => self.graph.neighbors(n).map(|m| self.graph[m].clone()).collect(),
            None => Vec::new(),
        }
    }

    /// endpoints of every edge as node positions
    pub fn edge_endpoints(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (a.index(), b.index()))
            .collect()
    }
}

/// projects `bipartite` onto the given species. Each name is taken once, in the order given
pub fn project_onto_species(
    bipartite: &BipartiteGraph,
    subset: &[String],
) -> Result<ProjectedGraph, NetworkError> {
    let source = bipartite.inner();
    let mut graph = UnGraph::<String, ()>::default();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::with_capacity(subset.len());
    // bipartite node -> projected node
    let mut mapping: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(subset.len());
    let mut order: Vec<(NodeIndex, NodeIndex)> = Vec::with_capacity(subset.len());
    for species in subset {
        if nodes.contains_key(species) {
            continue;
        }
        let b_node = bipartite
            .species_node(species)
            .ok_or_else(|| NetworkError::UnknownNode(species.clone()))?;
        let p_node = graph.add_node(species.clone());
        nodes.insert(species.clone(), p_node);
        mapping.insert(b_node, p_node);
        order.push((b_node, p_node));
    }

    let mut linked: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    for &(b_u, p_u) in &order {
        for reaction in source.neighbors(b_u) {
            if source[reaction].role != NodeRole::Reaction {
                continue;
            }
            for b_v in source.neighbors(reaction) {
                let Some(&p_v) = mapping.get(&b_v) else {
                    continue;
                };
                if p_v == p_u {
                    continue;
                }
                let key = if p_u < p_v { (p_u, p_v) } else { (p_v, p_u) };
                if linked.insert(key) {
                    graph.add_edge(key.0, key.1, ());
                }
            }
        }
    }
    info!(
        "projected graph: {} species, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(ProjectedGraph { graph, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReactionNetwork::reaction_set::{ReactionRecord, SpeciesIndex, UnknownSpeciesPolicy};

    fn build(species: Vec<&str>, reactions: Vec<ReactionRecord>) -> BipartiteGraph {
        let index = SpeciesIndex::new(species.iter().map(|s| s.to_string()).collect());
        BipartiteGraph::build(&index, &reactions, UnknownSpeciesPolicy::Reject).unwrap()
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_triangle_projection() {
        let b = build(
            vec!["A", "B", "C"],
            vec![
                ReactionRecord::new(vec!["A", "B"], vec![1.0, 1.0], vec!["C"], vec![1.0]),
                ReactionRecord::new(vec!["C"], vec![1.0], vec!["A"], vec![1.0]),
            ],
        );
        let p = project_onto_species(&b, &names(&["A", "B", "C"])).unwrap();
        assert_eq!(p.node_count(), 3);
        // A-C shared by R0 and R1 collapses to one edge
        assert_eq!(p.edge_count(), 3);
        assert!(p.has_edge("A", "B"));
        assert!(p.has_edge("C", "A"));
        assert!(p.has_edge("B", "C"));
        assert!(!p.has_edge("A", "A"));
        assert_eq!(p.degree("A"), Some(2));
        assert_eq!(p.nodes(), names(&["A", "B", "C"]));
    }

    #[test]
    fn test_edges_iff_common_reaction() {
        let reactions = vec![
            ReactionRecord::new(vec!["e", "He"], vec![1.0, 1.0], vec!["e", "He*"], vec![1.0, 1.0]),
            ReactionRecord::new(vec!["He*", "He*"], vec![1.0, 1.0], vec!["He+", "He", "e"], vec![1.0, 1.0, 1.0]),
            ReactionRecord::new(vec!["Ar"], vec![1.0], vec!["Ar"], vec![1.0]),
        ];
        let species = vec!["e", "He", "He*", "He+", "Ar", "N2"];
        let b = build(species.clone(), reactions.clone());
        let p = project_onto_species(&b, &names(&species)).unwrap();
        for u in &species {
            for v in &species {
                let shared = reactions.iter().any(|r| {
                    let all: Vec<&str> = r.participants().map(|(s, _)| s).collect();
                    u != v && all.contains(u) && all.contains(v)
                });
                assert_eq!(p.has_edge(u, v), shared, "pair {} {}", u, v);
            }
        }
        for (a, b) in p.edge_endpoints() {
            assert_ne!(a, b);
        }
        assert_eq!(p.degree("N2"), Some(0));
        assert_eq!(p.degree("Ar"), Some(0));
    }

    #[test]
    fn test_subset_projection() {
        let b = build(
            vec!["e", "A", "B"],
            vec![ReactionRecord::new(vec!["e", "A"], vec![1.0, 1.0], vec!["e", "B"], vec![1.0, 1.0])],
        );
        let p = project_onto_species(&b, &names(&["A", "B", "A"])).unwrap();
        assert_eq!(p.node_count(), 2);
        assert_eq!(p.edge_count(), 1);
        assert!(!p.contains("e"));
        assert_eq!(p.neighbors("A"), names(&["B"]));
    }

    #[test]
    fn test_unknown_subset_name_fails() {
        let b = build(vec!["A"], vec![]);
        assert!(matches!(
            project_onto_species(&b, &names(&["A", "R0"])),
            Err(NetworkError::UnknownNode(_))
        ));
    }
}
