//! # Community detection on the species projection
//!
//! ## Aim
//! Splits the projected species graph into communities by greedy modularity optimization
//! (the multi-level Louvain scheme) and evaluates the modularity of any partition.
//!
//! ## Main Data Structures and Logic
//! - `CommunityConfig`: resolution of the null model, optional seed of the visiting order,
//!   minimal modularity gain per level, optional level limit
//! - `Partition`: node -> community id, ids renumbered 0.. in node order
//! - `CommunityResult`: partition, its modularity and the number of levels done
//! - `LevelGraph` (private): weighted adjacency with self-loops, the graph of one Louvain level
//!
//! One level moves single nodes into the neighbouring community with the largest positive gain
//! until a full sweep moves nothing; the communities found are then collapsed into the nodes of
//! the next level (inner edges become self-loops). Levels stop when nothing moves or the gain
//! drops to `threshold`.
//!
//! Without a seed nodes are visited in graph order and the result is reproducible. With a seed
//! the order is shuffled at every level; only which nodes share a community and the modularity
//! value are meaningful, never the raw ids.
//!
//! ## Modularity
//! Q = 1/(2m) * sum_ij [A_ij - gamma * k_i k_j / (2m)] * delta(c_i, c_j), computed per community as
//! Q = sum_c [L_c / m - gamma * (d_c / 2m)^2]. A graph without edges has Q = 0.
use crate::ReactionNetwork::network_errors::NetworkError;
use crate::ReactionNetwork::projection::ProjectedGraph;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// weight of the null-model term, 1.0 gives standard modularity
    pub resolution: f64,
    /// seed of the node visiting order, `None` keeps graph order
    pub seed: Option<u64>,
    /// a level must raise modularity by more than this to be followed by another one
    pub threshold: f64,
    pub max_levels: Option<usize>,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: None,
            threshold: 1e-7,
            max_levels: None,
        }
    }
}

/// community of every node of a projected graph
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    nodes: Vec<String>,
    labels: Vec<usize>,
    /// node name -> position in `nodes`, first occurrence
    positions: HashMap<String, usize>,
}

impl Partition {
    /// labels are renumbered 0.. in order of first appearance
    pub fn from_labels(nodes: Vec<String>, labels: &[usize]) -> Self {
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        let labels = labels
            .iter()
            .map(|l| {
                let next = renumber.len();
                *renumber.entry(*l).or_insert(next)
            })
            .collect();
        let mut positions = HashMap::with_capacity(nodes.len());
        for (i, name) in nodes.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self {
            nodes,
            labels,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn community_of(&self, species: &str) -> Option<usize> {
        self.positions.get(species).map(|&i| self.labels[i])
    }

    pub fn same_community(&self, a: &str, b: &str) -> bool {
        match (self.community_of(a), self.community_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn num_communities(&self) -> usize {
        self.labels.iter().max().map_or(0, |m| m + 1)
    }

    /// members of every community, community id = position
    pub fn communities(&self) -> Vec<Vec<String>> {
        let mut groups = vec![Vec::new(); self.num_communities()];
        for (node, &label) in self.nodes.iter().zip(&self.labels) {
            groups[label].push(node.clone());
        }
        groups
    }

    pub fn as_map(&self) -> HashMap<String, usize> {
        self.nodes
            .iter()
            .cloned()
            .zip(self.labels.iter().copied())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.nodes
            .iter()
            .map(|n| n.as_str())
            .zip(self.labels.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommunityResult {
    pub partition: Partition,
    pub modularity: f64,
    /// aggregation levels that improved modularity
    pub levels: usize,
}

/// weighted graph of one Louvain level
#[derive(Debug, Clone)]
struct LevelGraph {
    /// neighbours without self-loops, every edge listed from both ends
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    /// weighted degree, a self-loop counts twice
    degrees: Vec<f64>,
}

impl LevelGraph {
    fn from_projected(projected: &ProjectedGraph) -> Self {
        let n = projected.node_count();
        let mut adjacency = vec![Vec::new(); n];
        for (a, b) in projected.edge_endpoints() {
            adjacency[a].push((b, 1.0));
            adjacency[b].push((a, 1.0));
        }
        Self::from_parts(adjacency, vec![0.0; n])
    }

    fn from_parts(adjacency: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let degrees = adjacency
            .iter()
            .zip(&self_loops)
            .map(|(nbrs, l)| nbrs.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * l)
            .collect();
        Self {
            adjacency,
            self_loops,
            degrees,
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// m, the total edge weight
    fn total_weight(&self) -> f64 {
        self.degrees.iter().sum::<f64>() / 2.0
    }

    fn modularity(&self, labels: &[usize], resolution: f64, m: f64) -> f64 {
        if m == 0.0 {
            return 0.0;
        }
        let mut internal: HashMap<usize, f64> = HashMap::new();
        let mut total: HashMap<usize, f64> = HashMap::new();
        for u in 0..self.len() {
            let c = labels[u];
            *total.entry(c).or_insert(0.0) += self.degrees[u];
            let mut inner = self.self_loops[u];
            for &(v, w) in &self.adjacency[u] {
                if u < v && labels[v] == c {
                    inner += w;
                }
            }
            *internal.entry(c).or_insert(0.0) += inner;
        }
        total
            .iter()
            .map(|(c, d_c)| {
                let l_c = internal.get(c).copied().unwrap_or(0.0);
                l_c / m - resolution * (d_c / (2.0 * m)).powi(2)
            })
            .sum()
    }

    /// collapses every community into one node; `labels` must be contiguous 0..k
    fn aggregate(&self, labels: &[usize]) -> LevelGraph {
        let k = labels.iter().max().map_or(0, |m| m + 1);
        let mut self_loops = vec![0.0; k];
        let mut between: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); k];
        for u in 0..self.len() {
            let cu = labels[u];
            self_loops[cu] += self.self_loops[u];
            for &(v, w) in &self.adjacency[u] {
                let cv = labels[v];
                if cu == cv {
                    // inner edges are seen from both ends
                    self_loops[cu] += w / 2.0;
                } else {
                    *between[cu].entry(cv).or_insert(0.0) += w;
                }
            }
        }
        let adjacency = between
            .into_iter()
            .map(|nbrs| nbrs.into_iter().collect())
            .collect();
        LevelGraph::from_parts(adjacency, self_loops)
    }
}

/// local moving phase of one level. Returns contiguous labels and whether any node moved
fn one_level(graph: &LevelGraph, m: f64, resolution: f64, order: &[usize]) -> (Vec<usize>, bool) {
    let mut community: Vec<usize> = (0..graph.len()).collect();
    let mut sigma_tot = graph.degrees.clone();
    let mut improved = false;
    let mut sweeps = 0;
    loop {
        let mut moves = 0;
        for &u in order {
            let degree = graph.degrees[u];
            let current = community[u];
            let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
            for &(v, w) in &graph.adjacency[u] {
                *weights.entry(community[v]).or_insert(0.0) += w;
            }
            sigma_tot[current] -= degree;
            let own = weights.get(&current).copied().unwrap_or(0.0);
            let remove_cost =
                -own / m + resolution * sigma_tot[current] * degree / (2.0 * m * m);
            let mut best = current;
            let mut best_gain = 0.0;
            for (&c, &w) in &weights {
                let gain = remove_cost + w / m - resolution * sigma_tot[c] * degree / (2.0 * m * m);
                if gain > best_gain {
                    best_gain = gain;
                    best = c;
                }
            }
            sigma_tot[best] += degree;
            if best != current {
                community[u] = best;
                moves += 1;
            }
        }
        sweeps += 1;
        if moves == 0 {
            break;
        }
        improved = true;
    }
    debug!("louvain level converged after {} sweeps", sweeps);

    let mut renumber: HashMap<usize, usize> = HashMap::new();
    let labels = community
        .iter()
        .map(|c| {
            let next = renumber.len();
            *renumber.entry(*c).or_insert(next)
        })
        .collect();
    (labels, improved)
}

/// multi-level Louvain community detection
pub fn detect_communities(projected: &ProjectedGraph, config: &CommunityConfig) -> CommunityResult {
    let nodes = projected.nodes();
    let base = LevelGraph::from_projected(projected);
    let m = base.total_weight();
    let mut membership: Vec<usize> = (0..base.len()).collect();
    let mut modularity = base.modularity(&membership, config.resolution, m);
    let mut levels = 0;

    if m > 0.0 {
        let mut rng = config.seed.map(StdRng::seed_from_u64);
        let mut graph = base.clone();
        loop {
            if config.max_levels.is_some_and(|max| levels >= max) {
                break;
            }
            let mut order: Vec<usize> = (0..graph.len()).collect();
            if let Some(rng) = rng.as_mut() {
                order.shuffle(rng);
            }
            let (labels, improved) = one_level(&graph, m, config.resolution, &order);
            if !improved {
                break;
            }
            membership = membership.iter().map(|&x| labels[x]).collect();
            let new_modularity = base.modularity(&membership, config.resolution, m);
            let gain = new_modularity - modularity;
            modularity = new_modularity;
            levels += 1;
            debug!(
                "level {}: {} communities, modularity {:.6}",
                levels,
                labels.iter().max().map_or(0, |x| x + 1),
                modularity
            );
            if gain <= config.threshold {
                break;
            }
            graph = graph.aggregate(&labels);
        }
    }

    let partition = Partition::from_labels(nodes, &membership);
    info!(
        "community detection: {} communities over {} species, modularity {:.4}",
        partition.num_communities(),
        partition.len(),
        modularity
    );
    CommunityResult {
        partition,
        modularity,
        levels,
    }
}

/// standard modularity (resolution 1) of any node -> community assignment
pub fn modularity(
    projected: &ProjectedGraph,
    assignment: &HashMap<String, usize>,
) -> Result<f64, NetworkError> {
    modularity_with_resolution(projected, assignment, 1.0)
}

pub fn modularity_with_resolution(
    projected: &ProjectedGraph,
    assignment: &HashMap<String, usize>,
    resolution: f64,
) -> Result<f64, NetworkError> {
    let labels = projected
        .nodes()
        .into_iter()
        .map(|name| {
            assignment
                .get(&name)
                .copied()
                .ok_or(NetworkError::IncompletePartition(name))
        })
        .collect::<Result<Vec<usize>, NetworkError>>()?;
    let graph = LevelGraph::from_projected(projected);
    let m = graph.total_weight();
    Ok(graph.modularity(&labels, resolution, m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_renumbering() {
        let p = Partition::from_labels(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            &[7, 3, 7, 9],
        );
        assert_eq!(p.community_of("a"), Some(0));
        assert_eq!(p.community_of("b"), Some(1));
        assert_eq!(p.community_of("d"), Some(2));
        assert_eq!(p.num_communities(), 3);
        assert!(p.same_community("a", "c"));
        assert!(!p.same_community("a", "b"));
        assert_eq!(p.community_of("zz"), None);
        assert_eq!(
            p.communities(),
            vec![
                vec!["a".to_string(), "c".to_string()],
                vec!["b".to_string()],
                vec!["d".to_string()]
            ]
        );
    }

    #[test]
    fn test_community_lookup_on_large_partition() {
        let nodes: Vec<String> = (0..1000).map(|i| format!("S{}", i)).collect();
        let labels: Vec<usize> = (0..1000).map(|i| i % 10).collect();
        let p = Partition::from_labels(nodes, &labels);
        assert_eq!(p.community_of("S0"), Some(0));
        assert_eq!(p.community_of("S999"), Some(9));
        assert!(p.same_community("S3", "S13"));
        assert_eq!(p.num_communities(), 10);
    }

    #[test]
    fn test_aggregation_keeps_total_weight() {
        // path 0-1-2-3 collapsed into {0,1} {2,3}
        let adjacency = vec![
            vec![(1, 1.0)],
            vec![(0, 1.0), (2, 1.0)],
            vec![(1, 1.0), (3, 1.0)],
            vec![(2, 1.0)],
        ];
        let g = LevelGraph::from_parts(adjacency, vec![0.0; 4]);
        let labels = [0, 0, 1, 1];
        let agg = g.aggregate(&labels);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.self_loops, vec![1.0, 1.0]);
        assert_eq!(agg.adjacency[0], vec![(1, 1.0)]);
        assert_eq!(agg.total_weight(), g.total_weight());
        let m = g.total_weight();
        let q_fine = g.modularity(&labels, 1.0, m);
        let q_coarse = agg.modularity(&[0, 1], 1.0, m);
        assert!((q_fine - q_coarse).abs() < 1e-12);
    }
}
