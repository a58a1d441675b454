//! Lineage graph and PageRank-style importance scores.
//!
//! The graph is rebuilt from scratch each generation. Every genome in the
//! population is a node; ancestors that were already truncated away still
//! appear as nodes when a survivor links to them.

use crate::config::RankingConfig;
use crate::engines::generation::genome::Genome;
use crate::types::GenomeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    /// Node ids in insertion order. Iteration follows this order so scores
    /// are bit-identical between runs.
    ids: Vec<GenomeId>,
    index: HashMap<GenomeId, usize>,
    /// Outgoing `(target, weight)` lists, one per node.
    edges: Vec<Vec<(usize, f64)>>,
    /// Sum of outgoing weights per node.
    outbound: Vec<f64>,
}

/// Converged scores of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRank {
    scores: HashMap<GenomeId, f64>,
    pub iterations: usize,
    /// L1 change of the final iteration.
    pub delta: f64,
}

impl PageRank {
    pub fn score(&self, id: GenomeId) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links every genome to each recorded parent in both directions:
    /// `child → parent` weighted by the parent's fitness at breeding time and
    /// `parent → child` weighted by the child's own fitness.
    pub fn from_population(genomes: &[Genome]) -> Self {
        let mut graph = Self::new();
        for genome in genomes {
            graph.add_node(genome.id());
        }
        for genome in genomes {
            let child_weight = 1.0 / (genome.fitness() as f64 + 1.0);
            for (parent, parent_fitness) in genome.lineage() {
                graph.link(genome.id(), parent, 1.0 / (parent_fitness as f64 + 1.0));
                graph.link(parent, genome.id(), child_weight);
            }
        }
        graph
    }

    pub fn add_node(&mut self, id: GenomeId) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, i);
        self.edges.push(Vec::new());
        self.outbound.push(0.0);
        i
    }

    /// Adds `weight` to the edge `source → target`; repeated links accumulate.
    pub fn link(&mut self, source: GenomeId, target: GenomeId, weight: f64) {
        let s = self.add_node(source);
        let t = self.add_node(target);
        self.outbound[s] += weight;
        match self.edges[s].iter_mut().find(|(to, _)| *to == t) {
            Some((_, w)) => *w += weight,
            None => self.edges[s].push((t, weight)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn contains(&self, id: GenomeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Accumulated weight of `source → target`, if linked.
    pub fn weight(&self, source: GenomeId, target: GenomeId) -> Option<f64> {
        let s = *self.index.get(&source)?;
        let t = *self.index.get(&target)?;
        self.edges[s]
            .iter()
            .find(|(to, _)| *to == t)
            .map(|(_, w)| *w)
    }

    /// Power iteration until the L1 change drops to `tolerance`, or stops
    /// decreasing.
    ///
    /// Mass held by nodes without outgoing edges is spread evenly over all
    /// nodes, so the scores always sum to 1.
    pub fn rank(&self, damping: f64, tolerance: f64) -> PageRank {
        let n = self.ids.len();
        if n == 0 {
            return PageRank {
                scores: HashMap::new(),
                iterations: 0,
                delta: 0.0,
            };
        }

        let inverse = 1.0 / n as f64;
        let normalized: Vec<Vec<(usize, f64)>> = self
            .edges
            .iter()
            .zip(&self.outbound)
            .map(|(edges, &total)| {
                edges
                    .iter()
                    .map(|&(to, w)| (to, if total > 0.0 { w / total } else { w }))
                    .collect()
            })
            .collect();

        let mut current = vec![inverse; n];
        let mut next = vec![0.0; n];
        let mut iterations = 0;
        let mut delta;
        let mut previous = f64::INFINITY;

        loop {
            let leak: f64 = (0..n)
                .filter(|&i| normalized[i].is_empty())
                .map(|i| current[i])
                .sum::<f64>()
                * damping;
            let base = (1.0 - damping) * inverse + leak * inverse;

            next.iter_mut().for_each(|v| *v = base);
            for (source, edges) in normalized.iter().enumerate() {
                let mass = damping * current[source];
                for &(target, weight) in edges {
                    next[target] += mass * weight;
                }
            }

            delta = next
                .iter()
                .zip(&current)
                .map(|(a, b)| (a - b).abs())
                .sum();
            std::mem::swap(&mut current, &mut next);
            iterations += 1;

            // The change contracts by `damping` each step; once it stops
            // shrinking only rounding noise is left.
            if delta <= tolerance || delta >= previous {
                break;
            }
            previous = delta;
        }

        PageRank {
            scores: self.ids.iter().copied().zip(current).collect(),
            iterations,
            delta,
        }
    }
}

/// Recomputes every genome's rank as `fitness − importance`. With ranking
/// disabled the rank is the fitness alone.
pub fn rank_population(genomes: &mut [Genome], config: &RankingConfig) -> Option<PageRank> {
    if !config.enabled {
        for genome in genomes.iter_mut() {
            let fitness = genome.fitness() as f64;
            genome.set_rank(fitness);
        }
        return None;
    }

    let graph = LineageGraph::from_population(genomes);
    let pagerank = graph.rank(config.damping, config.tolerance);
    log::debug!(
        "Lineage graph: {} nodes, {} edges, converged in {} iterations (delta {:.3e})",
        graph.node_count(),
        graph.edge_count(),
        pagerank.iterations,
        pagerank.delta
    );

    for genome in genomes.iter_mut() {
        let score = pagerank.score(genome.id()).unwrap_or(0.0);
        let fitness = genome.fitness() as f64;
        genome.set_rank(fitness - score);
    }
    Some(pagerank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_accumulate() {
        let mut graph = LineageGraph::new();
        graph.link(1, 2, 0.5);
        graph.link(1, 2, 0.25);
        assert_eq!(graph.weight(1, 2), Some(0.75));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let pagerank = LineageGraph::new().rank(0.85, 1e-6);
        assert!(pagerank.is_empty());
        assert_eq!(pagerank.iterations, 0);
    }

    #[test]
    fn test_isolated_nodes_share_mass_evenly() {
        let mut graph = LineageGraph::new();
        for id in 1..=4 {
            graph.add_node(id);
        }
        let pagerank = graph.rank(0.85, 1e-9);
        for id in 1..=4 {
            assert!((pagerank.score(id).unwrap() - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hub_collects_mass() {
        let mut graph = LineageGraph::new();
        for leaf in 2..=6 {
            graph.link(leaf, 1, 1.0);
        }
        let pagerank = graph.rank(0.85, 1e-9);
        let hub = pagerank.score(1).unwrap();
        for leaf in 2..=6 {
            assert!(hub > pagerank.score(leaf).unwrap());
        }
        assert!((pagerank.total() - 1.0).abs() < 1e-6);
    }
}
