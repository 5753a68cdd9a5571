/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::prob_graph::ProbGraph;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Generates Erdös-Rényi random graphs with activation probabilities and
/// node values.
///
/// The Erdös-Rényi random graph model is a simple model for generating random
/// graphs. It is parameterized by the number of nodes `n` and the probability
/// `p` of an arc between any two nodes. In this implementation, loops are never
/// included.
///
/// Every arc gets the same [activation probability](Self::arc_probability),
/// and every node a value drawn uniformly at random in [0 . . `max_value`).
/// External identifiers are the decimal representation of node indices.
///
/// Note that the time required to generate the graph is quadratic in `n`.
#[derive(Debug, Clone)]
pub struct ErdosRenyi {
    n: usize,
    p: f64,
    seed: u64,
    arc_probability: f64,
    max_value: f64,
}

impl ErdosRenyi {
    /// Create a new Erdös-Rényi random graph generator, given the number of
    /// nodes, the probability of an arc between any two nodes, and a seed for
    /// the [pseudorandom number generator](SmallRng).
    pub fn new(n: usize, p: f64, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&p), "p must be in [0..1]");
        Self {
            n,
            p,
            seed,
            arc_probability: 0.1,
            max_value: 1.0,
        }
    }

    /// Sets the activation probability of every arc (default: 0.1).
    pub fn arc_probability(&mut self, arc_probability: f64) -> &mut Self {
        self.arc_probability = arc_probability;
        self
    }

    /// Sets the (exclusive) upper bound of node values (default: 1).
    pub fn max_value(&mut self, max_value: f64) -> &mut Self {
        assert!(max_value > 0.0, "The maximum value must be positive");
        self.max_value = max_value;
        self
    }

    /// Generates the graph.
    pub fn build(&self) -> ProbGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut graph = ProbGraph::new();
        for x in 0..self.n {
            graph.node_id(&x.to_string());
        }
        for x in 0..self.n {
            graph.set_node_value(x, rng.random::<f64>() * self.max_value);
            for y in 0..self.n {
                if y != x && rng.random_bool(self.p) {
                    graph.add_node_arc(x, y, self.arc_probability);
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ValuedGraph;

    #[test]
    fn test_er() {
        let g0 = ErdosRenyi::new(10, 0.3, 0).build();
        let g1 = ErdosRenyi::new(10, 0.3, 0).build();
        assert_eq!(g0, g1);
        assert_eq!(g0.num_nodes(), 10);
        assert_eq!(g0.num_eligible(), 10);
        for x in 0..10 {
            assert!((0.0..1.0).contains(&g0.value(x)));
            for (y, p) in g0.successors(x) {
                assert_ne!(x, y);
                assert_eq!(p, 0.1);
            }
        }
    }

    #[test]
    fn test_er_complete() {
        let mut er = ErdosRenyi::new(5, 1.0, 1);
        er.arc_probability(0.5).max_value(3.0);
        let g = er.build();
        assert_eq!(g.num_arcs(), 20);
        assert_eq!(g.get_id("4"), Some(4));
    }
}
