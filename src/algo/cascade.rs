/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Simulation of the independent cascade model.
//!
//! In the independent cascade model, every active node gets exactly one chance
//! of activating each of its successors, and the attempt along an arc
//! succeeds independently with the probability labeling the arc. A
//! [`Cascade`] runs one such diffusion from a set of seeds and returns the
//! total value of the nodes that have been activated.
//!
//! # Examples
//!
//! ```
//! use infmax::algo::Cascade;
//! use infmax::graphs::prob_graph::ProbGraph;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut graph = ProbGraph::new();
//! graph.add_arc("a", "b", 1.0);
//! graph.add_arc("b", "c", 1.0);
//! graph.add_arc("c", "d", 0.0);
//! for (id, value) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)] {
//!     graph.set_value(id, value);
//! }
//!
//! let mut cascade = Cascade::new(&graph);
//! let mut rng = SmallRng::seed_from_u64(0);
//! // Arcs with probability one always fire, arcs with probability zero never do
//! assert_eq!(cascade.run(&[0], &mut rng), 6.0);
//! ```

use crate::traits::ValuedGraph;
use rand::Rng;
use std::collections::VecDeque;

/// Activation markers that can be reset in constant time.
///
/// Each node has a token, and a node is marked if its token is equal to the
/// current generation. Starting a new generation thus unmarks all nodes; only
/// when the generation counter wraps around the tokens are actually cleared.
#[derive(Debug, Clone)]
pub(crate) struct VisitArena {
    tokens: Box<[u32]>,
    generation: u32,
}

impl VisitArena {
    pub(crate) fn new(num_nodes: usize) -> Self {
        Self {
            tokens: vec![0; num_nodes].into_boxed_slice(),
            generation: 0,
        }
    }

    /// Unmarks all nodes.
    #[inline(always)]
    pub(crate) fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.tokens.fill(0);
            self.generation = 1;
        }
    }

    #[inline(always)]
    pub(crate) fn is_marked(&self, node: usize) -> bool {
        self.tokens[node] == self.generation
    }

    #[inline(always)]
    pub(crate) fn mark(&mut self, node: usize) {
        self.tokens[node] = self.generation;
    }
}

/// A reusable simulator of the independent cascade model on a
/// [`ValuedGraph`].
///
/// The simulator keeps activation markers and a queue that are reused
/// across runs, so that a run costs time proportional to the part of the graph
/// it reaches, rather than to the number of nodes.
///
/// A simulator is not shared between threads: each thread should create its
/// own.
#[derive(Debug, Clone)]
pub struct Cascade<'a, G: ValuedGraph> {
    graph: &'a G,
    arena: VisitArena,
    /// Active nodes to be processed, with the step of their activation.
    queue: VecDeque<(usize, usize)>,
}

impl<'a, G: ValuedGraph> Cascade<'a, G> {
    /// Creates a new simulator for the given graph.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            arena: VisitArena::new(graph.num_nodes()),
            queue: VecDeque::new(),
        }
    }

    /// Returns the graph of this simulator.
    pub fn graph(&self) -> &'a G {
        self.graph
    }

    /// Runs one diffusion from `seeds` and returns the total value of the
    /// activated nodes.
    ///
    /// Seeds are activated (and their values counted) unconditionally, even
    /// if their value is zero; a repeated seed is counted once. Activated
    /// nodes are processed in FIFO order, and for each arc (*u*, *v*, *p*)
    /// leaving a processed node *u* whose target *v* is not active yet, a
    /// uniform value *r* in [0 . . 1) is drawn from `rng`: if *r* ≤ *p*, *v*
    /// becomes active. No draw is performed for arcs towards active nodes.
    ///
    /// Probabilities are used as they are: a probability larger than or
    /// equal to one always fires, a negative probability never does.
    ///
    /// # Panics
    ///
    /// Panics if a seed is not a node of the graph.
    pub fn run<R: Rng>(&mut self, seeds: &[usize], rng: &mut R) -> f64 {
        self.run_with_max_steps(seeds, None, rng)
    }

    /// Runs one diffusion from `seeds` lasting at most `max_steps` steps, and
    /// returns the total value of the activated nodes.
    ///
    /// Seeds are activated at step zero, and nodes activated at step *t* try
    /// to activate their successors at step *t* + 1; attempts beyond
    /// `max_steps` are not performed (and no value is drawn for them). With
    /// [`None`] this method is equivalent to [`run`](Self::run).
    pub fn run_with_max_steps<R: Rng>(
        &mut self,
        seeds: &[usize],
        max_steps: Option<usize>,
        rng: &mut R,
    ) -> f64 {
        let max_steps = max_steps.unwrap_or(usize::MAX);
        self.arena.next_generation();
        self.queue.clear();
        let mut total = 0.0;

        for &seed in seeds {
            if !self.arena.is_marked(seed) {
                self.arena.mark(seed);
                self.queue.push_back((seed, 0));
                total += self.graph.value(seed);
            }
        }

        while let Some((node, step)) = self.queue.pop_front() {
            if step >= max_steps {
                // FIFO order: all remaining nodes are at least as late
                break;
            }
            for (succ, probability) in self.graph.successors(node) {
                if self.arena.is_marked(succ) {
                    continue;
                }
                if rng.random::<f64>() <= probability {
                    self.arena.mark(succ);
                    total += self.graph.value(succ);
                    self.queue.push_back((succ, step + 1));
                }
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::prob_graph::ProbGraph;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_arena_wraps_around() {
        let mut arena = VisitArena::new(3);
        arena.next_generation();
        arena.mark(1);
        assert!(arena.is_marked(1));
        assert!(!arena.is_marked(0));
        arena.next_generation();
        assert!(!arena.is_marked(1));

        // node 2 keeps a stale token equal to the generation after the wrap
        arena.generation = u32::MAX - 1;
        arena.mark(0);
        arena.tokens[2] = 1;
        arena.next_generation();
        assert_eq!(arena.generation, u32::MAX);
        assert!(!arena.is_marked(0));
        arena.mark(0);
        arena.next_generation();
        assert_eq!(arena.generation, 1);
        assert!(arena.tokens.iter().all(|&t| t == 0));
        assert!(!arena.is_marked(0));
        assert!(!arena.is_marked(2));
    }

    #[test]
    fn test_repeated_seed_counted_once() {
        let mut g = ProbGraph::new();
        g.set_value("a", 2.0);
        g.set_value("b", 3.0);
        let mut cascade = Cascade::new(&g);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(cascade.run(&[0, 0, 1], &mut rng), 5.0);
        assert_eq!(cascade.run(&[], &mut rng), 0.0);
    }

    #[test]
    fn test_zero_value_seed_propagates() {
        let mut g = ProbGraph::new();
        g.add_arc("a", "b", 1.0);
        g.set_value("b", 4.0);
        let mut cascade = Cascade::new(&g);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(cascade.run(&[0], &mut rng), 4.0);
    }

    #[test]
    fn test_out_of_range_probabilities() {
        let mut g = ProbGraph::new();
        g.add_arc("a", "b", 2.0);
        g.add_arc("a", "c", -1.0);
        g.set_value("b", 1.0);
        g.set_value("c", 10.0);
        let mut cascade = Cascade::new(&g);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(cascade.run(&[0], &mut rng), 1.0);
        }
    }

    #[test]
    fn test_max_steps() {
        // a chain a → b → c → d always firing
        let mut g = ProbGraph::new();
        g.add_arc("a", "b", 1.0);
        g.add_arc("b", "c", 1.0);
        g.add_arc("c", "d", 1.0);
        for (id, value) in [("a", 1.0), ("b", 2.0), ("c", 4.0), ("d", 8.0)] {
            g.set_value(id, value);
        }
        let mut cascade = Cascade::new(&g);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(cascade.run_with_max_steps(&[0], Some(0), &mut rng), 1.0);
        assert_eq!(cascade.run_with_max_steps(&[0], Some(1), &mut rng), 3.0);
        assert_eq!(cascade.run_with_max_steps(&[0], Some(2), &mut rng), 7.0);
        assert_eq!(cascade.run_with_max_steps(&[0, 2], Some(1), &mut rng), 15.0);
        assert_eq!(cascade.run_with_max_steps(&[0], None, &mut rng), 15.0);
        assert_eq!(cascade.run(&[0], &mut rng), 15.0);
    }
}
