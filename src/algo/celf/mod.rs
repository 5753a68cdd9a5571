/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Lazy greedy (CELF) selection of seeds.
//!
//! The greedy algorithm for influence maximization adds, at each step, the
//! node with the largest _marginal gain_, that is, the largest increase of
//! the expected spread of the current seed set. Computing all marginal gains
//! at every step requires *k* · *n* spread estimates; the CELF (cost-effective
//! lazy forward) strategy of Leskovec _et al._ exploits the fact that the
//! expected spread is submodular, so marginal gains can only decrease as the
//! seed set grows.
//!
//! Each candidate is kept in a max-heap as a [`NodeGain`] record tagged with
//! the size of the seed set at the time its gain was
//! [computed](NodeGain::computed_at). A record whose tag is equal to the
//! current size of the seed set is exact, and if it is on top of the heap no
//! other candidate can do better: the node is accepted. A record on top of the
//! heap with an older tag is just an upper bound, so its gain is recomputed
//! and the record reinserted. In practice, most candidates are never
//! recomputed.
//!
//! Since the fresh record on top of the heap bounds every other gain, the
//! selection stops as soon as such a record has a gain that is not positive:
//! adding more seeds would not increase the expected spread.
//!
//! On large graphs the candidates can be [pruned](Celf::candidates) to the
//! nodes with the largest product of outdegree and value, and diffusions can
//! be [limited](Celf::max_steps) to a given number of steps.
//!
//! # Parallelism
//!
//! Initial gains (singleton spreads) are computed in parallel using
//! all the threads of the current Rayon pool, each with its own generator;
//! the selection loop is inherently sequential and runs on the calling
//! thread. Generators are created by an [`RngFactory`]: by default they are
//! seeded with fresh entropy, but a [`Fixed`](crate::utils::Fixed) seeder
//! makes single-threaded runs reproducible.
//!
//! # Examples
//!
//! ```
//! use infmax::algo::celf::Celf;
//! use infmax::graphs::prob_graph::ProbGraph;
//! use infmax::utils::Fixed;
//!
//! // a → b → c always fires, c → d never does
//! let mut graph = ProbGraph::new();
//! graph.add_arc("a", "b", 1.0);
//! graph.add_arc("b", "c", 1.0);
//! graph.add_arc("c", "d", 0.0);
//! for (id, value) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)] {
//!     graph.set_value(id, value);
//! }
//!
//! let mut celf = Celf::with_seeder(&graph, Fixed(0));
//! celf.rounds(100);
//! let result = celf.run(3);
//!
//! // a reaches a, b, c (6); then d (4); b and c would add nothing
//! assert_eq!(result.seeds(), vec![0, 3]);
//! assert_eq!(result.total(), 10.0);
//! assert!(result.shortfall());
//! ```

mod par;

use super::{Cascade, SpreadEstimator};
use crate::traits::ValuedGraph;
use crate::utils::{Entropy, Granularity, RngFactory, Seeder};
use dary_heap::QuaternaryHeap;
use dsi_progress_logger::{no_logging, ConcurrentProgressLog, ProgressLog};
use std::cmp::{Ordering, Reverse};

/// A candidate with its (estimated) marginal gain.
///
/// Records are ordered by gain, using [`f64::total_cmp`], and then by
/// _decreasing_ node, so that in a max-heap ties are broken in favor of the
/// node with the smallest identifier. Equality is consistent with the order,
/// and thus ignores [`computed_at`](NodeGain::computed_at).
#[derive(Debug, Clone, Copy)]
pub struct NodeGain {
    /// The candidate.
    pub node: usize,
    /// The marginal gain of the candidate.
    pub gain: f64,
    /// The size of the seed set when the gain was computed.
    pub computed_at: usize,
}

impl Ord for NodeGain {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .total_cmp(&other.gain)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for NodeGain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeGain {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeGain {}

/// The acceptance of a seed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// The accepted node.
    pub node: usize,
    /// The value of the accepted node.
    pub value: f64,
    /// The marginal gain of the accepted node.
    pub gain: f64,
    /// The estimated spread of the seed set after the acceptance.
    pub total: f64,
}

/// The outcome of a [`Celf`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct CelfResult {
    k: usize,
    selections: Vec<Selection>,
    recomputations: usize,
}

impl CelfResult {
    /// Returns the number of seeds that were requested.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the seeds, in order of acceptance.
    pub fn seeds(&self) -> Vec<usize> {
        self.selections.iter().map(|s| s.node).collect()
    }

    /// Returns the log of the selections, in order of acceptance.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Returns the estimated spread of the seed set, that is, the sum of the
    /// accepted marginal gains.
    pub fn total(&self) -> f64 {
        self.selections.last().map_or(0.0, |s| s.total)
    }

    /// Returns the number of lazy recomputations of marginal gains.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Returns true if fewer than [`k`](Self::k) seeds were found, because
    /// there were not enough candidates with a positive marginal gain.
    pub fn shortfall(&self) -> bool {
        self.selections.len() < self.k
    }
}

/// Selects seeds using the lazy greedy (CELF) strategy.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run) or [`run_with_logging`](Self::run_with_logging).
///
/// Only nodes with an explicit [value](ValuedGraph::has_value) are
/// candidates.
pub struct Celf<'a, G: ValuedGraph + Sync, S: Seeder = Entropy> {
    graph: &'a G,
    estimator: SpreadEstimator,
    granularity: Granularity,
    max_candidates: Option<usize>,
    rng_factory: RngFactory<S>,
}

impl<G: ValuedGraph + Sync, S: Seeder> std::fmt::Debug for Celf<'_, G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Celf")
            .field("rounds", &self.estimator.rounds())
            .field("max_steps", &self.estimator.max_steps())
            .field("granularity", &self.granularity)
            .field("max_candidates", &self.max_candidates)
            .finish_non_exhaustive()
    }
}

impl<'a, G: ValuedGraph + Sync> Celf<'a, G> {
    /// Creates a new selector using generators seeded by [fresh
    /// entropy](Entropy).
    pub fn new(graph: &'a G) -> Self {
        Self::with_seeder(graph, Entropy)
    }
}

impl<'a, G: ValuedGraph + Sync, S: Seeder> Celf<'a, G, S> {
    /// Creates a new selector whose generators are seeded by the given
    /// [`Seeder`].
    pub fn with_seeder(graph: &'a G, seeder: S) -> Self {
        Self {
            graph,
            estimator: SpreadEstimator::default(),
            granularity: Granularity::default(),
            max_candidates: None,
            rng_factory: RngFactory::new(seeder),
        }
    }

    /// Sets the number of Monte Carlo rounds of each spread estimate.
    ///
    /// # Panics
    ///
    /// Panics if `rounds` is zero.
    pub fn rounds(&mut self, rounds: usize) -> &mut Self {
        self.estimator = SpreadEstimator::new(rounds).with_max_steps(self.estimator.max_steps());
        self
    }

    /// Sets the maximum number of diffusion steps of each cascade run, or
    /// [`None`] (the default) to let diffusions run to completion.
    pub fn max_steps(&mut self, max_steps: Option<usize>) -> &mut Self {
        self.estimator = self.estimator.with_max_steps(max_steps);
        self
    }

    /// Restricts the candidates to the `max` nodes with a value having the
    /// largest product of outdegree and value (ties broken by ascending
    /// node).
    ///
    /// By default all nodes with a value are candidates.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    pub fn candidates(&mut self, max: usize) -> &mut Self {
        assert!(max > 0, "The number of candidates must be positive");
        self.max_candidates = Some(max);
        self
    }

    /// Sets the granularity of the parallel computation of initial gains.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Returns the graph of this selector.
    pub fn graph(&self) -> &'a G {
        self.graph
    }

    /// Returns the spread estimator used by this selector.
    pub fn estimator(&self) -> &SpreadEstimator {
        &self.estimator
    }

    /// Selects up to `k` seeds.
    pub fn run(&self, k: usize) -> CelfResult {
        self.run_with_logging(k, no_logging![], no_logging![])
    }

    /// Selects up to `k` seeds, logging progress.
    ///
    /// `pl` is a sequential [`ProgressLog`] counting accepted seeds. `cpl` is
    /// a [`ConcurrentProgressLog`] used for node-level progress during the
    /// parallel computation of initial gains. Their options will be
    /// preserved, making thus possible to customize the logs.
    ///
    /// It is possible to specify either `pl` or `cpl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you don't want
    /// to log the corresponding part of the computation.
    ///
    /// Running out of candidates with a positive marginal gain before `k`
    /// seeds have been selected is not an error: a warning is logged, and the
    /// result will report a [shortfall](CelfResult::shortfall).
    pub fn run_with_logging(
        &self,
        k: usize,
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> CelfResult {
        let mut result = CelfResult {
            k,
            selections: Vec::with_capacity(k.min(self.graph.num_nodes())),
            recomputations: 0,
        };
        if k == 0 {
            log::info!("No seeds requested");
            return result;
        }

        let graph = self.graph;
        let pruned = self
            .max_candidates
            .filter(|&max| max < graph.num_eligible())
            .map(|max| top_candidates(graph, max));
        let is_candidate = |node: usize| match &pruned {
            Some(mask) => mask[node],
            None => graph.has_value(node),
        };

        let mut heap = par::initial_gains(
            graph,
            &self.estimator,
            &self.rng_factory,
            self.granularity,
            is_candidate,
            cpl,
        );
        log::info!("{} candidate(s)", heap.len());

        let mut seeds = Vec::with_capacity(k + 1);
        let mut is_seed = vec![false; self.graph.num_nodes()];
        let mut total = 0.0;
        let mut cascade = Cascade::new(self.graph);

        pl.item_name("seed");
        pl.expected_updates(Some(k.min(heap.len())));
        pl.start(format!("Selecting {k} seed(s)..."));

        while seeds.len() < k {
            let Some(top) = heap.pop() else {
                break;
            };
            if is_seed[top.node] {
                continue;
            }
            debug_assert!(top.computed_at <= seeds.len());

            if top.computed_at == seeds.len() {
                // Fresh: no other candidate can have a larger gain
                if top.gain <= 0.0 {
                    log::info!(
                        "Best fresh marginal gain is {} (node {}): stopping",
                        top.gain,
                        top.node
                    );
                    break;
                }
                seeds.push(top.node);
                is_seed[top.node] = true;
                total += top.gain;
                let selection = Selection {
                    node: top.node,
                    value: self.graph.value(top.node),
                    gain: top.gain,
                    total,
                };
                log::info!(
                    "Selected node {} (value: {}) | marginal gain: {} | total weighted reach: {}",
                    selection.node,
                    selection.value,
                    selection.gain,
                    selection.total
                );
                result.selections.push(selection);
                pl.update_and_display();
            } else {
                // Stale: the gain is an upper bound and must be refreshed
                let computed_at = seeds.len();
                seeds.push(top.node);
                let mut rng = self.rng_factory.candidate(top.node, computed_at);
                let spread = self.estimator.estimate_with(&mut cascade, &seeds, &mut rng);
                seeds.pop();
                result.recomputations += 1;
                log::debug!(
                    "Recomputed gain of node {}: {} -> {}",
                    top.node,
                    top.gain,
                    spread - total
                );
                heap.push(NodeGain {
                    node: top.node,
                    gain: spread - total,
                    computed_at,
                });
            }
        }

        pl.done();

        if result.shortfall() {
            log::warn!(
                "Candidates with a positive marginal gain exhausted before selecting k={} seeds. Selected {} seed(s).",
                k,
                result.selections.len()
            );
        }
        log::info!(
            "Selected {} seed(s) with {} recomputation(s); estimated total weighted reach: {}",
            result.selections.len(),
            result.recomputations,
            result.total()
        );

        debug_assert_eq!(seeds.len(), result.selections.len());
        result
    }
}

/// Returns a mask of the `max` nodes with a value having the largest product
/// of outdegree and value, ties broken by ascending node.
fn top_candidates(graph: &impl ValuedGraph, max: usize) -> Vec<bool> {
    // a min-heap of the best nodes seen so far
    let mut best = QuaternaryHeap::with_capacity(max + 1);
    for node in 0..graph.num_nodes() {
        if !graph.has_value(node) {
            continue;
        }
        best.push(Reverse(NodeGain {
            node,
            gain: graph.outdegree(node) as f64 * graph.value(node),
            computed_at: 0,
        }));
        if best.len() > max {
            best.pop();
        }
    }

    let mut mask = vec![false; graph.num_nodes()];
    for Reverse(candidate) in best {
        mask[candidate.node] = true;
    }
    log::info!(
        "Candidates pruned to the {} nodes with the largest outdegree × value",
        max
    );
    mask
}
