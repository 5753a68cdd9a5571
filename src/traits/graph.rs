/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

The read-only view of a valued, probability-labeled graph used by the
diffusion and selection algorithms.

*/

/// A directed graph whose arcs are labeled by an activation probability and
/// whose nodes carry an optional value.
///
/// Nodes are dense identifiers in the range [0 . . [`num_nodes`](Self::num_nodes)).
/// Successors are returned as pairs (target, probability); their order is
/// irrelevant to the algorithms of this crate, as every arc is evaluated
/// exactly once per activated source.
///
/// A node without an explicit value contributes [`value`](Self::value) (zero
/// unless an implementation decides otherwise) when activated, but it is
/// never a seed candidate.
///
/// Implementations are shared among worker threads during parallel
/// computations, so algorithms require `Self: Sync`.
pub trait ValuedGraph {
    /// The type of the iterator over the successors of a node.
    type Successors<'a>: Iterator<Item = (usize, f64)> + 'a
    where
        Self: 'a;

    /// Returns the number of nodes in the graph.
    fn num_nodes(&self) -> usize;

    /// Returns the number of arcs in the graph.
    fn num_arcs(&self) -> u64;

    /// Returns the successors of `node` with their activation probabilities.
    fn successors(&self, node: usize) -> Self::Successors<'_>;

    /// Returns the value of `node`.
    fn value(&self, node: usize) -> f64;

    /// Returns whether `node` has an explicit value.
    fn has_value(&self, node: usize) -> bool;

    /// Returns the number of nodes with an explicit value, that is, the
    /// number of seed candidates.
    fn num_eligible(&self) -> usize {
        (0..self.num_nodes()).filter(|&x| self.has_value(x)).count()
    }

    /// Returns the outdegree of `node`.
    fn outdegree(&self, node: usize) -> usize {
        self.successors(node).count()
    }
}

impl<G: ValuedGraph> ValuedGraph for &G {
    type Successors<'a>
        = G::Successors<'a>
    where
        Self: 'a;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        (**self).num_arcs()
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Self::Successors<'_> {
        (**self).successors(node)
    }

    #[inline(always)]
    fn value(&self, node: usize) -> f64 {
        (**self).value(node)
    }

    #[inline(always)]
    fn has_value(&self, node: usize) -> bool {
        (**self).has_value(node)
    }

    fn num_eligible(&self) -> usize {
        (**self).num_eligible()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        (**self).outdegree(node)
    }
}
