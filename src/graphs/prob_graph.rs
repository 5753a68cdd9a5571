/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::ValuedGraph;
use std::collections::HashMap;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
/// An arc with an activation probability, stored as a pair (target,
/// probability).
pub struct ProbArc(usize, f64);

impl ProbArc {
    /// Returns the target of the arc.
    #[inline(always)]
    pub fn target(&self) -> usize {
        self.0
    }

    /// Returns the activation probability of the arc.
    #[inline(always)]
    pub fn probability(&self) -> f64 {
        self.1
    }
}

impl From<(usize, f64)> for ProbArc {
    fn from((v, p): (usize, f64)) -> Self {
        Self(v, p)
    }
}

impl From<ProbArc> for (usize, f64) {
    fn from(value: ProbArc) -> (usize, f64) {
        (value.0, value.1)
    }
}

/// A mutable [`ValuedGraph`] implementation based on a vector of vectors, with
/// interning of external string identifiers.
///
/// Nodes are created the first time their external identifier is seen, either
/// explicitly by [`node_id`](Self::node_id) or implicitly by
/// [`add_arc`](Self::add_arc) and [`set_value`](Self::set_value), and receive
/// consecutive identifiers starting from zero. The graph is append-only: arcs
/// cannot be removed, and the only possible update is the overwriting of a
/// value by a later call to [`set_value`](Self::set_value).
///
/// Arc probabilities are stored as provided, without any range check.
///
/// By setting the feature `serde`, this struct can be serialized using
/// [serde](https://crates.io/crates/serde).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbGraph {
    /// The number of arcs in the graph.
    num_arcs: u64,
    /// For each node, its list of successors.
    succ: Vec<Vec<ProbArc>>,
    /// For each node, its value.
    values: Vec<f64>,
    /// For each node, whether its value was set explicitly.
    has_value: Vec<bool>,
    /// For each node, its external identifier.
    ids: Vec<String>,
    /// Map from external identifiers to nodes.
    id_map: HashMap<String, usize>,
}

impl ProbGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node associated with the given external identifier,
    /// creating a new node with no successors and no value if the identifier
    /// has never been seen.
    pub fn node_id(&mut self, external_id: &str) -> usize {
        if let Some(&node) = self.id_map.get(external_id) {
            return node;
        }
        let node = self.ids.len();
        self.ids.push(external_id.to_owned());
        self.id_map.insert(external_id.to_owned(), node);
        self.succ.push(Vec::new());
        self.values.push(0.0);
        self.has_value.push(false);
        node
    }

    /// Returns the node associated with the given external identifier, if
    /// any, without creating it.
    pub fn get_id(&self, external_id: &str) -> Option<usize> {
        self.id_map.get(external_id).copied()
    }

    /// Returns the external identifier of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not exist.
    pub fn external_id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    /// Adds an arc from `src` to `dst` with the given activation probability,
    /// creating the endpoints if necessary.
    ///
    /// Parallel arcs are allowed, and each of them gets its own activation
    /// attempt.
    pub fn add_arc(&mut self, src: &str, dst: &str, probability: f64) {
        let u = self.node_id(src);
        let v = self.node_id(dst);
        self.add_node_arc(u, v, probability);
    }

    /// Adds an arc between two existing nodes.
    ///
    /// # Panics
    ///
    /// Panics if one of the given nodes is greater or equal than the number of
    /// nodes in the graph.
    pub fn add_node_arc(&mut self, u: usize, v: usize, probability: f64) {
        let max = u.max(v);
        if max >= self.succ.len() {
            panic!(
                "Node {} does not exist (the graph has {} nodes)",
                max,
                self.succ.len(),
            );
        }
        self.succ[u].push((v, probability).into());
        self.num_arcs += 1;
    }

    /// Sets the value of the node with the given external identifier,
    /// creating the node if necessary.
    pub fn set_value(&mut self, external_id: &str, value: f64) {
        let node = self.node_id(external_id);
        self.set_node_value(node, value);
    }

    /// Sets the value of an existing node.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not exist.
    pub fn set_node_value(&mut self, node: usize, value: f64) {
        self.values[node] = value;
        self.has_value[node] = true;
    }

    /// Returns an iterator over the external identifiers, in node order.
    pub fn external_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.iter().map(String::as_str)
    }

    /// Returns the transpose of this graph.
    ///
    /// Every arc (*u*, *v*, *p*) becomes (*v*, *u*, *p*); nodes keep their
    /// identifiers, external identifiers and values. In a dependency graph
    /// with arcs from dependents to dependencies, this reverses the direction
    /// of influence.
    pub fn reversed(&self) -> ProbGraph {
        let mut succ = vec![Vec::new(); self.succ.len()];
        for (u, arcs) in self.succ.iter().enumerate() {
            for arc in arcs {
                succ[arc.target()].push((u, arc.probability()).into());
            }
        }
        ProbGraph {
            num_arcs: self.num_arcs,
            succ,
            values: self.values.clone(),
            has_value: self.has_value.clone(),
            ids: self.ids.clone(),
            id_map: self.id_map.clone(),
        }
    }

    /// Shrinks the capacity of the graph to fit its current size.
    pub fn shrink_to_fit(&mut self) {
        self.succ.shrink_to_fit();
        for s in self.succ.iter_mut() {
            s.shrink_to_fit();
        }
        self.values.shrink_to_fit();
        self.has_value.shrink_to_fit();
        self.ids.shrink_to_fit();
        self.id_map.shrink_to_fit();
    }
}

/// Iterator over the successors of a node of a [`ProbGraph`].
pub type Successors<'a> =
    core::iter::Map<core::slice::Iter<'a, ProbArc>, fn(&ProbArc) -> (usize, f64)>;

impl ValuedGraph for ProbGraph {
    type Successors<'a> = Successors<'a>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Successors<'_> {
        let unpack: fn(&ProbArc) -> (usize, f64) = |&arc| arc.into();
        self.succ[node].iter().map(unpack)
    }

    #[inline(always)]
    fn value(&self, node: usize) -> f64 {
        self.values[node]
    }

    #[inline(always)]
    fn has_value(&self, node: usize) -> bool {
        self.has_value[node]
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.succ[node].len()
    }
}
