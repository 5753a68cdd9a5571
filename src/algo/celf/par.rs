/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel computation of the initial gains.
//!
//! The gain of every candidate with respect to the empty seed set is its
//! singleton spread, and singleton spreads are independent of one another, so
//! they are computed by all the threads of the current Rayon pool. Each thread
//! grabs chunks of nodes from an [`AtomicUsize`] cursor, estimates spreads with
//! its own generator and simulator, and collects [`NodeGain`] records in a
//! private heap. Private heaps are merged into the resulting heap after all
//! threads have finished, so no partially merged heap is ever observable.

use super::NodeGain;
use crate::algo::{Cascade, SpreadEstimator};
use crate::traits::ValuedGraph;
use crate::utils::{Granularity, RngFactory, Seeder};
use dary_heap::QuaternaryHeap;
use dsi_progress_logger::ConcurrentProgressLog;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Computes the singleton gain of every node satisfying `is_candidate`, using
/// all the threads of the current Rayon pool.
///
/// Returns a heap of records with [`computed_at`](NodeGain::computed_at)
/// equal to zero.
pub(crate) fn initial_gains<G: ValuedGraph + Sync, S: Seeder>(
    graph: &G,
    estimator: &SpreadEstimator,
    rng_factory: &RngFactory<S>,
    granularity: Granularity,
    is_candidate: impl Fn(usize) -> bool + Sync,
    cpl: &mut impl ConcurrentProgressLog,
) -> QuaternaryHeap<NodeGain> {
    let n = graph.num_nodes();
    let node_granularity = granularity.granularity(n, rayon::current_num_threads());
    let node_cursor = AtomicUsize::new(0);

    cpl.item_name("node");
    cpl.expected_updates(Some(n));
    cpl.start(format!(
        "Computing singleton spreads ({} rounds, granularity={node_granularity})...",
        estimator.rounds()
    ));

    let private_heaps = rayon::broadcast(|ctx| {
        let mut local_cpl = cpl.clone();
        let mut rng = rng_factory.worker(ctx.index(), ctx.num_threads());
        let mut cascade = Cascade::new(graph);
        let mut heap = QuaternaryHeap::new();

        loop {
            let start = node_cursor.fetch_add(node_granularity, Ordering::Relaxed);
            if start >= n {
                break;
            }
            let end = (start + node_granularity).min(n);

            for node in start..end {
                if !is_candidate(node) {
                    continue;
                }
                debug_assert!(graph.has_value(node));
                let gain = estimator.estimate_with(&mut cascade, &[node], &mut rng);
                heap.push(NodeGain {
                    node,
                    gain,
                    computed_at: 0,
                });
            }

            local_cpl.update_with_count(end - start);
        }

        heap
    });

    cpl.done();

    let mut heap = QuaternaryHeap::with_capacity(private_heaps.iter().map(|h| h.len()).sum());
    for mut private_heap in private_heaps {
        heap.append(&mut private_heap);
    }
    heap
}
