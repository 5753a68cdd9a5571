/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use infmax::algo::SpreadEstimator;
use infmax::graphs::random::ErdosRenyi;
use infmax::traits::ValuedGraph;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Returns the total value of the nodes reachable from `seeds` through arcs
/// with positive probability.
fn reachable_value(graph: &impl ValuedGraph, seeds: &[usize]) -> f64 {
    let mut seen = vec![false; graph.num_nodes()];
    let mut stack = Vec::new();
    let mut total = 0.0;
    for &seed in seeds {
        if !seen[seed] {
            seen[seed] = true;
            stack.push(seed);
        }
    }
    while let Some(node) = stack.pop() {
        total += graph.value(node);
        for (succ, p) in graph.successors(node) {
            if p > 0.0 && !seen[succ] {
                seen[succ] = true;
                stack.push(succ);
            }
        }
    }
    total
}

#[test]
fn test_bounds() -> Result<()> {
    let estimator = SpreadEstimator::try_from(200)?;
    let mut rng = SmallRng::seed_from_u64(0);
    for seed in 0..5 {
        let mut er = ErdosRenyi::new(50, 0.05, seed);
        er.arc_probability(0.3).max_value(10.0);
        let g = er.build();
        for seeds in [vec![0], vec![1, 2, 3], (0..50).collect()] {
            let spread = estimator.estimate(&g, &seeds, &mut rng);
            let seed_value: f64 = seeds.iter().map(|&s| g.value(s)).sum();
            assert!(spread >= seed_value - 1E-9, "{spread} < {seed_value}");
            assert!(spread <= reachable_value(&g, &seeds) + 1E-9);
        }
    }
    Ok(())
}

#[test]
fn test_empty_seed_set() -> Result<()> {
    let g = ErdosRenyi::new(10, 0.5, 0).build();
    let estimator = SpreadEstimator::try_from(10)?;
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(estimator.estimate(&g, &[], &mut rng), 0.0);
    Ok(())
}

#[test]
fn test_single_arc_mean() -> Result<()> {
    let mut g = infmax::graphs::prob_graph::ProbGraph::new();
    g.add_arc("a", "b", 0.25);
    g.set_value("b", 4.0);
    let estimator = SpreadEstimator::try_from(100_000)?;
    let mut rng = SmallRng::seed_from_u64(1);
    // the expected value is 0.25 · 4 = 1, with a standard error below 0.01
    let spread = estimator.estimate(&g, &[0], &mut rng);
    assert!((spread - 1.0).abs() < 0.05, "{spread}");
    Ok(())
}

#[cfg_attr(feature = "slow_tests", test)]
#[cfg_attr(not(feature = "slow_tests"), allow(dead_code))]
fn test_convergence() -> Result<()> {
    let mut er = ErdosRenyi::new(200, 0.02, 3);
    er.arc_probability(0.2);
    let g = er.build();
    let mut rng = SmallRng::seed_from_u64(0);
    let coarse = SpreadEstimator::try_from(100_000)?.estimate(&g, &[0, 1], &mut rng);
    let fine = SpreadEstimator::try_from(1_000_000)?.estimate(&g, &[0, 1], &mut rng);
    assert!((coarse - fine).abs() < 0.05 * fine.max(1.0), "{coarse} vs {fine}");
    Ok(())
}
