/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::cascade::Cascade;
use crate::traits::ValuedGraph;
use anyhow::ensure;
use rand::Rng;

/// Monte Carlo estimator of the expected spread of a seed set.
///
/// The estimate is the arithmetic mean of the totals returned by a given number
/// of independent [cascade runs](Cascade::run). It is a random variable: to
/// obtain reproducible results the caller must fix the seed of the generator
/// (and, in parallel computations, use a single thread). There is no
/// memoization: every call samples anew.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use infmax::algo::SpreadEstimator;
/// use infmax::graphs::prob_graph::ProbGraph;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let mut graph = ProbGraph::new();
/// graph.add_arc("a", "b", 0.5);
/// graph.set_value("a", 1.0);
/// graph.set_value("b", 1.0);
///
/// let estimator = SpreadEstimator::try_from(10_000)?;
/// let spread = estimator.estimate(&graph, &[0], &mut SmallRng::seed_from_u64(0));
/// assert!((spread - 1.5).abs() < 0.05);
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadEstimator {
    rounds: usize,
    max_steps: Option<usize>,
}

impl SpreadEstimator {
    pub const DEFAULT_ROUNDS: usize = 1000;

    /// Creates a new estimator averaging the given number of cascade runs.
    ///
    /// # Panics
    ///
    /// Panics if `rounds` is zero. Use [`TryFrom`] for a fallible version.
    pub fn new(rounds: usize) -> Self {
        assert!(rounds > 0, "The number of rounds must be positive");
        SpreadEstimator {
            rounds,
            max_steps: None,
        }
    }

    /// Returns an estimator whose cascade runs last at most `max_steps`
    /// [steps](Cascade::run_with_max_steps), or run to completion if
    /// `max_steps` is [`None`].
    pub fn with_max_steps(self, max_steps: Option<usize>) -> Self {
        SpreadEstimator { max_steps, ..self }
    }

    /// Returns the maximum number of steps of each cascade run, if any.
    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    /// Returns the number of cascade runs averaged by each estimate.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Estimates the expected total value activated by `seeds`.
    pub fn estimate<G: ValuedGraph, R: Rng>(&self, graph: &G, seeds: &[usize], rng: &mut R) -> f64 {
        self.estimate_with(&mut Cascade::new(graph), seeds, rng)
    }

    /// Estimates the expected total value activated by `seeds`, reusing the
    /// provided simulator.
    ///
    /// This method avoids the allocation of a new simulator, and it is thus
    /// preferable when many estimates are computed on the same graph.
    pub fn estimate_with<G: ValuedGraph, R: Rng>(
        &self,
        cascade: &mut Cascade<'_, G>,
        seeds: &[usize],
        rng: &mut R,
    ) -> f64 {
        let mut total = 0.0;
        for _ in 0..self.rounds {
            total += cascade.run_with_max_steps(seeds, self.max_steps, rng);
        }
        total / self.rounds as f64
    }
}

impl TryFrom<usize> for SpreadEstimator {
    type Error = anyhow::Error;
    fn try_from(rounds: usize) -> anyhow::Result<Self> {
        ensure!(rounds > 0, "The number of rounds must be positive");
        Ok(SpreadEstimator {
            rounds,
            max_steps: None,
        })
    }
}

impl Default for SpreadEstimator {
    fn default() -> Self {
        SpreadEstimator {
            rounds: Self::DEFAULT_ROUNDS,
            max_steps: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::prob_graph::ProbGraph;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_rounds() {
        assert!(SpreadEstimator::try_from(0).is_err());
        assert_eq!(SpreadEstimator::default().rounds(), 1000);
    }

    #[test]
    fn test_resamples() {
        let mut g = ProbGraph::new();
        g.add_arc("a", "b", 0.5);
        g.set_value("b", 1.0);
        let estimator = SpreadEstimator::try_from(10).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let estimates: Vec<f64> = (0..20)
            .map(|_| estimator.estimate(&g, &[0], &mut rng))
            .collect();
        // with 20 independent estimates of ten coin flips, not all agree
        assert!(estimates.iter().any(|&e| e != estimates[0]));
    }

    #[test]
    fn test_max_steps() {
        let mut g = ProbGraph::new();
        g.add_arc("a", "b", 1.0);
        g.add_arc("b", "c", 1.0);
        g.set_value("b", 1.0);
        g.set_value("c", 1.0);
        let estimator = SpreadEstimator::try_from(5).unwrap();
        assert_eq!(estimator.max_steps(), None);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(estimator.estimate(&g, &[0], &mut rng), 2.0);
        let estimator = estimator.with_max_steps(Some(1));
        assert_eq!(estimator.rounds(), 5);
        assert_eq!(estimator.estimate(&g, &[0], &mut rng), 1.0);
    }
}
