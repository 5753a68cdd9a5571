/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{rounds_parser, DiffusionArgs, GlobalArgs, SeedArg};
use crate::algo::SpreadEstimator;
use crate::graphs::prob_graph::ProbGraph;
use crate::utils::{Entropy, Fixed, RngFactory, Seeder};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "estimate", about = "Estimates the expected weighted reach of a set of seeds.", long_about = None)]
pub struct CliArgs {
    /// The GEXF file containing the graph.
    pub graph: PathBuf,

    /// The title of the node attribute used as node value.
    pub attribute: String,

    #[arg(required = true)]
    /// The external identifiers of the seeds.
    pub seeds: Vec<String>,

    #[arg(short, long, default_value_t = SpreadEstimator::DEFAULT_ROUNDS, value_parser = rounds_parser)]
    /// The number of Monte Carlo rounds.
    pub rounds: usize,

    #[clap(flatten)]
    pub seed: SeedArg,

    #[clap(flatten)]
    pub diffusion: DiffusionArgs,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let graph = args.diffusion.load(&args.graph, &args.attribute)?;
    let seeds = resolve_seeds(&graph, &args.seeds)?;
    let estimator = SpreadEstimator::try_from(args.rounds)?.with_max_steps(args.diffusion.max_steps);

    let spread = match args.seed.seed {
        Some(seed) => estimate(&graph, &estimator, &seeds, RngFactory::new(Fixed(seed))),
        None => estimate(&graph, &estimator, &seeds, RngFactory::new(Entropy)),
    };

    log::info!(
        "Estimated the spread of {} seed(s) with {} rounds",
        seeds.len(),
        estimator.rounds()
    );
    println!("Estimated weighted reach: {}", spread);
    Ok(())
}

fn estimate<S: Seeder>(
    graph: &ProbGraph,
    estimator: &SpreadEstimator,
    seeds: &[usize],
    rng_factory: RngFactory<S>,
) -> f64 {
    let mut rng = rng_factory.worker(0, 1);
    estimator.estimate(graph, seeds, &mut rng)
}

/// Maps external identifiers to nodes.
fn resolve_seeds(graph: &ProbGraph, ids: &[String]) -> Result<Vec<usize>> {
    ids.iter()
        .map(|id| {
            graph
                .get_id(id)
                .with_context(|| format!("Unknown node identifier '{}'", id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_seeds() -> Result<()> {
        let mut graph = ProbGraph::new();
        graph.add_arc("zlib", "openssl", 0.5);
        let ids = vec!["openssl".to_owned(), "zlib".to_owned()];
        assert_eq!(resolve_seeds(&graph, &ids)?, vec![1, 0]);

        let err = resolve_seeds(&graph, &["curl".to_owned()]).unwrap_err();
        assert!(err.to_string().contains("curl"));
        Ok(())
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let mut graph = ProbGraph::new();
        graph.add_arc("a", "b", 0.5);
        graph.add_arc("b", "c", 0.5);
        graph.set_value("b", 1.0);
        graph.set_value("c", 1.0);
        let estimator = SpreadEstimator::try_from(100).unwrap();
        let x = estimate(&graph, &estimator, &[0], RngFactory::new(Fixed(7)));
        let y = estimate(&graph, &estimator, &[0], RngFactory::new(Fixed(7)));
        assert_eq!(x, y);
    }
}
