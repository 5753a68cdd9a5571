/*
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{
    candidates_parser, get_thread_pool, rounds_parser, DiffusionArgs, GlobalArgs, NumThreadsArg,
    SeedArg,
};
use crate::algo::celf::{Celf, CelfResult, Selection};
use crate::graphs::prob_graph::ProbGraph;
use crate::traits::ValuedGraph;
use crate::utils::{Fixed, Granularity, Seeder};
use anyhow::{Context, Result};
use clap::Parser;
use dsi_progress_logger::prelude::*;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "select", about = "Selects the k seeds maximizing the expected weighted reach using lazy greedy (CELF).", long_about = None)]
pub struct CliArgs {
    /// The GEXF file containing the graph.
    pub graph: PathBuf,

    /// The number of seeds to select.
    pub k: usize,

    /// The title of the node attribute used as node value.
    pub attribute: String,

    #[arg(value_parser = rounds_parser)]
    /// The number of Monte Carlo rounds of each spread estimate [default: 1000].
    pub rounds: Option<usize>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub seed: SeedArg,

    #[clap(flatten)]
    pub diffusion: DiffusionArgs,

    #[arg(long, value_parser = candidates_parser)]
    /// Restricts the candidates to the given number of nodes with the largest
    /// product of outdegree and value [default: all nodes with a value].
    pub candidates: Option<usize>,

    #[arg(long)]
    /// The number of nodes of each parallel task computing initial gains
    /// (advanced option).
    pub granularity: Option<usize>,

    #[arg(long)]
    /// Stores the selections, in order of acceptance, as a JSON array.
    pub log: Option<PathBuf>,
}

/// A selection, with the external identifier of the node.
#[derive(serde::Serialize, Debug)]
struct SelectionRecord<'a> {
    id: &'a str,
    #[serde(flatten)]
    selection: Selection,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let graph = args.diffusion.load(&args.graph, &args.attribute)?;
    println!("Nodes eligible for seeding: {}", graph.num_eligible());

    match args.seed.seed {
        Some(seed) => select(&global_args, &args, Celf::with_seeder(&graph, Fixed(seed))),
        None => select(&global_args, &args, Celf::new(&graph)),
    }
}

fn select<S: Seeder>(
    global_args: &GlobalArgs,
    args: &CliArgs,
    mut celf: Celf<'_, ProbGraph, S>,
) -> Result<()> {
    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut cpl = concurrent_progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        cpl.log_interval(log_interval);
    }

    if let Some(rounds) = args.rounds {
        celf.rounds(rounds);
    }
    celf.max_steps(args.diffusion.max_steps);
    if let Some(candidates) = args.candidates {
        celf.candidates(candidates);
    }
    if let Some(granularity) = args.granularity {
        celf.granularity(Granularity::Absolute(granularity));
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;
    let start = std::time::Instant::now();
    let result = thread_pool.install(|| celf.run_with_logging(args.k, &mut pl, &mut cpl));
    let elapsed = start.elapsed();

    let graph = celf.graph();
    for s in result.selections() {
        println!(
            "Selected node {} (value: {}) | marginal gain: {} | total weighted reach: {}",
            graph.external_id(s.node),
            s.value,
            s.gain,
            s.total
        );
    }
    let ids: Vec<&str> = result.seeds().into_iter().map(|node| graph.external_id(node)).collect();
    println!("Selected seeds: {}", ids.join(", "));
    println!("Time: {:.3}s", elapsed.as_secs_f64());

    if let Some(path) = &args.log {
        store_log(path, graph, &result)?;
    }

    Ok(())
}

/// Stores the selections of `result` as a JSON array at `path`.
fn store_log(path: &Path, graph: &ProbGraph, result: &CelfResult) -> Result<()> {
    log::info!("Storing the selection log at {}", path.display());
    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create selection log at {}", path.display()))?;
    let mut file = BufWriter::new(file);
    let records: Vec<_> = result
        .selections()
        .iter()
        .map(|&selection| SelectionRecord {
            id: graph.external_id(selection.node),
            selection,
        })
        .collect();
    serde_json::to_writer_pretty(&mut file, &records)
        .with_context(|| format!("Could not write selection log to {}", path.display()))?;
    writeln!(file)?;
    file.flush()
        .with_context(|| format!("Could not write selection log to {}", path.display()))?;
    Ok(())
}
