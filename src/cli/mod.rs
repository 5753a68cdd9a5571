/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface.

use anyhow::{anyhow, bail, ensure, Result};
use clap::{Args, Parser, Subcommand};
use crate::graphs::gexf;
use crate::graphs::prob_graph::ProbGraph;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};

pub mod estimate;
pub mod select;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILT_TIME_UTC,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Parses a positive number of Monte Carlo rounds.
pub fn rounds_parser(arg: &str) -> Result<usize> {
    let rounds = arg.parse::<usize>()?;
    ensure!(rounds > 0, "The number of rounds must be positive");
    Ok(rounds)
}

/// Parses a positive number of seed candidates.
pub fn candidates_parser(arg: &str) -> Result<usize> {
    let candidates = arg.parse::<usize>()?;
    ensure!(candidates > 0, "The number of candidates must be positive");
    Ok(candidates)
}

/// Shared CLI arguments for commands loading a graph and simulating
/// diffusions on it.
#[derive(Args, Debug)]
pub struct DiffusionArgs {
    #[arg(long)]
    /// Reverses the arcs of the graph after loading it (in a dependency graph
    /// with arcs from dependents to dependencies, influence then flows from
    /// dependencies to their dependents).
    pub reverse: bool,

    #[arg(long)]
    /// The maximum number of steps of each diffusion [default: unlimited].
    pub max_steps: Option<usize>,
}

impl DiffusionArgs {
    /// Loads a GEXF graph, reversing it if requested.
    pub fn load(&self, path: &Path, attribute: &str) -> Result<ProbGraph> {
        let graph = gexf::load(path, attribute)?.graph;
        if self.reverse {
            log::info!("Reversing the graph");
            return Ok(graph.reversed());
        }
        Ok(graph)
    }
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// Shared CLI arguments for commands using random generators.
#[derive(Args, Debug)]
pub struct SeedArg {
    #[arg(long)]
    /// A fixed seed for the random generators; if not given, generators are
    /// seeded with fresh entropy. Results are reproducible only when using a
    /// single thread.
    pub seed: Option<u64>,
}

/// Creates a [`ThreadPool`](rayon::ThreadPool) with the given number of threads.
pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow!("Failed to create thread pool: {e}"))?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

/// Parses a duration from a string.
/// For compatibility with Java, if no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::SpanRound;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span
            .round(span_round)
            .map_err(|e| std::io::Error::other(format!("Failed to round span: {e}")))?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Select(select::CliArgs),
    Estimate(estimate::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "infmax", version=build_info::version_string())]
/// Weighted influence maximization under the independent cascade model.
///
/// Logging is configured by the RUST_LOG environment variable (see
/// <https://docs.rs/env_logger/latest/env_logger/>); the default level is
/// `info`.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Select(args) => {
            select::main(cli.args, args)?;
        }
        SubCommands::Estimate(args) => {
            estimate::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let weeks = elapsed_seconds / (60 * 60 * 24 * 7);
    elapsed_seconds %= 60 * 60 * 24 * 7;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    match weeks {
        0 => {}
        1 => result.push_str("1 week "),
        _ => result.push_str(&format!("{} weeks ", weeks)),
    }
    match days {
        0 => {}
        1 => result.push_str("1 day "),
        _ => result.push_str(&format!("{} days ", days)),
    }
    match hours {
        0 => {}
        1 => result.push_str("1 hour "),
        _ => result.push_str(&format!("{} hours ", hours)),
    }
    match minutes {
        0 => {}
        1 => result.push_str("1 minute "),
        _ => result.push_str(&format!("{} minutes ", minutes)),
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
