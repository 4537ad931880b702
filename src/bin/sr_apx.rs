//! Binary that reads a graph, computes vertex covers with structural rounding and writes either
//! the smallest cover found (one vertex per line) or a CSV summary per lifting strategy to
//! standard out.
//!
//! ```bash
//! # greedy lift on a sparse6 file
//! sr_apx graph.s6
//! # compare all lifts and the plain approximations over 5 seeds
//! sr_apx graph.gr --lift all --apx all --runs 5 --report
//! ```

use std::error;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use fxhash::FxHashSet;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sr_cover::{
    apx::{Baseline, ALL_BASELINES},
    graph::UGraph,
    graph_io::{read_octset, write_cover, GraphFormat},
    lift::{Lift, ALL_LIFTS},
    octset::{prescribed_octset, OctDecomp, OctStrategy},
    rounding::{lift_partial, partial_cover, validate_solution, RoundingConfig, Solution},
};

/// Vertex cover by structural rounding on near-bipartite graphs
#[derive(Parser)]
#[command(name = "sr_apx")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input graph, read from standard in if omitted
    input: Option<PathBuf>,

    /// Input format (edges, gr, s6); guessed from the file extension by default
    #[arg(short, long)]
    format: Option<GraphFormat>,

    /// Lifting strategies to run, comma separated, or `all`
    #[arg(short, long, value_delimiter = ',', default_value = "greedy")]
    lift: Vec<String>,

    /// Plain approximations to run on the whole graph (std, dfs, heuristic), comma separated,
    /// or `all`
    #[arg(short, long, value_delimiter = ',')]
    apx: Vec<String>,

    /// How to find the octset (greedy, coloring)
    #[arg(short, long, default_value = "greedy")]
    octset: OctStrategy,

    /// File with a prescribed octset, one vertex per line
    #[arg(long)]
    prescribed_octset: Option<PathBuf>,

    /// Seed of the first run; run `i` uses `seed + i`
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of runs per method
    #[arg(short, long, default_value_t = 1)]
    runs: u64,

    /// Print a CSV summary instead of a cover
    #[arg(long)]
    report: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn read_graph(cli: &Cli) -> Result<UGraph, Box<dyn error::Error>> {
    let graph = match &cli.input {
        Some(path) => {
            let format = cli.format.unwrap_or_else(|| GraphFormat::from_path(path));
            format.read(BufReader::new(File::open(path)?))?
        },
        None => {
            let stdin = io::stdin();
            cli.format.unwrap_or(GraphFormat::EdgeList).read(stdin.lock())?
        },
    };
    Ok(graph)
}

fn selected_lifts(names: &[String]) -> Result<Vec<Lift>, Box<dyn error::Error>> {
    if names.iter().any(|name| name == "all") {
        return Ok(ALL_LIFTS.to_vec())
    }
    let mut lifts = Vec::new();
    for name in names {
        lifts.push(name.parse::<Lift>()?);
    }
    Ok(lifts)
}

fn selected_baselines(names: &[String]) -> Result<Vec<Baseline>, Box<dyn error::Error>> {
    if names.iter().any(|name| name == "all") {
        return Ok(ALL_BASELINES.to_vec())
    }
    let mut baselines = Vec::new();
    for name in names {
        baselines.push(name.parse::<Baseline>()?);
    }
    Ok(baselines)
}

/// Timing and size statistics of all runs of one method, a lift or a plain approximation.
#[derive(Default)]
struct Stats {
    method: String,
    /// Summed time of the octset discovery and the exact bipartite solve. Zero for plain
    /// approximations.
    bip_secs: f64,
    secs: f64,
    runs: u64,
    max_size: usize,
    best: Option<Solution>,
}

impl Stats {

    fn new(method: String) -> Self {
        Stats { method, ..Stats::default() }
    }

    fn record(&mut self, solution: Solution, secs: f64) {
        self.secs += secs;
        self.runs += 1;
        self.max_size = self.max_size.max(solution.cover.len());
        if self.best.as_ref().map_or(true, |b| solution.cover.len() < b.cover.len()) {
            self.best = Some(solution);
        }
    }

    fn min_size(&self) -> usize {
        self.best.as_ref().map_or(0, |b| b.cover.len())
    }

    fn avg(&self, secs: f64) -> f64 {
        secs / self.runs.max(1) as f64
    }

}

/// Runs every selected lift and approximation `cli.runs` times. Run `i` seeds its generator
/// with `cli.seed + i`. The octset and the partial cover of a run are computed once and shared
/// by all lifts, each of which continues from a copy of the same generator state.
fn collect_stats(
    graph: &UGraph,
    cli: &Cli,
    lifts: &[Lift],
    baselines: &[Baseline],
    prescribed: Option<&OctDecomp>,
) -> Result<Vec<Stats>, Box<dyn error::Error>> {
    let mut lift_stats: Vec<Stats> = lifts.iter().map(|lift| Stats::new(lift.to_string())).collect();
    let mut apx_stats: Vec<Stats> = baselines.iter().map(|b| Stats::new(b.to_string())).collect();
    for run in 0..cli.runs.max(1) {
        let config = RoundingConfig { octset: cli.octset, seed: cli.seed + run, ..RoundingConfig::default() };

        for (baseline, stats) in baselines.iter().zip(apx_stats.iter_mut()) {
            let mut rng = config.rng();
            let start = Instant::now();
            let cover = baseline.cover(graph, &mut rng);
            let secs = start.elapsed().as_secs_f64();
            let solution = Solution { cover, ..Solution::default() };
            validate_solution(graph, &solution)?;
            debug!(%baseline, run, size = solution.cover.len(), "run finished");
            stats.record(solution, secs);
        }

        if lifts.is_empty() {
            continue
        }
        let mut rng = config.rng();
        let start = Instant::now();
        let decomp = match prescribed {
            Some(decomp) => decomp.clone(),
            None => config.octset.decompose(graph, &mut rng),
        };
        let partial = partial_cover(graph, &decomp)?;
        let bip_secs = start.elapsed().as_secs_f64();
        for (lift, stats) in lifts.iter().zip(lift_stats.iter_mut()) {
            let mut lift_rng = rng.clone();
            let start = Instant::now();
            let solution = lift_partial(graph, &decomp, &partial, *lift, &mut lift_rng)?;
            let secs = start.elapsed().as_secs_f64();
            validate_solution(graph, &solution)?;
            debug!(%lift, run, size = solution.cover.len(), breakdown = %solution.breakdown, "run finished");
            stats.bip_secs += bip_secs;
            stats.record(solution, secs);
        }
    }
    apx_stats.extend(lift_stats);
    Ok(apx_stats)
}

fn write_report<W: Write>(graph: &UGraph, name: &str, stats: &[Stats], mut out: W) -> Result<(), io::Error> {
    writeln!(out, "name,n,m,method,oct size,partial,bip time,time,min size,max size,breakdown")?;
    for s in stats {
        let best = s.best.clone().unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{},{},{:.4},{:.4},{},{},{}",
            name, graph.num_nodes(), graph.num_edges(), s.method, best.octset_size, best.partial_size,
            s.avg(s.bip_secs), s.avg(s.secs), s.min_size(), s.max_size, best.breakdown,
        )?;
    }
    Ok(())
}

pub fn main() -> Result<(), Box<dyn error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let graph = read_graph(&cli)?;
    info!(nodes = graph.num_nodes(), edges = graph.num_edges(), "read graph");
    let lifts = selected_lifts(&cli.lift)?;
    let baselines = selected_baselines(&cli.apx)?;

    let prescribed = match &cli.prescribed_octset {
        Some(path) => {
            let octset: FxHashSet<usize> = read_octset(BufReader::new(File::open(path)?))?;
            Some(prescribed_octset(&graph, &octset)?)
        },
        None => None,
    };

    let stats = collect_stats(&graph, &cli, &lifts, &baselines, prescribed.as_ref())?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    if cli.report {
        let name = cli.input
            .as_ref()
            .and_then(|path| path.file_stem())
            .map_or_else(|| "stdin".to_owned(), |stem| stem.to_string_lossy().into_owned());
        write_report(&graph, &name, &stats, &mut stdout)?;
    } else if let Some(best) = stats.iter().filter(|s| s.best.is_some()).min_by_key(|s| s.min_size()) {
        info!(method = %best.method, size = best.min_size(), "best cover");
        if let Some(solution) = &best.best {
            write_cover(&solution.cover, &mut stdout)?;
        }
    }
    stdout.flush()?;
    Ok(())
}
