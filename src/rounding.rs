//! The structural rounding driver: find an octset, solve the bipartite rest exactly and lift the
//! partial cover back to the whole graph.

use fxhash::FxHashSet;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use crate::bipartite::bip_exact;
use crate::cust_error::ProcessingError;
use crate::graph::UGraph;
use crate::lift::{Breakdown, Lift};
use crate::octset::{OctDecomp, OctStrategy};

/// Parameters of a structural rounding run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RoundingConfig {
    pub lift: Lift,
    pub octset: OctStrategy,
    /// Seed for every random tie-break of the run.
    pub seed: u64,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        RoundingConfig {
            lift: Lift::Greedy,
            octset: OctStrategy::Greedy,
            seed: 0,
        }
    }
}

impl RoundingConfig {

    /// Returns a fresh generator seeded with `self.seed`.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

}

/// Result of a structural rounding run.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Solution {
    pub cover: FxHashSet<usize>,
    pub octset_size: usize,
    /// Size of the exact cover of `graph - octset`.
    pub partial_size: usize,
    /// What the lift added on top of the partial cover.
    pub breakdown: Breakdown,
}

/// Runs structural rounding on `graph` as described by `config`.
pub fn structural_rounding(graph: &UGraph, config: &RoundingConfig) -> Result<Solution, ProcessingError> {
    let mut rng = config.rng();
    let solution = structural_rounding_with(graph, config.lift, config.octset, &mut rng)?;
    info!(
        lift = %config.lift,
        octset = solution.octset_size,
        partial = solution.partial_size,
        cover = solution.cover.len(),
        "structural rounding done"
    );
    Ok(solution)
}

/// Runs structural rounding on `graph` with an octset found by `strategy`.
pub fn structural_rounding_with<R: Rng + ?Sized>(
    graph: &UGraph,
    lift: Lift,
    strategy: OctStrategy,
    rng: &mut R,
) -> Result<Solution, ProcessingError> {
    let decomp = strategy.decompose(graph, rng);
    round_decomp(graph, &decomp, lift, rng)
}

/// Runs structural rounding on `graph` with a given decomposition, e.g. a prescribed octset.
pub fn round_decomp<R: Rng + ?Sized>(
    graph: &UGraph,
    decomp: &OctDecomp,
    lift: Lift,
    rng: &mut R,
) -> Result<Solution, ProcessingError> {
    let partial = partial_cover(graph, decomp)?;
    lift_partial(graph, decomp, &partial, lift, rng)
}

/// Computes a minimum vertex cover of `graph - decomp.octset`.
pub fn partial_cover(graph: &UGraph, decomp: &OctDecomp) -> Result<FxHashSet<usize>, ProcessingError> {
    bip_exact(&graph.vertex_subgraph(&decomp.bipartite_part()))
}

/// Lifts `partial`, a cover of `graph - decomp.octset`, to a cover of `graph`.
pub fn lift_partial<R: Rng + ?Sized>(
    graph: &UGraph,
    decomp: &OctDecomp,
    partial: &FxHashSet<usize>,
    lift: Lift,
    rng: &mut R,
) -> Result<Solution, ProcessingError> {
    debug!(octset = decomp.octset.len(), partial = partial.len(), %lift, "lifting");
    let (cover, breakdown) = lift.lift(graph, &decomp.octset, partial, rng)?;
    Ok(Solution {
        cover,
        octset_size: decomp.octset.len(),
        partial_size: partial.len(),
        breakdown,
    })
}

/// Checks that `solution` covers `graph`.
pub fn validate_solution(graph: &UGraph, solution: &Solution) -> Result<(), ProcessingError> {
    match graph.uncovered_edge(&solution.cover) {
        Some((u, v)) => Err(ProcessingError::InvalidSolution(format!("edge ({}, {}) is not covered", u, v))),
        None => Ok(()),
    }
}
