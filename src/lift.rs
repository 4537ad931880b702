//! Lifting strategies for structural rounding.
//!
//! Every strategy takes the full graph `G`, an octset of `G` and a vertex cover `partial` of the
//! bipartite graph `G - octset`, and extends `partial` to a vertex cover of `G`. Besides the
//! cover each strategy reports a `Breakdown` of how many vertices each of its phases added.
//!
//! | Strategy | Added on top of `partial` |
//! |---|---|
//! | `Naive` | the whole octset |
//! | `Greedy` | octset vertices that still have an uncovered edge, scanned by increasing id |
//! | `Apx` | a 2-approximation of `G - partial` |
//! | `OctFirst` | a 2-approximation of `G[octset]`, then an exact cover of what remains |
//! | `BipFirst` | an exact cover of the octset/rest cut, then a 2-approximation of the rest of the octset |
//! | `Recursive` | structural rounding of `G - partial` |
//! | `RecursiveOct` | structural rounding of `G[octset]`, then an exact cover of what remains |
//! | `RecursiveBip` | an exact cover of the cut, then structural rounding of the rest of the octset |

use std::fmt;
use std::str::FromStr;
use fxhash::FxHashSet;
use rand::Rng;
use tracing::debug;
use crate::apx::std_apx;
use crate::bipartite::bip_exact;
use crate::cust_error::ProcessingError;
use crate::graph::UGraph;
use crate::octset::OctStrategy;
use crate::rounding::{structural_rounding_with, Solution};

/// Number of vertices each phase of a lift added to the partial cover.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Breakdown {
    phases: Vec<(&'static str, usize)>,
}

impl Breakdown {

    pub fn new() -> Self {
        Breakdown::default()
    }

    /// Records that phase `name` added `added` vertices.
    pub fn push(&mut self, name: &'static str, added: usize) {
        self.phases.push((name, added));
    }

    pub fn phases(&self) -> &[(&'static str, usize)] {
        &self.phases
    }

    /// Returns the count of phase `name`.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.phases.iter().find(|(phase, _)| *phase == name).map(|(_, added)| *added)
    }

    /// Returns the number of vertices added over all phases.
    pub fn total(&self) -> usize {
        self.phases.iter().map(|(_, added)| added).sum()
    }

}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.phases.iter().map(|(name, added)| format!("{}={}", name, added)).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// The available lifting strategies.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Lift {
    Naive,
    #[default]
    Greedy,
    Apx,
    OctFirst,
    BipFirst,
    Recursive,
    RecursiveOct,
    RecursiveBip,
}

pub const ALL_LIFTS: &[Lift] = &[
    Lift::Naive, Lift::Greedy, Lift::Apx, Lift::OctFirst, Lift::BipFirst,
    Lift::Recursive, Lift::RecursiveOct, Lift::RecursiveBip,
];

impl Lift {

    pub fn name(&self) -> &'static str {
        match self {
            Lift::Naive => "naive",
            Lift::Greedy => "greedy",
            Lift::Apx => "apx",
            Lift::OctFirst => "oct-first",
            Lift::BipFirst => "bip-first",
            Lift::Recursive => "recursive",
            Lift::RecursiveOct => "recursive-oct",
            Lift::RecursiveBip => "recursive-bip",
        }
    }

    /// Extends `partial`, a vertex cover of `graph - octset`, to a vertex cover of `graph`.
    pub fn lift<R: Rng + ?Sized>(
        &self,
        graph: &UGraph,
        octset: &FxHashSet<usize>,
        partial: &FxHashSet<usize>,
        rng: &mut R,
    ) -> Result<(FxHashSet<usize>, Breakdown), ProcessingError> {
        match self {
            Lift::Naive => Ok(naive_lift(graph, octset, partial)),
            Lift::Greedy => Ok(greedy_lift(graph, octset, partial)),
            Lift::Apx => Ok(apx_lift(graph, octset, partial, rng)),
            Lift::OctFirst => oct_first_lift(graph, octset, partial, rng),
            Lift::BipFirst => bip_first_lift(graph, octset, partial, rng),
            Lift::Recursive => recursive_lift(graph, octset, partial, rng),
            Lift::RecursiveOct => recursive_oct_lift(graph, octset, partial, rng),
            Lift::RecursiveBip => recursive_bip_lift(graph, octset, partial, rng),
        }
    }

}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Lift {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LIFTS
            .iter()
            .find(|lift| lift.name() == s || lift.name().replace('-', "_") == s)
            .copied()
            .ok_or_else(|| ProcessingError::InvalidParameter(format!("unknown lift `{}`", s)))
    }
}

/// Adds the vertices of `added` to `cover` and returns how many were new.
fn extend_counting(cover: &mut FxHashSet<usize>, added: impl IntoIterator<Item = usize>) -> usize {
    let before = cover.len();
    cover.extend(added);
    cover.len() - before
}

/// The subgraph of all edges between `octset` and nodes outside of both `octset` and `partial`.
fn cut_graph(graph: &UGraph, octset: &FxHashSet<usize>, partial: &FxHashSet<usize>) -> UGraph {
    graph.edge_filter_subgraph(|u, v| {
        octset.contains(&u) && !octset.contains(&v) && !partial.contains(&v)
    })
}

/// Runs structural rounding on `sub` with `lift` if `sub` has fewer nodes than `parent_size`.
/// Otherwise runs a single naive round so that the recursion always shrinks.
fn round_smaller<R: Rng + ?Sized>(
    sub: &UGraph,
    parent_size: usize,
    lift: Lift,
    rng: &mut R,
) -> Result<Solution, ProcessingError> {
    if sub.num_edges() == 0 {
        return Ok(Solution::default())
    }
    let lift = if sub.num_nodes() < parent_size {
        lift
    } else {
        debug!(nodes = sub.num_nodes(), "no progress, falling back to a naive round");
        Lift::Naive
    };
    debug!(nodes = sub.num_nodes(), edges = sub.num_edges(), %lift, "recursing");
    structural_rounding_with(sub, lift, OctStrategy::Greedy, rng)
}

/// Adds every octset vertex to `partial`.
pub fn naive_lift(_graph: &UGraph, octset: &FxHashSet<usize>, partial: &FxHashSet<usize>) -> (FxHashSet<usize>, Breakdown) {
    let mut cover = partial.clone();
    let mut breakdown = Breakdown::new();
    breakdown.push("octset", extend_counting(&mut cover, octset.iter().copied()));
    (cover, breakdown)
}

/// Scans the octset by increasing id and adds a vertex only if it has a neighbor that is
/// neither in the cover nor a not yet scanned octset vertex. `octset` is not modified.
pub fn greedy_lift(graph: &UGraph, octset: &FxHashSet<usize>, partial: &FxHashSet<usize>) -> (FxHashSet<usize>, Breakdown) {
    let mut nonoct: FxHashSet<usize> = graph.nodes().filter(|node| !octset.contains(node)).collect();
    let mut cover = partial.clone();
    let mut scan: Vec<usize> = octset.iter().copied().collect();
    scan.sort_unstable();
    for node in scan {
        let uncovered = graph.neighbors(node).map_or(false, |neighbors| {
            neighbors.iter().any(|neigh| nonoct.contains(neigh) && !cover.contains(neigh))
        });
        if uncovered {
            cover.insert(node);
        }
        nonoct.insert(node);
    }
    let mut breakdown = Breakdown::new();
    breakdown.push("octset", cover.len() - partial.len());
    (cover, breakdown)
}

/// Adds a 2-approximate cover of `graph - partial`.
pub fn apx_lift<R: Rng + ?Sized>(
    graph: &UGraph,
    _octset: &FxHashSet<usize>,
    partial: &FxHashSet<usize>,
    rng: &mut R,
) -> (FxHashSet<usize>, Breakdown) {
    let rest: FxHashSet<usize> = graph.nodes().filter(|node| !partial.contains(node)).collect();
    let mut cover = partial.clone();
    let mut breakdown = Breakdown::new();
    breakdown.push("apx", extend_counting(&mut cover, std_apx(graph, Some(&rest), rng)));
    (cover, breakdown)
}

/// Adds a 2-approximate cover of `graph[octset]`, then an exact cover of the bipartite graph
/// left after removing everything covered so far.
pub fn oct_first_lift<R: Rng + ?Sized>(
    graph: &UGraph,
    octset: &FxHashSet<usize>,
    partial: &FxHashSet<usize>,
    rng: &mut R,
) -> Result<(FxHashSet<usize>, Breakdown), ProcessingError> {
    let mut cover = partial.clone();
    let mut breakdown = Breakdown::new();
    breakdown.push("octset_apx", extend_counting(&mut cover, std_apx(graph, Some(octset), rng)));
    let residual = graph.without(&cover);
    breakdown.push("residual_exact", extend_counting(&mut cover, bip_exact(&residual)?));
    debug!(%breakdown, "oct-first lift");
    Ok((cover, breakdown))
}

/// Adds an exact cover of the edges between the octset and the uncovered rest, then a
/// 2-approximate cover of the octset vertices not taken by it.
pub fn bip_first_lift<R: Rng + ?Sized>(
    graph: &UGraph,
    octset: &FxHashSet<usize>,
    partial: &FxHashSet<usize>,
    rng: &mut R,
) -> Result<(FxHashSet<usize>, Breakdown), ProcessingError> {
    let cut = cut_graph(graph, octset, partial);
    let mut cover = partial.clone();
    let mut breakdown = Breakdown::new();
    let cut_cover = bip_exact(&cut)?;
    let rest: FxHashSet<usize> = octset.iter().copied().filter(|node| !cut_cover.contains(node)).collect();
    breakdown.push("cut_exact", extend_counting(&mut cover, cut_cover));
    breakdown.push("octset_apx", extend_counting(&mut cover, std_apx(graph, Some(&rest), rng)));
    debug!(%breakdown, "bip-first lift");
    Ok((cover, breakdown))
}

/// Adds the structural rounding cover of `graph - partial`.
pub fn recursive_lift<R: Rng + ?Sized>(
    graph: &UGraph,
    _octset: &FxHashSet<usize>,
    partial: &FxHashSet<usize>,
    rng: &mut R,
) -> Result<(FxHashSet<usize>, Breakdown), ProcessingError> {
    let residual = graph.without(partial);
    let sub = round_smaller(&residual, graph.num_nodes(), Lift::Recursive, rng)?;
    let mut cover = partial.clone();
    cover.extend(&sub.cover);
    let mut breakdown = Breakdown::new();
    breakdown.push("residual_bipartite", sub.partial_size);
    breakdown.push("residual_lift", sub.breakdown.total());
    Ok((cover, breakdown))
}

/// Adds the structural rounding cover of `graph[octset]`, then an exact cover of the bipartite
/// graph left after removing everything covered so far.
pub fn recursive_oct_lift<R: Rng + ?Sized>(
    graph: &UGraph,
    octset: &FxHashSet<usize>,
    partial: &FxHashSet<usize>,
    rng: &mut R,
) -> Result<(FxHashSet<usize>, Breakdown), ProcessingError> {
    let oct_graph = graph.vertex_subgraph(octset);
    let sub = round_smaller(&oct_graph, graph.num_nodes(), Lift::RecursiveOct, rng)?;
    let mut cover = partial.clone();
    let mut breakdown = Breakdown::new();
    cover.extend(&sub.cover);
    breakdown.push("octset_bipartite", sub.partial_size);
    breakdown.push("octset_lift", sub.breakdown.total());
    let residual = graph.without(&cover);
    breakdown.push("residual_exact", extend_counting(&mut cover, bip_exact(&residual)?));
    debug!(%breakdown, "recursive-oct lift");
    Ok((cover, breakdown))
}

/// Adds an exact cover of the edges between the octset and the uncovered rest, then the
/// structural rounding cover of the octset vertices not taken by it.
pub fn recursive_bip_lift<R: Rng + ?Sized>(
    graph: &UGraph,
    octset: &FxHashSet<usize>,
    partial: &FxHashSet<usize>,
    rng: &mut R,
) -> Result<(FxHashSet<usize>, Breakdown), ProcessingError> {
    let cut = cut_graph(graph, octset, partial);
    let mut cover = bip_exact(&cut)?;
    let mut breakdown = Breakdown::new();
    breakdown.push("cut_exact", cover.len());
    let rest: FxHashSet<usize> = octset.iter().copied().filter(|node| !cover.contains(node)).collect();
    let sub = round_smaller(&graph.vertex_subgraph(&rest), graph.num_nodes(), Lift::RecursiveBip, rng)?;
    cover.extend(&sub.cover);
    breakdown.push("octset_bipartite", sub.partial_size);
    breakdown.push("octset_lift", sub.breakdown.total());
    cover.extend(partial);
    debug!(%breakdown, "recursive-bip lift");
    Ok((cover, breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::octset::find_octset;

    fn set(nodes: &[usize]) -> FxHashSet<usize> {
        nodes.iter().copied().collect()
    }

    fn sample() -> UGraph {
        let gr = Cursor::new("p td 16 33\n1 2\n1 3\n1 4\n1 5\n1 6\n2 3\n2 4\n2 5\n2 10\n\
                              3 4\n3 5\n3 9\n4 5\n4 8\n5 7\n6 11\n6 12\n7 13\n8 14\n\
                              9 15\n10 16\n11 12\n11 13\n11 15\n11 16\n12 13\n12 14\n\
                              12 16\n13 14\n13 15\n14 15\n14 16\n15 16\n");
        UGraph::read_gr(gr).unwrap()
    }

    /// Octset and exact partial cover of `graph`.
    fn prepare(graph: &UGraph, seed: u64) -> (FxHashSet<usize>, FxHashSet<usize>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let decomp = find_octset(graph, &mut rng);
        let partial = bip_exact(&graph.vertex_subgraph(&decomp.bipartite_part())).unwrap();
        (decomp.octset, partial)
    }

    #[test]
    fn all_lifts_cover_test() {
        let graph = sample();
        for seed in 0..4 {
            let (octset, partial) = prepare(&graph, seed);
            for lift in ALL_LIFTS {
                let mut rng = StdRng::seed_from_u64(seed);
                let (cover, breakdown) = lift.lift(&graph, &octset, &partial, &mut rng).unwrap();
                assert!(graph.is_vertex_cover(&cover), "{} produced no cover", lift);
                assert!(cover.is_superset(&partial), "{} dropped partial", lift);
                assert_eq!(breakdown.total(), cover.len() - partial.len(), "{} miscounted", lift);
                // The optimum of `sample()` is 10.
                assert!(cover.len() >= 10);
            }
        }
    }

    #[test]
    fn naive_and_greedy_test() {
        let graph = sample();
        let (octset, partial) = prepare(&graph, 3);
        let (naive, naive_breakdown) = naive_lift(&graph, &octset, &partial);
        assert_eq!(naive.len(), partial.len() + octset.len());
        assert_eq!(naive_breakdown.get("octset"), Some(octset.len()));
        let octset_copy = octset.clone();
        let (greedy, _) = greedy_lift(&graph, &octset, &partial);
        assert!(greedy.len() <= naive.len());
        assert_eq!(octset, octset_copy);
    }

    #[test]
    fn empty_octset_test() {
        let graph = UGraph::from_edges(vec![(1, 2)]);
        let partial = bip_exact(&graph).unwrap();
        let octset = FxHashSet::default();
        assert_eq!(naive_lift(&graph, &octset, &partial).0, partial);
        assert_eq!(greedy_lift(&graph, &octset, &partial).0, partial);
        let mut rng = StdRng::seed_from_u64(0);
        for lift in ALL_LIFTS {
            let (cover, _) = lift.lift(&graph, &octset, &partial, &mut rng).unwrap();
            assert_eq!(cover, partial);
        }
    }

    #[test]
    fn greedy_order_test() {
        // Triangle 1-2-3 with octset {1, 2}: node 1 only sees covered or unscanned neighbors,
        // node 2 sees the already scanned, uncovered node 1.
        let graph = UGraph::from_edges(vec![(1, 2), (2, 3), (3, 1)]);
        let (cover, breakdown) = greedy_lift(&graph, &set(&[1, 2]), &set(&[3]));
        assert_eq!(cover, set(&[2, 3]));
        assert_eq!(breakdown.get("octset"), Some(1));
    }

    #[test]
    fn cut_graph_test() {
        // Octset {0, 2}: the octset edge 0-2 and the covered edge 2-4 are not part of the cut.
        let graph = UGraph::from_edges(vec![(0, 1), (1, 2), (2, 0), (2, 3), (2, 4)]);
        let cut = cut_graph(&graph, &set(&[0, 2]), &set(&[4]));
        assert_eq!(cut.num_edges(), 3);
        assert!(cut.adjacent(0, 1) && cut.adjacent(2, 1) && cut.adjacent(2, 3));
        assert!(!cut.adjacent(0, 2));
        assert!(!cut.contains(4));
        let cut_cover = bip_exact(&cut).unwrap();
        assert_eq!(cut_cover.len(), 2);
    }

    #[test]
    fn recursion_fallback_test() {
        // Everything in the octset, nothing in partial: the recursion can not shrink the graph
        // and has to fall back to a naive round.
        let graph = UGraph::from_edges(vec![(0, 1), (1, 2), (2, 0), (2, 3)]);
        let octset = graph.node_set();
        let partial = FxHashSet::default();
        let mut rng = StdRng::seed_from_u64(9);
        for lift in &[Lift::Recursive, Lift::RecursiveOct, Lift::RecursiveBip] {
            let (cover, _) = lift.lift(&graph, &octset, &partial, &mut rng).unwrap();
            assert!(graph.is_vertex_cover(&cover));
        }
    }

    #[test]
    fn lift_names_test() {
        for lift in ALL_LIFTS {
            assert_eq!(lift.name().parse::<Lift>(), Ok(*lift));
        }
        assert_eq!("recursive_bip".parse::<Lift>(), Ok(Lift::RecursiveBip));
        assert!("magic".parse::<Lift>().is_err());
    }

    #[test]
    fn breakdown_test() {
        let mut breakdown = Breakdown::new();
        breakdown.push("cut_exact", 3);
        breakdown.push("octset_apx", 2);
        assert_eq!(breakdown.total(), 5);
        assert_eq!(breakdown.get("octset_apx"), Some(2));
        assert_eq!(breakdown.get("other"), None);
        assert_eq!(breakdown.to_string(), "cut_exact=3 octset_apx=2");
    }

}
