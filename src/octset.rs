//! Heuristics for odd cycle transversals (octsets): vertex sets whose removal leaves a
//! bipartite graph.
//!
//! * `verify_bip` 2-colors the graph by BFS and moves every vertex that would need both colors
//!   into the octset. Seeded with a candidate octset it doubles as a validity check.
//! * `find_octset` peels off two maximal independent sets with a min-degree-first greedy and
//!   returns whatever is left. This tends to give much smaller octsets than the coloring.

use std::collections::VecDeque;
use std::str::FromStr;
use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;
use tracing::{debug, trace};
use crate::cust_error::ProcessingError;
use crate::degree_buckets::DegreeBuckets;
use crate::graph::UGraph;

/// An octset together with a proper 2-coloring of the rest of the graph.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OctDecomp {
    pub octset: FxHashSet<usize>,
    pub left: FxHashSet<usize>,
    pub right: FxHashSet<usize>,
}

impl OctDecomp {

    /// Returns the union of both sides.
    pub fn bipartite_part(&self) -> FxHashSet<usize> {
        self.left.union(&self.right).copied().collect()
    }

    /// Checks that the sides are independent and that the three sets partition the nodes of
    /// `graph`.
    pub fn is_valid_for(&self, graph: &UGraph) -> bool {
        graph.is_independent(&self.left)
            && graph.is_independent(&self.right)
            && self.left.is_disjoint(&self.right)
            && self.octset.is_disjoint(&self.left)
            && self.octset.is_disjoint(&self.right)
            && graph.nodes().all(|node| {
                self.octset.contains(&node) || self.left.contains(&node) || self.right.contains(&node)
            })
    }

}

/// How the structural rounding driver obtains its octset.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum OctStrategy {
    /// Two greedy maximal independent sets, see `find_octset`.
    #[default]
    Greedy,
    /// BFS 2-coloring, see `verify_bip`.
    Coloring,
}

impl OctStrategy {

    pub fn decompose<R: Rng + ?Sized>(&self, graph: &UGraph, rng: &mut R) -> OctDecomp {
        match self {
            OctStrategy::Greedy => find_octset(graph, rng),
            OctStrategy::Coloring => verify_bip(graph, &FxHashSet::default()),
        }
    }

}

impl FromStr for OctStrategy {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" | "indset" => Ok(OctStrategy::Greedy),
            "coloring" | "bfs" => Ok(OctStrategy::Coloring),
            _ => Err(ProcessingError::InvalidParameter(format!("unknown octset strategy `{}`", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// 2-colors `graph - seed` by BFS, restarting at the smallest unvisited node of each component
/// and putting it on the left. A neighbor that is asked to take both sides moves to the octset.
///
/// The returned octset is `seed` plus all such conflicts, so a valid `seed` comes back
/// unchanged.
pub fn verify_bip(graph: &UGraph, seed: &FxHashSet<usize>) -> OctDecomp {
    let mut side: FxHashMap<usize, Side> = FxHashMap::default();
    let mut conflicts: FxHashSet<usize> = FxHashSet::default();
    let mut queue = VecDeque::new();
    for start in graph.sorted_nodes() {
        if seed.contains(&start) || side.contains_key(&start) || conflicts.contains(&start) {
            continue
        }
        side.insert(start, Side::Left);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            // `current` could have been moved to the octset after it was queued.
            let wanted = match side.get(&current) {
                Some(current_side) => current_side.opposite(),
                None => continue,
            };
            let neighbors = match graph.neighbors(current) {
                Some(neighbors) => neighbors,
                None => continue,
            };
            for neigh in neighbors {
                if seed.contains(neigh) || conflicts.contains(neigh) {
                    continue
                }
                match side.get(neigh).copied() {
                    None => {
                        side.insert(*neigh, wanted);
                        queue.push_back(*neigh);
                    },
                    Some(neigh_side) if neigh_side == wanted => {},
                    Some(_) => {
                        trace!(node = *neigh, "coloring conflict");
                        side.remove(neigh);
                        conflicts.insert(*neigh);
                    },
                }
            }
        }
    }
    let mut decomp = OctDecomp {
        octset: seed.iter().copied().filter(|node| graph.contains(*node)).collect(),
        ..OctDecomp::default()
    };
    decomp.octset.extend(conflicts);
    for (node, node_side) in side {
        match node_side {
            Side::Left => decomp.left.insert(node),
            Side::Right => decomp.right.insert(node),
        };
    }
    decomp
}

/// Verifies a prescribed octset.
/// Returns the decomposition with exactly `octset` as its octset, or a `ProcessingError` if
/// `graph - octset` is not bipartite.
pub fn prescribed_octset(graph: &UGraph, octset: &FxHashSet<usize>) -> Result<OctDecomp, ProcessingError> {
    let decomp = verify_bip(graph, octset);
    let extra = decomp.octset.iter().filter(|node| !octset.contains(node)).count();
    if extra > 0 {
        return Err(ProcessingError::InvalidParameter(
            format!("prescribed octset is not valid, {} more vertices conflict", extra)))
    }
    Ok(decomp)
}

/// Computes a maximal independent set of the subgraph induced by `allowed` by repeatedly picking
/// a random node of minimum degree, removing its neighbors, and updating the degrees of the
/// neighbors of each removed node.
pub fn maximal_indset<R: Rng + ?Sized>(graph: &UGraph, allowed: &FxHashSet<usize>, rng: &mut R) -> FxHashSet<usize> {
    let mut pool = DegreeBuckets::new(graph, allowed);
    let mut indset = FxHashSet::default();
    while let Some(node) = pool.pop_min(rng) {
        indset.insert(node);
        let neighbors = match graph.neighbors(node) {
            Some(neighbors) => neighbors,
            None => continue,
        };
        // Stage the removals first, then relocate the survivors.
        let removed: Vec<usize> = neighbors.iter().copied().filter(|n| pool.remove(*n).is_some()).collect();
        let mut relocate = Vec::new();
        for gone in removed {
            if let Some(gone_neighbors) = graph.neighbors(gone) {
                relocate.extend(gone_neighbors.iter().copied().filter(|w| pool.contains(*w)));
            }
        }
        for survivor in relocate {
            pool.decrement(survivor);
        }
    }
    indset
}

/// Finds an octset by taking a maximal independent set as the left side and a maximal
/// independent set of the remainder as the right side.
pub fn find_octset<R: Rng + ?Sized>(graph: &UGraph, rng: &mut R) -> OctDecomp {
    let mut octset = graph.node_set();
    let left = maximal_indset(graph, &octset, rng);
    octset.retain(|node| !left.contains(node));
    let right = maximal_indset(graph, &octset, rng);
    octset.retain(|node| !right.contains(node));
    debug!(
        nodes = graph.num_nodes(),
        left = left.len(),
        right = right.len(),
        octset = octset.len(),
        "found octset"
    );
    OctDecomp { octset, left, right }
}
