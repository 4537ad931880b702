//! Exact vertex cover on bipartite graphs.
//!
//! The bipartition `(L, R)` comes from the BFS coloring in `octset::verify_bip`. A maximum
//! matching is computed with the Hopcroft-Karp algorithm: each phase layers the graph by BFS
//! from all unmatched nodes of `L`, then searches vertex-disjoint shortest augmenting paths by
//! DFS along the layers and flips the matching on each of them. Phases repeat until one finds no
//! augmenting path.
//!
//! By König's theorem the minimum vertex cover has the size of the maximum matching. Let `Z` be
//! the nodes reachable from unmatched nodes of `L` over alternating paths (any edge from `L` to
//! `R`, matched edges from `R` back to `L`). Then `(L \ Z) ∪ (R ∩ Z)` is a minimum vertex cover.

use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;
use crate::cust_error::ProcessingError;
use crate::graph::UGraph;
use crate::octset::verify_bip;

/// A matching stored from both ends: `mate[u] == v` iff `mate[v] == u`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Matching {
    mate: FxHashMap<usize, usize>,
}

impl Matching {

    /// Returns the partner of `node`, or `None` if `node` is unmatched.
    pub fn mate(&self, node: usize) -> Option<usize> {
        self.mate.get(&node).copied()
    }

    pub fn is_matched(&self, node: usize) -> bool {
        self.mate.contains_key(&node)
    }

    /// Returns the number of matched edges.
    pub fn len(&self) -> usize {
        self.mate.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.mate.is_empty()
    }

    /// Returns the matched edges as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.mate.iter().filter(|(u, v)| u < v).map(|(u, v)| (*u, *v))
    }

    /// Checks symmetry and that every matched pair is an edge of `graph`.
    pub fn is_valid_for(&self, graph: &UGraph) -> bool {
        self.mate.iter().all(|(u, v)| self.mate(*v) == Some(*u) && graph.adjacent(*u, *v))
    }

    fn join(&mut self, u: usize, v: usize) {
        self.mate.insert(u, v);
        self.mate.insert(v, u);
    }

}

/// Layers of one Hopcroft-Karp phase: BFS distance of the left nodes and the length of the
/// shortest augmenting path, if one exists.
struct Layers {
    dist: FxHashMap<usize, usize>,
    limit: Option<usize>,
}

/// BFS from all unmatched left nodes. Layering stops growing once a free right node is seen.
fn layer(graph: &UGraph, left: &[usize], matching: &Matching) -> Layers {
    let mut dist = FxHashMap::default();
    let mut queue = std::collections::VecDeque::new();
    for u in left {
        if !matching.is_matched(*u) {
            dist.insert(*u, 0);
            queue.push_back(*u);
        }
    }
    let mut limit = None;
    while let Some(u) = queue.pop_front() {
        let d = dist[&u];
        if limit.map_or(false, |l| d + 1 >= l) {
            continue
        }
        let neighbors = match graph.neighbors(u) {
            Some(neighbors) => neighbors,
            None => continue,
        };
        for v in neighbors {
            match matching.mate(*v) {
                None => {
                    limit = Some(limit.map_or(d + 1, |l: usize| l.min(d + 1)));
                },
                Some(w) => {
                    if !dist.contains_key(&w) {
                        dist.insert(w, d + 1);
                        queue.push_back(w);
                    }
                },
            }
        }
    }
    Layers { dist, limit }
}

/// Searches a shortest augmenting path from the free left node `root` along `layers` and flips
/// the matching along it. Nodes touched by the search are added to `used` so that later searches
/// of the same phase stay vertex-disjoint.
fn augment_from(
    graph: &UGraph,
    root: usize,
    layers: &Layers,
    limit: usize,
    used: &mut FxHashSet<usize>,
    matching: &mut Matching,
) -> bool {
    // Each frame holds a left node, its neighbors and the index of the next one to try. The
    // right node picked at a frame is `neighbors[next - 1]`.
    let neighbors_of = |u: usize| -> Vec<usize> {
        graph.neighbors(u).map_or_else(Vec::new, |n| n.iter().copied().collect())
    };
    used.insert(root);
    let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(root, neighbors_of(root), 0)];
    while let Some((u, neighbors, next)) = stack.last_mut() {
        if *next == neighbors.len() {
            stack.pop();
            continue
        }
        let u = *u;
        let v = neighbors[*next];
        *next += 1;
        let d = layers.dist[&u];
        match matching.mate(v) {
            None if d + 1 == limit => {
                let path: Vec<(usize, usize)> = stack
                    .iter()
                    .map(|(u, neighbors, next)| (*u, neighbors[*next - 1]))
                    .collect();
                for (u, v) in path {
                    matching.join(u, v);
                }
                return true
            },
            None => {},
            Some(w) => {
                if layers.dist.get(&w) == Some(&(d + 1)) && d + 1 < limit && !used.contains(&w) {
                    used.insert(w);
                    let frame = (w, neighbors_of(w), 0);
                    stack.push(frame);
                }
            },
        }
    }
    false
}

/// Computes a maximum matching of the bipartite graph `graph` with the side `left`.
pub fn maximum_matching(graph: &UGraph, left: &FxHashSet<usize>) -> Matching {
    let mut left: Vec<usize> = left.iter().copied().collect();
    left.sort_unstable();
    let mut matching = Matching::default();
    let mut phases = 0;
    loop {
        let layers = layer(graph, &left, &matching);
        let limit = match layers.limit {
            Some(limit) => limit,
            None => break,
        };
        phases += 1;
        let mut used = FxHashSet::default();
        let mut augmented = 0;
        for root in &left {
            if matching.is_matched(*root) || used.contains(root) {
                continue
            }
            if augment_from(graph, *root, &layers, limit, &mut used, &mut matching) {
                augmented += 1;
            }
        }
        if augmented == 0 {
            break
        }
    }
    debug!(size = matching.len(), phases, "maximum matching");
    matching
}

/// Returns the nodes reachable from unmatched nodes of `left` over alternating paths.
fn alternating_reach(graph: &UGraph, left: &FxHashSet<usize>, matching: &Matching) -> FxHashSet<usize> {
    let mut reached: FxHashSet<usize> = left.iter().copied().filter(|u| !matching.is_matched(*u)).collect();
    let mut stack: Vec<usize> = reached.iter().copied().collect();
    while let Some(u) = stack.pop() {
        let neighbors = match graph.neighbors(u) {
            Some(neighbors) => neighbors,
            None => continue,
        };
        for v in neighbors {
            if !reached.insert(*v) {
                continue
            }
            if let Some(w) = matching.mate(*v) {
                if reached.insert(w) {
                    stack.push(w);
                }
            }
        }
    }
    reached
}

/// Extracts a minimum vertex cover from a maximum `matching` by König's theorem.
pub fn konig_cover(
    graph: &UGraph,
    left: &FxHashSet<usize>,
    right: &FxHashSet<usize>,
    matching: &Matching,
) -> FxHashSet<usize> {
    let reached = alternating_reach(graph, left, matching);
    left.iter()
        .filter(|u| !reached.contains(u))
        .chain(right.iter().filter(|v| reached.contains(v)))
        .copied()
        .collect()
}

/// Computes a minimum vertex cover of the bipartite graph `graph`.
/// Returns a `ProcessingError::NotBipartite` if the BFS coloring of `graph` finds conflicts.
pub fn bip_exact(graph: &UGraph) -> Result<FxHashSet<usize>, ProcessingError> {
    let decomp = verify_bip(graph, &FxHashSet::default());
    if !decomp.octset.is_empty() {
        return Err(ProcessingError::NotBipartite { octset_size: decomp.octset.len() })
    }
    let matching = maximum_matching(graph, &decomp.left);
    let cover = konig_cover(graph, &decomp.left, &decomp.right, &matching);
    debug_assert_eq!(cover.len(), matching.len());
    Ok(cover)
}
