//! Implementation of several approximations for the Vertex Cover Problem, used on their own and
//! as building blocks of the lifting strategies.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use fxhash::FxHashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use crate::cust_error::ProcessingError;
use crate::degree_buckets::DegreeBuckets;
use crate::graph::UGraph;

/// The stand-alone approximations, run on the whole graph as a baseline for the lifts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Baseline {
    Std,
    Dfs,
    Heuristic,
}

pub const ALL_BASELINES: &[Baseline] = &[Baseline::Std, Baseline::Dfs, Baseline::Heuristic];

impl Baseline {

    pub fn name(&self) -> &'static str {
        match self {
            Baseline::Std => "std",
            Baseline::Dfs => "dfs",
            Baseline::Heuristic => "heuristic",
        }
    }

    /// Computes a vertex cover of `graph` with this approximation.
    pub fn cover<R: Rng + ?Sized>(&self, graph: &UGraph, rng: &mut R) -> FxHashSet<usize> {
        match self {
            Baseline::Std => std_apx(graph, None, rng),
            Baseline::Dfs => dfs_apx(graph, rng),
            Baseline::Heuristic => heuristic_apx(graph, rng),
        }
    }

}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Baseline {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_BASELINES
            .iter()
            .find(|baseline| baseline.name() == s)
            .copied()
            .ok_or_else(|| ProcessingError::InvalidParameter(format!("unknown approximation `{}`", s)))
    }
}

/// Approximates a vertex cover of the subgraph induced by `subset` (all of `graph` if `None`) by
/// building a maximal matching: repeatedly takes a random node `u` of maximum degree, matches it
/// with its available neighbor of highest degree and adds both to the cover.
/// The result is at most twice as large as an optimal cover of that subgraph.
pub fn std_apx<R: Rng + ?Sized>(graph: &UGraph, subset: Option<&FxHashSet<usize>>, rng: &mut R) -> FxHashSet<usize> {
    let mut pool = match subset {
        Some(subset) => DegreeBuckets::new(graph, subset),
        None => DegreeBuckets::of_graph(graph),
    };
    let mut cover = FxHashSet::default();
    while let Some(degree) = pool.max_degree() {
        if degree == 0 {
            break
        }
        let u = match pool.pop_max(rng) {
            Some(u) => u,
            None => break,
        };
        let u_neighbors = match graph.neighbors(u) {
            Some(neighbors) => neighbors,
            None => continue,
        };
        let v = match u_neighbors
            .iter()
            .copied()
            .filter(|n| pool.contains(*n))
            .max_by_key(|n| (pool.degree(*n), Reverse(*n))) {
            Some(v) => v,
            None => continue,
        };
        pool.remove(v);
        cover.insert(u);
        cover.insert(v);
        let mut relocate: Vec<usize> = u_neighbors.iter().copied().filter(|n| pool.contains(*n)).collect();
        if let Some(v_neighbors) = graph.neighbors(v) {
            relocate.extend(v_neighbors.iter().copied().filter(|n| pool.contains(*n)));
        }
        for node in relocate {
            pool.decrement(node);
        }
    }
    cover
}

/// Approximates a vertex cover by the internal nodes of a DFS forest. Roots are taken in random
/// order. The result is at most twice as large as an optimal cover.
pub fn dfs_apx<R: Rng + ?Sized>(graph: &UGraph, rng: &mut R) -> FxHashSet<usize> {
    let mut roots = graph.sorted_nodes();
    roots.shuffle(rng);
    let mut visited = FxHashSet::default();
    let mut cover = FxHashSet::default();
    let mut stack: Vec<(Option<usize>, usize)> = Vec::new();
    for root in roots {
        if visited.contains(&root) {
            continue
        }
        stack.push((None, root));
        while let Some((parent, node)) = stack.pop() {
            if !visited.insert(node) {
                continue
            }
            // Only nodes with a child end up in the cover.
            if let Some(parent) = parent {
                cover.insert(parent);
            }
            if let Some(neighbors) = graph.neighbors(node) {
                stack.extend(neighbors.iter().filter(|n| !visited.contains(n)).map(|n| (Some(node), *n)));
            }
        }
    }
    cover
}

/// Computes a vertex cover by repeatedly adding a random node of highest remaining degree.
/// No approximation guarantee, but usually smaller than `std_apx` in practice.
pub fn heuristic_apx<R: Rng + ?Sized>(graph: &UGraph, rng: &mut R) -> FxHashSet<usize> {
    let mut pool = DegreeBuckets::of_graph(graph);
    let mut cover = FxHashSet::default();
    while let Some(degree) = pool.max_degree() {
        if degree == 0 {
            break
        }
        let u = match pool.pop_max(rng) {
            Some(u) => u,
            None => break,
        };
        cover.insert(u);
        if let Some(neighbors) = graph.neighbors(u) {
            for neigh in neighbors {
                pool.decrement(*neigh);
            }
        }
    }
    cover
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::bipartite::bip_exact;

    fn sample() -> UGraph {
        let gr = Cursor::new("p td 16 33\n1 2\n1 3\n1 4\n1 5\n1 6\n2 3\n2 4\n2 5\n2 10\n\
                              3 4\n3 5\n3 9\n4 5\n4 8\n5 7\n6 11\n6 12\n7 13\n8 14\n\
                              9 15\n10 16\n11 12\n11 13\n11 15\n11 16\n12 13\n12 14\n\
                              12 16\n13 14\n13 15\n14 15\n14 16\n15 16\n");
        UGraph::read_gr(gr).unwrap()
    }

    #[test]
    fn two_approx_test() {
        // The optimum of `sample()` is 10.
        let graph = sample();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let std_cover = std_apx(&graph, None, &mut rng);
            assert!(graph.is_vertex_cover(&std_cover));
            assert!(std_cover.len() <= 20 && std_cover.len() % 2 == 0);
            let dfs_cover = dfs_apx(&graph, &mut rng);
            assert!(graph.is_vertex_cover(&dfs_cover));
            assert!(dfs_cover.len() <= 20);
            let heur_cover = heuristic_apx(&graph, &mut rng);
            assert!(graph.is_vertex_cover(&heur_cover));
            assert!(heur_cover.len() >= 10);
        }
    }

    #[test]
    fn restricted_std_apx_test() {
        let graph = sample();
        let subset: FxHashSet<usize> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let cover = std_apx(&graph, Some(&subset), &mut rng);
        // K5 on 0..5: the matching has two edges.
        assert_eq!(cover.len(), 4);
        assert!(cover.is_subset(&subset));
        assert!(graph.vertex_subgraph(&subset).is_vertex_cover(&cover));
    }

    #[test]
    fn bipartite_ratio_test() {
        let graph = UGraph::from_edges((0..10).map(|i| (i, i + 1)));
        let optimum = bip_exact(&graph).unwrap().len();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(std_apx(&graph, None, &mut rng).len() <= 2 * optimum);
        assert!(dfs_apx(&graph, &mut rng).len() <= 2 * optimum);
    }

    #[test]
    fn baseline_test() {
        let graph = sample();
        for baseline in ALL_BASELINES {
            let mut rng = StdRng::seed_from_u64(2);
            let cover = baseline.cover(&graph, &mut rng);
            assert!(graph.is_vertex_cover(&cover), "{} produced no cover", baseline);
            assert_eq!(baseline.name().parse::<Baseline>(), Ok(*baseline));
        }
        assert!("lp".parse::<Baseline>().is_err());
    }

    #[test]
    fn edgeless_test() {
        let mut graph = UGraph::new();
        graph.add_vertex(1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(std_apx(&graph, None, &mut rng).is_empty());
        assert!(dfs_apx(&graph, &mut rng).is_empty());
        assert!(heuristic_apx(&graph, &mut rng).is_empty());
    }

}
