//! Degree-bucketed vertex pool used by the greedy independent set and the greedy cover
//! approximations.
//!
//! Every vertex of the pool sits in exactly one bucket, the one matching its tracked degree.
//! Buckets are preallocated for the degree range `[0, max degree]` found at construction.
//! Degrees only ever decrease, so moving a vertex is a swap-remove from one bucket and a push
//! onto the next lower one.

use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;
use crate::graph::UGraph;

#[derive(Debug, Clone)]
pub struct DegreeBuckets {
    buckets: Vec<Vec<usize>>,
    /// Maps a node to its degree and its index inside `buckets[degree]`.
    slots: FxHashMap<usize, (usize, usize)>,
    /// No non-empty bucket lies below `min_hint`.
    min_hint: usize,
    /// No non-empty bucket lies above `max_hint`.
    max_hint: usize,
}

impl DegreeBuckets {

    /// Builds the pool over the nodes of `graph` in `allowed`. Degrees only count neighbors that
    /// are in `allowed` as well.
    pub fn new(graph: &UGraph, allowed: &FxHashSet<usize>) -> Self {
        let mut nodes: Vec<usize> = allowed.iter().copied().filter(|n| graph.contains(*n)).collect();
        nodes.sort_unstable();
        let degrees: Vec<usize> = nodes.iter().map(|node| graph.degree_in(*node, allowed)).collect();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);
        let mut pool = DegreeBuckets {
            buckets: vec![Vec::new(); max_degree + 1],
            slots: FxHashMap::default(),
            min_hint: 0,
            max_hint: max_degree,
        };
        for (node, degree) in nodes.into_iter().zip(degrees) {
            pool.attach(node, degree);
        }
        pool
    }

    /// Builds the pool over all nodes of `graph`.
    pub fn of_graph(graph: &UGraph) -> Self {
        DegreeBuckets::new(graph, &graph.node_set())
    }

    /// Returns the number of nodes left in the pool.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.slots.contains_key(&node)
    }

    /// Returns the tracked degree of `node`, or `None` if `node` is not in the pool.
    pub fn degree(&self, node: usize) -> Option<usize> {
        self.slots.get(&node).map(|(degree, _)| *degree)
    }

    fn attach(&mut self, node: usize, degree: usize) {
        let bucket = &mut self.buckets[degree];
        self.slots.insert(node, (degree, bucket.len()));
        bucket.push(node);
    }

    /// Takes `node` out of its bucket and the slot map. Returns its degree.
    fn detach(&mut self, node: usize) -> Option<usize> {
        let (degree, index) = self.slots.remove(&node)?;
        let bucket = &mut self.buckets[degree];
        bucket.swap_remove(index);
        if let Some(moved) = bucket.get(index) {
            self.slots.insert(*moved, (degree, index));
        }
        Some(degree)
    }

    /// Removes `node` from the pool. Returns its degree, or `None` if it was not in the pool.
    pub fn remove(&mut self, node: usize) -> Option<usize> {
        self.detach(node)
    }

    /// Lowers the degree of `node` by one and moves it to the matching bucket.
    /// Returns the new degree, or `None` if `node` is not in the pool.
    pub fn decrement(&mut self, node: usize) -> Option<usize> {
        let degree = self.degree(node)?;
        if degree == 0 {
            return Some(0)
        }
        self.detach(node);
        self.attach(node, degree - 1);
        if degree - 1 < self.min_hint {
            self.min_hint = degree - 1;
        }
        Some(degree - 1)
    }

    /// Returns the smallest tracked degree, or `None` for an empty pool.
    pub fn min_degree(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None
        }
        while self.buckets[self.min_hint].is_empty() {
            self.min_hint += 1;
        }
        Some(self.min_hint)
    }

    /// Returns the largest tracked degree, or `None` for an empty pool.
    pub fn max_degree(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None
        }
        while self.buckets[self.max_hint].is_empty() {
            self.max_hint -= 1;
        }
        Some(self.max_hint)
    }

    /// Removes and returns a node of minimum degree chosen uniformly at random.
    pub fn pop_min<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let degree = self.min_degree()?;
        Some(self.pop_random_in(degree, rng))
    }

    /// Removes and returns a node of maximum degree chosen uniformly at random.
    pub fn pop_max<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let degree = self.max_degree()?;
        Some(self.pop_random_in(degree, rng))
    }

    /// `buckets[degree]` must not be empty.
    fn pop_random_in<R: Rng + ?Sized>(&mut self, degree: usize, rng: &mut R) -> usize {
        let bucket = &self.buckets[degree];
        let node = bucket[rng.gen_range(0..bucket.len())];
        self.detach(node);
        node
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn star_with_tail() -> UGraph {
        // 0 is the center of a star on 1..=4, 4-5 is a tail.
        UGraph::from_edges(vec![(0, 1), (0, 2), (0, 3), (0, 4), (4, 5)])
    }

    #[test]
    fn bucket_invariant_test() {
        let graph = star_with_tail();
        let mut pool = DegreeBuckets::of_graph(&graph);
        assert_eq!(pool.len(), 6);
        assert_eq!(pool.degree(0), Some(4));
        assert_eq!(pool.degree(4), Some(2));
        assert_eq!(pool.min_degree(), Some(1));
        assert_eq!(pool.max_degree(), Some(4));
        assert_eq!(pool.remove(0), Some(4));
        for node in 1..=4 {
            pool.decrement(node);
        }
        assert_eq!(pool.min_degree(), Some(0));
        assert_eq!(pool.max_degree(), Some(1));
        assert_eq!(pool.degree(4), Some(1));
        assert_eq!(pool.decrement(9), None);
        assert!(!pool.contains(0));
    }

    #[test]
    fn restricted_degree_test() {
        let graph = star_with_tail();
        let allowed: FxHashSet<usize> = vec![0, 1, 4, 7].into_iter().collect();
        let pool = DegreeBuckets::new(&graph, &allowed);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.degree(0), Some(2));
        assert_eq!(pool.degree(4), Some(1));
        assert_eq!(pool.degree(7), None);
    }

    #[test]
    fn pop_order_test() {
        let graph = star_with_tail();
        let mut pool = DegreeBuckets::of_graph(&graph);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pool.pop_max(&mut rng), Some(0));
        let low = pool.pop_min(&mut rng).unwrap();
        assert!([1, 2, 3, 5].contains(&low));
        let mut rest = 0;
        while pool.pop_min(&mut rng).is_some() {
            rest += 1;
        }
        assert_eq!(rest, 4);
        assert!(pool.is_empty());
        assert_eq!(pool.min_degree(), None);
    }

}
