//! Implementation of a simple, undirected graph data structure keyed by arbitrary vertex ids,
//! together with the subgraph constructions used by structural rounding.

use fxhash::{FxHashMap, FxHashSet};

/// A simple undirected graph. Adjacency is kept symmetric, self-loops are never stored and
/// inserting an existing edge does not change the edge count.
#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct UGraph {
    adj_list: FxHashMap<usize, FxHashSet<usize>>,
    num_edges: usize,
}

// Static functions
impl UGraph {

    /// Creates an empty graph.
    pub fn new() -> Self {
        UGraph::default()
    }

    /// Creates a graph from a list of edges. Self-loops are dropped.
    pub fn from_edges<I: IntoIterator<Item = (usize, usize)>>(edges: I) -> Self {
        let mut graph = UGraph::new();
        for (u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Returns an `Iterator` over all nodes in no specific order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.adj_list.keys().copied()
    }

    /// Returns all nodes in increasing order.
    pub fn sorted_nodes(&self) -> Vec<usize> {
        let mut nodes: Vec<usize> = self.nodes().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Returns the node set of `self`.
    pub fn node_set(&self) -> FxHashSet<usize> {
        self.nodes().collect()
    }

    /// Returns the number of nodes of `self`.
    pub fn num_nodes(&self) -> usize {
        self.adj_list.len()
    }

    /// Returns the number of edges of `self`.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Checks if `node` is a vertex of `self`.
    pub fn contains(&self, node: usize) -> bool {
        self.adj_list.contains_key(&node)
    }

    /// Returns the neighborhood of `node`, or `None` if `node` is not in `self`.
    pub fn neighbors(&self, node: usize) -> Option<&FxHashSet<usize>> {
        self.adj_list.get(&node)
    }

    /// Returns the degree of `node`. Unknown nodes have degree 0.
    pub fn degree(&self, node: usize) -> usize {
        self.adj_list.get(&node).map_or(0, |neighbors| neighbors.len())
    }

    /// Returns the number of neighbors of `node` inside `set`.
    pub fn degree_in(&self, node: usize, set: &FxHashSet<usize>) -> usize {
        self.adj_list
            .get(&node)
            .map_or(0, |neighbors| neighbors.iter().filter(|n| set.contains(n)).count())
    }

    /// Returns the highest degree in `self`, 0 for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.adj_list.values().map(|neighbors| neighbors.len()).max().unwrap_or(0)
    }

    /// Checks if the edge `(u, v)` exists.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.adj_list.get(&u).map_or(false, |neighbors| neighbors.contains(&v))
    }

    /// Returns an iterator over all edges `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj_list
            .iter()
            .flat_map(|(u, neighbors)| {
                neighbors.iter().filter(move |v| u < *v).map(move |v| (*u, *v))
            })
    }

    /// Returns an edge of `self` with no endpoint in `cover`, or `None` if `cover` is a vertex
    /// cover.
    pub fn uncovered_edge(&self, cover: &FxHashSet<usize>) -> Option<(usize, usize)> {
        self.edges().find(|(u, v)| !(cover.contains(u) || cover.contains(v)))
    }

    /// Checks if `cover` is a vertex cover of `self`.
    pub fn is_vertex_cover(&self, cover: &FxHashSet<usize>) -> bool {
        self.uncovered_edge(cover).is_none()
    }

    /// Checks if `set` is independent in `self`.
    pub fn is_independent(&self, set: &FxHashSet<usize>) -> bool {
        set.iter().all(|node| {
            self.neighbors(*node).map_or(true, |neighbors| neighbors.is_disjoint(set))
        })
    }

}

// Dynamic functions
impl UGraph {

    /// Registers `node` without any edges. Does nothing if `node` already exists.
    pub fn add_vertex(&mut self, node: usize) {
        self.adj_list.entry(node).or_default();
    }

    /// Adds the edge `(u, v)`.
    /// Returns `true` if the edge is new, `false` for self-loops and existing edges.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if u == v {
            return false
        }
        let new = self.adj_list.entry(u).or_default().insert(v);
        self.adj_list.entry(v).or_default().insert(u);
        if new {
            self.num_edges += 1;
        }
        new
    }

}

// Subgraphs
impl UGraph {

    /// Returns the subgraph induced by the nodes of `set` that are in `self`. Members without
    /// neighbors in `set` stay as isolated vertices.
    pub fn vertex_subgraph(&self, set: &FxHashSet<usize>) -> UGraph {
        let mut sub = UGraph::new();
        for node in set {
            if let Some(neighbors) = self.neighbors(*node) {
                sub.add_vertex(*node);
                for neigh in neighbors {
                    if set.contains(neigh) {
                        sub.add_edge(*node, *neigh);
                    }
                }
            }
        }
        sub
    }

    /// Returns the subgraph induced by all nodes not in `removed`.
    pub fn without(&self, removed: &FxHashSet<usize>) -> UGraph {
        let keep: FxHashSet<usize> = self.nodes().filter(|node| !removed.contains(node)).collect();
        self.vertex_subgraph(&keep)
    }

    /// Returns the subgraph made of all edges `(u, v)` with `pred(u, v)`, together with their
    /// endpoints. `pred` sees each edge once in each orientation.
    pub fn edge_filter_subgraph<F: Fn(usize, usize) -> bool>(&self, pred: F) -> UGraph {
        let mut sub = UGraph::new();
        for (u, neighbors) in &self.adj_list {
            for v in neighbors {
                if pred(*u, *v) {
                    sub.add_edge(*u, *v);
                }
            }
        }
        sub
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(nodes: &[usize]) -> FxHashSet<usize> {
        nodes.iter().copied().collect()
    }

    #[test]
    fn add_edge_test() {
        let mut graph = UGraph::new();
        assert!(graph.add_edge(1, 2));
        assert!(!graph.add_edge(2, 1));
        assert!(!graph.add_edge(3, 3));
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.num_nodes(), 2);
        assert!(graph.adjacent(2, 1));
        assert_eq!(graph.degree(3), 0);
        assert!(graph.neighbors(3).is_none());
        graph.add_vertex(3);
        assert_eq!(graph.neighbors(3), Some(&FxHashSet::default()));
    }

    #[test]
    fn vertex_subgraph_test() {
        // 5-cycle
        let graph = UGraph::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]);
        let sub = graph.vertex_subgraph(&set(&[1, 2, 3, 7]));
        assert_eq!(sub.num_nodes(), 3);
        assert_eq!(sub.num_edges(), 2);
        let path = graph.without(&set(&[5]));
        assert_eq!(path.num_nodes(), 4);
        assert_eq!(path.num_edges(), 3);
        let isolated = graph.vertex_subgraph(&set(&[1, 3]));
        assert_eq!(isolated.num_nodes(), 2);
        assert_eq!(isolated.num_edges(), 0);
    }

    #[test]
    fn edge_filter_subgraph_test() {
        let graph = UGraph::from_edges(vec![(1, 2), (2, 3), (3, 4)]);
        let cut = graph.edge_filter_subgraph(|u, v| u == 2 || v == 2);
        assert_eq!(cut.num_edges(), 2);
        assert!(!cut.contains(4));
    }

    #[test]
    fn cover_test() {
        let graph = UGraph::from_edges(vec![(1, 2), (2, 3), (3, 4), (4, 1)]);
        assert!(graph.is_vertex_cover(&set(&[1, 3])));
        assert!(!graph.is_vertex_cover(&set(&[1, 2])));
        assert!(graph.is_independent(&set(&[2, 4])));
        assert_eq!(graph.edges().count(), 4);
        assert_eq!(graph.max_degree(), 2);
    }

}
