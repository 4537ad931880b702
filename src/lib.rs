pub mod graph;
pub mod graph_io;
pub mod cust_error;
pub mod degree_buckets;
pub mod octset;
pub mod bipartite;
pub mod apx;
pub mod lift;
pub mod rounding;
