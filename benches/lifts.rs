use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sr_cover::graph::UGraph;
use sr_cover::lift::ALL_LIFTS;
use sr_cover::rounding::{structural_rounding, validate_solution, RoundingConfig};

/// A bipartite grid with `noise` random extra edges, so that the octset stays small.
fn near_bipartite(side: usize, noise: usize, seed: u64) -> UGraph {
    let id = |r: usize, c: usize| r * side + c;
    let mut graph = UGraph::new();
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                graph.add_edge(id(r, c), id(r, c + 1));
            }
            if r + 1 < side {
                graph.add_edge(id(r, c), id(r + 1, c));
            }
        }
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let n = side * side;
    for _ in 0..noise {
        graph.add_edge(rng.gen_range(0..n), rng.gen_range(0..n));
    }
    graph
}

fn benchmark_graph(c: &mut Criterion, graph_name: &str, graph: &UGraph) {
    for lift in ALL_LIFTS {
        let config = RoundingConfig { lift: *lift, ..RoundingConfig::default() };
        c.bench_function(&format!("{}/{}", graph_name, lift), |b| {
            b.iter(|| {
                let solution = structural_rounding(graph, &config).unwrap();
                assert!(validate_solution(graph, &solution).is_ok());
            })
        });
    }
}

fn lifts_benchmark(c: &mut Criterion) {
    benchmark_graph(c, "grid30_noise50", &near_bipartite(30, 50, 1));
    benchmark_graph(c, "grid30_noise400", &near_bipartite(30, 400, 2));
}

criterion_group!(benches, lifts_benchmark);
criterion_main!(benches);
