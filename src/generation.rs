//! Seeded random instance generators for tests and benchmarks.
//!
//! Every generator takes an explicit seed; no process-wide randomness
//! anywhere, so the same seed always yields the same instance.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::structures::ElementId;
use crate::structures::data_points::DataPoints;
use crate::structures::graph::Graph;

/// A random connected graph with exactly `n_edges` edges.
///
/// Connectivity first: start from `n_nodes` single-node trees and merge two
/// random trees with an edge until one spans everything. The remaining edge
/// budget is then drawn uniformly from the absent node pairs.
///
/// # Panics
///
/// When `n_edges` cannot host a spanning tree or exceeds the complete graph.
#[must_use]
pub fn random_connected_graph(n_nodes: usize, n_edges: usize, seed: u64) -> Graph {
    assert!(n_nodes >= 1);
    assert!(n_edges >= n_nodes - 1);
    assert!(n_edges <= n_nodes * (n_nodes - 1) / 2);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = Graph::with_capacity(n_nodes, n_edges);

    let mut forest: Vec<Vec<ElementId>> = (0..n_nodes as ElementId).map(|v| vec![v]).collect();

    for _ in 0..n_nodes - 1 {
        let tree1 = rng.random_range(0..forest.len());
        let mut tree2 = rng.random_range(0..forest.len());
        while tree1 == tree2 {
            tree2 = rng.random_range(0..forest.len());
        }

        let node1 = forest[tree1][rng.random_range(0..forest[tree1].len())];
        let node2 = forest[tree2][rng.random_range(0..forest[tree2].len())];
        g.add_edge(node1, node2);

        let merged = forest.swap_remove(tree2.max(tree1));
        forest[tree2.min(tree1)].extend(merged);
    }

    // remaining budget from the pairs the spanning tree left out
    let mut available: Vec<(ElementId, ElementId)> = Vec::new();
    for a in 0..n_nodes as ElementId {
        for b in a + 1..n_nodes as ElementId {
            if !g.edge_exists(a, b) {
                available.push((a, b));
            }
        }
    }

    for _ in n_nodes - 1..n_edges {
        let idx = rng.random_range(0..available.len());
        let (a, b) = available.swap_remove(idx);
        g.add_edge(a, b);
    }

    g.sort_unique_neighbours();
    g
}

/// `n` uniform points in the `d`-dimensional unit cube.
#[must_use]
pub fn random_data_points(n: usize, d: usize, seed: u64) -> DataPoints {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let point: Vec<f64> = (0..d).map(|_| rng.random_range(0.0..1.0)).collect();
        points.push(point);
    }
    DataPoints::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphs_are_connected() {
        for seed in 0..5 {
            let g = random_connected_graph(12, 20, seed);
            assert!(g.is_one_component());
            assert_eq!(g.n(), 12);
            assert_eq!(g.n_edges(), 20);
        }
    }

    #[test]
    fn spanning_tree_budget_works() {
        let g = random_connected_graph(6, 5, 1);
        assert!(g.is_one_component());
        assert_eq!(g.n_edges(), 5);
    }

    #[test]
    fn same_seed_same_graph() {
        let a = random_connected_graph(10, 15, 42);
        let b = random_connected_graph(10, 15, 42);
        assert_eq!(a.to_edge_list_string(), b.to_edge_list_string());

        let c = random_connected_graph(10, 15, 43);
        assert_ne!(a.to_edge_list_string(), c.to_edge_list_string());
    }

    #[test]
    fn same_seed_same_points() {
        let a = random_data_points(8, 3, 7);
        let b = random_data_points(8, 3, 7);
        assert_eq!(a.to_point_list_string(), b.to_point_list_string());
        assert_eq!(a.n(), 8);
        assert_eq!(a.dimensionality(), 3);
    }
}
