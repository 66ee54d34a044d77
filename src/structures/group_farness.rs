use std::collections::VecDeque;
use std::path::Path;

use log::debug;

use crate::error::SearchError;
use crate::structures::ElementId;
use crate::structures::ScoreStructure;
use crate::structures::graph::Graph;

/// Negative group farness on a graph.
///
/// `f(S) = -sum_v d(v, S)` where `d(v, S)` is the smallest BFS hop distance
/// from `v` to any element of `S`, capped at `n`. The cap keeps unreachable
/// pairs (and the empty set, where every node sits at the cap) finite and
/// deterministic, and it is what makes `f` monotone and submodular from the
/// empty set up: adding an element can only lower capped distances, and by
/// less the more is already chosen.
///
/// `finalize` computes all-pairs BFS distances once; each depth then keeps a
/// rolling row of per-node minima so `evaluate_1d` is a single fused
/// min-and-sum pass.
#[derive(Debug)]
pub struct GraphNegativeGroupFarness {
    graph: Graph,
    dist: Vec<Vec<i64>>,

    depth: usize,
    min_dist: Vec<Vec<i64>>,
    temp_min: Vec<i64>,
    max_score: i64,
}

impl GraphNegativeGroupFarness {
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            dist: Vec::new(),
            depth: 0,
            min_dist: Vec::new(),
            temp_min: Vec::new(),
            max_score: 0,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SearchError> {
        Ok(Self::new(Graph::from_path(path)?))
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// `-sum_v min(left[v], row_c[v])`.
    fn negated_sum_of_min(left: &[i64], row_c: &[i64]) -> i64 {
        let mut sum = 0i64;
        for (l, c) in left.iter().zip(row_c) {
            sum += l.min(c);
        }
        -sum
    }
}

impl ScoreStructure for GraphNegativeGroupFarness {
    type SF = i64;

    fn n(&self) -> usize {
        self.graph.n()
    }

    fn finalize(&mut self) {
        self.graph.sort_unique_neighbours();

        let n = self.graph.n();
        let unreachable = n as i64;
        let mut queue = VecDeque::with_capacity(n);

        self.dist = vec![vec![0i64; n]; n];
        for v in 0..n {
            self.graph
                .bfs_distances(v as ElementId, unreachable, &mut self.dist[v], &mut queue);
        }
        self.temp_min = vec![unreachable; n];

        debug!("farness: {} nodes, {} edges", n, self.graph.n_edges());
    }

    fn initialize_helping_structures(&mut self, k: usize) {
        let n = self.graph.n();
        // with nothing chosen every node sits at the distance cap
        self.min_dist = vec![vec![n as i64; n]; k + 1];
        self.depth = 0;
        // every selected node contributes 0, every other node at least 1
        self.max_score = -((n - k) as i64);
    }

    fn visit_new_depth(&mut self, s: &[ElementId], s_size: usize) {
        self.depth += 1;
        debug_assert_eq!(self.depth, s_size);

        let c = s[s_size - 1] as usize;
        let (prev, cur) = self.min_dist.split_at_mut(self.depth);
        for ((m, p), d) in cur[0].iter_mut().zip(&prev[self.depth - 1]).zip(&self.dist[c]) {
            *m = (*p).min(*d);
        }
    }

    fn return_from_last_depth(&mut self) {
        self.depth -= 1;
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn evaluate_empty_set(&mut self) -> i64 {
        let n = self.graph.n() as i64;
        -(n * n)
    }

    fn evaluate_1d(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        let c = s[s_size - 1] as usize;
        Self::negated_sum_of_min(&self.min_dist[self.depth], &self.dist[c])
    }

    fn evaluate_2d(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        let c1 = s[s_size - 2] as usize;
        let c2 = s[s_size - 1] as usize;

        let row = &self.min_dist[self.depth];
        let mut sum = 0i64;
        for ((m, d1), d2) in row.iter().zip(&self.dist[c1]).zip(&self.dist[c2]) {
            sum += (*m).min(*d1).min(*d2);
        }
        -sum
    }

    fn evaluate_xd(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        let n_new = s_size - self.depth;
        debug_assert!(n_new >= 1);
        if n_new == 1 {
            return self.evaluate_1d(s, s_size);
        }
        if n_new == 2 {
            return self.evaluate_2d(s, s_size);
        }

        let base = &self.min_dist[self.depth];
        let first = &self.dist[s[self.depth] as usize];
        for ((t, b), d) in self.temp_min.iter_mut().zip(base).zip(first) {
            *t = (*b).min(*d);
        }
        for j in 1..n_new - 1 {
            let row = &self.dist[s[self.depth + j] as usize];
            for (t, d) in self.temp_min.iter_mut().zip(row) {
                *t = (*t).min(*d);
            }
        }
        Self::negated_sum_of_min(&self.temp_min, &self.dist[s[s_size - 1] as usize])
    }

    fn evaluate_general(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        match s_size {
            0 => self.evaluate_empty_set(),
            1 => -self.dist[s[0] as usize].iter().sum::<i64>(),
            _ => {
                let first = &self.dist[s[0] as usize];
                let second = &self.dist[s[1] as usize];
                for ((t, a), b) in self.temp_min.iter_mut().zip(first).zip(second) {
                    *t = (*a).min(*b);
                }
                for j in 2..s_size - 1 {
                    let row = &self.dist[s[j] as usize];
                    for (t, d) in self.temp_min.iter_mut().zip(row) {
                        *t = (*t).min(*d);
                    }
                }
                if s_size == 2 {
                    return -self.temp_min.iter().sum::<i64>();
                }
                Self::negated_sum_of_min(&self.temp_min, &self.dist[s[s_size - 1] as usize])
            }
        }
    }

    fn max_reachable_score(&self) -> i64 {
        self.max_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GraphNegativeGroupFarness {
        let mut g = GraphNegativeGroupFarness::new(Graph::from_edges(&[(0, 1), (1, 2), (0, 2)]));
        g.finalize();
        g.initialize_helping_structures(1);
        g
    }

    #[test]
    fn triangle_singletons() {
        let mut g = triangle();
        // every node sees the two others at distance 1
        for c in 0..3 {
            assert_eq!(g.evaluate_general(&[c], 1), -2);
        }
    }

    #[test]
    fn path4_pairs() {
        let mut g = GraphNegativeGroupFarness::new(Graph::from_edges(&[(0, 1), (1, 2), (2, 3)]));
        g.finalize();
        g.initialize_helping_structures(2);

        // {1, 2} covers everything at distance <= 1
        assert_eq!(g.evaluate_general(&[1, 2], 2), -2);
        // {0, 3} leaves 1 and 2 at distance 1
        assert_eq!(g.evaluate_general(&[0, 3], 2), -2);
        // {0, 1} leaves distances 1 and 2 for nodes 2 and 3
        assert_eq!(g.evaluate_general(&[0, 1], 2), -3);
    }

    #[test]
    fn disconnected_uses_sentinel() {
        let mut g = GraphNegativeGroupFarness::new(Graph::from_edges(&[(0, 1), (2, 3)]));
        g.finalize();
        g.initialize_helping_structures(1);
        // nodes 2 and 3 are n = 4 hops "away" from node 0's component
        assert_eq!(g.evaluate_general(&[0], 1), -(1 + 4 + 4));
    }

    #[test]
    fn specialized_evaluators_match_general() {
        let mut g = GraphNegativeGroupFarness::new(Graph::from_edges(&[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (0, 4),
            (1, 4),
        ]));
        g.finalize();
        g.initialize_helping_structures(3);

        let s = [3, 0, 2];

        let expected1 = g.evaluate_general(&s[..1], 1);
        assert_eq!(g.evaluate_1d(&s[..1], 1), expected1);

        let expected2 = g.evaluate_general(&s[..2], 2);
        assert_eq!(g.evaluate_2d(&s[..2], 2), expected2);
        let expected3 = g.evaluate_general(&s, 3);
        assert_eq!(g.evaluate_xd(&s, 3), expected3);

        g.visit_new_depth(&s[..1], 1);
        assert_eq!(g.evaluate_1d(&s[..2], 2), expected2);
        assert_eq!(g.evaluate_2d(&s, 3), expected3);
        assert_eq!(g.evaluate_xd(&s, 3), expected3);

        g.visit_new_depth(&s[..2], 2);
        assert_eq!(g.evaluate_1d(&s, 3), expected3);

        g.return_from_last_depth();
        g.return_from_last_depth();
        assert_eq!(g.depth(), 0);
    }

    #[test]
    fn monotone_and_diminishing_from_the_empty_set() {
        let mut g = GraphNegativeGroupFarness::new(Graph::from_edges(&[(0, 1), (1, 2), (2, 3)]));
        g.finalize();
        g.initialize_helping_structures(3);

        let f0 = g.evaluate_empty_set();
        let f1 = g.evaluate_general(&[2], 1);
        let f2 = g.evaluate_general(&[2, 0], 2);
        let f3 = g.evaluate_general(&[2, 0, 3], 3);
        assert_eq!(f0, -16);
        assert!(f0 < f1 && f1 < f2 && f2 < f3);

        // the gain of 0 shrinks once 2 is chosen
        let gain_at_empty = g.evaluate_general(&[0], 1) - f0;
        let gain_after = f2 - f1;
        assert!(gain_after <= gain_at_empty);
    }

    #[test]
    fn cap_accounts_for_selected_nodes() {
        let g = triangle();
        assert_eq!(g.max_reachable_score(), -2);
    }
}
