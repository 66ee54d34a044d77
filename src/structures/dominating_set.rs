use std::path::Path;

use log::debug;

use crate::error::SearchError;
use crate::structures::ElementId;
use crate::structures::ScoreStructure;
use crate::structures::graph::Graph;

/// Partial dominating set on a graph.
///
/// `f(S) = |N[S]|`, the number of nodes inside the closed neighbourhood of
/// `S`. Each depth keeps a coverage bitmap and its population count, so the
/// marginal of a candidate is just its not-yet-covered closed neighbours.
#[derive(Debug)]
pub struct GraphPartialDominatingSet {
    graph: Graph,

    depth: usize,
    covered: Vec<Vec<u8>>,
    n_covered: Vec<i64>,
    temp_covered: Vec<u8>,
}

impl GraphPartialDominatingSet {
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            depth: 0,
            covered: Vec::new(),
            n_covered: Vec::new(),
            temp_covered: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SearchError> {
        Ok(Self::new(Graph::from_path(path)?))
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Marks `N[c]` in `bitmap`, returning how many nodes were new.
    fn mark_closed_neighbourhood(graph: &Graph, bitmap: &mut [u8], c: ElementId) -> i64 {
        let mut newly = 0i64;
        if bitmap[c as usize] == 0 {
            bitmap[c as usize] = 1;
            newly += 1;
        }
        for &u in graph.neighbours(c) {
            if bitmap[u as usize] == 0 {
                bitmap[u as usize] = 1;
                newly += 1;
            }
        }
        newly
    }
}

impl ScoreStructure for GraphPartialDominatingSet {
    type SF = i64;

    fn n(&self) -> usize {
        self.graph.n()
    }

    fn finalize(&mut self) {
        self.graph.sort_unique_neighbours();
        self.temp_covered = vec![0u8; self.graph.n()];
        debug!(
            "dominating set: {} nodes, {} edges",
            self.graph.n(),
            self.graph.n_edges()
        );
    }

    fn initialize_helping_structures(&mut self, k: usize) {
        let n = self.graph.n();
        self.covered = vec![vec![0u8; n]; k + 1];
        self.n_covered = vec![0i64; k + 1];
        self.depth = 0;
    }

    fn visit_new_depth(&mut self, s: &[ElementId], s_size: usize) {
        self.depth += 1;
        debug_assert_eq!(self.depth, s_size);

        let c = s[s_size - 1];
        let (prev, cur) = self.covered.split_at_mut(self.depth);
        cur[0].copy_from_slice(&prev[self.depth - 1]);
        let newly = Self::mark_closed_neighbourhood(&self.graph, &mut cur[0], c);
        self.n_covered[self.depth] = self.n_covered[self.depth - 1] + newly;
    }

    fn return_from_last_depth(&mut self) {
        self.depth -= 1;
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn evaluate_empty_set(&mut self) -> i64 {
        0
    }

    fn evaluate_1d(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        let c = s[s_size - 1];
        let bitmap = &self.covered[self.depth];

        let mut newly = 0i64;
        if bitmap[c as usize] == 0 {
            newly += 1;
        }
        for &u in self.graph.neighbours(c) {
            if bitmap[u as usize] == 0 {
                newly += 1;
            }
        }
        self.n_covered[self.depth] + newly
    }

    fn evaluate_2d(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        self.evaluate_xd(s, s_size)
    }

    fn evaluate_xd(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        let n_new = s_size - self.depth;
        debug_assert!(n_new >= 1);
        if n_new == 1 {
            return self.evaluate_1d(s, s_size);
        }

        self.temp_covered.copy_from_slice(&self.covered[self.depth]);
        let mut count = self.n_covered[self.depth];
        for &c in &s[self.depth..s_size] {
            count += Self::mark_closed_neighbourhood(&self.graph, &mut self.temp_covered, c);
        }
        count
    }

    fn evaluate_general(&mut self, s: &[ElementId], s_size: usize) -> i64 {
        self.temp_covered.fill(0);
        let mut count = 0i64;
        for &c in &s[..s_size] {
            count += Self::mark_closed_neighbourhood(&self.graph, &mut self.temp_covered, c);
        }
        count
    }

    fn max_reachable_score(&self) -> i64 {
        self.graph.n() as i64
    }
}
