use crate::score::Score;
use crate::structures::ElementId;
use crate::structures::ScoreStructure;

/// Exhaustive size-k enumeration.
///
/// Ground truth for the branch-and-bound search: no bounds, no caches, just
/// `evaluate_general` on every size-k superset of the fixed prefix. Only
/// meant for tests and tiny instances.
pub struct BfTreeSearch<'a, T: ScoreStructure> {
    t: &'a mut T,
    k: usize,

    candidates: Vec<ElementId>,
    s: Vec<ElementId>,
    best_s: Vec<ElementId>,
    best_score: T::SF,
    sf_evaluated: u64,
}

impl<'a, T: ScoreStructure> BfTreeSearch<'a, T> {
    /// `s_part` pins a prefix; `init_candidates` restricts the pool (empty
    /// means the full ground set). Prefix elements never reappear in the
    /// pool.
    #[must_use]
    pub fn new(t: &'a mut T, k: usize, s_part: &[ElementId], init_candidates: &[ElementId]) -> Self {
        let n = t.n();
        debug_assert!(s_part.len() <= k);

        let mut candidates = Vec::with_capacity(n);
        if init_candidates.is_empty() {
            for c in 0..n as ElementId {
                if !s_part.contains(&c) {
                    candidates.push(c);
                }
            }
        } else {
            for &c in init_candidates {
                if !s_part.contains(&c) {
                    candidates.push(c);
                }
            }
        }

        Self {
            t,
            k,
            candidates,
            s: s_part.to_vec(),
            best_s: Vec::new(),
            best_score: T::SF::lowest(),
            sf_evaluated: 0,
        }
    }

    pub fn search(&mut self) -> (T::SF, Vec<ElementId>) {
        self.best_score = T::SF::lowest();
        self.best_s.clear();
        self.recursive_search(0);
        (self.best_score, self.best_s.clone())
    }

    #[must_use]
    pub fn sf_evaluated(&self) -> u64 {
        self.sf_evaluated
    }

    fn recursive_search(&mut self, from: usize) {
        if self.s.len() == self.k {
            self.sf_evaluated += 1;
            let score = self.t.evaluate_general(&self.s, self.k);
            if score > self.best_score {
                self.best_score = score;
                self.best_s.clear();
                self.best_s.extend_from_slice(&self.s);
            }
            return;
        }

        for idx in from..self.candidates.len() {
            self.s.push(self.candidates[idx]);
            self.recursive_search(idx + 1);
            self.s.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::structures::dominating_set::GraphPartialDominatingSet;
    use crate::structures::graph::Graph;

    #[test]
    fn finds_the_path4_optimum() {
        let mut g = GraphPartialDominatingSet::new(Graph::from_edges(&[(0, 1), (1, 2), (2, 3)]));
        g.finalize();
        g.initialize_helping_structures(2);

        let (score, set) = BfTreeSearch::new(&mut g, 2, &[], &[]).search();
        assert_eq!(score, 4);
        assert_eq!(set, vec![1, 2]);
    }

    #[test]
    fn evaluates_every_subset_once() {
        let mut g = GraphPartialDominatingSet::new(Graph::from_edges(&[(0, 1), (1, 2), (2, 3)]));
        g.finalize();
        g.initialize_helping_structures(2);

        let mut bf = BfTreeSearch::new(&mut g, 2, &[], &[]);
        bf.search();
        // 4 choose 2
        assert_eq!(bf.sf_evaluated(), 6);
    }

    #[test]
    fn agrees_with_direct_subset_enumeration() {
        let mut g = GraphPartialDominatingSet::new(Graph::from_edges(&[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 0),
            (1, 4),
        ]));
        g.finalize();
        g.initialize_helping_structures(2);

        let best_by_hand = (0..5u32)
            .combinations(2)
            .map(|s| g.evaluate_general(&s, 2))
            .max()
            .unwrap();

        let (score, _) = BfTreeSearch::new(&mut g, 2, &[], &[]).search();
        assert_eq!(score, best_by_hand);
    }

    #[test]
    fn respects_a_fixed_prefix() {
        let mut g = GraphPartialDominatingSet::new(Graph::from_edges(&[(0, 1), (1, 2), (2, 3)]));
        g.finalize();
        g.initialize_helping_structures(2);

        let (score, set) = BfTreeSearch::new(&mut g, 2, &[0], &[]).search();
        assert_eq!(set[0], 0);
        assert_eq!(score, 4);
        assert_eq!(set, vec![0, 2]);
    }
}
