use smallvec::SmallVec;

use crate::config::PbfAlgorithm;
use crate::score::Score;
use crate::structures::ElementId;

/// Short per-block candidate lists; blocks rarely exceed a handful of slots.
pub type BlockSet = SmallVec<[ElementId; 4]>;

/// Partitioned-block bound solver.
///
/// Holds, per block `b` and selection count `j`, the best known score
/// improvement `si_s[b][j]` any `j`-subset of the block can reach (an upper
/// bound fed by the caller) plus the subset achieving it. `get_solution`
/// then maximizes `sum_b si_s[b][j_b]` subject to `sum_b j_b = r`, either by
/// enumerating compositions or by a bounded-knapsack DP over the blocks.
#[derive(Debug)]
pub struct PbfSolver<SF: Score> {
    n_blocks: usize,
    max_k: usize,
    algorithm: PbfAlgorithm,
    need_candidates: bool,

    block_len: Vec<usize>,
    si_s: Vec<Vec<SF>>,
    set_s: Vec<Vec<BlockSet>>,

    // brute force scratch
    counter: Vec<usize>,
    best_counter: Vec<usize>,

    // dynamic programming scratch
    dynamic_ready: bool,
    dynamic_arr: Vec<Vec<SF>>,
    dynamic_arr_indices: Vec<Vec<usize>>,
}

impl<SF: Score> PbfSolver<SF> {
    #[must_use]
    pub fn new(algorithm: PbfAlgorithm, need_candidates: bool) -> Self {
        Self {
            n_blocks: 0,
            max_k: 0,
            algorithm,
            need_candidates,
            block_len: Vec::new(),
            si_s: Vec::new(),
            set_s: Vec::new(),
            counter: Vec::new(),
            best_counter: Vec::new(),
            dynamic_ready: false,
            dynamic_arr: Vec::new(),
            dynamic_arr_indices: Vec::new(),
        }
    }

    /// Resets the block tables for a new bound evaluation.
    ///
    /// `block_lens[b]` is how many candidates block `b` actually holds; the
    /// last block of a partition is routinely short.
    pub fn reinitialize(
        &mut self,
        block_lens: &[usize],
        max_k: usize,
        algorithm: PbfAlgorithm,
        need_candidates: bool,
    ) {
        self.n_blocks = block_lens.len();
        self.max_k = max_k;
        self.algorithm = algorithm;
        self.need_candidates = need_candidates;

        self.block_len.clear();
        self.block_len.extend_from_slice(block_lens);

        self.si_s.resize(self.n_blocks, Vec::new());
        self.set_s.resize(self.n_blocks, Vec::new());
        for b in 0..self.n_blocks {
            let slots = block_lens[b] + 1;
            self.si_s[b].clear();
            self.si_s[b].resize(slots, SF::zero());
            self.set_s[b].clear();
            self.set_s[b].resize(slots, BlockSet::new());
        }

        match self.algorithm {
            PbfAlgorithm::BruteForce => {
                self.counter.resize(self.n_blocks, 0);
                self.best_counter.resize(self.n_blocks, 0);
            }
            PbfAlgorithm::Dynamic => {
                self.dynamic_ready = false;
                self.dynamic_arr.resize(self.n_blocks, Vec::new());
                self.dynamic_arr_indices.resize(self.n_blocks, Vec::new());

                let mut capacity = 0usize;
                for b in 0..self.n_blocks {
                    capacity += block_lens[b];
                    let table = capacity.min(max_k) + 1;
                    self.dynamic_arr[b].clear();
                    self.dynamic_arr[b].resize(table, SF::zero());
                    self.dynamic_arr_indices[b].clear();
                    self.dynamic_arr_indices[b].resize(table, 0);
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    #[inline]
    #[must_use]
    pub fn get_si(&self, b: usize, j: usize) -> SF {
        self.si_s[b][j]
    }

    /// Offers a `j`-subset of block `b`; kept when at least as good as the
    /// incumbent entry.
    pub fn add_set(&mut self, b: usize, set: &[ElementId], si: SF) {
        let j = set.len();
        debug_assert!(j <= self.block_len[b]);
        if si >= self.si_s[b][j] {
            self.si_s[b][j] = si;
            self.set_s[b][j].clear();
            self.set_s[b][j].extend_from_slice(set);
        }
    }

    pub fn add_set_1(&mut self, b: usize, e1: ElementId, si: SF) {
        self.add_set(b, &[e1], si);
    }

    pub fn add_set_2(&mut self, b: usize, e1: ElementId, e2: ElementId, si: SF) {
        self.add_set(b, &[e1, e2], si);
    }

    /// Maximizes the block-sum for exactly `r` selected candidates.
    ///
    /// With `need_candidates` the chosen per-block subsets and their entries
    /// land in `res` / `res_si`.
    pub fn get_solution(&mut self, r: usize, res: &mut Vec<BlockSet>, res_si: &mut Vec<SF>) -> SF {
        res.clear();
        res_si.clear();
        if r == 0 {
            return SF::zero();
        }

        match self.algorithm {
            PbfAlgorithm::BruteForce => self.get_bf_solution(r, res, res_si),
            PbfAlgorithm::Dynamic => self.get_dynamic_solution(r, res, res_si),
        }
    }

    fn get_bf_solution(&mut self, r: usize, res: &mut Vec<BlockSet>, res_si: &mut Vec<SF>) -> SF {
        self.counter.iter_mut().for_each(|c| *c = 0);
        let mut best_sum = SF::lowest();

        while Self::next_combination(&mut self.counter, &self.block_len) {
            if self.counter.iter().sum::<usize>() != r {
                // this combination has not the right amount of elements
                continue;
            }

            let mut s = SF::zero();
            for b in 0..self.n_blocks {
                s += self.si_s[b][self.counter[b]];
            }
            if s > best_sum {
                best_sum = s;
                self.best_counter.copy_from_slice(&self.counter);
            }
        }
        debug_assert!(best_sum > SF::lowest());

        if self.need_candidates {
            for b in 0..self.n_blocks {
                let j = self.best_counter[b];
                if j != 0 {
                    res.push(self.set_s[b][j].clone());
                    res_si.push(self.si_s[b][j]);
                }
            }
        }
        best_sum
    }

    /// Odometer step over per-block selection counts `0..=block_len[b]`.
    /// Returns false once every combination has been visited.
    fn next_combination(comb: &mut [usize], caps: &[usize]) -> bool {
        let last = comb.len() - 1;
        comb[last] += 1;
        if comb[last] <= caps[last] {
            return true;
        }

        for i in (1..=last).rev() {
            if comb[i] > caps[i] {
                comb[i] = 0;
                comb[i - 1] += 1;
            } else {
                break;
            }
        }
        comb[0] <= caps[0]
    }

    fn get_dynamic_solution(
        &mut self,
        r: usize,
        res: &mut Vec<BlockSet>,
        res_si: &mut Vec<SF>,
    ) -> SF {
        if !self.dynamic_ready {
            self.populate_dynamic_array();
        }
        debug_assert!(r < self.dynamic_arr[self.n_blocks - 1].len());

        if self.need_candidates {
            let mut remaining = r;
            for b in (0..self.n_blocks).rev() {
                let j = self.dynamic_arr_indices[b][remaining];
                if j > 0 {
                    res.push(self.set_s[b][j].clone());
                    res_si.push(self.si_s[b][j]);
                }
                remaining -= j;
            }
        }

        self.dynamic_arr[self.n_blocks - 1][r]
    }

    fn populate_dynamic_array(&mut self) {
        for j in 0..self.dynamic_arr[0].len() {
            self.dynamic_arr[0][j] = self.si_s[0][j];
            self.dynamic_arr_indices[0][j] = j;
        }

        for b in 1..self.n_blocks {
            for j in 0..self.dynamic_arr[b].len() {
                let mut best = SF::lowest();
                let mut best_l = 0usize;
                for l in 0..=j.min(self.block_len[b]) {
                    if j - l >= self.dynamic_arr[b - 1].len() {
                        // previous blocks cannot carry that many elements
                        continue;
                    }
                    let value = self.si_s[b][l] + self.dynamic_arr[b - 1][j - l];
                    if value >= best {
                        best = value;
                        best_l = l;
                    }
                }
                self.dynamic_arr[b][j] = best;
                self.dynamic_arr_indices[b][j] = best_l;
            }
        }
        self.dynamic_ready = true;
    }
}
