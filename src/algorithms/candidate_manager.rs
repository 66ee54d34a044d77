use std::cmp::Ordering;

use crate::heap_primitives::heap_child_left;
use crate::heap_primitives::heap_child_right;
use crate::heap_primitives::heap_parent;
use crate::heap_primitives::mirrored_index;
use crate::score::Score;
use crate::structures::ElementId;

/// A candidate together with its (possibly approximate) marginal gain.
///
/// `accurate` means the gain equals the true marginal at the current prefix;
/// otherwise the gain is only an upper bound on it.
#[derive(Copy, Clone, Debug)]
pub struct CandidateEntry<SF: Score> {
    pub candidate: ElementId,
    pub score_improvement: SF,
    pub accurate: bool,
}

impl<SF: Score> CandidateEntry<SF> {
    /// Ranking used everywhere: larger gain first, ties to the smaller id.
    #[inline(always)]
    #[must_use]
    fn outranks(&self, other: &Self) -> bool {
        self.score_improvement > other.score_improvement
            || (self.score_improvement == other.score_improvement
                && self.candidate < other.candidate)
    }

    #[inline(always)]
    #[must_use]
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score_improvement
            .cmp(&self.score_improvement)
            .then(self.candidate.cmp(&other.candidate))
    }
}

/// Per-depth store of candidates and their marginal gains.
///
/// One backing array, three contiguous regions:
///
/// ```text
///   [0, offset)            consumed: already descended into
///   [offset, n_sorted)     sorted-accurate: refined, waiting their turn
///   [size - heap_size, size)   max-heap of unrefined gains, root at the END
/// ```
///
/// The heap is mirrored into the tail so a popped root lands in the slot
/// right after the sorted region without moving anything else. `csum_si[i]`
/// carries the cumulative gain of the first `i` sorted entries, which makes
/// the partial-sum bounds O(1).
///
/// A separate fixed-capacity min-heap (`sub_heap`) tracks the r largest gains
/// ever offered to it along with their running sum.
#[derive(Debug)]
pub struct CandidateManager<SF: Score> {
    candidates: Vec<CandidateEntry<SF>>,
    csum_si: Vec<SF>,

    offset: usize,
    size: usize,
    max_size: usize,

    heap_size: usize,
    n_sorted_candidates: usize,

    sub_heap: Vec<CandidateEntry<SF>>,
    sub_heap_size: usize,
    sub_heap_max_size: usize,
    sub_heap_sum: SF,
}

impl<SF: Score> CandidateManager<SF> {
    #[must_use]
    pub fn new(n: usize) -> Self {
        let zero_entry = CandidateEntry {
            candidate: 0,
            score_improvement: SF::zero(),
            accurate: false,
        };
        Self {
            candidates: vec![zero_entry; n],
            csum_si: vec![SF::zero(); n + 1],
            offset: 0,
            size: 0,
            max_size: n,
            heap_size: 0,
            n_sorted_candidates: 0,
            sub_heap: Vec::new(),
            sub_heap_size: 0,
            sub_heap_max_size: 0,
            sub_heap_sum: SF::zero(),
        }
    }

    pub fn reinitialize(&mut self, n: usize) {
        let zero_entry = CandidateEntry {
            candidate: 0,
            score_improvement: SF::zero(),
            accurate: false,
        };
        self.candidates.resize(n, zero_entry);
        self.csum_si.resize(n + 1, SF::zero());
        self.offset = 0;
        self.size = 0;
        self.max_size = n;
        self.heap_size = 0;
        self.n_sorted_candidates = 0;
        self.sub_heap_size = 0;
        self.sub_heap_max_size = 0;
        self.sub_heap_sum = SF::zero();
    }

    /// Resets the manager for a fresh depth visit with a size-`r` sub-heap.
    pub fn clear(&mut self, r: usize) {
        let zero_entry = CandidateEntry {
            candidate: 0,
            score_improvement: SF::zero(),
            accurate: false,
        };
        self.sub_heap.resize(r, zero_entry);
        self.sub_heap_size = 0;
        self.sub_heap_max_size = r;
        self.sub_heap_sum = SF::zero();
        self.size = 0;
    }

    /// Populates with candidates `0..n`, zero gains, all inaccurate.
    pub fn fill_candidates(&mut self, n: usize) {
        debug_assert!(n <= self.max_size);
        for (i, entry) in self.candidates[..n].iter_mut().enumerate() {
            entry.candidate = i as ElementId;
            entry.score_improvement = SF::zero();
            entry.accurate = false;
        }
        self.offset = 0;
        self.size = n;
        self.heap_size = 0;
        self.n_sorted_candidates = 0;
    }

    /// Copies the parent's unvisited candidates into this manager's heap,
    /// carrying their gains as stale upper bounds.
    ///
    /// The sub-heap (if armed via [`clear`](Self::clear)) sees every copied
    /// gain, so its sum is the top-r bound total right after the fill.
    pub fn fill_from(&mut self, parent: &CandidateManager<SF>) {
        let m = (parent.n_sorted_candidates - parent.offset) + parent.heap_size;
        self.prepare_candidate_heap(m);

        for i in parent.offset..parent.n_sorted_candidates {
            let e = &parent.candidates[i];
            self.add_to_candidate_heap(e.candidate, e.score_improvement);
            self.sub_heap_add(e.candidate, e.score_improvement);
        }
        for i in parent.size - parent.heap_size..parent.size {
            let e = &parent.candidates[i];
            self.add_to_candidate_heap(e.candidate, e.score_improvement);
            self.sub_heap_add(e.candidate, e.score_improvement);
        }
        self.heapify_candidate_heap();
    }

    // Accessors
    // ---------

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    #[inline(always)]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
    #[inline(always)]
    #[must_use]
    pub fn n_sorted(&self) -> usize {
        self.n_sorted_candidates
    }
    #[inline(always)]
    #[must_use]
    pub fn heap_len(&self) -> usize {
        self.heap_size
    }
    /// Candidates not yet consumed by a descent.
    #[inline(always)]
    #[must_use]
    pub fn unvisited(&self) -> usize {
        (self.n_sorted_candidates - self.offset) + self.heap_size
    }

    #[inline(always)]
    #[must_use]
    pub fn get_entry(&self, idx: usize) -> CandidateEntry<SF> {
        self.candidates[idx]
    }
    #[inline(always)]
    #[must_use]
    pub fn get_c(&self, idx: usize) -> ElementId {
        self.candidates[idx].candidate
    }
    #[inline(always)]
    #[must_use]
    pub fn get_si(&self, idx: usize) -> SF {
        self.candidates[idx].score_improvement
    }
    #[inline(always)]
    #[must_use]
    pub fn get_acc(&self, idx: usize) -> bool {
        self.candidates[idx].accurate
    }

    /// Consumes the sorted entry at `offset` for a descent.
    pub fn consume_sorted_front(&mut self) -> CandidateEntry<SF> {
        debug_assert!(self.offset < self.n_sorted_candidates);
        let e = self.candidates[self.offset];
        self.offset += 1;
        e
    }

    // Candidate heap
    // --------------

    /// Starts a fresh heap over `m` slots.
    pub fn prepare_candidate_heap(&mut self, m: usize) {
        debug_assert!(m <= self.max_size);
        self.size = m;
        self.offset = 0;
        self.heap_size = 0;
        self.n_sorted_candidates = 0;
        self.csum_si[0] = SF::zero();
    }

    /// Bulk append without restoring heap order; pair with
    /// [`heapify_candidate_heap`](Self::heapify_candidate_heap), or append in
    /// descending gain order.
    pub fn add_to_candidate_heap(&mut self, c: ElementId, si: SF) {
        let slot = self.size - 1 - self.heap_size;
        self.candidates[slot] = CandidateEntry {
            candidate: c,
            score_improvement: si,
            accurate: false,
        };
        self.heap_size += 1;
    }

    /// Bulk append of a gain already known to be exact.
    pub fn add_accurate_to_candidate_heap(&mut self, c: ElementId, si: SF) {
        let slot = self.size - 1 - self.heap_size;
        self.candidates[slot] = CandidateEntry {
            candidate: c,
            score_improvement: si,
            accurate: true,
        };
        self.heap_size += 1;
    }

    /// Restores heap order after bulk appends.
    pub fn heapify_candidate_heap(&mut self) {
        if self.heap_size < 2 {
            return;
        }
        for p in (0..self.heap_size / 2).rev() {
            self.drop_down(p);
        }
        self.verify_candidate_heap();
    }

    /// Append and sift up.
    pub fn push_to_candidate_heap(&mut self, c: ElementId, si: SF) {
        self.add_to_candidate_heap(c, si);
        self.bubble_up(self.heap_size - 1);
        self.verify_candidate_heap();
    }

    #[inline(always)]
    #[must_use]
    pub fn candidate_heap_is_empty(&self) -> bool {
        self.heap_size == 0
    }

    #[inline(always)]
    #[must_use]
    pub fn top_candidate_heap_is_accurate(&self) -> bool {
        self.candidates[self.size - 1].accurate
    }
    #[inline(always)]
    #[must_use]
    pub fn top_candidate_heap_get_c(&self) -> ElementId {
        self.candidates[self.size - 1].candidate
    }
    #[inline(always)]
    #[must_use]
    pub fn top_candidate_heap_get_si(&self) -> SF {
        self.candidates[self.size - 1].score_improvement
    }

    /// The root's gain was refined to the true marginal; mark it accurate and
    /// restore heap order. Refinement lowers gains (up to float noise), so
    /// sifting down is all the fixing the heap needs.
    pub fn top_candidate_heap_update(&mut self, si: SF) {
        self.candidates[self.size - 1].score_improvement = si;
        self.candidates[self.size - 1].accurate = true;
        self.drop_down(0);
        self.verify_candidate_heap();
    }

    /// Pops the root into the sorted-accurate region and extends `csum_si`.
    ///
    /// Works by sinking a sentinel through the heap so the root's entry ends
    /// on a leaf, then swapping it into the slot adjacent to the sorted
    /// region. Correct descending order comes for free from popping maxima.
    pub fn top_candidate_heap_remove(&mut self) {
        debug_assert!(self.heap_size > 0);
        debug_assert!(self.candidates[self.size - 1].accurate);
        debug_assert_eq!(self.n_sorted_candidates, self.size - self.heap_size);

        self.n_sorted_candidates += 1;
        if self.heap_size == 1 {
            self.heap_size = 0;
            self.csum_si[self.size] =
                self.csum_si[self.size - 1] + self.candidates[self.size - 1].score_improvement;
            return;
        }

        let si_temp = self.candidates[self.size - 1].score_improvement;
        self.candidates[self.size - 1].score_improvement = SF::lowest();
        let p = self.drop_down(0);

        let boundary = self.size - self.heap_size;
        let sunk = mirrored_index(self.size, p);
        self.candidates.swap(boundary, sunk);
        self.candidates[boundary].score_improvement = si_temp;

        self.heap_size -= 1;
        let sorted_end = self.size - self.heap_size;
        self.csum_si[sorted_end] = self.csum_si[sorted_end - 1] + si_temp;

        if p < self.heap_size {
            self.bubble_up(p);
        }
        self.verify_candidate_heap();
    }

    /// Pops the root straight into the consumed region; used when the root
    /// was chosen for a descent without going through the sorted prefix.
    pub fn place_top_candidate_heap_away(&mut self) -> CandidateEntry<SF> {
        debug_assert!(self.heap_size > 0);
        debug_assert_eq!(self.n_sorted_candidates, self.size - self.heap_size);

        let root = self.candidates[self.size - 1];
        let boundary = self.size - self.heap_size;
        self.candidates[self.size - 1] = self.candidates[boundary];
        self.heap_size -= 1;
        if self.heap_size > 0 {
            self.drop_down(0);
        }

        self.candidates[boundary] = root;
        self.csum_si[self.n_sorted_candidates + 1] =
            self.csum_si[self.n_sorted_candidates] + root.score_improvement;
        self.n_sorted_candidates += 1;
        self.offset = self.n_sorted_candidates;

        self.verify_candidate_heap();
        root
    }

    /// Sorts whatever is left in the heap into the sorted region in one go
    /// and extends `csum_si` over it.
    ///
    /// Only sound as a bound source while no entry has been removed one by
    /// one (the stale gains are not comparable to refined ones).
    pub fn candidate_heap_sort_remaining(&mut self) {
        if self.heap_size == 0 {
            return;
        }
        debug_assert_eq!(self.n_sorted_candidates, self.size - self.heap_size);

        let start = self.size - self.heap_size;
        self.candidates[start..self.size].sort_by(CandidateEntry::rank_cmp);

        for i in start..self.size {
            self.csum_si[i + 1] = self.csum_si[i] + self.candidates[i].score_improvement;
        }
        self.n_sorted_candidates = self.size;
        self.heap_size = 0;
    }

    // Prefix sums over the sorted region
    // ----------------------------------

    /// Sum of the gains of `count` sorted entries starting at `start_idx`.
    #[inline(always)]
    #[must_use]
    pub fn get_partial_sum(&self, start_idx: usize, count: usize) -> SF {
        debug_assert!(start_idx + count <= self.n_sorted_candidates);
        self.csum_si[start_idx + count] - self.csum_si[start_idx]
    }

    /// Sum of the smallest `r` gains among the sorted entries.
    #[must_use]
    pub fn get_sum_last_r_sorted(&self, r: usize) -> SF {
        let r = r.min(self.n_sorted_candidates);
        self.get_partial_sum(self.n_sorted_candidates - r, r)
    }

    // SUB heap: the r largest gains seen, as a min-heap with a running sum
    // --------------------------------------------------------------------

    /// Offers a gain; kept only while it is among the r largest so far.
    pub fn sub_heap_add(&mut self, c: ElementId, si: SF) {
        if self.sub_heap_max_size == 0 {
            return;
        }
        if self.sub_heap_size < self.sub_heap_max_size {
            self.sub_heap[self.sub_heap_size] = CandidateEntry {
                candidate: c,
                score_improvement: si,
                accurate: false,
            };
            self.sub_heap_sum += si;
            self.sub_heap_size += 1;
            self.sub_heap_sift_up(self.sub_heap_size - 1);
            return;
        }

        if si > self.sub_heap[0].score_improvement {
            self.sub_heap_sum += si - self.sub_heap[0].score_improvement;
            self.sub_heap[0] = CandidateEntry {
                candidate: c,
                score_improvement: si,
                accurate: false,
            };
            self.sub_heap_sift_down(0);
        }
    }

    /// Index of a candidate in the sub-heap, by linear scan.
    #[must_use]
    pub fn sub_heap_find(&self, c: ElementId) -> Option<usize> {
        self.sub_heap[..self.sub_heap_size]
            .iter()
            .position(|e| e.candidate == c)
    }

    /// Replaces a gain in place, keeping order and sum intact.
    pub fn sub_heap_update(&mut self, idx: usize, si: SF) {
        debug_assert!(idx < self.sub_heap_size);
        let old = self.sub_heap[idx].score_improvement;
        self.sub_heap_sum += si - old;
        self.sub_heap[idx].score_improvement = si;
        if si < old {
            self.sub_heap_sift_up(idx);
        } else {
            self.sub_heap_sift_down(idx);
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn sub_heap_min(&self) -> SF {
        self.sub_heap[0].score_improvement
    }
    #[inline(always)]
    #[must_use]
    pub fn sub_heap_sum(&self) -> SF {
        self.sub_heap_sum
    }
    #[inline(always)]
    #[must_use]
    pub fn sub_heap_len(&self) -> usize {
        self.sub_heap_size
    }

    fn sub_heap_sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = heap_parent(i);
            if self.sub_heap[i].score_improvement < self.sub_heap[parent].score_improvement {
                self.sub_heap.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sub_heap_sift_down(&mut self, mut i: usize) {
        loop {
            let l = heap_child_left(i);
            if l >= self.sub_heap_size {
                return;
            }
            let r = heap_child_right(i);
            let mut smallest = l;
            if r < self.sub_heap_size
                && self.sub_heap[r].score_improvement < self.sub_heap[l].score_improvement
            {
                smallest = r;
            }
            if self.sub_heap[smallest].score_improvement < self.sub_heap[i].score_improvement {
                self.sub_heap.swap(i, smallest);
                i = smallest;
            } else {
                return;
            }
        }
    }

    // Mirrored heap internals
    // -----------------------

    #[inline(always)]
    fn heap_entry(&self, p: usize) -> &CandidateEntry<SF> {
        &self.candidates[mirrored_index(self.size, p)]
    }

    /// Lowers heap position `p` until both children stop outranking it.
    /// Returns the final position.
    fn drop_down(&mut self, mut p: usize) -> usize {
        loop {
            let l = heap_child_left(p);
            if l >= self.heap_size {
                return p;
            }
            let r = heap_child_right(p);

            let mut best = l;
            if r < self.heap_size && self.heap_entry(r).outranks(self.heap_entry(l)) {
                best = r;
            }
            if !self.heap_entry(best).outranks(self.heap_entry(p)) {
                return p;
            }

            self.candidates
                .swap(mirrored_index(self.size, p), mirrored_index(self.size, best));
            p = best;
        }
    }

    /// Raises heap position `p` while it outranks its parent.
    /// Returns the final position.
    fn bubble_up(&mut self, mut p: usize) -> usize {
        while p > 0 {
            let parent = heap_parent(p);
            if !self.heap_entry(p).outranks(self.heap_entry(parent)) {
                return p;
            }
            self.candidates.swap(
                mirrored_index(self.size, p),
                mirrored_index(self.size, parent),
            );
            p = parent;
        }
        p
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_candidate_heap(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_candidate_heap(&self) {
        assert!(self.is_valid_heap(0));
        for i in self.offset + 1..self.n_sorted_candidates {
            assert!(
                !self.candidates[i].outranks(&self.candidates[i - 1]),
                "sorted region out of order at {i}"
            );
        }
    }

    /// Whether the subtree rooted at heap position `p` satisfies heap order.
    #[must_use]
    pub fn is_valid_heap(&self, p: usize) -> bool {
        if self.heap_size == 0 {
            return true;
        }

        let mut valid = true;
        let l = heap_child_left(p);
        if l < self.heap_size {
            valid &= !self.heap_entry(l).outranks(self.heap_entry(p)) && self.is_valid_heap(l);
        }
        let r = heap_child_right(p);
        if r < self.heap_size {
            valid &= !self.heap_entry(r).outranks(self.heap_entry(p)) && self.is_valid_heap(r);
        }
        valid
    }
}
