//! Implementation of score structures.
//!
//! A structure owns an instance (a graph or a point cloud) together with the
//! per-depth scratch that makes score-function evaluation cheap along the
//! search's current prefix. The tree search only ever talks to the
//! [`ScoreStructure`] trait.

use crate::score::Score;

pub mod data_points;
pub mod dominating_set;
pub mod graph;
pub mod group_farness;
pub mod k_medoid;

/// Ground-set elements are dense ids in `[0, n)`.
pub type ElementId = u32;

/// The capability contract every objective satisfies.
///
/// The search appends elements to its prefix on descent and truncates on
/// backtrack; [`visit_new_depth`](ScoreStructure::visit_new_depth) and
/// [`return_from_last_depth`](ScoreStructure::return_from_last_depth) mirror
/// exactly those two moves so the structure can keep rolling state per depth.
/// The specialized evaluators assume the depth cursor lags the set size by
/// the stated amount; `evaluate_general` must be correct for any set.
pub trait ScoreStructure {
    /// The numeric type scores of this objective live in.
    type SF: Score;

    /// Ground set cardinality.
    #[must_use]
    fn n(&self) -> usize;

    /// One-shot post-construction cleanup.
    fn finalize(&mut self);

    /// Allocates per-depth scratch for searches down to depth `k`.
    fn initialize_helping_structures(&mut self, k: usize);

    /// The search descended; `s[..s_size]` is the new prefix.
    fn visit_new_depth(&mut self, s: &[ElementId], s_size: usize);

    /// The search backtracked; undoes exactly one `visit_new_depth`.
    fn return_from_last_depth(&mut self);

    /// Where the depth cursor currently sits.
    #[must_use]
    fn depth(&self) -> usize;

    #[must_use]
    fn evaluate_empty_set(&mut self) -> Self::SF;

    /// `f(s)` assuming the depth cursor is at `s_size - 1`.
    #[must_use]
    fn evaluate_1d(&mut self, s: &[ElementId], s_size: usize) -> Self::SF;

    /// `f(s)` assuming the depth cursor is at `s_size - 2`.
    #[must_use]
    fn evaluate_2d(&mut self, s: &[ElementId], s_size: usize) -> Self::SF;

    /// `f(s)` using the rolling state at the current depth cursor, however
    /// far behind `s_size` it sits.
    #[must_use]
    fn evaluate_xd(&mut self, s: &[ElementId], s_size: usize) -> Self::SF;

    /// `f(s)` for any set, independent of the depth cursor.
    #[must_use]
    fn evaluate_general(&mut self, s: &[ElementId], s_size: usize) -> Self::SF;

    /// An absolute cap on `f`; reaching it ends the search early.
    #[must_use]
    fn max_reachable_score(&self) -> Self::SF;
}
