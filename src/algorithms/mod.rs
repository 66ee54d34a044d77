//! Implementation of the subset search machinery.
//!
//! The iterative branch-and-bound driver and its collaborators: the
//! per-depth candidate store, the score-improvement cache, the
//! partitioned-block bound solver, and the exhaustive reference search the
//! tests measure everything against.

pub mod brute_force;
pub mod candidate_manager;
pub mod pbf;
pub mod si_cache;
pub mod tree_search;
