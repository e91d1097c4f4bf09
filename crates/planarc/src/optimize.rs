//! Greedy crossing minimization over an arrangement.
//!
//! Adjacent-swap hill climbing: the underlying problem (minimum-crossing
//! linear arrangement) is NP-hard, so this converges to a local optimum
//! under a hard pass bound, not to a global one.

use crate::arrangement::{Arrangement, Point};

/// What a single [`optimize_sequence`] run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOutcome {
    /// Full left-to-right passes performed.
    pub passes: usize,
    pub initial_crossings: usize,
    pub final_crossings: usize,
    /// `false` when the pass budget ran out while passes were still
    /// improving. Not fatal: the arrangement keeps its best state so far.
    pub converged: bool,
}

/// Reorders the sequence to reduce link crossings.
///
/// Repeatedly scans adjacent positions left to right; each pair is
/// tentatively swapped (rebuilding the position index) and the swap is kept
/// only when the total crossing count strictly decreased. Full passes repeat
/// while any pass improved, bounded by `len()²` passes. Links are addressed
/// by point identity, so the permutation never rebinds them.
pub fn optimize_sequence<P: Point>(arrangement: &mut Arrangement<P>) -> OptimizeOutcome {
    let n = arrangement.len();
    let max_passes = n.saturating_mul(n);
    let initial_crossings = arrangement.crossing_count();

    let mut current = initial_crossings;
    let mut passes = 0;
    let mut improved = true;

    while improved && current > 0 && passes < max_passes {
        improved = false;
        passes += 1;

        for i in 0..n.saturating_sub(1) {
            arrangement.swap_adjacent(i);
            let candidate = arrangement.crossing_count();
            if candidate < current {
                current = candidate;
                improved = true;
            } else {
                arrangement.swap_adjacent(i);
            }
        }
    }

    tracing::debug!(passes, crossings = current, "optimize_sequence finished");

    OptimizeOutcome {
        passes,
        initial_crossings,
        final_crossings: current,
        converged: !improved || current == 0,
    }
}
