//! Greedy nearest-neighbor ordering for smooth gradients.
//!
//! Starting from a random candidate, repeatedly appends the remaining
//! candidate closest in LAB to the last one placed. The result is a
//! Hamiltonian path, not a tour, and only locally optimal.

use crate::color::{nearest, Lab};
use crate::prng::UniformSource;

/// Orders `candidates` into a nearest-neighbor chain.
///
/// Candidates move from a `remaining` pool into the output one at a time.
/// Ties go to the candidate that came first in the input. Draws exactly one
/// value from `rng` for a non-empty input and none for an empty one.
pub fn order_path(candidates: Vec<Lab>, rng: &mut dyn UniformSource) -> Vec<Lab> {
    if candidates.is_empty() {
        return candidates;
    }
    let mut remaining = candidates;
    let mut ordered = Vec::with_capacity(remaining.len());
    let start = rng.next_index(remaining.len());
    ordered.push(remaining.remove(start));

    while let Some(&last) = ordered.last() {
        let Some(next) = nearest(&remaining, &last) else {
            break;
        };
        ordered.push(remaining.remove(next));
    }
    ordered
}

/// Sum of LAB distances between consecutive points.
pub fn path_length(points: &[Lab]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
