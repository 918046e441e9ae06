//! Rejection-sampled seeding of the candidate set.

use crate::bounds::HclBounds;
use crate::color::Lab;
use crate::error::PaletteError;
use crate::prng::UniformSource;

/// Draws allowed per slot before the bounds are declared unsatisfiable.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Draws one LAB point uniformly from L in [0, 100], a and b in [-100, 100].
fn random_lab(rng: &mut dyn UniformSource) -> Lab {
    Lab {
        l: 100.0 * rng.next_f64(),
        a: 100.0 * (2.0 * rng.next_f64() - 1.0),
        b: 100.0 * (2.0 * rng.next_f64() - 1.0),
    }
}

/// Fills `count` slots with admissible random LAB points.
///
/// Each slot is rejection-sampled independently. Returns
/// [`PaletteError::Configuration`] as soon as one slot exhausts `max_attempts`.
pub fn seed_candidates(
    count: usize,
    bounds: &HclBounds,
    rng: &mut dyn UniformSource,
    max_attempts: usize,
) -> Result<Vec<Lab>, PaletteError> {
    let mut candidates = Vec::with_capacity(count);
    let mut total_attempts = 0usize;
    for _ in 0..count {
        let (lab, attempts) = (1..=max_attempts)
            .map(|attempt| (random_lab(rng), attempt))
            .find(|(lab, _)| bounds.admits(*lab))
            .ok_or(PaletteError::Configuration {
                attempts: max_attempts,
            })?;
        total_attempts += attempts;
        candidates.push(lab);
    }
    tracing::debug!(count, total_attempts, "seeded candidates");
    Ok(candidates)
}
