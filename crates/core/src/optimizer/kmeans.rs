//! k-means over a discretized grid of admissible LAB samples.
//!
//! The admissible region is sampled on a fixed grid (L every 5 units, a and b
//! every 10). Each iteration assigns every sample to its nearest candidate and
//! moves the candidate to the mean of its samples. A mean that falls outside
//! the region is replaced by the nearest sample not yet used as a substitute
//! in this iteration, or by the nearest sample overall once that pool is empty.

use super::{Diagnostics, Optimizer};
use crate::bounds::HclBounds;
use crate::color::{nearest, Lab};
use crate::params::param_usize;
use crate::prng::UniformSource;
use serde_json::{json, Value};

/// Default number of assign/recenter iterations.
const DEFAULT_ITERATIONS: usize = 50;
/// Default grid spacing along L.
const DEFAULT_LIGHTNESS_STEP: usize = 5;
/// Default grid spacing along a and b.
const DEFAULT_AB_STEP: usize = 10;

/// k-means optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    pub iterations: usize,
    /// Grid spacing along L over [0, 100]. Zero is treated as 1.
    pub lightness_step: usize,
    /// Grid spacing along a and b over [-100, 100]. Zero is treated as 1.
    pub ab_step: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            lightness_step: DEFAULT_LIGHTNESS_STEP,
            ab_step: DEFAULT_AB_STEP,
        }
    }
}

impl KMeans {
    /// Reads `iterations`, `lightness_step` and `ab_step`, defaulting any that are missing.
    /// Grid steps below 1 are raised to 1.
    pub fn from_json(params: &Value) -> Self {
        Self {
            iterations: param_usize(params, "iterations", DEFAULT_ITERATIONS),
            lightness_step: param_usize(params, "lightness_step", DEFAULT_LIGHTNESS_STEP).max(1),
            ab_step: param_usize(params, "ab_step", DEFAULT_AB_STEP).max(1),
        }
    }

    /// Admissible grid points in L-major, then a, then b order.
    pub fn sample_grid(&self, bounds: &HclBounds) -> Vec<Lab> {
        let l_step = self.lightness_step.max(1);
        let ab_step = self.ab_step.max(1);
        let mut samples = Vec::new();
        for l in (0..=100i32).step_by(l_step) {
            for a in (-100..=100i32).step_by(ab_step) {
                for b in (-100..=100i32).step_by(ab_step) {
                    let lab = Lab::new(f64::from(l), f64::from(a), f64::from(b));
                    if bounds.admits(lab) {
                        samples.push(lab);
                    }
                }
            }
        }
        samples
    }
}

/// Mean of the samples assigned to `cluster`, or `None` if it has none.
fn cluster_mean(samples: &[Lab], assignment: &[usize], cluster: usize) -> Option<Lab> {
    let (sum, count) = samples
        .iter()
        .zip(assignment)
        .filter(|(_, &owner)| owner == cluster)
        .fold((Lab::default(), 0usize), |(sum, count), (s, _)| {
            (sum + *s, count + 1)
        });
    (count > 0).then(|| sum / count as f64)
}

/// Moves `candidate` to `centroid`, or to the nearest admissible stand-in.
///
/// A stand-in drawn from `free` is removed from it, so two candidates never
/// share a substitute within one iteration. Once `free` is empty the nearest
/// of all `samples` is used and duplicates are possible.
fn recenter(
    candidate: &mut Lab,
    centroid: Lab,
    bounds: &HclBounds,
    free: &mut Vec<Lab>,
    samples: &[Lab],
    diagnostics: &mut Diagnostics,
) {
    if bounds.admits(centroid) {
        *candidate = centroid;
    } else if let Some(k) = nearest(free, &centroid) {
        *candidate = free.remove(k);
        diagnostics.centroid_substitutions += 1;
    } else if let Some(k) = nearest(samples, &centroid) {
        *candidate = samples[k];
        diagnostics.centroid_fallbacks += 1;
    }
}

impl Optimizer for KMeans {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn optimize(
        &self,
        candidates: &mut [Lab],
        bounds: &HclBounds,
        _rng: &mut dyn UniformSource,
    ) -> Diagnostics {
        let samples = self.sample_grid(bounds);
        let mut diagnostics = Diagnostics {
            samples: samples.len(),
            ..Diagnostics::default()
        };
        if samples.is_empty() {
            tracing::warn!("k-means has no admissible grid samples; candidates left as seeded");
            return diagnostics;
        }
        if candidates.is_empty() {
            return diagnostics;
        }

        let mut assignment = vec![0usize; samples.len()];
        for _ in 0..self.iterations {
            let mut free = samples.clone();
            for (owner, sample) in assignment.iter_mut().zip(&samples) {
                // candidates is non-empty, so nearest always finds one.
                *owner = nearest(candidates, sample).unwrap_or(0);
            }

            for (j, candidate) in candidates.iter_mut().enumerate() {
                let Some(centroid) = cluster_mean(&samples, &assignment, j) else {
                    diagnostics.empty_clusters += 1;
                    continue;
                };
                recenter(candidate, centroid, bounds, &mut free, &samples, &mut diagnostics);
            }
        }

        if diagnostics.centroid_substitutions + diagnostics.centroid_fallbacks > 0 {
            tracing::warn!(
                substitutions = diagnostics.centroid_substitutions,
                fallbacks = diagnostics.centroid_fallbacks,
                "k-means centroids left the admissible region; bounds may be poorly conditioned"
            );
        }
        tracing::debug!(
            iterations = self.iterations,
            samples = diagnostics.samples,
            empty_clusters = diagnostics.empty_clusters,
            "k-means finished"
        );
        diagnostics
    }

    fn params(&self) -> Value {
        json!({
            "iterations": self.iterations,
            "lightness_step": self.lightness_step,
            "ab_step": self.ab_step,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "iterations": {
                "type": "integer",
                "default": DEFAULT_ITERATIONS,
                "min": 0,
                "description": "Number of assign/recenter iterations"
            },
            "lightness_step": {
                "type": "integer",
                "default": DEFAULT_LIGHTNESS_STEP,
                "min": 1,
                "max": 100,
                "description": "Sample grid spacing along L"
            },
            "ab_step": {
                "type": "integer",
                "default": DEFAULT_AB_STEP,
                "min": 1,
                "max": 200,
                "description": "Sample grid spacing along a and b"
            }
        })
    }
}
