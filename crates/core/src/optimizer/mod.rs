//! Candidate refinement strategies.
//!
//! An [`Optimizer`] moves a seeded candidate set around inside the admissible
//! region. Every accepted position is checked against the bounds, so an
//! admissible input set stays admissible. Local irregularities (coincident
//! candidates, rejected moves, centroids outside the region) are recovered in
//! place and counted in [`Diagnostics`].

pub mod kmeans;
pub mod repulsion;

pub use kmeans::KMeans;
pub use repulsion::Repulsion;

use crate::bounds::HclBounds;
use crate::color::Lab;
use crate::error::PaletteError;
use crate::prng::UniformSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strategy names accepted by [`PaletteStrategy::from_name`].
const STRATEGY_NAMES: &[&str] = &["repulsion", "kmeans"];

/// Counters describing what an optimizer run had to recover from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Repulsion moves that stayed admissible and were applied.
    pub accepted_moves: usize,
    /// Repulsion moves discarded because they left the admissible region.
    pub rejected_moves: usize,
    /// Coincident pairs separated by random jitter.
    pub jitter_events: usize,
    /// Size of the k-means sample grid.
    pub samples: usize,
    /// Clusters that received no samples in an iteration.
    pub empty_clusters: usize,
    /// Inadmissible centroids replaced by the nearest unused sample.
    pub centroid_substitutions: usize,
    /// Inadmissible centroids replaced by the nearest sample after the free pool ran out.
    pub centroid_fallbacks: usize,
}

/// Refines a candidate set in place.
///
/// Object-safe, so strategies can be chosen at runtime as `&dyn Optimizer`.
pub trait Optimizer {
    /// Short identifier, matching the name accepted by [`PaletteStrategy::from_name`].
    fn name(&self) -> &'static str;

    /// Moves `candidates` apart while keeping each one admissible under `bounds`.
    fn optimize(
        &self,
        candidates: &mut [Lab],
        bounds: &HclBounds,
        rng: &mut dyn UniformSource,
    ) -> Diagnostics;

    /// Current tuning values as a JSON object.
    fn params(&self) -> Value;

    /// Describes every tuning value: type, default and meaning.
    fn param_schema(&self) -> Value;
}

/// The refinement strategy used for a palette request.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteStrategy {
    /// Pairwise inverse-square repulsion (default).
    Repulsion(Repulsion),
    /// k-means over a discretized grid of admissible samples.
    KMeans(KMeans),
}

impl PaletteStrategy {
    /// Builds a strategy by name, reading tuning values from `params`.
    ///
    /// Accepts `"repulsion"`, `"kmeans"` and `"k-means"` (case insensitive).
    pub fn from_name(name: &str, params: &Value) -> Result<Self, PaletteError> {
        match name.to_ascii_lowercase().as_str() {
            "repulsion" => Ok(PaletteStrategy::Repulsion(Repulsion::from_json(params))),
            "kmeans" | "k-means" => Ok(PaletteStrategy::KMeans(KMeans::from_json(params))),
            _ => Err(PaletteError::UnknownStrategy(name.to_string())),
        }
    }

    /// Returns all recognized strategy names.
    pub fn list_names() -> &'static [&'static str] {
        STRATEGY_NAMES
    }
}

impl Default for PaletteStrategy {
    fn default() -> Self {
        PaletteStrategy::Repulsion(Repulsion::default())
    }
}

impl Optimizer for PaletteStrategy {
    fn name(&self) -> &'static str {
        match self {
            PaletteStrategy::Repulsion(o) => o.name(),
            PaletteStrategy::KMeans(o) => o.name(),
        }
    }

    fn optimize(
        &self,
        candidates: &mut [Lab],
        bounds: &HclBounds,
        rng: &mut dyn UniformSource,
    ) -> Diagnostics {
        match self {
            PaletteStrategy::Repulsion(o) => o.optimize(candidates, bounds, rng),
            PaletteStrategy::KMeans(o) => o.optimize(candidates, bounds, rng),
        }
    }

    fn params(&self) -> Value {
        match self {
            PaletteStrategy::Repulsion(o) => o.params(),
            PaletteStrategy::KMeans(o) => o.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            PaletteStrategy::Repulsion(o) => o.param_schema(),
            PaletteStrategy::KMeans(o) => o.param_schema(),
        }
    }
}
