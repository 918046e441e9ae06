//! Palette requests and the generation pipeline.
//!
//! A [`PaletteRequest`] captures everything needed to reproduce a palette:
//! size, bounds, strategy and its tuning values, PRNG seed and the
//! initializer's retry budget. [`generate`] runs the pipeline:
//! seed candidates, refine them with one optimizer, order them into a path,
//! convert to RGB.

use crate::bounds::HclBounds;
use crate::error::PaletteError;
use crate::init::{seed_candidates, DEFAULT_MAX_ATTEMPTS};
use crate::optimizer::{Optimizer, PaletteStrategy};
use crate::order::{order_path, path_length};
use crate::palette::Palette;
use crate::prng::{UniformSource, Xorshift64};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest supported palette size.
pub const MAX_COLORS: usize = 16;

/// Reproducible description of a palette.
///
/// Missing JSON fields take their [`Default`] values: 16 colors, full
/// bounds, repulsion with default tuning, seed 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteRequest {
    pub size: usize,
    pub bounds: HclBounds,
    pub strategy: String,
    pub params: Value,
    pub seed: u64,
    pub max_attempts: usize,
}

impl Default for PaletteRequest {
    fn default() -> Self {
        Self {
            size: MAX_COLORS,
            bounds: HclBounds::FULL,
            strategy: "repulsion".to_string(),
            params: Value::Object(serde_json::Map::new()),
            seed: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PaletteRequest {
    /// Creates a request for `size` colors with default bounds and strategy.
    pub fn new(size: usize, seed: u64) -> Self {
        Self {
            size,
            seed,
            ..Self::default()
        }
    }

    /// Checks size, bounds and strategy name without generating anything.
    pub fn validate(&self) -> Result<(), PaletteError> {
        validate_size(self.size)?;
        self.bounds.validate()?;
        self.optimizer().map(|_| ())
    }

    /// Resolves `strategy` and `params` into an optimizer.
    pub fn optimizer(&self) -> Result<PaletteStrategy, PaletteError> {
        PaletteStrategy::from_name(&self.strategy, &self.params)
    }

    /// Generates the palette with an `Xorshift64` seeded from `seed`.
    pub fn generate(&self) -> Result<Palette, PaletteError> {
        let mut rng = Xorshift64::new(self.seed);
        self.generate_with(&mut rng)
    }

    /// Generates the palette drawing from a caller-supplied random source.
    pub fn generate_with(&self, rng: &mut dyn UniformSource) -> Result<Palette, PaletteError> {
        let optimizer = self.optimizer()?;
        generate(self.size, &self.bounds, &optimizer, rng, self.max_attempts)
    }
}

fn validate_size(size: usize) -> Result<(), PaletteError> {
    if (1..=MAX_COLORS).contains(&size) {
        Ok(())
    } else {
        Err(PaletteError::InvalidSize {
            requested: size,
            max: MAX_COLORS,
        })
    }
}

/// Runs the full pipeline for `size` colors inside `bounds`.
///
/// Returns [`PaletteError::Configuration`] when the initializer cannot find
/// admissible colors within `max_attempts` draws per slot. Every returned
/// color is admissible: the initializer and optimizers only ever accept
/// admissible points, and ordering does not change them.
pub fn generate(
    size: usize,
    bounds: &HclBounds,
    optimizer: &dyn Optimizer,
    rng: &mut dyn UniformSource,
    max_attempts: usize,
) -> Result<Palette, PaletteError> {
    validate_size(size)?;
    bounds.validate()?;

    let mut candidates = seed_candidates(size, bounds, rng, max_attempts)?;
    let diagnostics = optimizer.optimize(&mut candidates, bounds, rng);
    let ordered = order_path(candidates, rng);
    debug_assert!(ordered.iter().all(|lab| bounds.admits(*lab)));
    tracing::debug!(
        size,
        strategy = optimizer.name(),
        path_length = path_length(&ordered),
        "palette generated"
    );
    Ok(Palette::from_ordered(ordered, diagnostics))
}
