//! Error types for palette generation.

use thiserror::Error;

/// Errors produced by palette generation.
///
/// Only configuration problems escape the numeric core. Degenerate pairs,
/// rejected moves and out-of-region centroids are recovered locally and
/// surface as [`Diagnostics`](crate::optimizer::Diagnostics) counters instead.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The initializer could not find an admissible color within its retry budget.
    ///
    /// The bounding box excludes every point of the representable LAB volume
    /// (or leaves so little of it that rejection sampling is hopeless).
    #[error("configuration error: no admissible color found after {attempts} attempts")]
    Configuration { attempts: usize },

    /// A bounding box axis has `min > max`.
    #[error("empty color space bounds: {0}")]
    EmptyBounds(String),

    /// Requested palette size is outside the supported range.
    #[error("invalid palette size {requested}: must be between 1 and {max}")]
    InvalidSize { requested: usize, max: usize },

    /// A strategy name was not recognized.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

impl PaletteError {
    /// True for errors caused by a misconfigured color space.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PaletteError::Configuration { .. } | PaletteError::EmptyBounds(_)
        )
    }
}
