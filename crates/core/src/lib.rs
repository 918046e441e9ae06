#![deny(unsafe_code)]
//! Perceptually spread color palettes for LED strips.
//!
//! Provides CIELAB/XYZ/sRGB/HCL conversion, the HCL-box admissibility test,
//! rejection-sampling initialization, two optimizers (`Repulsion`, `KMeans`)
//! behind the `Optimizer` trait, greedy path ordering, the `Xorshift64`
//! PRNG, and `PaletteRequest` for reproducible generation.

pub mod bounds;
pub mod color;
pub mod error;
pub mod init;
pub mod optimizer;
pub mod order;
pub mod palette;
pub mod params;
pub mod prng;
pub mod request;

pub use bounds::{admissible, HclBounds};
pub use color::{Hcl, Lab, Rgb, Xyz};
pub use error::PaletteError;
pub use optimizer::{Diagnostics, KMeans, Optimizer, PaletteStrategy, Repulsion};
pub use palette::Palette;
pub use prng::{Replay, UniformSource, Xorshift64};
pub use request::{generate, PaletteRequest, MAX_COLORS};
