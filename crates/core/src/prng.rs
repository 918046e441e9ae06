//! Uniform randomness for palette generation.
//!
//! Every stateful phase (initializer, optimizers, path orderer) draws from an
//! injected [`UniformSource`] instead of a global generator, so a palette is a
//! pure function of its request and its random stream.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed floats in [0, 1).
///
/// Object-safe: phases take `&mut dyn UniformSource`.
pub trait UniformSource {
    /// Returns the next value in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed f64 in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed index in [0, len).
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    fn next_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "next_index requires a non-empty range");
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). A seed of 0 is replaced
/// with a non-zero fallback because 0 is a fixed point of the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl UniformSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` divided by 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Used to pin exact LAB draws in scenario tests. Values outside [0, 1) are
/// clamped into range; an empty list yields 0.0 forever.
#[derive(Debug, Clone)]
pub struct Replay {
    values: Vec<f64>,
    cursor: usize,
}

impl Replay {
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for Replay {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
