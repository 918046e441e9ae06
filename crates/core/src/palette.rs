//! Generated palette: ordered colors ready for an LED driver.
//!
//! Colors are stored both as the optimized LAB points and as their RGB
//! triples. [`Palette::sample`] performs gradient lookup the way LED palette
//! tables do: linear interpolation in RGB between neighbouring entries.
//! RGB interpolation between valid triples is always valid, whereas LAB
//! interpolation can leave the gamut.

use crate::color::{lab_to_rgb, Lab, Rgb};
use crate::optimizer::Diagnostics;
use serde::Serialize;

/// An ordered set of admissible colors plus the optimizer's diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Palette {
    colors: Vec<Rgb>,
    lab: Vec<Lab>,
    diagnostics: Diagnostics,
}

impl Palette {
    /// Builds a palette from already ordered, admissible LAB points.
    pub(crate) fn from_ordered(lab: Vec<Lab>, diagnostics: Diagnostics) -> Self {
        let colors = lab.iter().copied().map(lab_to_rgb).collect();
        Self {
            colors,
            lab,
            diagnostics,
        }
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the palette has no colors. Never the case for a generated palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// RGB triples in path order.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// LAB points in path order.
    pub fn lab(&self) -> &[Lab] {
        &self.lab
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Colors as `"#rrggbb"` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    /// Samples the gradient at `t` in [0, 1].
    ///
    /// `t` is clamped; NaN reads as 0. Entries are evenly spaced, so
    /// `sample(0.0)` is the first color and `sample(1.0)` the last.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.colors.len();
        match n {
            0 => Rgb::new(0, 0, 0),
            1 => self.colors[0],
            _ => {
                let scaled = t * (n - 1) as f64;
                let idx = (scaled as usize).min(n - 2);
                let frac = scaled - idx as f64;
                let (c0, c1) = (self.colors[idx], self.colors[idx + 1]);
                let lerp = |a: i32, b: i32| (f64::from(a) + frac * f64::from(b - a)).round() as i32;
                Rgb::new(lerp(c0.r, c1.r), lerp(c0.g, c1.g), lerp(c0.b, c1.b))
            }
        }
    }

    /// `steps` evenly spaced samples from the first color to the last.
    pub fn gradient(&self, steps: usize) -> Vec<Rgb> {
        match steps {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..steps)
                .map(|i| self.sample(i as f64 / (steps - 1) as f64))
                .collect(),
        }
    }
}
