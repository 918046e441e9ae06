//! HCL bounding box and the admissibility predicate.
//!
//! A LAB point is admissible when it converts to a valid RGB triple and its
//! HCL projection lies inside the configured box. Every color that enters a
//! palette passes through [`admissible`].

use crate::color::{lab_to_hcl, lab_to_rgb, Hcl, Lab};
use crate::error::PaletteError;
use serde::{Deserialize, Serialize};

/// Closed-interval bounds on hue (degrees), chroma and lightness.
///
/// A neutral color reports hue -1, so any box with `hue_min > -1` rejects
/// grays. That is intentional: hue bounds select chromatic colors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HclBounds {
    pub hue_min: i32,
    pub hue_max: i32,
    pub chroma_min: i32,
    pub chroma_max: i32,
    pub lightness_min: i32,
    pub lightness_max: i32,
}

impl HclBounds {
    /// The whole hue circle, chroma 0..100, lightness 0..100.
    pub const FULL: HclBounds = HclBounds {
        hue_min: 0,
        hue_max: 360,
        chroma_min: 0,
        chroma_max: 100,
        lightness_min: 0,
        lightness_max: 100,
    };

    /// Builds bounds from `(min, max)` pairs for hue, chroma and lightness.
    pub fn new(hue: (i32, i32), chroma: (i32, i32), lightness: (i32, i32)) -> Self {
        Self {
            hue_min: hue.0,
            hue_max: hue.1,
            chroma_min: chroma.0,
            chroma_max: chroma.1,
            lightness_min: lightness.0,
            lightness_max: lightness.1,
        }
    }

    /// Rejects boxes where any axis has `min > max`.
    ///
    /// A non-empty box can still exclude the whole gamut; that case is only
    /// detectable by sampling and surfaces from the initializer.
    pub fn validate(&self) -> Result<(), PaletteError> {
        let axes = [
            ("hue", self.hue_min, self.hue_max),
            ("chroma", self.chroma_min, self.chroma_max),
            ("lightness", self.lightness_min, self.lightness_max),
        ];
        match axes.iter().find(|(_, min, max)| min > max) {
            Some((name, min, max)) => Err(PaletteError::EmptyBounds(format!(
                "{name} {min} > {max}"
            ))),
            None => Ok(()),
        }
    }

    /// Closed-interval test on each HCL axis independently.
    pub fn contains(&self, hcl: Hcl) -> bool {
        hcl.h >= f64::from(self.hue_min)
            && hcl.h <= f64::from(self.hue_max)
            && hcl.c >= f64::from(self.chroma_min)
            && hcl.c <= f64::from(self.chroma_max)
            && hcl.l >= f64::from(self.lightness_min)
            && hcl.l <= f64::from(self.lightness_max)
    }

    /// Shorthand for [`admissible`] with these bounds.
    pub fn admits(&self, lab: Lab) -> bool {
        admissible(lab, self)
    }
}

impl Default for HclBounds {
    fn default() -> Self {
        Self::FULL
    }
}

/// True iff `lab` is inside the RGB gamut and its HCL projection is inside `bounds`.
pub fn admissible(lab: Lab, bounds: &HclBounds) -> bool {
    lab_to_rgb(lab).is_valid() && bounds.contains(lab_to_hcl(lab))
}
