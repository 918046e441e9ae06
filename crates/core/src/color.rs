//! Color types and conversion functions.
//!
//! Provides `Lab` (CIE L*a*b*, D65), the intermediate `Xyz`, the device
//! space `Rgb` (8-bit integer channels) and the cylindrical `Hcl` used for
//! constraint checking. All conversions are pure functions of their input.
//!
//! `lab_to_rgb` performs no clamping: an out-of-gamut LAB point yields channels
//! outside [0, 255], which callers detect with [`Rgb::is_valid`].

use serde::{Deserialize, Serialize, Serializer};
use std::ops::{Add, AddAssign, Div, DivAssign};

/// D65 reference white.
const XN: f64 = 0.950470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088830;

/// 4 / 29
const T0: f64 = 4.0 / 29.0;
/// 6 / 29, the cubic/linear split of the LAB companding curve.
const T1: f64 = 6.0 / 29.0;
/// 3 * T1^2
const T2: f64 = 3.0 * T1 * T1;

/// Linear-segment threshold of the sRGB gamma encoder.
const GAMMA_LINEAR_LIMIT: f64 = 0.00304;

/// Chroma is rounded at four decimals when deciding whether a color is neutral.
const CHROMA_EPSILON_SCALE: f64 = 10_000.0;

/// Hue value reported for neutral colors whose hue is undefined.
pub const HUE_UNDEFINED: f64 = -1.0;

/// CIE L*a*b* color. `l` is nominally 0..100, `a` and `b` are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// CIE XYZ tristimulus values relative to D65.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Device RGB with integer channels.
///
/// Produced by [`lab_to_rgb`] and valid only when every channel is in
/// [0, 255]. Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

/// Hue (degrees), chroma and lightness.
///
/// `h` is in [0, 360), or [`HUE_UNDEFINED`] when chroma is effectively zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    pub h: f64,
    pub c: f64,
    pub l: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Euclidean distance in LAB (CIE76 delta E).
    pub fn distance(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    pub fn to_rgb(self) -> Rgb {
        lab_to_rgb(self)
    }

    pub fn to_hcl(self) -> Hcl {
        lab_to_hcl(self)
    }
}

impl Add for Lab {
    type Output = Lab;

    fn add(self, rhs: Lab) -> Lab {
        Lab {
            l: self.l + rhs.l,
            a: self.a + rhs.a,
            b: self.b + rhs.b,
        }
    }
}

impl AddAssign for Lab {
    fn add_assign(&mut self, rhs: Lab) {
        self.l += rhs.l;
        self.a += rhs.a;
        self.b += rhs.b;
    }
}

impl Div<f64> for Lab {
    type Output = Lab;

    fn div(self, rhs: f64) -> Lab {
        Lab {
            l: self.l / rhs,
            a: self.a / rhs,
            b: self.b / rhs,
        }
    }
}

impl DivAssign<usize> for Lab {
    fn div_assign(&mut self, count: usize) {
        *self = *self / count as f64;
    }
}

impl Rgb {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// True iff all three channels lie in [0, 255].
    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0..=255).contains(c))
    }

    /// Formats as `"#rrggbb"`, clamping channels into [0, 255].
    pub fn to_hex(self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(|c| c.clamp(0, 255));
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Index of the point nearest to `target`, lowest index on ties.
///
/// Returns `None` for an empty slice.
pub fn nearest(points: &[Lab], target: &Lab) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, p)| {
            let d = p.distance(target);
            match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            }
        })
        .map(|(i, _)| i)
}

/// Inverse LAB companding: cubic above `T1`, linear below.
fn lab_component_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

/// Gamma-encodes one linear channel and scales it to the nearest integer in 0..255.
///
/// Out-of-range input maps to out-of-range output; nothing is clamped.
fn xyz_component_to_rgb(c: f64) -> i32 {
    let encoded = if c <= GAMMA_LINEAR_LIMIT {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (255.0 * encoded).round() as i32
}

/// Converts LAB to XYZ with the D65 white point.
pub fn lab_to_xyz(c: Lab) -> Xyz {
    let y = (c.l + 16.0) / 116.0;
    let x = y + c.a / 500.0;
    let z = y - c.b / 200.0;
    Xyz {
        x: XN * lab_component_to_xyz(x),
        y: YN * lab_component_to_xyz(y),
        z: ZN * lab_component_to_xyz(z),
    }
}

/// Converts XYZ to gamma-encoded integer sRGB via the linear sRGB matrix.
pub fn xyz_to_rgb(c: Xyz) -> Rgb {
    Rgb {
        r: xyz_component_to_rgb(3.2404542 * c.x - 1.5371385 * c.y - 0.4985314 * c.z),
        g: xyz_component_to_rgb(-0.9692660 * c.x + 1.8760108 * c.y + 0.0415560 * c.z),
        b: xyz_component_to_rgb(0.0556434 * c.x - 0.2040259 * c.y + 1.0572252 * c.z),
    }
}

/// Convenience: LAB to RGB via XYZ.
pub fn lab_to_rgb(c: Lab) -> Rgb {
    xyz_to_rgb(lab_to_xyz(c))
}

/// Converts LAB to HCL.
///
/// Hue wraps into [0, 360) by taking the integer degrees modulo 360 and adding
/// back the fractional part, which keeps sub-degree precision for negative
/// angles. When chroma rounds to zero at four decimals the hue is
/// [`HUE_UNDEFINED`].
pub fn lab_to_hcl(c: Lab) -> Hcl {
    let shifted = c.b.atan2(c.a).to_degrees() + 360.0;
    let whole = shifted.trunc();
    let mut h = (whole as i64 % 360) as f64 + (shifted - whole);
    let chroma = c.a.hypot(c.b);
    if (chroma * CHROMA_EPSILON_SCALE).round() == 0.0 {
        h = HUE_UNDEFINED;
    }
    Hcl {
        h,
        c: chroma,
        l: c.l,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- LAB -> RGB --

    #[test]
    fn white_maps_to_full_rgb() {
        assert_eq!(lab_to_rgb(Lab::new(100.0, 0.0, 0.0)), Rgb::new(255, 255, 255));
    }

    #[test]
    fn black_maps_to_zero_rgb() {
        assert_eq!(lab_to_rgb(Lab::new(0.0, 0.0, 0.0)), Rgb::new(0, 0, 0));
    }

    #[test]
    fn mid_gray_has_equal_channels() {
        // L=50 neutral: Y = ((66/116)^3) = 0.1842, encoded to ~118.9.
        assert_eq!(lab_to_rgb(Lab::new(50.0, 0.0, 0.0)), Rgb::new(119, 119, 119));
    }

    #[test]
    fn lab_to_xyz_white_is_reference_white() {
        let xyz = lab_to_xyz(Lab::new(100.0, 0.0, 0.0));
        assert!(approx_eq(xyz.x, XN), "x: {}", xyz.x);
        assert!(approx_eq(xyz.y, YN), "y: {}", xyz.y);
        assert!(approx_eq(xyz.z, ZN), "z: {}", xyz.z);
    }

    #[test]
    fn lab_to_xyz_uses_linear_segment_below_threshold() {
        // L=5 puts y = 21/116 < 6/29 on the linear branch.
        let xyz = lab_to_xyz(Lab::new(5.0, 0.0, 0.0));
        let expected = T2 * (21.0 / 116.0 - T0);
        assert!(approx_eq(xyz.y, expected), "y: {} vs {expected}", xyz.y);
    }

    #[test]
    fn saturated_lab_is_out_of_gamut_without_clamping() {
        let rgb = lab_to_rgb(Lab::new(50.0, 100.0, -100.0));
        assert!(!rgb.is_valid(), "expected out-of-gamut, got {rgb:?}");
        assert!(rgb.b > 255, "blue should overflow, got {}", rgb.b);
        assert!(rgb.g < 0, "green should underflow, got {}", rgb.g);
    }

    #[test]
    fn conversion_is_reproducible() {
        let lab = Lab::new(63.2, -41.7, 12.9);
        assert_eq!(lab_to_rgb(lab), lab_to_rgb(lab));
        assert_eq!(lab.to_rgb(), lab_to_rgb(lab));
    }

    // -- RGB validity --

    #[test]
    fn is_valid_accepts_channel_bounds() {
        assert!(Rgb::new(0, 0, 0).is_valid());
        assert!(Rgb::new(255, 255, 255).is_valid());
        assert!(Rgb::new(12, 200, 99).is_valid());
    }

    #[test]
    fn is_valid_rejects_any_channel_outside_bounds() {
        assert!(!Rgb::new(-1, 0, 0).is_valid());
        assert!(!Rgb::new(0, 256, 0).is_valid());
        assert!(!Rgb::new(0, 0, 300).is_valid());
    }

    // -- LAB -> HCL --

    #[test]
    fn zero_chroma_has_undefined_hue_at_any_lightness() {
        for l in [0.0, 25.0, 50.0, 100.0] {
            let hcl = lab_to_hcl(Lab::new(l, 0.0, 0.0));
            assert_eq!(hcl.h, HUE_UNDEFINED, "L={l}");
            assert_eq!(hcl.c, 0.0);
            assert_eq!(hcl.l, l);
        }
    }

    #[test]
    fn chroma_rounding_to_zero_is_undefined() {
        assert_eq!(lab_to_hcl(Lab::new(50.0, 0.00003, 0.0)).h, HUE_UNDEFINED);
        assert!(lab_to_hcl(Lab::new(50.0, 0.00006, 0.0)).h >= 0.0);
    }

    #[test]
    fn hue_quadrants() {
        let cases = [
            ((1.0, 0.0), 0.0),
            ((1.0, 1.0), 45.0),
            ((0.0, 1.0), 90.0),
            ((-1.0, 0.0), 180.0),
            ((0.0, -1.0), 270.0),
            ((1.0, -1.0), 315.0),
        ];
        for ((a, b), expected) in cases {
            let h = lab_to_hcl(Lab::new(50.0, a, b)).h;
            assert!((h - expected).abs() < 1e-9, "a={a} b={b}: {h} vs {expected}");
        }
    }

    #[test]
    fn hue_keeps_fractional_degrees_for_negative_angles() {
        // atan2 gives -0.5 degrees; wrapped it must be 359.5, not 359.
        let angle = (-0.5_f64).to_radians();
        let hcl = lab_to_hcl(Lab::new(50.0, 10.0 * angle.cos(), 10.0 * angle.sin()));
        assert!((hcl.h - 359.5).abs() < 1e-9, "got {}", hcl.h);
        assert!((hcl.c - 10.0).abs() < 1e-9);
    }

    #[test]
    fn hue_just_below_zero_stays_below_360() {
        let hcl = lab_to_hcl(Lab::new(50.0, 10.0, -1e-12));
        assert!(hcl.h < 360.0 && hcl.h > 359.0, "got {}", hcl.h);
    }

    // -- Lab arithmetic --

    #[test]
    fn lab_sum_and_division_give_centroid() {
        let mut acc = Lab::default();
        acc += Lab::new(10.0, -20.0, 30.0);
        acc += Lab::new(30.0, 20.0, -10.0);
        let mean = acc / 2.0;
        assert_eq!(mean, Lab::new(20.0, 0.0, 10.0));
        acc /= 2;
        assert_eq!(acc, mean);
        assert_eq!(
            Lab::new(1.0, 2.0, 3.0) + Lab::new(1.0, 1.0, 1.0),
            Lab::new(2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn distance_is_euclidean() {
        let d = Lab::new(0.0, 0.0, 0.0).distance(&Lab::new(2.0, 3.0, 6.0));
        assert!(approx_eq(d, 7.0), "got {d}");
    }

    #[test]
    fn nearest_prefers_lowest_index_on_ties() {
        let points = [
            Lab::new(10.0, 0.0, 0.0),
            Lab::new(-10.0, 0.0, 0.0),
            Lab::new(0.0, 5.0, 0.0),
        ];
        assert_eq!(nearest(&points, &Lab::new(0.0, 0.0, 0.0)), Some(2));
        assert_eq!(nearest(&points[..2], &Lab::new(0.0, 0.0, 0.0)), Some(0));
        assert_eq!(nearest(&[], &Lab::default()), None);
    }

    // -- Hex --

    #[test]
    fn to_hex_clamps_out_of_range_channels() {
        assert_eq!(Rgb::new(300, -5, 128).to_hex(), "#ff0080");
    }

    #[test]
    fn rgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(192, 255, 238)).unwrap();
        assert_eq!(json, "\"#c0ffee\"");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hue_matches_direct_atan2(
                l in 0.0_f64..=100.0,
                a in -100.0_f64..=100.0,
                b in -100.0_f64..=100.0,
            ) {
                let hcl = lab_to_hcl(Lab::new(l, a, b));
                prop_assume!(hcl.h != HUE_UNDEFINED);
                let direct = b.atan2(a).to_degrees().rem_euclid(360.0);
                let diff = (hcl.h - direct).abs();
                // Allow the 0/360 seam.
                prop_assert!(diff < 1e-9 || (diff - 360.0).abs() < 1e-9,
                    "hue {} vs direct {direct} for a={a}, b={b}", hcl.h);
                prop_assert!((0.0..360.0).contains(&hcl.h));
                prop_assert!((hcl.c - a.hypot(b)).abs() < 1e-12);
            }

            #[test]
            fn neutral_axis_is_always_undefined(l in -10.0_f64..=110.0) {
                prop_assert_eq!(lab_to_hcl(Lab::new(l, 0.0, 0.0)).h, HUE_UNDEFINED);
            }

            #[test]
            fn neutral_axis_stays_in_gamut(l in 0.0_f64..=100.0) {
                let rgb = lab_to_rgb(Lab::new(l, 0.0, 0.0));
                prop_assert!(rgb.is_valid(), "gray L={l} gave {:?}", rgb);
            }
        }
    }
}
