//! Force-directed spreading of candidates in LAB.
//!
//! Each step every pair pushes apart with magnitude `repulsion / d²`. The
//! summed push per candidate is scaled so the actual move never exceeds
//! [`MAX_STEP`] units, and a move is applied only if it lands on an
//! admissible point. There is no momentum: displacements are rebuilt from
//! zero every step.

use super::{Diagnostics, Optimizer};
use crate::bounds::HclBounds;
use crate::color::Lab;
use crate::params::{param_f64, param_usize};
use crate::prng::UniformSource;
use serde_json::{json, Value};
use std::ops::{AddAssign, SubAssign};

/// Default force constant.
const DEFAULT_REPULSION: f64 = 100.0;
/// Default displacement gain.
const DEFAULT_SPEED: f64 = 100.0;
/// Default number of simulation steps.
const DEFAULT_STEPS: usize = 1000;
/// Longest move a candidate may make in one step.
const MAX_STEP: f64 = 0.1;
/// Half-width of the per-axis jitter applied to coincident candidates.
const JITTER: f64 = 2.0;

/// Accumulated push on one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Displacement {
    dl: f64,
    da: f64,
    db: f64,
}

impl Displacement {
    fn norm(&self) -> f64 {
        (self.dl * self.dl + self.da * self.da + self.db * self.db).sqrt()
    }
}

impl AddAssign for Displacement {
    fn add_assign(&mut self, rhs: Displacement) {
        self.dl += rhs.dl;
        self.da += rhs.da;
        self.db += rhs.db;
    }
}

impl SubAssign for Displacement {
    fn sub_assign(&mut self, rhs: Displacement) {
        self.dl -= rhs.dl;
        self.da -= rhs.da;
        self.db -= rhs.db;
    }
}

/// Repulsion optimizer settings.
///
/// Use [`Default`] for repulsion 100, speed 100, 1000 steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    /// Force constant in `repulsion / d²`.
    pub repulsion: f64,
    /// Gain applied to the summed force before the step cap.
    pub speed: f64,
    /// Number of simulation steps.
    pub steps: usize,
}

impl Default for Repulsion {
    fn default() -> Self {
        Self {
            repulsion: DEFAULT_REPULSION,
            speed: DEFAULT_SPEED,
            steps: DEFAULT_STEPS,
        }
    }
}

impl Repulsion {
    /// Reads `repulsion`, `speed` and `steps`, defaulting any that are missing.
    ///
    /// Negative force constants and gains are raised to 0. A negative
    /// `repulsion` would pull candidates together.
    pub fn from_json(params: &Value) -> Self {
        Self {
            repulsion: param_f64(params, "repulsion", DEFAULT_REPULSION).max(0.0),
            speed: param_f64(params, "speed", DEFAULT_SPEED).max(0.0),
            steps: param_usize(params, "steps", DEFAULT_STEPS),
        }
    }

    /// Sums pairwise forces into `forces`, jittering coincident pairs.
    fn accumulate_forces(
        &self,
        candidates: &[Lab],
        forces: &mut [Displacement],
        rng: &mut dyn UniformSource,
        diagnostics: &mut Diagnostics,
    ) {
        forces.fill(Displacement::default());
        for i in 0..candidates.len() {
            for j in 0..i {
                let (ci, cj) = (candidates[i], candidates[j]);
                let d = ci.distance(&cj);
                if d > 0.0 {
                    // force / d turns the difference vector into force * unit vector.
                    let scale = self.repulsion / (d * d) / d;
                    let push = Displacement {
                        dl: (ci.l - cj.l) * scale,
                        da: (ci.a - cj.a) * scale,
                        db: (ci.b - cj.b) * scale,
                    };
                    forces[i] += push;
                    forces[j] -= push;
                } else {
                    forces[i] += Displacement {
                        dl: rng.next_range(-JITTER, JITTER),
                        da: rng.next_range(-JITTER, JITTER),
                        db: rng.next_range(-JITTER, JITTER),
                    };
                    diagnostics.jitter_events += 1;
                }
            }
        }
    }

    /// Applies each capped displacement if the destination is admissible.
    fn apply_forces(
        &self,
        candidates: &mut [Lab],
        forces: &[Displacement],
        bounds: &HclBounds,
        diagnostics: &mut Diagnostics,
    ) {
        for (lab, force) in candidates.iter_mut().zip(forces) {
            let displacement = self.speed * force.norm();
            if displacement <= 0.0 || !displacement.is_finite() {
                continue;
            }
            let ratio = self.speed * displacement.min(MAX_STEP) / displacement;
            let moved = Lab {
                l: lab.l + force.dl * ratio,
                a: lab.a + force.da * ratio,
                b: lab.b + force.db * ratio,
            };
            if bounds.admits(moved) {
                *lab = moved;
                diagnostics.accepted_moves += 1;
            } else {
                diagnostics.rejected_moves += 1;
            }
        }
    }
}

impl Optimizer for Repulsion {
    fn name(&self) -> &'static str {
        "repulsion"
    }

    fn optimize(
        &self,
        candidates: &mut [Lab],
        bounds: &HclBounds,
        rng: &mut dyn UniformSource,
    ) -> Diagnostics {
        let mut diagnostics = Diagnostics::default();
        let mut forces = vec![Displacement::default(); candidates.len()];
        for _ in 0..self.steps {
            self.accumulate_forces(candidates, &mut forces, rng, &mut diagnostics);
            self.apply_forces(candidates, &forces, bounds, &mut diagnostics);
        }
        tracing::debug!(
            steps = self.steps,
            accepted = diagnostics.accepted_moves,
            rejected = diagnostics.rejected_moves,
            jitter = diagnostics.jitter_events,
            "repulsion finished"
        );
        diagnostics
    }

    fn params(&self) -> Value {
        json!({
            "repulsion": self.repulsion,
            "speed": self.speed,
            "steps": self.steps,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "repulsion": {
                "type": "number",
                "default": DEFAULT_REPULSION,
                "min": 0.0,
                "description": "Force constant: pairwise push is repulsion / distance^2"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": 0.0,
                "description": "Gain on the summed force; each move is still capped at 0.1 LAB units"
            },
            "steps": {
                "type": "integer",
                "default": DEFAULT_STEPS,
                "min": 0,
                "description": "Number of simulation steps"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::admissible;
    use crate::init::{seed_candidates, DEFAULT_MAX_ATTEMPTS};
    use crate::prng::{Replay, Xorshift64};

    fn mean_pairwise_distance(points: &[Lab]) -> f64 {
        let mut total = 0.0;
        let mut pairs = 0;
        for i in 0..points.len() {
            for j in 0..i {
                total += points[i].distance(&points[j]);
                pairs += 1;
            }
        }
        if pairs == 0 {
            0.0
        } else {
            total / pairs as f64
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let r = Repulsion::default();
        assert!((r.repulsion - 100.0).abs() < f64::EPSILON);
        assert!((r.speed - 100.0).abs() < f64::EPSILON);
        assert_eq!(r.steps, 1000);
    }

    #[test]
    fn from_json_uses_defaults_for_empty_object() {
        assert_eq!(Repulsion::from_json(&json!({})), Repulsion::default());
    }

    #[test]
    fn from_json_extracts_custom_values() {
        let r = Repulsion::from_json(&json!({"repulsion": 50.0, "speed": 10, "steps": 20}));
        let p = r.params();
        assert!((p["repulsion"].as_f64().unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((p["speed"].as_f64().unwrap() - 10.0).abs() < f64::EPSILON);
        assert_eq!(p["steps"], 20);
    }

    #[test]
    fn from_json_raises_negative_values_to_schema_minimum() {
        let r = Repulsion::from_json(&json!({"repulsion": -50.0, "speed": -1}));
        assert_eq!(r.repulsion, 0.0);
        assert_eq!(r.speed, 0.0);
        let schema = r.param_schema();
        assert_eq!(schema["repulsion"]["min"], 0.0);
        assert_eq!(schema["speed"]["min"], 0.0);
    }

    #[test]
    fn negative_repulsion_never_pulls_candidates_together() {
        let start = [Lab::new(50.0, 10.0, 10.0), Lab::new(50.0, 12.0, 10.0)];
        let mut candidates = start;
        let optimizer = Repulsion {
            steps: 5,
            ..Repulsion::from_json(&json!({"repulsion": -100.0}))
        };
        let mut rng = Xorshift64::new(1);
        optimizer.optimize(&mut candidates, &HclBounds::FULL, &mut rng);
        assert!(candidates[0].distance(&candidates[1]) >= start[0].distance(&start[1]));
    }

    #[test]
    fn param_schema_lists_every_param() {
        let schema = Repulsion::default().param_schema();
        for key in ["repulsion", "speed", "steps"] {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    #[test]
    fn two_candidates_move_apart_by_at_most_max_step_each() {
        let mut candidates = [Lab::new(50.0, 10.0, 10.0), Lab::new(50.0, 12.0, 10.0)];
        let before = candidates[0].distance(&candidates[1]);
        let optimizer = Repulsion {
            steps: 1,
            ..Repulsion::default()
        };
        let mut rng = Xorshift64::new(1);
        let diag = optimizer.optimize(&mut candidates, &HclBounds::FULL, &mut rng);
        let after = candidates[0].distance(&candidates[1]);
        assert_eq!(diag.accepted_moves, 2);
        assert!((after - before - 2.0 * MAX_STEP).abs() < 1e-9, "{before} -> {after}");
        // Push is along the a axis only.
        assert!((candidates[0].l - 50.0).abs() < 1e-12);
        assert!((candidates[1].b - 10.0).abs() < 1e-12);
        assert!(candidates[1].a > 12.0 && candidates[0].a < 10.0);
    }

    #[test]
    fn single_candidate_is_untouched() {
        let start = Lab::new(60.0, 20.0, 20.0);
        let mut candidates = [start];
        let mut rng = Replay::new(vec![0.5]);
        let diag = Repulsion::default().optimize(&mut candidates, &HclBounds::FULL, &mut rng);
        assert_eq!(candidates[0], start);
        assert_eq!(diag, Diagnostics::default());
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn coincident_candidates_are_jittered_apart() {
        let start = Lab::new(60.0, 20.0, 20.0);
        let mut candidates = [start, start];
        let optimizer = Repulsion {
            steps: 1,
            ..Repulsion::default()
        };
        // Jitter of (+1, +1, +1) on the higher-indexed candidate.
        let mut rng = Replay::new(vec![0.75]);
        let diag = optimizer.optimize(&mut candidates, &HclBounds::FULL, &mut rng);
        assert_eq!(diag.jitter_events, 1);
        assert_eq!(candidates[0], start, "lower index must not move");
        assert!(candidates[1].distance(&start) > 0.0);
        assert!((candidates[1].distance(&start) - MAX_STEP).abs() < 1e-9);
    }

    #[test]
    fn moves_outside_region_are_rejected() {
        // Lightness pinned to exactly 60: any move with a lightness component fails.
        let bounds = HclBounds::new((0, 360), (0, 100), (60, 60));
        let mut candidates = [Lab::new(60.0, 20.0, 20.0), Lab::new(60.5, 20.0, 20.0)];
        let optimizer = Repulsion {
            steps: 5,
            ..Repulsion::default()
        };
        let mut rng = Xorshift64::new(3);
        let diag = optimizer.optimize(&mut candidates, &bounds, &mut rng);
        assert_eq!(diag.accepted_moves, 0);
        assert_eq!(diag.rejected_moves, 10);
        assert_eq!(candidates[0], Lab::new(60.0, 20.0, 20.0));
    }

    #[test]
    fn optimized_candidates_stay_admissible() {
        let bounds = HclBounds::new((180, 300), (10, 80), (20, 80));
        let mut rng = Xorshift64::new(77);
        let mut candidates = seed_candidates(8, &bounds, &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap();
        let optimizer = Repulsion {
            steps: 200,
            ..Repulsion::default()
        };
        optimizer.optimize(&mut candidates, &bounds, &mut rng);
        for lab in &candidates {
            assert!(admissible(*lab, &bounds), "{lab:?} left the region");
        }
    }

    #[test]
    fn spreading_increases_mean_distance_on_full_box() {
        let bounds = HclBounds::FULL;
        let mut improved = 0;
        for seed in 1..=10u64 {
            let mut rng = Xorshift64::new(seed);
            let mut candidates =
                seed_candidates(8, &bounds, &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap();
            let before = mean_pairwise_distance(&candidates);
            Repulsion::default().optimize(&mut candidates, &bounds, &mut rng);
            if mean_pairwise_distance(&candidates) >= before {
                improved += 1;
            }
        }
        assert!(improved >= 9, "only {improved}/10 runs spread out");
    }
}
