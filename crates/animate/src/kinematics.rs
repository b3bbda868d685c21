//! Closed-form motion used by the animator. Pure functions, no scene access.

use serde::{Deserialize, Serialize};

use crate::params::AnimationParams;

/// Half width of the band clouds drift through before teleporting across.
pub const CLOUD_WRAP_BOUND: f32 = 50.0;

/// Advance a phase accumulator by `delta * speed`.
pub fn advance_phase(phase: f64, delta: f32, speed: f32) -> f64 {
    phase + f64::from(delta) * f64::from(speed)
}

/// Rectified-sine bob: the body touches `base_height` twice per period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub base_height: f32,
    pub amplitude: f32,
}

impl Bounce {
    /// Both boats ride the swell with the same profile.
    pub const BOAT: Bounce = Bounce {
        base_height: 0.2,
        amplitude: 0.2,
    };

    pub fn height(&self, phase: f64) -> f32 {
        self.base_height + self.amplitude * phase.sin().abs() as f32
    }
}

/// Which way a sprite drifts along X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Convention for a pool of `count`: first half positive, second half negative.
    pub fn for_pool_index(index: usize, count: usize) -> Self {
        // `index < count / 2` with the division done in floating point, so an
        // odd pool puts its middle sprite in the positive half.
        if (index as f32) < count as f32 / 2.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// Move `x` along `direction` and teleport to the opposite bound once past it.
pub fn drift(x: f32, direction: Direction, speed: f32, delta: f32, bound: f32) -> f32 {
    let moved = x + speed * delta * direction.sign();
    match direction {
        Direction::Positive if moved > bound => -bound,
        Direction::Negative if moved < -bound => bound,
        _ => moved,
    }
}

/// Axis-aligned ellipse in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center_x: f32,
    pub center_z: f32,
    pub radius_x: f32,
    pub radius_z: f32,
}

impl Ellipse {
    pub fn from_params(params: &AnimationParams) -> Self {
        Self {
            center_x: params.yacht_orbit_center_x,
            center_z: params.yacht_orbit_center_z,
            radius_x: params.yacht_orbit_radius_x,
            radius_z: params.yacht_orbit_radius_z,
        }
    }

    /// Point on the ellipse at `phase`, as (x, z).
    pub fn point(&self, phase: f64) -> (f32, f32) {
        let x = f64::from(self.center_x) + f64::from(self.radius_x) * phase.cos();
        let z = f64::from(self.center_z) + f64::from(self.radius_z) * phase.sin();
        (x as f32, z as f32)
    }

    /// Yaw that faces along the ellipse tangent at `phase`.
    ///
    /// Uses the radii-weighted derivative, `atan2(rz·cos φ, rx·sin φ)`; on a
    /// non-circular ellipse this differs from the raw phase angle.
    pub fn heading(&self, phase: f64) -> f32 {
        let dz = f64::from(self.radius_z) * phase.cos();
        let dx = f64::from(self.radius_x) * phase.sin();
        dz.atan2(dx) as f32
    }

    /// `((x-cx)/rx)^2 + ((z-cz)/rz)^2`; 1 for points on the ellipse.
    pub fn normalized_radius(&self, x: f32, z: f32) -> f32 {
        let u = (x - self.center_x) / self.radius_x;
        let v = (z - self.center_z) / self.radius_z;
        u * u + v * v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn bounce_stays_in_band() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..2_000 {
            let phase: f64 = rng.random_range(0.0..10_000.0);
            let h = Bounce::BOAT.height(phase);
            assert!((0.2..=0.4 + 1e-6).contains(&h), "height {h} at {phase}");
        }
    }

    #[test]
    fn bounce_touches_base_at_multiples_of_pi() {
        for k in 0..20 {
            let h = Bounce::BOAT.height(PI * f64::from(k));
            assert!((h - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn bounce_quarter_turn_sequence() {
        let mut phase = 0.0;
        let mut heights = vec![Bounce::BOAT.height(phase)];
        for _ in 0..4 {
            phase = advance_phase(phase, FRAC_PI_2 as f32, 1.0);
            heights.push(Bounce::BOAT.height(phase));
        }
        let expected = [0.2, 0.4, 0.2, 0.4, 0.2];
        for (h, e) in heights.iter().zip(expected) {
            assert!((h - e).abs() < 1e-6, "{heights:?}");
        }
    }

    #[test]
    fn zero_speed_freezes_phase() {
        assert_eq!(advance_phase(1.25, 0.5, 0.0), 1.25);
        assert_eq!(advance_phase(1.25, 0.0, 3.0), 1.25);
    }

    #[test]
    fn pool_split() {
        let dirs: Vec<Direction> = (0..6).map(|i| Direction::for_pool_index(i, 6)).collect();
        assert_eq!(&dirs[..3], &[Direction::Positive; 3]);
        assert_eq!(&dirs[3..], &[Direction::Negative; 3]);
        assert_eq!(Direction::for_pool_index(1, 3), Direction::Positive);
        assert_eq!(Direction::for_pool_index(2, 3), Direction::Negative);
    }

    #[test]
    fn drift_moves_by_speed_times_delta() {
        let x = drift(10.0, Direction::Positive, 0.5, 2.0, 50.0);
        assert_eq!(x, 11.0);
        let x = drift(10.0, Direction::Negative, 0.5, 2.0, 50.0);
        assert_eq!(x, 9.0);
    }

    #[test]
    fn drift_wraps_to_opposite_bound() {
        assert_eq!(drift(49.9, Direction::Positive, 1.0, 1.0, 50.0), -50.0);
        assert_eq!(drift(-49.9, Direction::Negative, 1.0, 1.0, 50.0), 50.0);
        // Landing exactly on the bound is not a crossing.
        assert_eq!(drift(49.0, Direction::Positive, 1.0, 1.0, 50.0), 50.0);
    }

    #[test]
    fn drift_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..5_000 {
            let dir = if rng.random_bool(0.5) {
                Direction::Positive
            } else {
                Direction::Negative
            };
            let x0: f32 = rng.random_range(-50.0..=50.0);
            let speed: f32 = rng.random_range(0.0..=10.0);
            let delta: f32 = rng.random_range(0.0..=0.5);
            let x1 = drift(x0, dir, speed, delta, CLOUD_WRAP_BOUND);
            assert!((-50.0..=50.0).contains(&x1));
            let wrapped = x1 == -dir.sign() * CLOUD_WRAP_BOUND && x1 != x0;
            if !wrapped {
                assert!((x1 - x0).abs() <= speed * delta + 1e-4);
            }
        }
    }

    #[test]
    fn ellipse_points_lie_on_ellipse() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..2_000 {
            let e = Ellipse {
                center_x: rng.random_range(-50.0..50.0),
                center_z: rng.random_range(-50.0..50.0),
                radius_x: rng.random_range(5.0..50.0),
                radius_z: rng.random_range(5.0..50.0),
            };
            let phase: f64 = rng.random_range(0.0..1_000.0);
            let (x, z) = e.point(phase);
            assert!((e.normalized_radius(x, z) - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn heading_is_tangent() {
        let e = Ellipse {
            center_x: -9.0,
            center_z: 0.0,
            radius_x: 16.0,
            radius_z: 30.0,
        };
        let phase = 0.7;
        let h = e.heading(phase);
        let expected = (30.0 * phase.cos()).atan2(16.0 * phase.sin()) as f32;
        assert!((h - expected).abs() < 1e-6);
        // Differs from the raw phase when the radii differ.
        assert!((h - phase as f32).abs() > 1e-3);
    }

    #[test]
    fn orbit_scenario_point() {
        let e = Ellipse::from_params(&AnimationParams::default());
        let phase = advance_phase(0.0, 1.0, 0.2);
        let (x, z) = e.point(phase);
        assert!((x - 6.681).abs() < 1e-2, "x = {x}");
        assert!((z - 5.960).abs() < 1e-2, "z = {z}");
    }
}
