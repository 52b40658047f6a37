//! Shape generator — target position and color for every particle.
//!
//! Generation is pure apart from the caller-supplied random source, and total
//! for any particle count (zero included).  The result is a complete
//! [`ShapeTargets`] shadow buffer; publishing it is the particle set's job.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::glyph;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// Scatter targets fill the cube `[-12.5, 12.5)³`.
pub const SCATTER_HALF_EXTENT: f32 = 12.5;

/// The heart curve spans roughly 32 × 29 units before this factor.
pub const HEART_SCALE:     f32 = 0.25;
pub const HEART_DEPTH:     f32 = 0.5;
pub const CIRCLE_RADIUS:   f32 = 5.0;
pub const CIRCLE_JITTER:   f32 = 0.25;
pub const CIRCLE_DEPTH:    f32 = 1.0;
pub const GLYPH_DEPTH:     f32 = 0.5;

pub const HEART_COLOR:  Vec3 = Vec3::new(1.0, 0.0, 0.4);
pub const CIRCLE_COLOR: Vec3 = Vec3::new(0.4, 0.0, 1.0);
pub const GLYPH_COLOR:  Vec3 = Vec3::new(0.0, 1.0, 1.0);

// ════════════════════════════════════════════════════════════════════════════
// Shape
// ════════════════════════════════════════════════════════════════════════════

/// A named target formation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Independent uniform positions and colors.
    Scatter,
    /// Parametric heart curve, flat red-pink.
    Heart,
    /// Noisy ring around the origin, purple.
    Circle,
    /// Outline of the rasterized message, cyan.
    Glyph(String),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Scatter  => "scatter",
            Shape::Heart    => "heart",
            Shape::Circle   => "circle",
            Shape::Glyph(_) => "glyph-text",
        }
    }
}

/// Complete target buffers for one shape, one entry per particle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeTargets {
    pub positions: Vec<Vec3>,
    pub colors:    Vec<Vec3>,
}

impl ShapeTargets {
    fn with_capacity(count: usize) -> Self {
        ShapeTargets {
            positions: Vec::with_capacity(count),
            colors:    Vec::with_capacity(count),
        }
    }

    pub fn len(&self) -> usize { self.positions.len() }

    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    fn push(&mut self, position: Vec3, color: Vec3) {
        self.positions.push(position);
        self.colors.push(color);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// generate
// ════════════════════════════════════════════════════════════════════════════

/// Compute targets for `count` particles arranged as `shape`.
pub fn generate<R: Rng>(shape: &Shape, count: usize, rng: &mut R) -> ShapeTargets {
    let mut out = ShapeTargets::with_capacity(count);

    match shape {
        Shape::Scatter => {
            let e = SCATTER_HALF_EXTENT;
            for _ in 0..count {
                let p = Vec3::new(
                    rng.random_range(-e..e),
                    rng.random_range(-e..e),
                    rng.random_range(-e..e),
                );
                let c = Vec3::new(rng.random(), rng.random(), rng.random());
                out.push(p, c);
            }
        }

        Shape::Heart => {
            for _ in 0..count {
                let t  = rng.random_range(0.0..TAU);
                let xy = heart_curve(t) * HEART_SCALE;
                let z  = rng.random_range(-HEART_DEPTH..HEART_DEPTH);
                out.push(xy.extend(z), HEART_COLOR);
            }
        }

        Shape::Circle => {
            for _ in 0..count {
                let angle  = rng.random_range(0.0..TAU);
                let radius = CIRCLE_RADIUS + rng.random_range(-CIRCLE_JITTER..CIRCLE_JITTER);
                let z      = rng.random_range(-CIRCLE_DEPTH..CIRCLE_DEPTH);
                out.push(
                    Vec3::new(angle.cos() * radius, angle.sin() * radius, z),
                    CIRCLE_COLOR,
                );
            }
        }

        Shape::Glyph(message) => {
            let pts = glyph::text_points(message);
            if pts.is_empty() && count > 0 {
                log::debug!("message {:?} rasterized to nothing; collapsing to origin", message);
            }
            for i in 0..count {
                // Far more particles than glyph samples: points are reused cyclically.
                let xy = if pts.is_empty() { Vec2::ZERO } else { pts[i % pts.len()] };
                let z  = rng.random_range(-GLYPH_DEPTH..GLYPH_DEPTH);
                out.push(xy.extend(z), GLYPH_COLOR);
            }
        }
    }

    out
}

/// The classic heart curve, unscaled:
/// `x = 16 sin³t`, `y = 13 cos t − 5 cos 2t − 2 cos 3t − cos 4t`.
pub fn heart_curve(t: f32) -> Vec2 {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos()
        - 5.0 * (2.0 * t).cos()
        - 2.0 * (3.0 * t).cos()
        - (4.0 * t).cos();
    Vec2::new(x, y)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use test_case::test_case;

    fn rng() -> StdRng { StdRng::seed_from_u64(0x5eed) }

    fn all_shapes() -> Vec<Shape> {
        vec![
            Shape::Scatter,
            Shape::Heart,
            Shape::Circle,
            Shape::Glyph("I LOVE YOU".to_string()),
            Shape::Glyph(String::new()),
        ]
    }

    #[test_case(0    ; "empty")]
    #[test_case(1    ; "single")]
    #[test_case(8000 ; "full field")]
    fn every_shape_fills_exactly_n(count: usize) {
        let mut rng = rng();
        for shape in all_shapes() {
            let t = generate(&shape, count, &mut rng);
            assert_eq!(t.len(), count, "{} positions", shape.name());
            assert_eq!(t.colors.len(), count, "{} colors", shape.name());
            assert_eq!(t.is_empty(), count == 0, "{}", shape.name());
        }
    }

    #[test]
    fn scatter_stays_inside_the_cube() {
        let t = generate(&Shape::Scatter, 2000, &mut rng());
        for p in &t.positions {
            assert!(p.abs().max_element() <= SCATTER_HALF_EXTENT);
        }
        for c in &t.colors {
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
        // Not all the same point.
        assert_ne!(t.positions[0], t.positions[1]);
    }

    #[test]
    fn heart_points_lie_on_the_curve() {
        // Replay the generator's draws with an identically seeded source.
        let t = generate(&Shape::Heart, 500, &mut rng());
        let mut replay = rng();
        for p in &t.positions {
            let param = replay.random_range(0.0..TAU);
            let z     = replay.random_range(-HEART_DEPTH..HEART_DEPTH);
            let expected = heart_curve(param);
            assert!((p.truncate() / HEART_SCALE - expected).length() < 1e-4);
            assert_eq!(p.z, z);
        }
        assert!(t.colors.iter().all(|c| *c == HEART_COLOR));
    }

    #[test]
    fn circle_is_a_noisy_ring() {
        let t = generate(&Shape::Circle, 2000, &mut rng());
        for p in &t.positions {
            let r = p.truncate().length();
            assert!(r >= CIRCLE_RADIUS - CIRCLE_JITTER - 1e-4);
            assert!(r <= CIRCLE_RADIUS + CIRCLE_JITTER + 1e-4);
            assert!(p.z.abs() <= CIRCLE_DEPTH);
        }
        assert!(t.colors.iter().all(|c| *c == CIRCLE_COLOR));
    }

    #[test]
    fn unrenderable_message_collapses_to_origin() {
        let t = generate(&Shape::Glyph(String::new()), 300, &mut rng());
        for p in &t.positions {
            assert_eq!(p.truncate(), Vec2::ZERO);
            assert!(p.z.abs() <= GLYPH_DEPTH);
        }
        assert!(t.colors.iter().all(|c| *c == GLYPH_COLOR));
    }

    #[test]
    fn glyph_points_are_reused_cyclically() {
        let pts = glyph::text_points("I LOVE YOU");
        assert!(!pts.is_empty());

        let count = pts.len() * 3 + 7;
        let t = generate(&Shape::Glyph("I LOVE YOU".into()), count, &mut rng());
        for (i, p) in t.positions.iter().enumerate() {
            assert_eq!(p.truncate(), pts[i % pts.len()]);
        }
    }

    #[test]
    fn heart_curve_known_points() {
        // t = 0 is the top notch, t = π the bottom tip.
        assert!((heart_curve(0.0) - Vec2::new(0.0, 5.0)).length() < 1e-5);
        assert!((heart_curve(std::f32::consts::PI) - Vec2::new(0.0, -17.0)).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn heart_curve_is_mirror_symmetric(t in 0.0f32..TAU) {
            let a = heart_curve(t);
            let b = heart_curve(-t);
            prop_assert!((a.x + b.x).abs() < 1e-3);
            prop_assert!((a.y - b.y).abs() < 1e-3);
        }

        #[test]
        fn heart_curve_matches_closed_form(t in 0.0f32..TAU) {
            let p = heart_curve(t);
            let (s, c) = (t.sin(), t.cos());
            // cos 2t, cos 3t, cos 4t in terms of cos t.
            let c2 = 2.0 * c * c - 1.0;
            let c3 = 4.0 * c * c * c - 3.0 * c;
            let c4 = 2.0 * c2 * c2 - 1.0;
            prop_assert!((p.x - 16.0 * s * s * s).abs() < 1e-3);
            prop_assert!((p.y - (13.0 * c - 5.0 * c2 - 2.0 * c3 - c4)).abs() < 1e-3);
        }
    }
}
