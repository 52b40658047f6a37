//! Particle storage and the per-frame animation stepper.
//!
//! The [`ParticleSet`] exclusively owns four parallel arrays (current and
//! target, position and color).  The shape generator never touches the
//! current arrays: it fills a separate [`ShapeTargets`] shadow buffer which is
//! published here in one move, so the stepper can never observe half of one
//! shape and half of another.

use bitflags::bitflags;
use glam::Vec3;

use crate::error::ParticleError;
use crate::shapes::ShapeTargets;

/// Smoothing factor applied on every tick.
pub const DEFAULT_ALPHA: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// Dirty flags + sink
// ════════════════════════════════════════════════════════════════════════════

bitflags! {
    /// Which attribute buffers must be re-uploaded before the next draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u8 {
        const POSITIONS = 0b01;
        const COLORS    = 0b10;
    }
}

/// Anything that can receive the particle attribute buffers for drawing.
///
/// Both slices are flat `[x0, y0, z0, x1, y1, z1, …]` buffers of length
/// `3 · N`.  Colors are linear RGB in `[0, 1]`.
pub trait ParticleSink {
    fn upload(&mut self, positions: &[f32], colors: &[f32]);
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleSet
// ════════════════════════════════════════════════════════════════════════════

/// Struct-of-arrays particle storage with a fixed count.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    current_positions: Vec<Vec3>,
    target_positions:  Vec<Vec3>,
    current_colors:    Vec<Vec3>,
    target_colors:     Vec<Vec3>,
    dirty:             Dirty,
}

impl ParticleSet {
    /// `count` particles, everything at zero.
    pub fn new(count: usize) -> Self {
        ParticleSet {
            current_positions: vec![Vec3::ZERO; count],
            target_positions:  vec![Vec3::ZERO; count],
            current_colors:    vec![Vec3::ZERO; count],
            target_colors:     vec![Vec3::ZERO; count],
            dirty:             Dirty::all(),
        }
    }

    /// Startup state: particles sit at the origin already wearing the target
    /// colors, and fly out toward `targets` once the stepper starts.
    ///
    /// Ragged `targets` are rejected, as in [`set_targets`](Self::set_targets).
    pub fn spawn(targets: ShapeTargets) -> Result<Self, ParticleError> {
        let ShapeTargets { positions, colors } = targets;
        if positions.len() != colors.len() {
            return Err(ParticleError::Ragged {
                positions: positions.len(),
                colors:    colors.len(),
            });
        }

        Ok(ParticleSet {
            current_positions: vec![Vec3::ZERO; positions.len()],
            target_positions:  positions,
            current_colors:    colors.clone(),
            target_colors:     colors,
            dirty:             Dirty::all(),
        })
    }

    pub fn len(&self) -> usize { self.current_positions.len() }

    pub fn is_empty(&self) -> bool { self.current_positions.is_empty() }

    /// Publish a complete shadow buffer as the new targets.
    ///
    /// Either every target is replaced or, on error, none is.
    pub fn set_targets(&mut self, targets: ShapeTargets) -> Result<(), ParticleError> {
        if targets.positions.len() != targets.colors.len() {
            return Err(ParticleError::Ragged {
                positions: targets.positions.len(),
                colors:    targets.colors.len(),
            });
        }
        if targets.len() != self.len() {
            return Err(ParticleError::CountMismatch {
                expected: self.len(),
                got:      targets.len(),
            });
        }

        self.target_positions = targets.positions;
        self.target_colors    = targets.colors;
        Ok(())
    }

    /// Jump every particle straight onto its target.
    pub fn snap_to_targets(&mut self) {
        self.current_positions.copy_from_slice(&self.target_positions);
        self.current_colors.copy_from_slice(&self.target_colors);
        self.dirty = Dirty::all();
    }

    pub fn current_positions(&self) -> &[Vec3] { &self.current_positions }
    pub fn target_positions(&self)  -> &[Vec3] { &self.target_positions }
    pub fn current_colors(&self)    -> &[Vec3] { &self.current_colors }
    pub fn target_colors(&self)     -> &[Vec3] { &self.target_colors }
    pub fn dirty(&self)             -> Dirty   { self.dirty }

    /// Largest absolute per-component gap between current and target, over
    /// both positions and colors.
    pub fn max_distance(&self) -> f32 {
        let pos = self.current_positions.iter().zip(&self.target_positions);
        let col = self.current_colors.iter().zip(&self.target_colors);
        pos.chain(col)
            .map(|(c, t)| (*t - *c).abs().max_element())
            .fold(0.0, f32::max)
    }

    /// Upload both buffers if anything changed since the last flush.
    /// Returns whether an upload happened.
    pub fn flush<S: ParticleSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if self.dirty.is_empty() {
            return false;
        }
        sink.upload(
            bytemuck::cast_slice(&self.current_positions),
            bytemuck::cast_slice(&self.current_colors),
        );
        self.dirty = Dirty::empty();
        true
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Stepper
// ════════════════════════════════════════════════════════════════════════════

/// First-order exponential approach of every component toward its target.
///
/// α is confined to `(0, 1]`; outside it the update overshoots and the
/// distance to the target stops shrinking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepper {
    alpha: f32,
}

impl Default for Stepper {
    fn default() -> Self {
        Stepper { alpha: DEFAULT_ALPHA }
    }
}

impl Stepper {
    pub fn new(alpha: f32) -> Result<Self, ParticleError> {
        if alpha > 0.0 && alpha <= 1.0 {
            Ok(Stepper { alpha })
        } else {
            Err(ParticleError::InvalidAlpha(alpha))
        }
    }

    pub fn alpha(&self) -> f32 { self.alpha }

    /// Advance one display frame.
    pub fn step(&self, set: &mut ParticleSet) {
        let a = self.alpha;
        for (c, t) in set.current_positions.iter_mut().zip(&set.target_positions) {
            *c += (*t - *c) * a;
        }
        for (c, t) in set.current_colors.iter_mut().zip(&set.target_colors) {
            *c += (*t - *c) * a;
        }
        set.dirty |= Dirty::POSITIONS | Dirty::COLORS;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingSink {
        uploads:   usize,
        positions: Vec<f32>,
        colors:    Vec<f32>,
    }

    impl ParticleSink for RecordingSink {
        fn upload(&mut self, positions: &[f32], colors: &[f32]) {
            self.uploads  += 1;
            self.positions = positions.to_vec();
            self.colors    = colors.to_vec();
        }
    }

    fn two_particles() -> ShapeTargets {
        ShapeTargets {
            positions: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.0, 8.0)],
            colors:    vec![Vec3::new(1.0, 0.0, 0.4), Vec3::new(0.0, 1.0, 1.0)],
        }
    }

    #[test]
    fn spawn_starts_at_origin_with_target_colors() {
        let set = ParticleSet::spawn(two_particles()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.current_positions().iter().all(|p| *p == Vec3::ZERO));
        assert_eq!(set.current_colors(), set.target_colors());
    }

    #[test]
    fn one_step_moves_a_tenth_of_the_way() {
        let mut set = ParticleSet::spawn(two_particles()).unwrap();
        Stepper::default().step(&mut set);
        let p = set.current_positions()[0];
        assert!((p - Vec3::new(0.1, 0.2, 0.3)).abs().max_element() < 1e-6);
    }

    #[test]
    fn target_is_a_fixed_point() {
        let mut set = ParticleSet::spawn(two_particles()).unwrap();
        set.snap_to_targets();
        let before = set.clone();
        Stepper::default().step(&mut set);
        assert_eq!(set.current_positions(), before.current_positions());
        assert_eq!(set.current_colors(), before.current_colors());
    }

    #[test]
    fn count_mismatch_leaves_targets_untouched() {
        let mut set = ParticleSet::spawn(two_particles()).unwrap();
        let wrong = ShapeTargets {
            positions: vec![Vec3::ONE; 3],
            colors:    vec![Vec3::ONE; 3],
        };
        assert_eq!(
            set.set_targets(wrong),
            Err(ParticleError::CountMismatch { expected: 2, got: 3 })
        );
        assert_eq!(set.target_positions(), two_particles().positions.as_slice());
    }

    #[test]
    fn ragged_targets_are_rejected() {
        let mut set = ParticleSet::new(2);
        let ragged = ShapeTargets {
            positions: vec![Vec3::ONE; 2],
            colors:    vec![Vec3::ONE; 1],
        };
        assert_eq!(
            set.set_targets(ragged),
            Err(ParticleError::Ragged { positions: 2, colors: 1 })
        );
    }

    #[test]
    fn spawn_rejects_ragged_targets() {
        let ragged = ShapeTargets {
            positions: vec![Vec3::ONE; 3],
            colors:    vec![Vec3::ONE; 2],
        };
        assert_eq!(
            ParticleSet::spawn(ragged).unwrap_err(),
            ParticleError::Ragged { positions: 3, colors: 2 }
        );
    }

    #[test]
    fn alpha_outside_unit_interval_is_rejected() {
        for bad in [0.0, -0.1, 1.5, 2.5, f32::NAN] {
            assert!(matches!(Stepper::new(bad), Err(ParticleError::InvalidAlpha(_))), "{bad}");
        }
        assert_eq!(Stepper::new(1.0).unwrap().alpha(), 1.0);
        assert_eq!(Stepper::default().alpha(), DEFAULT_ALPHA);
    }

    #[test]
    fn alpha_of_one_lands_in_a_single_step() {
        let mut set = ParticleSet::spawn(two_particles()).unwrap();
        Stepper::new(1.0).unwrap().step(&mut set);
        assert_eq!(set.max_distance(), 0.0);
    }

    #[test]
    fn flush_uploads_flat_buffers_once_per_step() {
        let mut set = ParticleSet::spawn(two_particles()).unwrap();
        let mut sink = RecordingSink::default();

        assert!(set.flush(&mut sink));
        assert!(!set.flush(&mut sink));
        assert_eq!(sink.uploads, 1);

        set.snap_to_targets();
        Stepper::default().step(&mut set);
        assert_eq!(set.dirty(), Dirty::POSITIONS | Dirty::COLORS);
        assert!(set.flush(&mut sink));
        assert_eq!(sink.uploads, 2);
        assert_eq!(sink.positions, vec![1.0, 2.0, 3.0, -4.0, 0.0, 8.0]);
        assert_eq!(sink.colors.len(), 6);
    }

    #[test]
    fn empty_set_steps_and_flushes() {
        let mut set = ParticleSet::new(0);
        let mut sink = RecordingSink::default();
        Stepper::default().step(&mut set);
        assert!(set.flush(&mut sink));
        assert!(sink.positions.is_empty());
        assert_eq!(set.max_distance(), 0.0);
    }
}
