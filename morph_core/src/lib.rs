//! # morph_core
//!
//! A fixed-size particle field that morphs between generated target shapes,
//! with a small geometric classifier that turns a hand-landmark snapshot into
//! a discrete gesture label.
//!
//! Nothing in this crate knows about windows, cameras or landmark models.
//! Landmarks come in as plain [`HandLandmarks`] snapshots; buffers go out
//! through the [`ParticleSink`] trait.
//!
//! ## Data flow
//!
//! ```text
//! HandLandmarks ─► classify() ─► GestureLabel ─► Shape ─► generate() ─► ShapeTargets
//!                                                                           │
//!                                                     ParticleSet::set_targets
//!                                                                           ▼
//!                          ParticleSink ◄── flush() ◄── Stepper::step(ParticleSet)
//! ```
//!
//! ## Gesture → Shape mapping
//!
//! | Gesture | Shape | Color |
//! |---|---|---|
//! | Fist  | scatter (uniform cube, 25 units wide) | random |
//! | Wave  | ring of radius 5 | purple |
//! | Pinch | heart curve | red-pink |
//! | Peace | glyph text `"I LOVE YOU"` | cyan |
//!
//! ## Quick start
//!
//! ```rust
//! use morph_core::{classify, generate, ParticleSet, Shape, Stepper};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut set = ParticleSet::spawn(generate(&Shape::Scatter, 500, &mut rng)).unwrap();
//! let stepper = Stepper::default();
//!
//! // No hand in frame: nothing changes.
//! assert!(classify(None).shape().is_none());
//!
//! set.set_targets(generate(&Shape::Circle, 500, &mut rng)).unwrap();
//! for _ in 0..60 {
//!     stepper.step(&mut set);
//! }
//! assert!(set.max_distance() < 1.0);
//! ```

pub mod error;
pub mod gesture;
pub mod glyph;
pub mod particles;
pub mod shapes;

pub use error::{LandmarkError, ParticleError};
pub use gesture::{classify, GestureLabel, HandLandmarks, GESTURE_RULES, LANDMARK_COUNT};
pub use particles::{Dirty, ParticleSet, ParticleSink, Stepper, DEFAULT_ALPHA};
pub use shapes::{generate, heart_curve, Shape, ShapeTargets};
