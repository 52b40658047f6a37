//! Error types for the core crate.
//!
//! Shape generation, classification and stepping are total; only the
//! boundaries that accept caller-built data can fail.

use thiserror::Error;

/// Rejected buffer publication on a [`ParticleSet`](crate::ParticleSet), or
/// an unusable [`Stepper`](crate::Stepper) factor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParticleError {
    /// The shadow buffer was generated for a different particle count.
    #[error("target buffer holds {got} particles, particle set holds {expected}")]
    CountMismatch { expected: usize, got: usize },

    /// Positions and colors of a shadow buffer disagree in length.
    #[error("target buffer has {positions} positions but {colors} colors")]
    Ragged { positions: usize, colors: usize },

    #[error("smoothing factor must be in (0, 1], got {0}")]
    InvalidAlpha(f32),
}

/// Malformed landmark snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected {expected} hand landmarks, got {got}")]
    WrongCount { expected: usize, got: usize },
}
