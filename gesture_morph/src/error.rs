use std::io;

use morph_core::{LandmarkError, ParticleError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("replay line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("replay line {line}: {source}")]
    Landmarks {
        line: usize,
        #[source]
        source: LandmarkError,
    },

    #[error("particle setup: {0}")]
    Particles(#[from] ParticleError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
