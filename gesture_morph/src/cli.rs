//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "gesture_morph")]
#[command(about = "Hand-gesture controlled particle morphing", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Number of particles in the field
    #[arg(short = 'n', long, default_value_t = 8000)]
    pub particles: usize,

    /// Text spelled out by the peace gesture
    #[arg(short, long, default_value = "I LOVE YOU")]
    pub message: String,

    /// Per-frame smoothing factor, in (0, 1]
    #[arg(long, default_value_t = morph_core::DEFAULT_ALPHA)]
    pub alpha: f32,

    /// Window width in pixels
    #[arg(long, default_value_t = 960)]
    pub width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 640)]
    pub height: usize,

    /// Replay landmark frames from a JSON-lines file instead of the keyboard
    #[arg(short, long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Delay between replayed frames
    #[arg(long, default_value_t = 33, value_name = "MS")]
    pub replay_interval_ms: u64,

    /// Loop the replay file forever
    #[arg(long)]
    pub replay_loop: bool,

    /// Seed for reproducible shapes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start tracking without waiting for a click
    #[arg(long)]
    pub autostart: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        if self.verbose > 0 {
            Some(match self.verbose {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            })
        } else if self.quiet {
            Some(log::LevelFilter::Error)
        } else {
            None
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            particle_count:  self.particles,
            message:         self.message.clone(),
            alpha:           self.alpha,
            width:           self.width,
            height:          self.height,
            replay:          self.replay.clone(),
            replay_interval: Duration::from_millis(self.replay_interval_ms),
            replay_loop:     self.replay_loop,
            seed:            self.seed,
            autostart:       self.autostart,
        }
    }
}
