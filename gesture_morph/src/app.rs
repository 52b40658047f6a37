//! Top-level application state machine.
//!
//! `AppState` owns the `ParticleSet`, the `Stepper` and the random source.
//! It turns incoming landmark frames into shape changes and drives the
//! visualizer each frame.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use morph_core::gesture::PEACE_MESSAGE;
use morph_core::{
    classify, generate, GestureLabel, HandLandmarks, ParticleSet, ParticleSink, Shape, Stepper,
    DEFAULT_ALPHA,
};

use crate::error::{AppError, Result};
use crate::source::{
    spawn_landmark_source, LandmarkFrame, LandmarkSource, ReplayLandmarkSource, SimInput,
    SimLandmarkSource,
};
use crate::visualizer::{Control, Visualizer};

pub const STATUS_IDLE:     &str = "TAP TO START";
pub const STATUS_LOADING:  &str = "Loading...";
pub const STATUS_DETECTED: &str = "Gesture Detected!";

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub particle_count: usize,
    /// Text spelled out by the peace gesture.
    pub message:        String,
    pub alpha:          f32,
    pub width:          usize,
    pub height:         usize,
    /// Replay landmarks from this JSON-lines file instead of the keyboard.
    pub replay:         Option<PathBuf>,
    pub replay_interval: Duration,
    pub replay_loop:    bool,
    /// Fixed seed for reproducible shapes; random when absent.
    pub seed:           Option<u64>,
    /// Start tracking immediately instead of waiting for a click.
    pub autostart:      bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            particle_count:  8000,
            message:         PEACE_MESSAGE.to_string(),
            alpha:           DEFAULT_ALPHA,
            width:           960,
            height:          640,
            replay:          None,
            replay_interval: Duration::from_millis(33),
            replay_loop:     false,
            seed:            None,
            autostart:       false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        Stepper::new(self.alpha).map_err(|e| AppError::Config(e.to_string()))?;
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Config(format!(
                "window size must be non-zero, got {}x{}", self.width, self.height
            )));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    particles: ParticleSet,
    stepper:   Stepper,
    rng:       StdRng,
    message:   String,
    /// Gesture whose shape the targets currently hold.
    applied:   GestureLabel,
    tracking:  bool,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_os_rng(),
        };
        let stepper   = Stepper::new(cfg.alpha)?;
        let particles = ParticleSet::spawn(generate(&Shape::Scatter, cfg.particle_count, &mut rng))?;

        Ok(AppState {
            particles,
            stepper,
            rng,
            message:  cfg.message.clone(),
            // The startup scatter is what a fist would summon.
            applied:  GestureLabel::Fist,
            tracking: false,
            status:   STATUS_IDLE.to_string(),
        })
    }

    /// Tracking has been requested; frames will follow.
    pub fn start_tracking(&mut self) {
        self.tracking = true;
        self.status   = STATUS_LOADING.to_string();
    }

    // ── process one landmark frame ────────────────────────────────────────

    /// Classify a frame and, on a gesture transition, publish the new shape.
    pub fn handle_frame(&mut self, frame: Option<HandLandmarks>) -> GestureLabel {
        let label = classify(frame.as_ref());
        if frame.is_some() {
            self.status = STATUS_DETECTED.to_string();
        }
        debug!("frame classified as {}", label.as_str());

        if label == GestureLabel::None || label == self.applied {
            return label;
        }
        let Some(shape) = label.shape() else { return label };
        let shape = match shape {
            Shape::Glyph(_) => Shape::Glyph(self.message.clone()),
            other           => other,
        };

        let targets = generate(&shape, self.particles.len(), &mut self.rng);
        match self.particles.set_targets(targets) {
            Ok(()) => {
                info!("{} → {}", label.as_str(), shape.name());
                self.applied = label;
            }
            Err(e) => error!("could not publish {} targets: {}", shape.name(), e),
        }
        label
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Advance the animation one frame and hand the buffers to `sink`.
    pub fn tick<S: ParticleSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        self.stepper.step(&mut self.particles);
        trace!("max gap to target {:.4}", self.particles.max_distance());
        self.particles.flush(sink)
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn particles(&self)   -> &ParticleSet  { &self.particles }
    pub fn applied(&self)     -> GestureLabel  { self.applied }
    pub fn is_tracking(&self) -> bool          { self.tracking }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn build_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Box<dyn LandmarkSource>> {
    Ok(match &cfg.replay {
        Some(path) => Box::new(ReplayLandmarkSource::open(
            path,
            cfg.replay_interval,
            cfg.replay_loop,
        )?),
        None => Box::new(SimLandmarkSource { rx: sim_rx }),
    })
}

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer
/// and the landmark source (keyboard simulation, or a replay file), waits for
/// a click / Enter unless `autostart` is set, and drives the event/render
/// loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<()> {
    cfg.validate()?;

    // ── Sim input channel ─────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut pending = Some(build_source(&cfg, sim_rx)?);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new("Gesture Morph", cfg.width, cfg.height, sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg)?;
    info!("{} particles, alpha {}", app.particles().len(), cfg.alpha);

    let mut frames: Option<Receiver<LandmarkFrame>> = None;
    let mut start   = cfg.autostart;

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input
        match vis.poll_input() {
            Control::Quit     => break,
            Control::Start    => start = true,
            Control::Continue => {}
        }

        // 2. Start the landmark source on first request
        if start {
            if let Some(source) = pending.take() {
                app.start_tracking();
                vis.set_tracking(true);
                frames = Some(spawn_landmark_source(source));
            }
        }

        // 3. Drain landmark frames
        let mut finished = false;
        if let Some(rx) = &frames {
            loop {
                match rx.try_recv() {
                    Ok(frame) => { app.handle_frame(frame); }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            // Keep animating toward the last shape.
            info!("landmark source finished");
            frames = None;
        }

        // 4. Per-frame animation
        app.tick(&mut vis);

        // 5. Render
        vis.render(&app.status)?;
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
