//! Landmark sources — keyboard simulation and recorded replays.
//!
//! The public interface is a stream of [`LandmarkFrame`]s delivered over a
//! `mpsc` channel, one per processed camera frame: `Some(hand)` when a hand
//! was detected, `None` when the frame was empty.  Consumers don't need to
//! know whether frames came from a simulator or a file, and the source runs
//! at its own cadence, independent of the render loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use glam::Vec3;
use log::{debug, info, warn};
use serde::Deserialize;

use morph_core::gesture::poses;
use morph_core::HandLandmarks;

use crate::error::AppError;

/// Zero or one hand for one processed camera frame.
pub type LandmarkFrame = Option<HandLandmarks>;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`LandmarkFrame`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn name(&self) -> &'static str;

    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
///
/// The receiver disconnects when the source finishes.
pub fn spawn_landmark_source(source: Box<dyn LandmarkSource>) -> Receiver<LandmarkFrame> {
    let (tx, rx) = mpsc::channel();
    info!("starting {} landmark source", source.name());
    thread::spawn(move || source.run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    NoHand,     // 0
    Fist,       // 1
    Wave,       // 2
    Pinch,      // 3
    Peace,      // 4
    OpenPalm,   // 5
}

impl SimKey {
    /// The frame a camera would have produced for this pose.
    pub fn frame(self) -> LandmarkFrame {
        match self {
            SimKey::NoHand   => None,
            SimKey::Fist     => Some(poses::fist()),
            SimKey::Wave     => Some(poses::wave()),
            SimKey::Pinch    => Some(poses::pinch()),
            SimKey::Peace    => Some(poses::peace()),
            SimKey::OpenPalm => Some(poses::open_palm()),
        }
    }
}

/// Landmark source driven by [`SimInput`] events (from the visualizer's
/// window): each key press becomes one canned landmark frame.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimLandmarkSource {
    fn name(&self) -> &'static str { "keyboard simulation" }

    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        for input in self.rx {
            let SimInput::KeyDown(key) = input;
            debug!("simulated pose {:?}", key);
            if tx.send(key.frame()).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayLandmarkSource — JSON-lines recording
// ════════════════════════════════════════════════════════════════════════════

/// One recorded point: `[x, y, z]` or `{"x": .., "y": .., "z": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayPoint {
    Triple([f32; 3]),
    Named {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
}

impl From<ReplayPoint> for Vec3 {
    fn from(p: ReplayPoint) -> Vec3 {
        match p {
            ReplayPoint::Triple(a)        => Vec3::from(a),
            ReplayPoint::Named { x, y, z } => Vec3::new(x, y, z),
        }
    }
}

/// One recorded frame: a bare point list / `null`, or an object with a
/// `landmarks` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Bare(Option<Vec<ReplayPoint>>),
    Tagged { landmarks: Option<Vec<ReplayPoint>> },
}

/// Parse one line of a replay file.  `line` is 1-based, for error messages.
pub fn parse_replay_line(text: &str, line: usize) -> Result<LandmarkFrame, AppError> {
    let parsed: ReplayLine = serde_json::from_str(text)
        .map_err(|source| AppError::Replay { line, source })?;

    let points = match parsed {
        ReplayLine::Bare(p) | ReplayLine::Tagged { landmarks: p } => p,
    };
    let Some(points) = points else { return Ok(None) };

    let points: Vec<Vec3> = points.into_iter().map(Vec3::from).collect();
    HandLandmarks::from_points(&points)
        .map(Some)
        .map_err(|source| AppError::Landmarks { line, source })
}

/// Plays back a recorded landmark stream at a fixed frame interval.
pub struct ReplayLandmarkSource {
    pub path:     PathBuf,
    pub frames:   Vec<LandmarkFrame>,
    pub interval: Duration,
    /// Start over after the last frame instead of finishing.
    pub looped:   bool,
}

impl ReplayLandmarkSource {
    /// Read and parse a replay file up front.  Blank lines are ignored,
    /// malformed lines are logged and skipped.
    pub fn open(path: &Path, interval: Duration, looped: bool) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)?;

        let mut frames  = Vec::new();
        let mut skipped = 0usize;
        for (i, raw) in text.lines().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() { continue; }
            match parse_replay_line(raw, i + 1) {
                Ok(frame) => frames.push(frame),
                Err(e)    => {
                    warn!("{}: {}", path.display(), e);
                    skipped += 1;
                }
            }
        }
        info!(
            "loaded {} landmark frames from {} ({} skipped)",
            frames.len(), path.display(), skipped
        );

        Ok(ReplayLandmarkSource {
            path: path.to_path_buf(),
            frames,
            interval,
            looped,
        })
    }
}

impl LandmarkSource for ReplayLandmarkSource {
    fn name(&self) -> &'static str { "replay" }

    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        if self.frames.is_empty() {
            warn!("{}: nothing to replay", self.path.display());
            return;
        }
        loop {
            for frame in &self.frames {
                if tx.send(*frame).is_err() { return; }
                thread::sleep(self.interval);
            }
            if !self.looped { break; }
        }
        info!("replay of {} finished", self.path.display());
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::{classify, GestureLabel};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn triples(hand: &HandLandmarks) -> String {
        let pts: Vec<[f32; 3]> = hand.points().iter().map(|p| p.to_array()).collect();
        serde_json::to_string(&pts).unwrap()
    }

    #[test]
    fn sim_keys_produce_matching_labels() {
        let cases = [
            (SimKey::NoHand,   GestureLabel::None),
            (SimKey::Fist,     GestureLabel::Fist),
            (SimKey::Wave,     GestureLabel::Wave),
            (SimKey::Pinch,    GestureLabel::Pinch),
            (SimKey::Peace,    GestureLabel::Peace),
            (SimKey::OpenPalm, GestureLabel::None),
        ];
        for (key, label) in cases {
            assert_eq!(classify(key.frame().as_ref()), label, "{:?}", key);
        }
    }

    #[test]
    fn sim_source_forwards_key_presses() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let frames = spawn_landmark_source(Box::new(SimLandmarkSource { rx: sim_rx }));

        sim_tx.send(SimInput::KeyDown(SimKey::Pinch)).unwrap();
        sim_tx.send(SimInput::KeyDown(SimKey::NoHand)).unwrap();
        drop(sim_tx);

        let got: Vec<LandmarkFrame> = frames.iter().collect();
        assert_eq!(got, vec![Some(poses::pinch()), None]);
    }

    #[test]
    fn parses_null_as_empty_frame() {
        assert_eq!(parse_replay_line("null", 1).unwrap(), None);
        assert_eq!(parse_replay_line(r#"{"landmarks": null}"#, 1).unwrap(), None);
    }

    #[test]
    fn parses_triples_and_named_points() {
        let hand = poses::peace();
        let bare = parse_replay_line(&triples(&hand), 1).unwrap();
        assert_eq!(bare, Some(hand));

        let named: Vec<serde_json::Value> = hand
            .points()
            .iter()
            .map(|p| serde_json::json!({ "x": p.x, "y": p.y }))
            .collect();
        let line = serde_json::json!({ "landmarks": named }).to_string();
        let tagged = parse_replay_line(&line, 1).unwrap().unwrap();
        assert_eq!(classify(Some(&tagged)), GestureLabel::Peace);
    }

    #[test]
    fn rejects_wrong_point_count_and_garbage() {
        let short = serde_json::to_string(&vec![[0.0f32; 3]; 5]).unwrap();
        assert!(matches!(
            parse_replay_line(&short, 3),
            Err(AppError::Landmarks { line: 3, .. })
        ));
        assert!(matches!(
            parse_replay_line("not json", 4),
            Err(AppError::Replay { line: 4, .. })
        ));
    }

    #[test]
    fn replay_skips_bad_lines_and_plays_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", triples(&poses::fist())).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{{ broken").unwrap();
        writeln!(file, "null").unwrap();
        writeln!(file, "{}", triples(&poses::wave())).unwrap();

        let source = ReplayLandmarkSource::open(file.path(), Duration::ZERO, false).unwrap();
        assert_eq!(source.frames.len(), 3);

        let got: Vec<LandmarkFrame> = spawn_landmark_source(Box::new(source)).iter().collect();
        assert_eq!(got, vec![Some(poses::fist()), None, Some(poses::wave())]);
    }

    #[test]
    fn missing_replay_file_is_an_io_error() {
        let err = ReplayLandmarkSource::open(
            Path::new("/definitely/not/here.jsonl"),
            Duration::ZERO,
            false,
        );
        assert!(matches!(err, Err(AppError::Io(_))));
    }
}
