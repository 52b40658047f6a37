//! Gesture classification from a single frame of hand landmarks.
//!
//! The classifier is purely geometric: it compares a handful of landmark
//! coordinates in normalised image space (x to the right, y **down**).
//! Several predicates can hold at once, so they are tried in the fixed order
//! of [`GESTURE_RULES`] and the first match wins.
//!
//! ## Landmarks consulted
//!
//! | Index | Joint |
//! |---|---|
//! | 3, 4 | thumb IP joint, thumb tip |
//! | 6, 8 | index PIP joint, index tip |
//! | 10, 12 | middle PIP joint, middle tip |
//! | 14, 16 | ring PIP joint, ring tip |
//! | 19, 20 | pinky DIP joint, pinky tip |

use std::ops::Index;

use glam::Vec3;

use crate::error::LandmarkError;
use crate::shapes::Shape;

/// Points per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Thumb-tip to index-tip distance (image plane) below which fingers pinch.
pub const PINCH_DISTANCE: f32 = 0.05;

/// Message spelled out by the peace sign.
pub const PEACE_MESSAGE: &str = "I LOVE YOU";

const THUMB_IP:   usize = 3;
const THUMB_TIP:  usize = 4;
const INDEX_PIP:  usize = 6;
const INDEX_TIP:  usize = 8;
const MIDDLE_PIP: usize = 10;
const MIDDLE_TIP: usize = 12;
const RING_PIP:   usize = 14;
const RING_TIP:   usize = 16;
const PINKY_DIP:  usize = 19;
const PINKY_TIP:  usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// One hand's 21 tracked points for a single camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks(pub [Vec3; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn from_points(points: &[Vec3]) -> Result<Self, LandmarkError> {
        let arr: [Vec3; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            LandmarkError::WrongCount { expected: LANDMARK_COUNT, got: points.len() }
        })?;
        Ok(HandLandmarks(arr))
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] { &self.0 }
}

impl Index<usize> for HandLandmarks {
    type Output = Vec3;

    fn index(&self, i: usize) -> &Vec3 { &self.0[i] }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel
// ════════════════════════════════════════════════════════════════════════════

/// Discrete hand pose for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GestureLabel {
    /// No hand, or a hand matching none of the rules.
    #[default]
    None,
    Fist,
    Wave,
    Pinch,
    Peace,
}

impl GestureLabel {
    /// The formation this gesture summons.  `None` keeps the current one.
    pub fn shape(self) -> Option<Shape> {
        match self {
            GestureLabel::None  => None,
            GestureLabel::Fist  => Some(Shape::Scatter),
            GestureLabel::Wave  => Some(Shape::Circle),
            GestureLabel::Pinch => Some(Shape::Heart),
            GestureLabel::Peace => Some(Shape::Glyph(PEACE_MESSAGE.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::None  => "none",
            GestureLabel::Fist  => "fist",
            GestureLabel::Wave  => "wave",
            GestureLabel::Pinch => "pinch",
            GestureLabel::Peace => "peace",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rules
// ════════════════════════════════════════════════════════════════════════════

pub type GesturePredicate = fn(&HandLandmarks) -> bool;

/// Classification precedence, highest first.
///
/// Fist and Wave overlap (a curled index with curled middle and ring fingers
/// satisfies both); Fist is tested first.
pub const GESTURE_RULES: [(GestureLabel, GesturePredicate); 4] = [
    (GestureLabel::Fist,  is_fist),
    (GestureLabel::Wave,  is_wave),
    (GestureLabel::Pinch, is_pinch),
    (GestureLabel::Peace, is_peace),
];

/// Label for one frame.  `None` when no hand was detected.
pub fn classify(landmarks: Option<&HandLandmarks>) -> GestureLabel {
    let Some(hand) = landmarks else {
        return GestureLabel::None;
    };
    GESTURE_RULES
        .iter()
        .find(|(_, matches)| matches(hand))
        .map_or(GestureLabel::None, |(label, _)| *label)
}

fn curled(m: &HandLandmarks, tip: usize, pip: usize) -> bool {
    m[tip].y > m[pip].y
}

fn extended(m: &HandLandmarks, tip: usize, pip: usize) -> bool {
    m[tip].y < m[pip].y
}

/// Index, middle and ring fingers all curled.
pub fn is_fist(m: &HandLandmarks) -> bool {
    curled(m, INDEX_TIP, INDEX_PIP)
        && curled(m, MIDDLE_TIP, MIDDLE_PIP)
        && curled(m, RING_TIP, RING_PIP)
}

/// Thumb and pinky splayed outward, index curled.
pub fn is_wave(m: &HandLandmarks) -> bool {
    m[THUMB_TIP].x < m[THUMB_IP].x
        && m[PINKY_TIP].x > m[PINKY_DIP].x
        && curled(m, INDEX_TIP, INDEX_PIP)
}

/// Thumb tip touching index tip.
pub fn is_pinch(m: &HandLandmarks) -> bool {
    m[INDEX_TIP].truncate().distance(m[THUMB_TIP].truncate()) < PINCH_DISTANCE
}

/// Index and middle extended, ring curled.
pub fn is_peace(m: &HandLandmarks) -> bool {
    extended(m, INDEX_TIP, INDEX_PIP)
        && extended(m, MIDDLE_TIP, MIDDLE_PIP)
        && curled(m, RING_TIP, RING_PIP)
}

// ════════════════════════════════════════════════════════════════════════════
// Canned poses
// ════════════════════════════════════════════════════════════════════════════

/// Plausible right-hand landmark sets, palm toward the camera, one per label.
/// Used by keyboard simulation and tests.
pub mod poses {
    use super::{HandLandmarks, LANDMARK_COUNT};
    use glam::Vec3;

    #[derive(Clone, Copy)]
    enum Finger {
        Extended,
        Curled,
        /// Extended and leaning away from the palm (pinky only).
        Splayed,
    }

    #[derive(Clone, Copy)]
    enum Thumb {
        /// Pointing out to the left.
        Splayed,
        /// Folded across the palm.
        Tucked,
        /// Tip resting on the extended index tip.
        Pinching,
    }

    const WRIST:     Vec3 = Vec3::new(0.48, 0.80, 0.0);
    const FINGER_X:  [f32; 4] = [0.42, 0.48, 0.54, 0.60];
    const MCP_Y:     f32 = 0.60;

    fn finger(x: f32, state: Finger) -> [Vec3; 4] {
        let p = |x: f32, y: f32| Vec3::new(x, y, 0.0);
        match state {
            Finger::Extended => [p(x, MCP_Y), p(x, 0.52), p(x, 0.46), p(x, 0.40)],
            Finger::Curled   => [p(x, MCP_Y), p(x, 0.55), p(x, 0.58), p(x, 0.61)],
            Finger::Splayed  => [
                p(x, 0.62),
                p(x + 0.03, 0.56),
                p(x + 0.05, 0.51),
                p(x + 0.07, 0.47),
            ],
        }
    }

    fn thumb(state: Thumb) -> [Vec3; 4] {
        let p = |x: f32, y: f32| Vec3::new(x, y, 0.0);
        match state {
            Thumb::Splayed  => [p(0.42, 0.75), p(0.37, 0.70), p(0.32, 0.66), p(0.27, 0.63)],
            Thumb::Tucked   => [p(0.42, 0.75), p(0.40, 0.72), p(0.42, 0.70), p(0.50, 0.72)],
            Thumb::Pinching => [p(0.42, 0.75), p(0.38, 0.66), p(0.38, 0.55), p(0.43, 0.41)],
        }
    }

    fn hand(t: Thumb, fingers: [Finger; 4]) -> HandLandmarks {
        let mut pts = [Vec3::ZERO; LANDMARK_COUNT];
        pts[0] = WRIST;
        pts[1..5].copy_from_slice(&thumb(t));
        for (i, (x, state)) in FINGER_X.iter().zip(fingers).enumerate() {
            let start = 5 + i * 4;
            pts[start..start + 4].copy_from_slice(&finger(*x, state));
        }
        HandLandmarks(pts)
    }

    /// All four fingers curled, thumb folded across them.
    pub fn fist() -> HandLandmarks {
        use Finger::Curled;
        hand(Thumb::Tucked, [Curled, Curled, Curled, Curled])
    }

    /// Thumb and pinky out, index curled, middle and ring up.
    pub fn wave() -> HandLandmarks {
        use Finger::*;
        hand(Thumb::Splayed, [Curled, Extended, Extended, Splayed])
    }

    /// Thumb tip on index tip, remaining fingers up ("OK" sign).
    pub fn pinch() -> HandLandmarks {
        use Finger::Extended;
        hand(Thumb::Pinching, [Extended, Extended, Extended, Extended])
    }

    /// Index and middle up, ring and pinky curled.
    pub fn peace() -> HandLandmarks {
        use Finger::*;
        hand(Thumb::Tucked, [Extended, Extended, Curled, Curled])
    }

    /// Flat open palm: matches no rule.
    pub fn open_palm() -> HandLandmarks {
        use Finger::Extended;
        hand(Thumb::Splayed, [Extended, Extended, Extended, Extended])
    }

    /// "Hang loose": thumb and pinky out, the rest curled.  Satisfies both
    /// the fist and the wave rule.
    pub fn shaka() -> HandLandmarks {
        use Finger::*;
        hand(Thumb::Splayed, [Curled, Curled, Curled, Splayed])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
