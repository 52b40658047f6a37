//! # gesture_morph
//!
//! Hand-gesture controller for the `morph_core` particle field, with a
//! software point-cloud renderer.
//!
//! ## Gesture → Shape mapping
//!
//! | Gesture | Shape |
//! |---|---|
//! | Fist | scatter |
//! | Wave (thumb and pinky out, index curled) | circle |
//! | Pinch (thumb tip on index tip) | heart |
//! | Peace (index and middle up, ring curled) | glyph text, `--message` |
//! | No hand / anything else | keep current shape |
//!
//! ## Landmark sources
//!
//! * (default) — **Simulation mode**: number keys inject canned hand poses.
//! * `--replay FILE` — **Replay mode**: plays back a JSON-lines landmark
//!   recording, one frame per line (`null`, a list of 21 `[x, y, z]`
//!   triples, or `{"landmarks": [...]}` with `{x, y, z}` points).
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | Click / `Enter` | Start tracking |
//! | `0` | Frame with no hand |
//! | `1` | Fist |
//! | `2` | Wave |
//! | `3` | Pinch |
//! | `4` | Peace |
//! | `5` | Open palm (no gesture) |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod camera;
pub mod cli;
pub mod error;
pub mod source;
pub mod visualizer;
