//! Software-rendered point cloud using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ status label                                           │
//! │                                                        │
//! │                 · ·  particle field  · ·               │
//! │                ·   (additive points,    ·              │
//! │                 ·   perspective view)  ·               │
//! │                                                        │
//! │ key legend                                             │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Framebuffer`] does all the drawing and is window-free so it can be
//! tested; [`Visualizer`] owns the window, forwards key presses as
//! [`SimInput`]s and keeps the framebuffer sized to the window.

use std::sync::mpsc::Sender;
use std::time::Duration;

use glam::Vec3;
use log::debug;
use minifb::{Key, KeyRepeat, MouseButton, Window, WindowOptions};

use morph_core::glyph::char_glyph;
use morph_core::ParticleSink;

use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::source::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

/// World-space edge length of one particle.
pub const POINT_SIZE:  f32   = 0.05;
const BG_COLOR:        u32   = 0xFF000000;
const LABEL_COLOR:     u32   = 0xFFEEEEEE;
const LEGEND_COLOR:    u32   = 0xFF888888;
const LABEL_SCALE:     usize = 2;
const LEGEND: &str = "0=NO HAND  1=FIST  2=WAVE  3=PINCH  4=PEACE  5=OPEN  ENTER=START  Q=QUIT";

// ════════════════════════════════════════════════════════════════════════════
// Framebuffer
// ════════════════════════════════════════════════════════════════════════════

/// ARGB pixel buffer plus the camera that projects into it.
pub struct Framebuffer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
    camera: PerspectiveCamera,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![BG_COLOR; width * height],
            camera: PerspectiveCamera::looking_at_origin(width, height),
        }
    }

    pub fn width(&self)   -> usize              { self.width }
    pub fn height(&self)  -> usize              { self.height }
    pub fn pixels(&self)  -> &[u32]             { &self.pixels }
    pub fn camera(&self)  -> &PerspectiveCamera { &self.camera }

    /// Adopt a new viewport size; the camera aspect follows.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width  = width;
        self.height = height;
        self.pixels = vec![BG_COLOR; width * height];
        self.camera.set_aspect(width, height);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BG_COLOR);
    }

    /// Draw flat `[x, y, z, …]` / `[r, g, b, …]` buffers as additive squares.
    pub fn draw_points(&mut self, positions: &[f32], colors: &[f32]) {
        for (p, c) in positions.chunks_exact(3).zip(colors.chunks_exact(3)) {
            let world = Vec3::new(p[0], p[1], p[2]);
            let Some(s) = self.camera.project(world, self.width, self.height) else {
                continue;
            };
            let size = (POINT_SIZE * self.camera.pixels_per_unit(s.depth, self.height))
                .round()
                .max(1.0) as isize;
            let x0 = s.x as isize - size / 2;
            let y0 = s.y as isize - size / 2;
            let rgb = Vec3::new(c[0], c[1], c[2]);
            for dy in 0..size {
                for dx in 0..size {
                    self.add_pixel(x0 + dx, y0 + dy, rgb);
                }
            }
        }
    }

    /// Text in the shared 5×7 font, scaled up.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if let Some(rows) = char_glyph(ch) {
                for (row, &bits) in rows.iter().enumerate() {
                    for col in 0..5usize {
                        if bits & (1 << (4 - col)) != 0 {
                            self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                        }
                    }
                }
            }
            cx += 6 * scale;
            if cx >= self.width { break; }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn add_pixel(&mut self, x: isize, y: isize, rgb: Vec3) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let i = y as usize * self.width + x as usize;
        self.pixels[i] = add_argb(self.pixels[i], rgb);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[row * self.width + col] = color;
            }
        }
    }
}

/// Saturating additive blend of a linear RGB color onto an ARGB pixel.
fn add_argb(dst: u32, rgb: Vec3) -> u32 {
    let channel = |shift: u32, v: f32| {
        let d = (dst >> shift) & 0xFF;
        let s = (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (d + s).min(0xFF) << shift
    };
    0xFF000000 | channel(16, rgb.x) | channel(8, rgb.y) | channel(0, rgb.z)
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

/// What the user asked for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Click or Enter: begin landmark tracking.
    Start,
    Quit,
}

pub struct Visualizer {
    window:     Window,
    fb:         Framebuffer,
    sim_tx:     Sender<SimInput>,
    /// Only forward pose keys once tracking has started.
    tracking:   bool,
    mouse_was_down: bool,
    positions:  Vec<f32>,
    colors:     Vec<f32>,
}

impl Visualizer {
    pub fn new(title: &str, width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            title,
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            fb: Framebuffer::new(width, height),
            sim_tx,
            tracking: false,
            mouse_was_down: false,
            positions: Vec::new(),
            colors:    Vec::new(),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn set_tracking(&mut self, tracking: bool) { self.tracking = tracking; }

    /// Poll keyboard and mouse; pose keys are forwarded as [`SimInput`]s.
    pub fn poll_input(&mut self) -> Control {
        if !self.window.is_open() { return Control::Quit; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return Control::Quit;
        }

        let mouse_down = self.window.get_mouse_down(MouseButton::Left);
        let clicked    = mouse_down && !self.mouse_was_down;
        self.mouse_was_down = mouse_down;
        if clicked || one_shot(Key::Enter) {
            return Control::Start;
        }

        if self.tracking {
            let bindings = [
                (Key::Key0, SimKey::NoHand),
                (Key::Key1, SimKey::Fist),
                (Key::Key2, SimKey::Wave),
                (Key::Key3, SimKey::Pinch),
                (Key::Key4, SimKey::Peace),
                (Key::Key5, SimKey::OpenPalm),
            ];
            for (key, sim) in bindings {
                if self.window.is_key_pressed(key, KeyRepeat::No) {
                    let _ = self.sim_tx.send(SimInput::KeyDown(sim));
                }
            }
        }

        Control::Continue
    }

    /// Render one frame from the most recently uploaded buffers.
    pub fn render(&mut self, status: &str) -> Result<()> {
        let (w, h) = self.window.get_size();
        if w > 0 && h > 0 && (w, h) != (self.fb.width(), self.fb.height()) {
            debug!("viewport resized to {}x{}", w, h);
            self.fb.resize(w, h);
        }

        self.fb.clear();
        self.fb.draw_points(&self.positions, &self.colors);
        self.fb.draw_label(status, 12, 12, LABEL_SCALE, LABEL_COLOR);
        let legend_y = self.fb.height().saturating_sub(14);
        self.fb.draw_label(LEGEND, 12, legend_y, 1, LEGEND_COLOR);

        self.window.update_with_buffer(self.fb.pixels(), self.fb.width(), self.fb.height())?;
        Ok(())
    }
}

impl ParticleSink for Visualizer {
    fn upload(&mut self, positions: &[f32], colors: &[f32]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.colors.clear();
        self.colors.extend_from_slice(colors);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
