//! Offscreen text rasterizer for the glyph-text shape.
//!
//! Text is drawn into a 400 × 100 single-channel bitmap with a built-in 5×7
//! bitmap font, each font cell scaled to a 6 px block and thickened by one
//! pixel for a bold look.  The text is centered on x = 200 with its baseline
//! on y = 60.  Every second pixel row and column is then sampled and bright
//! pixels become scene-space points.
//!
//! ```text
//! (0,0) ┌───────────────────────────────────────┐
//!       │            cap line  y = 18           │
//!       │        ███ █   ███ █ █ ███ ...        │
//!       │            baseline  y = 60           │
//!       └───────────────────────────────────────┘ (400,100)
//!                         x = 200 → scene x = 0
//! ```

use glam::Vec2;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const CANVAS_W:  usize = 400;
pub const CANVAS_H:  usize = 100;
const CENTER_X:      i32   = 200;
const BASELINE_Y:    i32   = 60;
const CELL:          i32   = 6;
const GLYPH_COLS:    i32   = 5;
const GLYPH_ROWS:    i32   = 7;
const ADVANCE:       i32   = (GLYPH_COLS + 1) * CELL;
const BOLD:          i32   = 1;
const INK:           u8    = 255;

/// Sampling stride in pixels, both axes.
pub const SAMPLE_STEP: usize = 2;
/// Red-channel values strictly above this count as ink.
pub const BRIGHTNESS_THRESHOLD: u8 = 128;
/// Scene units per canvas pixel.
pub const PIXEL_TO_SCENE: f32 = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// GlyphCanvas
// ════════════════════════════════════════════════════════════════════════════

/// Red-channel intensity bitmap, row-major.
#[derive(Clone, Debug)]
pub struct GlyphCanvas {
    red: Vec<u8>,
}

impl GlyphCanvas {
    pub fn blank() -> Self {
        GlyphCanvas { red: vec![0; CANVAS_W * CANVAS_H] }
    }

    /// Draw `text` bold and centered.  Characters without a glyph leave a gap.
    pub fn render(text: &str) -> Self {
        let mut canvas = GlyphCanvas::blank();

        let n = text.chars().count() as i64;
        if n == 0 {
            return canvas;
        }
        // Layout in i64: a long message is far wider than the canvas.
        let advance = i64::from(ADVANCE);
        let width   = n.saturating_mul(advance) - i64::from(CELL);
        let left    = i64::from(CENTER_X) - width / 2;
        let top     = BASELINE_Y - GLYPH_ROWS * CELL;

        for (i, ch) in text.chars().enumerate() {
            let gx = left.saturating_add((i as i64).saturating_mul(advance));
            if gx >= CANVAS_W as i64 {
                break;
            }
            if gx + advance <= 0 {
                continue;
            }
            let Some(rows) = char_glyph(ch) else { continue };
            // Within (-ADVANCE, CANVAS_W) here, so it fits.
            let gx = gx as i32;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - col)) != 0 {
                        canvas.fill_block(
                            gx + col * CELL,
                            top + row as i32 * CELL,
                            CELL + BOLD,
                        );
                    }
                }
            }
        }
        canvas
    }

    pub fn red(&self, x: usize, y: usize) -> u8 {
        self.red[y * CANVAS_W + x]
    }

    fn fill_block(&mut self, x: i32, y: i32, size: i32) {
        for py in y.max(0)..(y + size).min(CANVAS_H as i32) {
            for px in x.max(0)..(x + size).min(CANVAS_W as i32) {
                self.red[py as usize * CANVAS_W + px as usize] = INK;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sampling
// ════════════════════════════════════════════════════════════════════════════

/// Scene-space points for every bright sample of `canvas`, in row-major
/// sample order.
pub fn sample_points(canvas: &GlyphCanvas) -> Vec<Vec2> {
    let mut pts = Vec::new();
    for y in (0..CANVAS_H).step_by(SAMPLE_STEP) {
        for x in (0..CANVAS_W).step_by(SAMPLE_STEP) {
            if canvas.red(x, y) > BRIGHTNESS_THRESHOLD {
                pts.push(pixel_to_scene(x, y));
            }
        }
    }
    pts
}

/// Rasterize and sample in one go.
pub fn text_points(text: &str) -> Vec<Vec2> {
    sample_points(&GlyphCanvas::render(text))
}

/// Canvas pixel → scene plane.  Canvas y grows downward, scene y upward.
pub fn pixel_to_scene(x: usize, y: usize) -> Vec2 {
    Vec2::new(
        (x as f32 - (CANVAS_W / 2) as f32) * PIXEL_TO_SCENE,
        -(y as f32 - (CANVAS_H / 2) as f32) * PIXEL_TO_SCENE,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// 5×7 bitmap font
// ────────────────────────────────────────────────────────────────────────────

/// Rows top to bottom, 5 bits each (MSB = leftmost column).
/// Lowercase folds to uppercase; anything else unknown has no glyph.
pub fn char_glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '\'' => [0b01100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '♥' => [0b00000, 0b01010, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000],
        ' ' => [0b00000; 7],
        _   => return None,
    };
    Some(rows)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_text_produce_no_points() {
        assert!(text_points("").is_empty());
        assert!(text_points("     ").is_empty());
    }

    #[test]
    fn unsupported_glyphs_draw_nothing() {
        assert!(text_points("€€").is_empty());
    }

    #[test]
    fn lowercase_folds_to_uppercase() {
        assert_eq!(text_points("love"), text_points("LOVE"));
    }

    #[test]
    fn message_is_horizontally_centered() {
        let pts = text_points("I LOVE YOU");
        assert!(!pts.is_empty());
        let min_x = pts.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = pts.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        assert!((min_x + max_x).abs() < 0.5, "min {min_x} max {max_x}");
    }

    #[test]
    fn points_sit_on_the_sample_grid_inside_the_canvas() {
        for p in text_points("HELLO 42") {
            assert!(p.x >= -10.0 && p.x < 10.0);
            assert!(p.y > -2.5 && p.y <= 2.5);
            let px = (p.x / PIXEL_TO_SCENE).round() as i32 + CENTER_X;
            let py = (-p.y / PIXEL_TO_SCENE).round() as i32 + 50;
            assert_eq!(px % 2, 0);
            assert_eq!(py % 2, 0);
        }
    }

    #[test]
    fn ink_lies_between_cap_line_and_baseline() {
        let canvas = GlyphCanvas::render("E");
        for y in 0..CANVAS_H {
            for x in 0..CANVAS_W {
                if canvas.red(x, y) > BRIGHTNESS_THRESHOLD {
                    assert!(y >= 18 && y <= 60, "ink at row {y}");
                }
            }
        }
    }

    #[test]
    fn overlong_text_is_clipped_not_panicking() {
        let long = "W".repeat(40);
        let pts = text_points(&long);
        assert!(!pts.is_empty());
    }

    #[test]
    fn huge_message_keeps_the_centered_layout() {
        // Any even-length run of one glyph wider than the canvas shows the
        // same centered slice.
        let huge = "W".repeat(60_000_000);
        let pts = text_points(&huge);
        assert!(!pts.is_empty());
        assert_eq!(pts, text_points(&"W".repeat(20)));
    }

    #[test]
    fn pixel_to_scene_maps_canvas_center_to_origin() {
        assert_eq!(pixel_to_scene(200, 50), Vec2::ZERO);
        assert_eq!(pixel_to_scene(0, 0), Vec2::new(-10.0, 2.5));
    }
}
