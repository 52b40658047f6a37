//! Perspective camera looking down −z at the origin.

use glam::{Mat4, Vec3, Vec4Swizzles};

pub const DEFAULT_FOV_Y: f32 = 75.0;
pub const DEFAULT_NEAR:  f32 = 0.1;
pub const DEFAULT_FAR:   f32 = 1000.0;
pub const DEFAULT_EYE_Z: f32 = 12.0;

/// A point mapped onto the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:     f32,
    pub y:     f32,
    /// Distance along the view axis, in world units.
    pub depth: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect:        f32,
    pub near:          f32,
    pub far:           f32,
    pub position:      Vec3,
    pub target:        Vec3,
    view_proj:         Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32, position: Vec3) -> Self {
        let mut cam = PerspectiveCamera {
            fov_y_degrees,
            aspect,
            near,
            far,
            position,
            target: Vec3::ZERO,
            view_proj: Mat4::IDENTITY,
        };
        cam.update_projection();
        cam
    }

    /// The stock camera: 75° vertical field of view, 12 units back.
    pub fn looking_at_origin(width: usize, height: usize) -> Self {
        PerspectiveCamera::new(
            DEFAULT_FOV_Y,
            aspect_of(width, height),
            DEFAULT_NEAR,
            DEFAULT_FAR,
            Vec3::new(0.0, 0.0, DEFAULT_EYE_Z),
        )
    }

    /// Match the viewport after a resize.
    pub fn set_aspect(&mut self, width: usize, height: usize) {
        self.aspect = aspect_of(width, height);
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        let proj = Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        self.view_proj = proj * view;
    }

    pub fn view_projection(&self) -> Mat4 { self.view_proj }

    /// Map a world point to pixel coordinates (origin top-left).
    /// `None` when the point falls outside the near/far range.
    pub fn project(&self, point: Vec3, width: usize, height: usize) -> Option<Projected> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Projected {
            x:     (ndc.x + 1.0) * 0.5 * width as f32,
            y:     (1.0 - ndc.y) * 0.5 * height as f32,
            depth: clip.w,
        })
    }

    /// How many pixels one world unit spans at `depth` on a viewport `height`
    /// pixels tall.
    pub fn pixels_per_unit(&self, depth: f32, height: usize) -> f32 {
        let half = (self.fov_y_degrees.to_radians() * 0.5).tan();
        height as f32 / (2.0 * half * depth.max(self.near))
    }
}

fn aspect_of(width: usize, height: usize) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lands_in_the_middle() {
        let cam = PerspectiveCamera::looking_at_origin(800, 600);
        let p = cam.project(Vec3::ZERO, 800, 600).unwrap();
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 300.0).abs() < 1e-3);
        assert!((p.depth - 12.0).abs() < 1e-4);
    }

    #[test]
    fn up_and_right_are_up_and_right_on_screen() {
        let cam = PerspectiveCamera::looking_at_origin(800, 600);
        let p = cam.project(Vec3::new(1.0, 1.0, 0.0), 800, 600).unwrap();
        assert!(p.x > 400.0);
        assert!(p.y < 300.0);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let cam = PerspectiveCamera::looking_at_origin(800, 600);
        assert!(cam.project(Vec3::new(0.0, 0.0, 20.0), 800, 600).is_none());
    }

    #[test]
    fn resize_keeps_the_aspect_in_step() {
        let mut cam = PerspectiveCamera::looking_at_origin(800, 600);
        cam.set_aspect(1000, 500);
        assert_eq!(cam.aspect, 2.0);

        // A point one unit right of center moves the same number of pixels
        // horizontally as one unit up moves vertically.
        let c = cam.project(Vec3::ZERO, 1000, 500).unwrap();
        let r = cam.project(Vec3::X, 1000, 500).unwrap();
        let u = cam.project(Vec3::Y, 1000, 500).unwrap();
        assert!(((r.x - c.x) - (c.y - u.y)).abs() < 1e-2);
    }

    #[test]
    fn pixels_per_unit_matches_projection() {
        let cam = PerspectiveCamera::looking_at_origin(800, 600);
        let c = cam.project(Vec3::ZERO, 800, 600).unwrap();
        let u = cam.project(Vec3::Y, 800, 600).unwrap();
        let ppu = cam.pixels_per_unit(12.0, 600);
        assert!(((c.y - u.y) - ppu).abs() < 1e-2);
    }
}
