//! Slow cinematic camera that pulls back when the tree scatters.
//!
//! Per frame:
//!
//! * `x = 4 · sin(0.05 · time)` — a gentle side-to-side drift.
//! * `z` eases toward 24 (formed) or 36 (exploded) by 4% per frame.
//! * `y` eases toward 1 (formed) or 5 (exploded) by 4% per frame.
//!
//! The camera always looks at the origin; the tree itself sits two units
//! lower ([`GROUP_OFFSET`]).

use glam::{Mat4, Vec3};

/// Offset applied to every instance before projection.
pub const GROUP_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);

const START:        Vec3 = Vec3::new(0.0, 2.0, 22.0);
const DRIFT_X:      f32  = 4.0;
const DRIFT_RATE:   f32  = 0.05;
const EASE:         f32  = 0.04;
const FORMED_Z:     f32  = 24.0;
const EXPLODED_DZ:  f32  = 12.0;
const FORMED_Y:     f32  = 1.0;
const EXPLODED_DY:  f32  = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DriftCamera {
    pub position: Vec3,
    pub target:   Vec3,
    /// Vertical field of view in radians.
    pub fov_y:    f32,
    pub near:     f32,
}

impl Default for DriftCamera {
    fn default() -> Self {
        DriftCamera {
            position: START,
            target:   Vec3::ZERO,
            fov_y:    45f32.to_radians(),
            near:     0.1,
        }
    }
}

impl DriftCamera {
    /// One frame of drift.  Frame-rate dependent by construction: the
    /// easing is a fixed fraction per rendered frame.
    pub fn update(&mut self, time: f32, expanded: bool) {
        let e = if expanded { 1.0 } else { 0.0 };
        let target_z = FORMED_Z + EXPLODED_DZ * e;
        let target_y = FORMED_Y + EXPLODED_DY * e;
        self.position.x = (time * DRIFT_RATE).sin() * DRIFT_X;
        self.position.z += (target_z - self.position.z) * EASE;
        self.position.y += (target_y - self.position.y) * EASE;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Freeze the current pose into a projector for a `width × height`
    /// framebuffer.
    pub fn projector(&self, width: usize, height: usize) -> Projector {
        let half_h = height as f32 * 0.5;
        Projector {
            view:   self.view(),
            focal:  half_h / (self.fov_y * 0.5).tan(),
            cx:     width as f32 * 0.5,
            cy:     half_h,
            near:   self.near,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Projector
// ════════════════════════════════════════════════════════════════════════════

/// A world point mapped into the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x:     f32,
    pub y:     f32,
    /// Distance in front of the camera along its view axis.
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

#[derive(Clone, Debug)]
pub struct Projector {
    view:  Mat4,
    focal: f32,
    cx:    f32,
    cy:    f32,
    near:  f32,
}

impl Projector {
    /// `None` when the point is behind the near plane.
    pub fn project(&self, world: Vec3) -> Option<ScreenPoint> {
        let v = self.view.transform_point3(world);
        let depth = -v.z;
        if depth < self.near {
            return None;
        }
        let scale = self.focal / depth;
        Some(ScreenPoint {
            x: self.cx + v.x * scale,
            y: self.cy - v.y * scale,
            depth,
            scale,
        })
    }
}
