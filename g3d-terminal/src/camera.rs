//! Host-owned camera state, mutated by input handling between frames.

use g3d_core::{CameraSnapshot, Vector};

/// Mutable camera the event loop steers. The render pipeline never sees
/// this directly; [`Camera::snapshot`] produces the immutable per-frame
/// copy it consumes.
pub struct Camera {
    up: Vector,
    position: Vector,
    look: Vector,
    yaw: f64,
    light: Vector,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            up: Vector::new(0.0, 1.0, 0.0),
            position: Vector::new(0.0, 0.0, 0.0),
            look: Vector::new(0.0, 0.0, 1.0),
            yaw: 0.0,
            light: Vector::new(0.0, 0.0, 1.0),
        }
    }

    /// Move along the look direction; negative distance moves backward.
    pub fn move_forward(&mut self, distance: f64) {
        let moved = self.position + self.look * distance;
        self.position = Vector::new(moved.x, moved.y, moved.z);
    }

    /// Sideways movement; positive distance moves left.
    pub fn strafe(&mut self, distance: f64) {
        self.position.x += distance;
    }

    /// Vertical movement; positive distance moves up.
    pub fn rise(&mut self, distance: f64) {
        self.position.y += distance;
    }

    pub fn rotate_yaw(&mut self, delta: f64) {
        self.yaw += delta;
    }

    pub fn position(&self) -> &Vector {
        &self.position
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            up: self.up,
            position: self.position,
            look: self.look,
            yaw: self.yaw,
            light: self.light,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
