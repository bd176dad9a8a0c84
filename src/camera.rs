//! Trailing chase camera
//!
//! Follows behind and above the drone. Smoothing is a fixed fraction per
//! rendered frame, not per second.

use glam::Vec3;

/// Camera offset from the drone
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 8.0, 15.0);
/// Look-at point offset from the drone
pub const LOOK_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 0.0);
/// Fraction of the remaining distance covered each frame
pub const FOLLOW_SMOOTHING: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            position: FOLLOW_OFFSET,
            look_at: LOOK_OFFSET,
        }
    }
}

impl ChaseCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ease toward the drone's trailing spot (call once per frame)
    pub fn follow(&mut self, drone: Vec3) {
        let target = drone + FOLLOW_OFFSET;
        self.position = self.position.lerp(target, FOLLOW_SMOOTHING);
        self.look_at = drone + LOOK_OFFSET;
    }

    /// Jump straight to the trailing spot
    pub fn snap(&mut self, drone: Vec3) {
        self.position = drone + FOLLOW_OFFSET;
        self.look_at = drone + LOOK_OFFSET;
    }
}
