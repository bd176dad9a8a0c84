//! Drone Sim - A quadcopter flight trainer
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (flight dynamics, collisions, missions, tutorial)
//! - `camera`: Trailing chase camera for the scene
//! - `recorder`: Flight recording and replay
//! - `persistence`: Stored recording schema
//! - `platform`: Browser/native platform abstraction (storage, clock)
//! - `settings`: Player preferences

pub mod camera;
pub mod persistence;
pub mod platform;
pub mod recorder;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use camera::ChaseCamera;
pub use recorder::{FlightFrame, FlightRecorder};
pub use settings::Settings;

/// World and session constants
pub mod consts {
    use glam::Vec3;

    /// Drone spawn position (meters)
    pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 5.0, 0.0);
    /// Drone spawn orientation (pitch, yaw, roll)
    pub const INITIAL_ORIENTATION: Vec3 = Vec3::ZERO;

    /// Gravity (m/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Thrust at full throttle (m/s²)
    pub const THROTTLE_POWER: f32 = 20.0;
    /// Fraction of full power delivered with the throttle stick centered
    pub const HOVER_BASELINE: f32 = 0.5;

    /// Joystick dead zone, per axis and for combined attitude input
    pub const STICK_DEAD_ZONE: f32 = 0.05;
    /// Joystick sensitivity multiplier
    pub const STICK_SENSITIVITY: f32 = 1.5;

    /// Drone collision radius against spheres and beams
    pub const DRONE_RADIUS: f32 = 0.6;
    /// Drone half-extent against boxes
    pub const DRONE_HALF_SIZE: f32 = 0.4;

    /// Seconds an obstacle waits after a hit before it can damage again
    pub const HIT_COOLDOWN_SECS: f32 = 2.0;

    /// Starting (and maximum) health
    pub const MAX_HEALTH: u32 = 100;
    /// Points per collected ring
    pub const RING_SCORE: u64 = 100;
    /// Points per finished tutorial step
    pub const TUTORIAL_STEP_SCORE: u64 = 50;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Wrap degrees into [0, 360)
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
