//! Quadcopter flight dynamics
//!
//! One call to [`integrate`] advances the drone by one render frame. The step is
//! variable (`dt` is whatever the host frame clock measured) and the function is
//! pure: the returned state depends only on the previous state, the sticks,
//! `dt`, the wind and the profile.

use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::input::{ControlChannels, ControlInput};
use crate::consts::*;
use crate::{normalize_angle, wrap_degrees};

/// Flight "feel", chosen when a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightProfile {
    /// Dead zone with auto-level; exponential drag
    #[default]
    Stabilized,
    /// Angles always integrate from the sticks; flat per-frame damping
    Agile,
}

impl FlightProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightProfile::Stabilized => "Stabilized",
            FlightProfile::Agile => "Agile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stabilized" | "stable" => Some(FlightProfile::Stabilized),
            "agile" | "acro" => Some(FlightProfile::Agile),
            _ => None,
        }
    }

    /// Angular rate per unit stick (pitch, yaw, roll) in rad/s
    pub fn rates(&self) -> Vec3 {
        match self {
            FlightProfile::Stabilized => Vec3::new(3.0, 2.0, 3.0),
            FlightProfile::Agile => Vec3::new(4.0, 2.0, 4.0),
        }
    }

    /// Maximum pitch/roll magnitude (radians)
    pub fn max_tilt(&self) -> f32 {
        match self {
            FlightProfile::Stabilized => FRAC_PI_4,
            FlightProfile::Agile => FRAC_PI_3,
        }
    }

    /// Horizontal acceleration per radian of tilt
    pub fn tilt_force(&self) -> f32 {
        match self {
            FlightProfile::Stabilized => 12.0,
            FlightProfile::Agile => 15.0,
        }
    }

    /// Horizontal velocity kept after touching the ground
    pub fn ground_restitution(&self) -> f32 {
        match self {
            FlightProfile::Stabilized => 0.3,
            FlightProfile::Agile => 0.5,
        }
    }
}

/// Stabilized profile: attitude input below this magnitude counts as none
const ATTITUDE_DEAD_ZONE: f32 = STICK_DEAD_ZONE;
/// Stabilized profile: tilt relaxation rate toward level (1/s)
const AUTO_LEVEL_RATE: f32 = 3.0;
/// Stabilized profile: horizontal drag coefficient (1/s)
const HORIZONTAL_DRAG: f32 = 5.0;
/// Stabilized profile: vertical drag coefficient (1/s)
const VERTICAL_DRAG: f32 = 2.0;

/// Agile profile: per-frame velocity damping
const AGILE_LINEAR_DAMPING: f32 = 0.95;
/// Agile profile: per-frame angular velocity damping
const AGILE_ANGULAR_DAMPING: f32 = 0.9;

/// Kinematic state of the drone
///
/// `orientation` holds Euler angles as (pitch, yaw, roll) in x/y/z.
/// `altitude`, `speed` and `heading` are projections refreshed by every
/// integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    pub position: Vec3,
    pub orientation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Height above ground (m)
    pub altitude: f32,
    /// Horizontal speed (m/s)
    pub speed: f32,
    /// Compass heading in degrees, [0, 360)
    pub heading: f32,
}

impl Default for DroneState {
    fn default() -> Self {
        Self::new()
    }
}

impl DroneState {
    /// Drone at the spawn point, level and at rest
    pub fn new() -> Self {
        Self {
            position: INITIAL_POSITION,
            orientation: INITIAL_ORIENTATION,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            altitude: 0.0,
            speed: 0.0,
            heading: 0.0,
        }
        .with_telemetry()
    }

    /// Back to the spawn pose
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn pitch(&self) -> f32 {
        self.orientation.x
    }

    pub fn yaw(&self) -> f32 {
        self.orientation.y
    }

    pub fn roll(&self) -> f32 {
        self.orientation.z
    }

    /// Recompute altitude, horizontal speed and heading
    pub fn with_telemetry(mut self) -> Self {
        self.altitude = self.position.y;
        self.speed = (self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z).sqrt();
        self.heading = wrap_degrees(self.orientation.y.to_degrees());
        self
    }
}

/// Advance the drone by one frame
pub fn integrate(
    state: &DroneState,
    input: &ControlInput,
    dt: f32,
    wind: Vec3,
    profile: FlightProfile,
) -> DroneState {
    if dt <= 0.0 {
        return state.with_telemetry();
    }

    let ControlChannels {
        throttle,
        yaw,
        pitch,
        roll,
    } = input.channels();

    let mut next = *state;

    // Vertical thrust: centered throttle still delivers the hover baseline
    let effective_throttle = HOVER_BASELINE + throttle * (1.0 - HOVER_BASELINE);
    next.velocity.y += (effective_throttle * THROTTLE_POWER - GRAVITY) * dt;

    next.velocity += wind * dt;

    let rates = profile.rates();
    match profile {
        FlightProfile::Stabilized => {
            let magnitude = (pitch * pitch + roll * roll + yaw * yaw).sqrt();
            if magnitude > ATTITUDE_DEAD_ZONE {
                next.angular_velocity = Vec3::new(pitch, yaw, roll) * rates;
                next.orientation.x += next.angular_velocity.x * dt;
                next.orientation.z += next.angular_velocity.z * dt;
            } else {
                let keep = 1.0 - AUTO_LEVEL_RATE * dt;
                next.orientation.x *= keep;
                next.orientation.z *= keep;
                next.angular_velocity = Vec3::ZERO;
            }
            // Yaw ignores the dead zone
            next.orientation.y += yaw * rates.y * dt;
        }
        FlightProfile::Agile => {
            next.angular_velocity = Vec3::new(pitch, yaw, roll) * rates;
            next.orientation += next.angular_velocity * dt;
            next.velocity *= AGILE_LINEAR_DAMPING;
            next.angular_velocity *= AGILE_ANGULAR_DAMPING;
        }
    }

    next.orientation.y = normalize_angle(next.orientation.y);

    let max_tilt = profile.max_tilt();
    next.orientation.x = next.orientation.x.clamp(-max_tilt, max_tilt);
    next.orientation.z = next.orientation.z.clamp(-max_tilt, max_tilt);

    // Tilt through the current heading into world-space thrust
    let (sin, cos) = next.orientation.y.sin_cos();
    let (p, r) = (next.orientation.x, next.orientation.z);
    let tilt = profile.tilt_force() * dt;
    next.velocity.x += (-r * cos - p * sin) * tilt;
    next.velocity.z += (-r * sin + p * cos) * tilt;

    if profile == FlightProfile::Stabilized {
        let drag = (-HORIZONTAL_DRAG * dt).exp();
        next.velocity.x *= drag;
        next.velocity.z *= drag;
        next.velocity.y *= (-VERTICAL_DRAG * dt).exp();
    }

    next.position += next.velocity * dt;

    if next.position.y < 0.0 {
        let restitution = profile.ground_restitution();
        next.position.y = 0.0;
        next.velocity.y = 0.0;
        next.velocity.x *= restitution;
        next.velocity.z *= restitution;
    }

    next.with_telemetry()
}
