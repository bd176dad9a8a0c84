//! Collision detection between the drone and the course
//!
//! The drone is treated as a point with a small padding radius. Each shape has
//! its own overlap test; hazards additionally carry a per-instance cooldown so
//! one long overlap costs health once, not every frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::obstacles::{Course, ObstacleKind, Shape};
use crate::consts::{DRONE_HALF_SIZE, DRONE_RADIUS, HIT_COOLDOWN_SECS};

/// Fraction of the ring radius the drone must be within to count as through
const RING_CAPTURE_FACTOR: f32 = 0.6;

/// Sphere (balloon) overlap
#[inline]
pub fn sphere_hit(drone: Vec3, center: Vec3, radius: f32) -> bool {
    drone.distance(center) < radius + DRONE_RADIUS
}

/// Axis-aligned box overlap; all three axes must be within reach
pub fn box_hit(drone: Vec3, center: Vec3, size: Vec3) -> bool {
    let delta = (drone - center).abs();
    let reach = size / 2.0 + Vec3::splat(DRONE_HALF_SIZE);
    delta.x < reach.x && delta.y < reach.y && delta.z < reach.z
}

/// Closest point to `p` on the segment `a`-`b`
pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let line = b - a;
    let len_sq = line.length_squared();
    if len_sq < 1e-8 {
        return a; // Degenerate segment
    }
    let t = ((p - a).dot(line) / len_sq).clamp(0.0, 1.0);
    a + line * t
}

/// Capsule (beam) overlap against the segment `a`-`b`
pub fn beam_hit(drone: Vec3, a: Vec3, b: Vec3, thickness: f32) -> bool {
    let closest = closest_point_on_segment(drone, a, b);
    drone.distance(closest) < thickness / 2.0 + DRONE_RADIUS
}

/// Drone passed close enough to a ring's center
#[inline]
pub fn ring_hit(drone: Vec3, center: Vec3, radius: f32) -> bool {
    drone.distance(center) < radius * RING_CAPTURE_FACTOR
}

/// Per-obstacle damage cooldown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitCooldown {
    /// Session time of the last damaging hit (seconds)
    last_hit: Option<f32>,
}

impl HitCooldown {
    /// Register a contact at `now`; true if it should deal damage
    pub fn try_hit(&mut self, now: f32) -> bool {
        match self.last_hit {
            Some(last) if now - last <= HIT_COOLDOWN_SECS => false,
            _ => {
                self.last_hit = Some(now);
                true
            }
        }
    }
}

/// Outcome of a contact this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// A ring was flown through (now collected)
    Ring { id: u32 },
    /// A hazard dealt damage
    Hazard {
        id: u32,
        kind: ObstacleKind,
        damage: u32,
    },
}

/// Check the drone against every active obstacle
///
/// Rings are one-shot: a hit marks them collected and they are skipped from
/// then on. Hazards only report when their cooldown allows.
pub fn check_course(
    course: &mut Course,
    drone: Vec3,
    now: f32,
    rings: bool,
    hazards: bool,
) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for obstacle in &mut course.obstacles {
        if !obstacle.is_active() {
            continue;
        }

        match obstacle.shape {
            Shape::Ring { radius, .. } => {
                if rings && ring_hit(drone, obstacle.position, radius) {
                    obstacle.collected = true;
                    contacts.push(Contact::Ring { id: obstacle.id });
                }
            }
            shape => {
                if !hazards {
                    continue;
                }
                let hit = match shape {
                    Shape::Sphere { radius } => sphere_hit(drone, obstacle.position, radius),
                    Shape::Box { size } => box_hit(drone, obstacle.position, size),
                    Shape::Beam { thickness, .. } => obstacle
                        .beam_endpoints()
                        .is_some_and(|(a, b)| beam_hit(drone, a, b, thickness)),
                    Shape::Ring { .. } => false,
                };
                if hit && obstacle.cooldown.try_hit(now) {
                    contacts.push(Contact::Hazard {
                        id: obstacle.id,
                        kind: obstacle.kind,
                        damage: obstacle.kind.damage(),
                    });
                }
            }
        }
    }

    contacts
}
