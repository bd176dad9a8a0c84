//! Obstacle course: rings to collect and hazards to avoid
//!
//! Courses are built from static placement tables indexed by mode and
//! difficulty. Animated obstacles get a random phase from the session seed so
//! they do not move in lockstep.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, TAU};

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::HitCooldown;
use super::state::{Difficulty, GameMode};

/// Ring radius (m)
pub const RING_RADIUS: f32 = 2.0;
/// Balloon radius (m)
pub const BALLOON_RADIUS: f32 = 0.8;
pub const BALLOON_BOB_SPEED: f32 = 0.5;
pub const BALLOON_BOB_RANGE: f32 = 0.5;
/// Beam cross-section (m)
pub const BEAM_THICKNESS: f32 = 0.3;

/// Obstacle type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ring,
    MovingPlatform,
    RotatingBeam,
    Balloon,
}

impl ObstacleKind {
    /// Health lost on contact (rings award score instead)
    pub fn damage(&self) -> u32 {
        match self {
            ObstacleKind::Ring => 0,
            ObstacleKind::Balloon => 5,
            ObstacleKind::MovingPlatform => 10,
            ObstacleKind::RotatingBeam => 15,
        }
    }
}

/// World axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Collision geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Collectible hoop; `rotation` is display-only Euler angles
    Ring { radius: f32, rotation: Vec3 },
    Sphere { radius: f32 },
    /// Axis-aligned box with full extents
    Box { size: Vec3 },
    /// Bar of `length` along its local X axis
    Beam { length: f32, thickness: f32 },
}

/// How an obstacle moves over session time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Static,
    /// `base[axis] += sin(t * speed + phase) * range`
    Oscillate {
        axis: Axis,
        range: f32,
        speed: f32,
        phase: f32,
    },
    /// Rotation angle `t * speed + phase` about `axis`
    Spin { axis: Axis, speed: f32, phase: f32 },
}

/// A ring or hazard in the course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub base: Vec3,
    pub shape: Shape,
    pub motion: Motion,
    /// Current world position (after motion)
    pub position: Vec3,
    /// Current spin angle (radians, Spin motion only)
    pub spin: f32,
    /// Rings only: flown through already
    pub collected: bool,
    #[serde(skip)]
    pub cooldown: HitCooldown,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, base: Vec3, shape: Shape, motion: Motion) -> Self {
        let mut obstacle = Self {
            id,
            kind,
            base,
            shape,
            motion,
            position: base,
            spin: 0.0,
            collected: false,
            cooldown: HitCooldown::default(),
        };
        obstacle.animate(0.0);
        obstacle
    }

    pub fn ring(id: u32, base: Vec3, rotation: Vec3) -> Self {
        Self::new(
            id,
            ObstacleKind::Ring,
            base,
            Shape::Ring {
                radius: RING_RADIUS,
                rotation,
            },
            Motion::Static,
        )
    }

    pub fn balloon(id: u32, base: Vec3, phase: f32) -> Self {
        Self::new(
            id,
            ObstacleKind::Balloon,
            base,
            Shape::Sphere {
                radius: BALLOON_RADIUS,
            },
            Motion::Oscillate {
                axis: Axis::Y,
                range: BALLOON_BOB_RANGE,
                speed: BALLOON_BOB_SPEED,
                phase,
            },
        )
    }

    pub fn platform(
        id: u32,
        base: Vec3,
        size: Vec3,
        axis: Axis,
        range: f32,
        speed: f32,
        phase: f32,
    ) -> Self {
        Self::new(
            id,
            ObstacleKind::MovingPlatform,
            base,
            Shape::Box { size },
            Motion::Oscillate {
                axis,
                range,
                speed,
                phase,
            },
        )
    }

    pub fn beam(id: u32, base: Vec3, length: f32, speed: f32, phase: f32) -> Self {
        Self::new(
            id,
            ObstacleKind::RotatingBeam,
            base,
            Shape::Beam {
                length,
                thickness: BEAM_THICKNESS,
            },
            Motion::Spin {
                axis: Axis::Y,
                speed,
                phase,
            },
        )
    }

    /// Still part of the scene (collected rings are not)
    pub fn is_active(&self) -> bool {
        !self.collected
    }

    /// Move to where the motion law puts it at session time `t`
    pub fn animate(&mut self, t: f32) {
        match self.motion {
            Motion::Static => {
                self.position = self.base;
            }
            Motion::Oscillate {
                axis,
                range,
                speed,
                phase,
            } => {
                let offset = (t * speed + phase).sin() * range;
                self.position = self.base + axis.unit() * offset;
            }
            Motion::Spin { speed, phase, .. } => {
                self.position = self.base;
                self.spin = t * speed + phase;
            }
        }
    }

    /// Current rotation (identity unless spinning)
    pub fn rotation(&self) -> Quat {
        match self.motion {
            Motion::Spin { axis, .. } => Quat::from_axis_angle(axis.unit(), self.spin),
            _ => Quat::IDENTITY,
        }
    }

    /// World-space end points of a beam
    pub fn beam_endpoints(&self) -> Option<(Vec3, Vec3)> {
        match self.shape {
            Shape::Beam { length, .. } => {
                let half = self.rotation() * Vec3::new(length / 2.0, 0.0, 0.0);
                Some((self.position - half, self.position + half))
            }
            _ => None,
        }
    }
}

/// All obstacles for a run (stable order by id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    pub obstacles: Vec<Obstacle>,
}

impl Course {
    /// Build the course for a mode and difficulty
    pub fn build(mode: GameMode, difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut obstacles = Vec::new();
        let mut next_id = 1;
        let mut id = || {
            let current = next_id;
            next_id += 1;
            current
        };

        match mode {
            GameMode::FreeFlight => {}
            GameMode::Tutorial => {
                obstacles.push(Obstacle::ring(id(), Vec3::new(0.0, 5.0, -10.0), Vec3::ZERO));
            }
            GameMode::Mission => {
                for &(pos, rot) in ring_layout(difficulty) {
                    obstacles.push(Obstacle::ring(id(), Vec3::from(pos), Vec3::from(rot)));
                }

                let mut phase = || rng.random_range(0.0..TAU);

                let mut platforms = vec![
                    ([0.0, 4.0, -15.0], [4.0, 0.5, 4.0], 2.0, 0.8, Axis::Y),
                    ([6.0, 6.0, -25.0], [3.0, 0.5, 3.0], 2.5, 1.0, Axis::X),
                    ([-6.0, 8.0, -35.0], [3.0, 0.5, 3.0], 2.0, 0.9, Axis::Z),
                ];
                let mut beams = vec![([0.0, 6.0, -22.0], 7.0, 0.6), ([5.0, 9.0, -45.0], 6.0, 0.8)];
                if difficulty == Difficulty::Hard {
                    beams.push(([-8.0, 7.0, -33.0], 5.0, 1.2));
                    platforms.push(([8.0, 10.0, -52.0], [2.5, 0.5, 2.5], 3.0, 1.2, Axis::Y));
                }

                for (pos, size, range, speed, axis) in platforms {
                    obstacles.push(Obstacle::platform(
                        id(),
                        Vec3::from(pos),
                        Vec3::from(size),
                        axis,
                        range,
                        speed,
                        phase(),
                    ));
                }
                for (pos, length, speed) in beams {
                    obstacles.push(Obstacle::beam(id(), Vec3::from(pos), length, speed, phase()));
                }
                for pos in BALLOONS {
                    obstacles.push(Obstacle::balloon(id(), Vec3::from(pos), phase()));
                }
            }
        }

        log::debug!(
            "Built {} course ({}) with {} obstacles",
            mode.as_str(),
            difficulty.as_str(),
            obstacles.len()
        );

        Self { obstacles }
    }

    /// Advance every obstacle's motion to session time `t`
    pub fn animate(&mut self, t: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.animate(t);
        }
    }

    pub fn rings(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.kind == ObstacleKind::Ring)
    }

    /// Rings not yet flown through
    pub fn remaining_rings(&self) -> usize {
        self.rings().filter(|o| o.is_active()).count()
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }
}

type RingPlacement = ([f32; 3], [f32; 3]);

const EASY_RINGS: [RingPlacement; 5] = [
    ([0.0, 5.0, -10.0], [0.0, 0.0, 0.0]),
    ([5.0, 6.0, -20.0], [0.0, 0.0, 0.0]),
    ([-5.0, 7.0, -30.0], [0.0, 0.0, 0.0]),
    ([0.0, 8.0, -40.0], [0.0, 0.0, 0.0]),
    ([3.0, 5.0, -50.0], [0.0, 0.0, 0.0]),
];

const MEDIUM_RINGS: [RingPlacement; 6] = [
    ([0.0, 5.0, -10.0], [0.0, FRAC_PI_6, 0.0]),
    ([7.0, 6.0, -20.0], [0.0, -FRAC_PI_6, 0.0]),
    ([-7.0, 7.0, -30.0], [FRAC_PI_6, 0.0, 0.0]),
    ([4.0, 8.0, -40.0], [0.0, FRAC_PI_4, 0.0]),
    ([-4.0, 5.0, -50.0], [0.0, 0.0, FRAC_PI_6]),
    ([0.0, 10.0, -60.0], [0.0, 0.0, 0.0]),
];

const HARD_RINGS: [RingPlacement; 7] = [
    ([0.0, 5.0, -10.0], [0.0, FRAC_PI_4, 0.0]),
    ([8.0, 4.0, -18.0], [FRAC_PI_4, FRAC_PI_4, 0.0]),
    ([-8.0, 8.0, -26.0], [0.0, -FRAC_PI_3, FRAC_PI_6]),
    ([6.0, 10.0, -34.0], [FRAC_PI_6, 0.0, FRAC_PI_4]),
    ([-6.0, 3.0, -42.0], [0.0, FRAC_PI_2, 0.0]),
    ([4.0, 12.0, -50.0], [FRAC_PI_3, FRAC_PI_6, 0.0]),
    ([0.0, 6.0, -60.0], [0.0, 0.0, FRAC_PI_3]),
];

const BALLOONS: [[f32; 3]; 6] = [
    [3.0, 7.0, -12.0],
    [-4.0, 9.0, -18.0],
    [7.0, 5.0, -28.0],
    [-7.0, 11.0, -38.0],
    [4.0, 4.0, -48.0],
    [-3.0, 13.0, -55.0],
];

fn ring_layout(difficulty: Difficulty) -> &'static [RingPlacement] {
    match difficulty {
        Difficulty::Easy => &EASY_RINGS,
        Difficulty::Medium => &MEDIUM_RINGS,
        Difficulty::Hard => &HARD_RINGS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(course: &Course, kind: ObstacleKind) -> usize {
        course.obstacles.iter().filter(|o| o.kind == kind).count()
    }

    #[test]
    fn test_ring_count_matches_difficulty() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let course = Course::build(GameMode::Mission, difficulty, 7);
            assert_eq!(course.remaining_rings() as u32, difficulty.total_rings());
        }
    }

    #[test]
    fn test_hard_adds_hazards() {
        let easy = Course::build(GameMode::Mission, Difficulty::Easy, 1);
        let hard = Course::build(GameMode::Mission, Difficulty::Hard, 1);
        assert_eq!(count(&easy, ObstacleKind::RotatingBeam), 2);
        assert_eq!(count(&hard, ObstacleKind::RotatingBeam), 3);
        assert_eq!(count(&easy, ObstacleKind::MovingPlatform), 3);
        assert_eq!(count(&hard, ObstacleKind::MovingPlatform), 4);
        assert_eq!(count(&hard, ObstacleKind::Balloon), 6);
    }

    #[test]
    fn test_tutorial_and_free_flight_courses() {
        let tutorial = Course::build(GameMode::Tutorial, Difficulty::Hard, 3);
        assert_eq!(tutorial.obstacles.len(), 1);
        assert_eq!(tutorial.obstacles[0].kind, ObstacleKind::Ring);
        assert!(Course::build(GameMode::FreeFlight, Difficulty::Easy, 3).obstacles.is_empty());
    }

    #[test]
    fn test_seed_reproduces_phases() {
        let a = Course::build(GameMode::Mission, Difficulty::Medium, 42);
        let b = Course::build(GameMode::Mission, Difficulty::Medium, 42);
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.motion, y.motion);
        }
        let ids: Vec<u32> = a.obstacles.iter().map(|o| o.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_platform_oscillates_on_axis() {
        let mut p = Obstacle::platform(
            1,
            Vec3::new(6.0, 6.0, -25.0),
            Vec3::new(3.0, 0.5, 3.0),
            Axis::X,
            2.5,
            1.0,
            0.0,
        );
        p.animate(std::f32::consts::FRAC_PI_2);
        assert!((p.position.x - 8.5).abs() < 1e-5);
        assert_eq!(p.position.y, 6.0);
        assert_eq!(p.position.z, -25.0);
    }

    #[test]
    fn test_beam_endpoints_rotate_about_y() {
        let mut beam = Obstacle::beam(1, Vec3::new(0.0, 6.0, 0.0), 8.0, 1.0, 0.0);
        let (a, b) = beam.beam_endpoints().unwrap();
        assert!((a - Vec3::new(-4.0, 6.0, 0.0)).length() < 1e-5);
        assert!((b - Vec3::new(4.0, 6.0, 0.0)).length() < 1e-5);

        beam.animate(FRAC_PI_2);
        let (_, b) = beam.beam_endpoints().unwrap();
        // +X rotated a quarter turn about +Y lands on -Z
        assert!((b - Vec3::new(0.0, 6.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_damage_table() {
        assert_eq!(ObstacleKind::Balloon.damage(), 5);
        assert_eq!(ObstacleKind::MovingPlatform.damage(), 10);
        assert_eq!(ObstacleKind::RotatingBeam.damage(), 15);
        assert_eq!(ObstacleKind::Ring.damage(), 0);
    }
}
