//! Per-frame simulation tick
//!
//! A [`Session`] owns every piece of mutable state; [`tick`] advances all of it
//! by one rendered frame and reports what happened as [`GameEvent`]s so the
//! presentation layer can react without watching individual fields.

use glam::Vec3;

use super::collision::{Contact, check_course};
use super::flight::{DroneState, FlightProfile, integrate};
use super::input::ControlInput;
use super::obstacles::Course;
use super::state::{Difficulty, GameEvent, GameMode, GameState};
use super::tutorial::{TutorialEvent, TutorialState};
use super::wind::{wind_force, wind_strength};
use crate::camera::ChaseCamera;
use crate::consts::TUTORIAL_STEP_SCORE;
use crate::recorder::FlightRecorder;
use crate::settings::Settings;

/// Pose to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPose {
    pub position: Vec3,
    /// Euler angles (pitch, yaw, roll)
    pub rotation: Vec3,
}

/// Everything a running game needs, owned in one place
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed for course phases
    pub seed: u64,
    /// Flight feel fixed at session start
    pub profile: FlightProfile,
    pub wind_enabled: bool,
    /// Written by the joystick widgets
    pub controls: ControlInput,
    pub drone: DroneState,
    pub game: GameState,
    pub course: Course,
    pub tutorial: TutorialState,
    pub recorder: FlightRecorder,
    pub camera: ChaseCamera,
    /// Pose shown during replay
    replay_pose: Option<DisplayPose>,
    /// Seconds since the session (or current run) started
    pub time: f32,
    /// Frames simulated
    pub frame: u64,
}

impl Session {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let game = GameState {
            show_instructions: settings.show_instructions,
            ..GameState::new(settings.mode, settings.difficulty)
        };
        let course = Course::build(game.mode, game.difficulty, seed);
        log::info!(
            "Session started: mode={} difficulty={} profile={} seed={}",
            game.mode.as_str(),
            game.difficulty.as_str(),
            settings.flight_profile.as_str(),
            seed
        );
        Self {
            seed,
            profile: settings.flight_profile,
            wind_enabled: settings.wind_enabled,
            controls: ControlInput::new(settings.control_mode),
            drone: DroneState::new(),
            game,
            course,
            tutorial: TutorialState::new(),
            recorder: FlightRecorder::new(),
            camera: ChaseCamera::new(),
            replay_pose: None,
            time: 0.0,
            frame: 0,
        }
    }

    /// Put the drone back at the spawn point, sticks centered
    pub fn reset_drone(&mut self) {
        self.drone.reset();
        self.controls.center_sticks();
    }

    /// Switch mode: new course, fresh run, tutorial from the start
    pub fn set_mode(&mut self, mode: GameMode) {
        self.game.set_mode(mode);
        self.restart_run();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.game.set_difficulty(difficulty);
        self.restart_run();
    }

    /// Same mode and difficulty, from the top
    pub fn restart(&mut self) {
        self.game.reset_game();
        self.restart_run();
    }

    fn restart_run(&mut self) {
        self.course = Course::build(self.game.mode, self.game.difficulty, self.seed);
        self.tutorial.restart();
        self.time = 0.0;
        self.reset_drone();
        self.camera.snap(self.drone.position);
    }

    /// Where the scene should draw the drone
    pub fn display_pose(&self) -> DisplayPose {
        self.replay_pose.unwrap_or(DisplayPose {
            position: self.drone.position,
            rotation: self.drone.orientation,
        })
    }

    /// Wind acting on the drone at the current time
    pub fn wind(&self) -> Vec3 {
        let strength = wind_strength(self.game.mode, self.game.difficulty, self.wind_enabled);
        wind_force(strength, self.time)
    }
}

/// Advance the session by one rendered frame
///
/// `dt` is the frame time in seconds, `now_ms` the wall clock used to stamp
/// recorded frames.
pub fn tick(session: &mut Session, dt: f32, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    session.frame += 1;

    // Replay drives the display only; the simulation holds still
    if session.recorder.is_replaying() {
        match session.recorder.next_frame() {
            Some(frame) => {
                session.replay_pose = Some(DisplayPose {
                    position: frame.position,
                    rotation: frame.rotation,
                });
            }
            None => {
                session.replay_pose = None;
                events.push(GameEvent::ReplayFinished);
            }
        }
        let pose = session.display_pose();
        session.camera.follow(pose.position);
        return events;
    }
    session.replay_pose = None;

    let dt = dt.max(0.0);
    session.time += dt;

    let wind = session.wind();
    session.drone = integrate(&session.drone, &session.controls, dt, wind, session.profile);

    session.course.animate(session.time);
    let contacts = check_course(
        &mut session.course,
        session.drone.position,
        session.time,
        session.game.rings_active(),
        session.game.hazards_active(),
    );
    for contact in contacts {
        apply_contact(&mut session.game, contact, &mut events);
    }

    if session.game.mode == GameMode::Tutorial {
        match session.tutorial.update(&session.drone, dt) {
            Some(TutorialEvent::StepPassed(step)) => {
                session.game.add_score(TUTORIAL_STEP_SCORE);
                events.push(GameEvent::TutorialStepPassed { step });
            }
            Some(TutorialEvent::Advanced(step)) => {
                events.push(GameEvent::TutorialAdvanced { step });
            }
            None => {}
        }
    }

    session
        .recorder
        .record_frame(session.drone.position, session.drone.orientation, now_ms);

    session.camera.follow(session.drone.position);

    events
}

fn apply_contact(game: &mut GameState, contact: Contact, events: &mut Vec<GameEvent>) {
    match contact {
        Contact::Ring { id } => {
            let finished = game.collect_ring();
            log::debug!(
                "Ring {} collected ({}/{})",
                id,
                game.rings_collected,
                game.total_rings
            );
            events.push(GameEvent::RingCollected { ring_id: id });
            if finished {
                log::info!("Mission complete, score {}", game.score);
                events.push(GameEvent::MissionComplete);
            }
        }
        Contact::Hazard { id, kind, damage } => {
            let crashed = game.take_damage(damage);
            log::debug!("Hit {:?} #{} for {}, health {}", kind, id, damage, game.health);
            events.push(GameEvent::DamageTaken {
                obstacle_id: id,
                kind,
                amount: damage,
            });
            if crashed {
                log::info!("Drone destroyed, score {}", game.score);
                events.push(GameEvent::Crashed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::StickInput;
    use crate::sim::obstacles::{Obstacle, ObstacleKind};
    use crate::sim::tutorial::TutorialStep;

    const DT: f32 = 1.0 / 60.0;

    fn session(mode: GameMode) -> Session {
        let settings = Settings {
            mode,
            ..Default::default()
        };
        Session::new(12345, &settings)
    }

    #[test]
    fn test_free_flight_has_no_events() {
        let mut s = session(GameMode::FreeFlight);
        for _ in 0..120 {
            assert!(tick(&mut s, DT, 0.0).is_empty());
        }
        assert_eq!(s.frame, 120);
        assert!((s.time - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_flying_through_tutorial_ring() {
        let mut s = session(GameMode::Tutorial);
        s.drone.position = Vec3::new(0.0, 5.0, -10.0);
        let events = tick(&mut s, DT, 0.0);
        assert!(events.contains(&GameEvent::RingCollected { ring_id: 1 }));
        assert_eq!(s.game.score, 100);

        // Ring stays collected
        let events = tick(&mut s, DT, 0.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::RingCollected { .. })));
        assert_eq!(s.game.rings_collected, 1);
    }

    #[test]
    fn test_hazard_damage_with_cooldown() {
        let mut s = session(GameMode::Mission);
        let balloon = Vec3::new(0.0, 30.0, 100.0);
        s.course = Course {
            obstacles: vec![Obstacle::new(
                99,
                ObstacleKind::Balloon,
                balloon,
                crate::sim::obstacles::Shape::Sphere { radius: 0.8 },
                crate::sim::obstacles::Motion::Static,
            )],
        };

        let mut damage = 0;
        // 1.5 s parked inside the balloon
        for _ in 0..90 {
            s.drone.position = balloon;
            s.drone.velocity = Vec3::ZERO;
            for e in tick(&mut s, DT, 0.0) {
                if let GameEvent::DamageTaken { amount, .. } = e {
                    damage += amount;
                }
            }
        }
        assert_eq!(damage, 5);
        assert_eq!(s.game.health, 95);
    }

    #[test]
    fn test_no_damage_outside_mission() {
        let mut s = session(GameMode::Tutorial);
        s.course.obstacles.push(Obstacle::balloon(50, Vec3::new(0.0, 5.0, 0.0), 0.0));
        s.drone.position = Vec3::new(0.0, 5.0, 0.0);
        let events = tick(&mut s, DT, 0.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::DamageTaken { .. })));
        assert_eq!(s.game.health, 100);
    }

    #[test]
    fn test_collecting_every_ring_completes_mission() {
        let mut s = session(GameMode::Mission);
        let rings: Vec<Vec3> = s.course.rings().map(|r| r.position).collect();
        assert_eq!(rings.len(), 5);

        let mut completed = false;
        for ring in rings {
            s.drone.position = ring;
            s.drone.velocity = Vec3::ZERO;
            completed |= tick(&mut s, 1e-4, 0.0).contains(&GameEvent::MissionComplete);
        }
        assert!(completed);
        assert!(s.game.mission_complete);
        assert_eq!(s.game.rings_collected, s.game.total_rings);
    }

    #[test]
    fn test_tutorial_hover_awards_points() {
        let mut s = session(GameMode::Tutorial);
        let mut passed = false;
        // Spawn is already at 5 m; centered sticks drift up very slowly
        for _ in 0..70 {
            passed |= tick(&mut s, DT, 0.0).contains(&GameEvent::TutorialStepPassed {
                step: TutorialStep::Hover,
            });
        }
        assert!(passed);
        assert_eq!(s.game.score, 50);
    }

    #[test]
    fn test_tutorial_awards_accumulate_across_steps() {
        let mut s = session(GameMode::Tutorial);
        s.game.add_score(TUTORIAL_STEP_SCORE);
        s.tutorial.step = TutorialStep::Forward;
        for _ in 0..40 {
            s.drone.position = Vec3::new(20.0, 5.0, 0.0);
            s.drone.velocity = Vec3::new(10.0, 0.0, 0.0);
            tick(&mut s, DT, 0.0);
        }
        assert!(s.tutorial.step_complete);
        assert_eq!(s.game.score, 2 * TUTORIAL_STEP_SCORE);
    }

    #[test]
    fn test_record_then_replay_freezes_physics() {
        let mut s = session(GameMode::FreeFlight);
        s.recorder.start_recording();
        s.controls.left_stick = StickInput::new(0.0, 1.0);
        for i in 0..10 {
            tick(&mut s, DT, i as f64);
        }
        s.recorder.stop_recording();
        assert_eq!(s.recorder.len(), 10);
        let first = s.recorder.frames()[0];

        let frozen = s.drone;
        s.recorder.start_replay();
        tick(&mut s, DT, 100.0);
        assert_eq!(s.drone, frozen);
        assert_eq!(s.display_pose().position, first.position);

        let mut finished = false;
        for _ in 0..10 {
            finished |= tick(&mut s, DT, 0.0).contains(&GameEvent::ReplayFinished);
        }
        assert!(finished);
        assert!(!s.recorder.is_replaying());
        assert_eq!(s.display_pose().position, s.drone.position);
    }

    #[test]
    fn test_set_mode_rebuilds_course() {
        let mut s = session(GameMode::FreeFlight);
        assert!(s.course.obstacles.is_empty());
        s.drone.position = Vec3::new(10.0, 2.0, 3.0);
        s.set_mode(GameMode::Mission);
        assert_eq!(s.course.remaining_rings(), 5);
        assert_eq!(s.drone.position, Vec3::new(0.0, 5.0, 0.0));
        s.set_difficulty(Difficulty::Hard);
        assert_eq!(s.course.remaining_rings(), 7);
        assert_eq!(s.game.total_rings, 7);
    }

    #[test]
    fn test_new_difficulty_after_crash_is_a_fresh_run() {
        let mut s = session(GameMode::Mission);
        assert!(s.game.take_damage(100));
        assert!(s.game.mission_complete);

        s.set_difficulty(Difficulty::Hard);
        assert_eq!(s.game.health, 100);
        assert!(!s.game.mission_complete);
        assert!(s.game.hazards_active());

        // Running out of health ends the new run too
        s.course = Course {
            obstacles: vec![Obstacle::beam(1, Vec3::new(0.0, 30.0, 100.0), 8.0, 0.0, 0.0)],
        };
        let mut crashed = false;
        for _ in 0..7 {
            s.time += 2.5;
            s.drone.position = Vec3::new(0.0, 30.0, 100.0);
            s.drone.velocity = Vec3::ZERO;
            crashed |= tick(&mut s, DT, 0.0).contains(&GameEvent::Crashed);
        }
        assert!(crashed);
        assert_eq!(s.game.health, 0);
        assert!(s.game.mission_complete);
    }
}
