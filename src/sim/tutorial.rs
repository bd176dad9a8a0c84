//! Tutorial progression
//!
//! Linear steps: hover, fly forward, turn around, done. Each step samples the
//! drone telemetry every frame and counts frames that satisfy its goal. Once
//! the count passes the step's threshold the step is marked passed, points are
//! awarded, and two seconds later the next step begins.

use serde::{Deserialize, Serialize};

use super::flight::DroneState;

/// Seconds between passing a step and starting the next
pub const ADVANCE_DELAY_SECS: f32 = 2.0;

/// Tutorial step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TutorialStep {
    #[default]
    Hover,
    Forward,
    Turn,
    Complete,
}

impl TutorialStep {
    pub fn next(&self) -> Self {
        match self {
            TutorialStep::Hover => TutorialStep::Forward,
            TutorialStep::Forward => TutorialStep::Turn,
            TutorialStep::Turn | TutorialStep::Complete => TutorialStep::Complete,
        }
    }

    /// Frames of satisfied goal needed to pass (count must exceed this)
    pub fn required_frames(&self) -> u32 {
        match self {
            TutorialStep::Hover => 60,
            TutorialStep::Forward | TutorialStep::Turn => 30,
            TutorialStep::Complete => 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TutorialStep::Hover => "Hover practice",
            TutorialStep::Forward => "Forward flight",
            TutorialStep::Turn => "Turn around",
            TutorialStep::Complete => "Tutorial complete!",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            TutorialStep::Hover => "Hold the drone still between 4 and 6 m for one second",
            TutorialStep::Forward => "Fly forward faster than 2 m/s",
            TutorialStep::Turn => "Turn the drone to face the opposite way",
            TutorialStep::Complete => "You have mastered the basic controls",
        }
    }
}

/// Goal check for a step; `None` when the step has no goal
fn goal_met(step: TutorialStep, drone: &DroneState) -> Option<bool> {
    match step {
        TutorialStep::Hover => Some(drone.altitude > 4.0 && drone.altitude < 6.0 && drone.speed < 0.5),
        TutorialStep::Forward => Some(drone.speed > 2.0),
        TutorialStep::Turn => {
            let off = (drone.heading - 180.0).abs();
            Some(off < 20.0 || off > 340.0)
        }
        TutorialStep::Complete => None,
    }
}

/// What changed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialEvent {
    /// The current step's goal was met
    StepPassed(TutorialStep),
    /// Moved on to a new step
    Advanced(TutorialStep),
}

/// Tutorial progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorialState {
    pub step: TutorialStep,
    /// Frames the current goal has been satisfied
    pub timer: u32,
    /// Current step passed, waiting to advance
    pub step_complete: bool,
    /// Seconds left before advancing
    advance_in: f32,
}

impl TutorialState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first step
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    pub fn is_finished(&self) -> bool {
        self.step == TutorialStep::Complete
    }

    /// Progress toward the current goal, 0..=1
    pub fn progress(&self) -> f32 {
        let required = self.step.required_frames();
        if self.step_complete || required == 0 {
            return 1.0;
        }
        (self.timer as f32 / required as f32).min(1.0)
    }

    /// Sample one frame of telemetry
    pub fn update(&mut self, drone: &DroneState, dt: f32) -> Option<TutorialEvent> {
        if self.is_finished() {
            return None;
        }

        if self.step_complete {
            self.advance_in -= dt;
            if self.advance_in <= 0.0 {
                self.enter(self.step.next());
                return Some(TutorialEvent::Advanced(self.step));
            }
            return None;
        }

        let met = goal_met(self.step, drone)?;
        if met {
            self.timer += 1;
        } else if self.step != TutorialStep::Turn {
            // The turn step keeps its count through misses
            self.timer = 0;
        }

        if self.timer > self.step.required_frames() {
            self.step_complete = true;
            self.advance_in = ADVANCE_DELAY_SECS;
            log::info!("Tutorial step passed: {}", self.step.title());
            return Some(TutorialEvent::StepPassed(self.step));
        }
        None
    }

    fn enter(&mut self, step: TutorialStep) {
        log::info!("Tutorial step: {}", step.title());
        self.step = step;
        self.timer = 0;
        self.step_complete = false;
        self.advance_in = 0.0;
    }
}
