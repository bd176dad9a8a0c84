//! Game and mission state
//!
//! A small reducer: discrete events (ring collected, damage taken, points
//! awarded) mutate the state and the mission completes when every ring is in
//! or health runs out.

use serde::{Deserialize, Serialize};

use super::obstacles::ObstacleKind;
use super::tutorial::TutorialStep;
use crate::consts::*;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Open sky, no obstacles
    #[default]
    FreeFlight,
    /// Guided steps with a single ring
    Tutorial,
    /// Rings to collect, hazards that hurt
    Mission,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::FreeFlight => "free_flight",
            GameMode::Tutorial => "tutorial",
            GameMode::Mission => "mission",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free_flight" | "free" => Some(GameMode::FreeFlight),
            "tutorial" => Some(GameMode::Tutorial),
            "mission" => Some(GameMode::Mission),
            _ => None,
        }
    }
}

/// Mission difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Rings in a mission at this difficulty
    pub fn total_rings(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 6,
            Difficulty::Hard => 7,
        }
    }
}

/// Something that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A ring was flown through
    RingCollected { ring_id: u32 },
    /// A hazard hit the drone
    DamageTaken {
        obstacle_id: u32,
        kind: ObstacleKind,
        amount: u32,
    },
    /// All rings collected
    MissionComplete,
    /// Health ran out
    Crashed,
    /// A tutorial step's goal was met (points awarded)
    TutorialStepPassed { step: TutorialStep },
    /// The tutorial moved on to a new step
    TutorialAdvanced { step: TutorialStep },
    /// Replay reached the end of the recording
    ReplayFinished,
}

/// Score, rings and health for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub score: u64,
    pub rings_collected: u32,
    pub total_rings: u32,
    pub health: u32,
    pub mission_complete: bool,
    /// Whether the control help overlay is shown
    pub show_instructions: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameMode::default(), Difficulty::default())
    }
}

impl GameState {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            mode,
            difficulty,
            score: 0,
            rings_collected: 0,
            total_rings: difficulty.total_rings(),
            health: MAX_HEALTH,
            mission_complete: false,
            show_instructions: true,
        }
    }

    /// Switch mode and start the run over
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset_game();
    }

    /// Change difficulty and start the run over
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.total_rings = difficulty.total_rings();
        self.reset_game();
    }

    /// Clear the run's progress, keeping mode and difficulty
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.rings_collected = 0;
        self.health = MAX_HEALTH;
        self.mission_complete = false;
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Count a ring; returns true if this ring finished the mission
    pub fn collect_ring(&mut self) -> bool {
        self.rings_collected += 1;
        self.score += RING_SCORE;
        let finished = !self.mission_complete && self.rings_collected >= self.total_rings;
        if finished {
            self.mission_complete = true;
        }
        finished
    }

    /// Apply damage; returns true if this hit emptied the health bar
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        let crashed = was_alive && self.health == 0;
        if crashed {
            self.mission_complete = true;
        }
        crashed
    }

    pub fn toggle_instructions(&mut self) {
        self.show_instructions = !self.show_instructions;
    }

    /// Collision checks for hazards apply
    pub fn hazards_active(&self) -> bool {
        self.mode == GameMode::Mission && !self.mission_complete
    }

    /// Rings can be collected (tutorial and mission)
    pub fn rings_active(&self) -> bool {
        self.mode != GameMode::FreeFlight && !self.mission_complete
    }
}
