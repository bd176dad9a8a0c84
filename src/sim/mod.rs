//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep (the host's frame time)
//! - Seeded RNG only
//! - Stable iteration order (by obstacle ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod flight;
pub mod input;
pub mod obstacles;
pub mod state;
pub mod tick;
pub mod tutorial;
pub mod wind;

pub use collision::{Contact, HitCooldown, check_course};
pub use flight::{DroneState, FlightProfile, integrate};
pub use input::{ControlChannels, ControlInput, ControlMode, Joystick, StickInput, StickSide, map_joystick};
pub use obstacles::{Course, Obstacle, ObstacleKind};
pub use state::{Difficulty, GameEvent, GameMode, GameState};
pub use tick::{DisplayPose, Session, tick};
pub use tutorial::{TutorialState, TutorialStep};
