//! Player settings and preferences
//!
//! Persisted separately from recordings in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::sim::{ControlMode, Difficulty, FlightProfile, GameMode};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Stick layout
    pub control_mode: ControlMode,
    /// Flight feel
    pub flight_profile: FlightProfile,

    // === Game ===
    /// Mode selected in the menu
    pub mode: GameMode,
    /// Mission difficulty
    pub difficulty: Difficulty,
    /// Gusting wind during missions
    pub wind_enabled: bool,

    // === HUD ===
    /// Show the control help overlay
    pub show_instructions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Mode2,
            flight_profile: FlightProfile::Stabilized,

            mode: GameMode::FreeFlight,
            difficulty: Difficulty::Easy,
            wind_enabled: true,

            show_instructions: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "drone_sim_settings";

    /// Load settings from a store, falling back to defaults
    pub fn load_from(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings storage unavailable: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to a store (best effort)
    pub fn save_to(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}
