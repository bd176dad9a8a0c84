//! Browser bindings
//!
//! The page script owns the canvas, the 3D scene and the joystick DOM. Each
//! animation frame it calls [`WebSim::frame`] and reads poses and HUD values
//! back out of the simulation.

use wasm_bindgen::prelude::*;

use crate::platform::{LocalStorage, now_ms};
use crate::recorder::FlightRecorder;
use crate::settings::Settings;
use crate::sim::{Difficulty, GameMode, Session, StickInput, StickSide, map_joystick, tick};

/// Longest frame the simulation will take in one step (seconds)
const MAX_FRAME_SECS: f64 = 0.1;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Drone sim starting...");
}

/// Running simulation driven from JavaScript
#[wasm_bindgen]
pub struct WebSim {
    session: Session,
    settings: Settings,
    store: Option<LocalStorage>,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebSim {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSim {
        let store = match LocalStorage::open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Storage unavailable, nothing will persist: {}", e);
                None
            }
        };
        let settings = match &store {
            Some(store) => Settings::load_from(store),
            None => Settings::default(),
        };
        let seed = js_sys::Date::now() as u64;
        WebSim {
            session: Session::new(seed, &settings),
            settings,
            store,
            last_time: None,
        }
    }

    /// Advance one animation frame; returns this frame's events as JSON
    pub fn frame(&mut self, time_ms: f64) -> String {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_SECS),
            None => 0.0,
        };
        self.last_time = Some(time_ms);

        let events = tick(&mut self.session, dt as f32, now_ms());
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Could not encode events: {}", e);
            "[]".to_string()
        })
    }

    // === Controls ===

    pub fn set_left_stick(&mut self, x: f32, y: f32) {
        self.session.controls.set_stick(StickSide::Left, StickInput::new(x, y));
    }

    pub fn set_right_stick(&mut self, x: f32, y: f32) {
        self.session.controls.set_stick(StickSide::Right, StickInput::new(x, y));
    }

    /// Pointer offset from a stick's center to `[x, y]` deflection
    pub fn map_stick(dx: f32, dy: f32, max_radius: f32) -> Vec<f32> {
        let stick = map_joystick(dx, dy, max_radius);
        vec![stick.x, stick.y]
    }

    /// Swap Mode 1 / Mode 2; returns the new mode
    pub fn toggle_control_mode(&mut self) -> String {
        let mode = self.session.controls.control_mode.toggled();
        self.session.controls.control_mode = mode;
        self.settings.control_mode = mode;
        self.persist_settings();
        log::info!("Control mode: {}", mode.as_str());
        mode.as_str().to_string()
    }

    pub fn control_mode(&self) -> String {
        self.session.controls.control_mode.as_str().to_string()
    }

    /// Caption for the "left" or "right" stick
    pub fn stick_label(&self, side: &str) -> String {
        let side = match side {
            "left" => StickSide::Left,
            _ => StickSide::Right,
        };
        side.label(self.session.controls.control_mode).to_string()
    }

    // === Game ===

    pub fn set_mode(&mut self, mode: &str) -> bool {
        let Some(mode) = GameMode::from_str(mode) else {
            log::warn!("Unknown game mode '{}'", mode);
            return false;
        };
        self.session.set_mode(mode);
        self.settings.mode = mode;
        self.persist_settings();
        true
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> bool {
        let Some(difficulty) = Difficulty::from_str(difficulty) else {
            log::warn!("Unknown difficulty '{}'", difficulty);
            return false;
        };
        self.session.set_difficulty(difficulty);
        self.settings.difficulty = difficulty;
        self.persist_settings();
        true
    }

    /// Drone back to the spawn point
    pub fn reset_drone(&mut self) {
        self.session.reset_drone();
    }

    /// Same mode and difficulty from the top
    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn toggle_instructions(&mut self) -> bool {
        self.session.game.toggle_instructions();
        self.settings.show_instructions = self.session.game.show_instructions;
        self.persist_settings();
        self.settings.show_instructions
    }

    // === Scene ===

    /// Drone `[x, y, z]` to draw
    pub fn drone_position(&self) -> Vec<f32> {
        self.session.display_pose().position.to_array().to_vec()
    }

    /// Drone `[pitch, yaw, roll]` to draw
    pub fn drone_rotation(&self) -> Vec<f32> {
        self.session.display_pose().rotation.to_array().to_vec()
    }

    /// `[px, py, pz, tx, ty, tz]`: camera position then look-at target
    pub fn camera(&self) -> Vec<f32> {
        let cam = &self.session.camera;
        let mut out = cam.position.to_array().to_vec();
        out.extend_from_slice(&cam.look_at.to_array());
        out
    }

    /// Current obstacle poses as JSON
    pub fn obstacles(&self) -> String {
        serde_json::to_string(&self.session.course.obstacles).unwrap_or_else(|e| {
            log::warn!("Could not encode obstacles: {}", e);
            "[]".to_string()
        })
    }

    // === HUD ===

    pub fn altitude(&self) -> f32 {
        self.session.drone.altitude
    }

    pub fn speed(&self) -> f32 {
        self.session.drone.speed
    }

    pub fn heading(&self) -> f32 {
        self.session.drone.heading
    }

    pub fn score(&self) -> f64 {
        self.session.game.score as f64
    }

    pub fn health(&self) -> u32 {
        self.session.game.health
    }

    pub fn rings_collected(&self) -> u32 {
        self.session.game.rings_collected
    }

    pub fn total_rings(&self) -> u32 {
        self.session.game.total_rings
    }

    pub fn mission_complete(&self) -> bool {
        self.session.game.mission_complete
    }

    pub fn show_instructions(&self) -> bool {
        self.session.game.show_instructions
    }

    pub fn tutorial_title(&self) -> String {
        self.session.tutorial.step.title().to_string()
    }

    pub fn tutorial_instructions(&self) -> String {
        self.session.tutorial.step.instructions().to_string()
    }

    pub fn tutorial_progress(&self) -> f32 {
        self.session.tutorial.progress()
    }

    // === Recorder ===

    pub fn start_recording(&mut self) {
        self.session.recorder.start_recording();
    }

    pub fn stop_recording(&mut self) {
        self.session.recorder.stop_recording();
    }

    pub fn start_replay(&mut self) -> bool {
        self.session.recorder.start_replay()
    }

    pub fn stop_replay(&mut self) {
        self.session.recorder.stop_replay();
    }

    pub fn is_recording(&self) -> bool {
        self.session.recorder.is_recording()
    }

    pub fn is_replaying(&self) -> bool {
        self.session.recorder.is_replaying()
    }

    pub fn recorded_frames(&self) -> usize {
        self.session.recorder.len()
    }

    pub fn save_recording(&mut self, name: &str) -> bool {
        let Some(store) = self.store.as_mut() else {
            log::warn!("No storage, recording '{}' not saved", name);
            return false;
        };
        match self.session.recorder.save(store, name) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not save recording '{}': {}", name, e);
                false
            }
        }
    }

    pub fn load_recording(&mut self, name: &str) -> bool {
        match &self.store {
            Some(store) => self.session.recorder.load(store, name),
            None => false,
        }
    }

    pub fn delete_recording(&mut self, name: &str) -> bool {
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        match FlightRecorder::delete(store, name) {
            Ok(deleted) => deleted,
            Err(e) => {
                log::warn!("Could not delete recording '{}': {}", name, e);
                false
            }
        }
    }

    /// Saved recording names as a JSON array
    pub fn saved_recordings(&self) -> String {
        let names = match &self.store {
            Some(store) => FlightRecorder::saved_recordings(store),
            None => Vec::new(),
        };
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }
}

impl WebSim {
    fn persist_settings(&mut self) {
        if let Some(store) = self.store.as_mut() {
            self.settings.save_to(store);
        }
    }
}

impl Default for WebSim {
    fn default() -> Self {
        Self::new()
    }
}
