//! Gusting wind for missions

use glam::Vec3;

use super::state::{Difficulty, GameMode};

/// Peak horizontal wind acceleration for a mode/difficulty (m/s²)
pub fn wind_strength(mode: GameMode, difficulty: Difficulty, enabled: bool) -> f32 {
    if !enabled || mode != GameMode::Mission {
        return 0.0;
    }
    match difficulty {
        Difficulty::Easy => 0.5,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 3.0,
    }
}

/// Wind force at session time `t` (seconds)
///
/// Three out-of-phase sines; the vertical component is weaker.
pub fn wind_force(strength: f32, t: f32) -> Vec3 {
    if strength == 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        (t * 0.5).sin() * strength,
        (t * 0.7).sin() * strength * 0.3,
        (t * 0.3).cos() * strength,
    )
}
