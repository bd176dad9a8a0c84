//! Joystick input mapping
//!
//! Two on-screen sticks produce normalized axis pairs. The control mode decides
//! which stick axis drives which of the four flight channels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{STICK_DEAD_ZONE, STICK_SENSITIVITY};

/// Gap between the widget edge and the furthest knob travel (pixels)
pub const KNOB_MARGIN: f32 = 20.0;

/// Stick-to-channel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Left: throttle/yaw, right: pitch/roll
    Mode1,
    /// Left: throttle/roll, right: pitch/yaw
    #[default]
    Mode2,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Mode1 => "mode1",
            ControlMode::Mode2 => "mode2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mode1" | "1" => Some(ControlMode::Mode1),
            "mode2" | "2" => Some(ControlMode::Mode2),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ControlMode::Mode1 => ControlMode::Mode2,
            ControlMode::Mode2 => ControlMode::Mode1,
        }
    }
}

/// Which on-screen stick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickSide {
    Left,
    Right,
}

impl StickSide {
    /// Caption shown under the stick for the given mode
    pub fn label(&self, mode: ControlMode) -> &'static str {
        match (mode, self) {
            (ControlMode::Mode1, StickSide::Left) => "Throttle / Yaw",
            (ControlMode::Mode1, StickSide::Right) => "Elevator / Aileron",
            (ControlMode::Mode2, StickSide::Left) => "Throttle / Aileron",
            (ControlMode::Mode2, StickSide::Right) => "Elevator / Yaw",
        }
    }
}

/// Normalized stick deflection, each axis in [-1, 1] (y up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StickInput {
    pub x: f32,
    pub y: f32,
}

impl StickInput {
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Both sticks plus the active mode, written by the UI and read each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInput {
    pub left_stick: StickInput,
    pub right_stick: StickInput,
    pub control_mode: ControlMode,
}

/// Logical flight channels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlChannels {
    pub throttle: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl ControlInput {
    pub fn new(control_mode: ControlMode) -> Self {
        Self {
            control_mode,
            ..Default::default()
        }
    }

    /// Resolve the four channels for the active mode
    pub fn channels(&self) -> ControlChannels {
        let (left, right) = (self.left_stick, self.right_stick);
        match self.control_mode {
            ControlMode::Mode1 => ControlChannels {
                throttle: left.y,
                yaw: left.x,
                pitch: right.y,
                roll: right.x,
            },
            ControlMode::Mode2 => ControlChannels {
                throttle: left.y,
                roll: left.x,
                pitch: right.y,
                yaw: right.x,
            },
        }
    }

    /// Return both sticks to center
    pub fn center_sticks(&mut self) {
        self.left_stick = StickInput::CENTER;
        self.right_stick = StickInput::CENTER;
    }

    pub fn set_stick(&mut self, side: StickSide, stick: StickInput) {
        match side {
            StickSide::Left => self.left_stick = stick,
            StickSide::Right => self.right_stick = stick,
        }
    }
}

/// Map a pointer displacement from the widget center to a stick deflection
///
/// `dx`/`dy` are in screen pixels (y grows downward). The displacement is
/// clamped to `max_radius`, normalized, dead-zoned per axis, scaled by the
/// sensitivity and clamped back to [-1, 1].
pub fn map_joystick(dx: f32, dy: f32, max_radius: f32) -> StickInput {
    if max_radius <= 0.0 {
        return StickInput::CENTER;
    }

    let knob = clamp_to_radius(Vec2::new(dx, dy), max_radius);

    let mut x = knob.x / max_radius;
    let mut y = -knob.y / max_radius;

    if x.abs() < STICK_DEAD_ZONE {
        x = 0.0;
    }
    if y.abs() < STICK_DEAD_ZONE {
        y = 0.0;
    }

    StickInput {
        x: (x * STICK_SENSITIVITY).clamp(-1.0, 1.0),
        y: (y * STICK_SENSITIVITY).clamp(-1.0, 1.0),
    }
}

fn clamp_to_radius(offset: Vec2, max_radius: f32) -> Vec2 {
    let distance = offset.length();
    if distance > max_radius {
        offset / distance * max_radius
    } else {
        offset
    }
}

/// Screen rectangle occupied by a stick widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl WidgetRect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// A draggable on-screen stick
///
/// Only the drag flag and knob offset are kept; every update is pushed
/// to the move callback.
pub struct Joystick {
    rect: WidgetRect,
    dragging: bool,
    knob: Vec2,
    on_move: Box<dyn FnMut(StickInput)>,
}

impl Joystick {
    pub fn new(rect: WidgetRect, on_move: impl FnMut(StickInput) + 'static) -> Self {
        Self {
            rect,
            dragging: false,
            knob: Vec2::ZERO,
            on_move: Box::new(on_move),
        }
    }

    /// Furthest knob travel from center (pixels)
    pub fn max_radius(&self) -> f32 {
        self.rect.width / 2.0 - KNOB_MARGIN
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Knob offset from center for drawing (pixels, screen orientation)
    pub fn knob_offset(&self) -> Vec2 {
        self.knob
    }

    /// Widget moved or resized
    pub fn set_rect(&mut self, rect: WidgetRect) {
        self.rect = rect;
    }

    /// Starts a drag when the pointer lands inside the widget.
    /// Returns true if the event was consumed.
    pub fn pointer_down(&mut self, p: Vec2) -> bool {
        if !self.rect.contains(p) {
            return false;
        }
        self.dragging = true;
        self.update(p);
        true
    }

    /// Returns true if the event was consumed
    pub fn pointer_move(&mut self, p: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        self.update(p);
        true
    }

    /// Release (also used for pointer cancel)
    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.knob = Vec2::ZERO;
        (self.on_move)(StickInput::CENTER);
    }

    fn update(&mut self, p: Vec2) {
        let radius = self.max_radius();
        let offset = p - self.rect.center();
        self.knob = clamp_to_radius(offset, radius.max(0.0));
        let stick = map_joystick(offset.x, offset.y, radius);
        (self.on_move)(stick);
    }
}

impl std::fmt::Debug for Joystick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joystick")
            .field("rect", &self.rect)
            .field("dragging", &self.dragging)
            .field("knob", &self.knob)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_mode1_left_stick_is_yaw() {
        let input = ControlInput {
            left_stick: StickInput::new(1.0, 0.0),
            right_stick: StickInput::CENTER,
            control_mode: ControlMode::Mode1,
        };
        let ch = input.channels();
        assert_eq!(ch.yaw, 1.0);
        assert_eq!(ch.roll, 0.0);
    }

    #[test]
    fn test_mode2_left_stick_is_roll() {
        let input = ControlInput {
            left_stick: StickInput::new(1.0, 0.0),
            right_stick: StickInput::CENTER,
            control_mode: ControlMode::Mode2,
        };
        let ch = input.channels();
        assert_eq!(ch.roll, 1.0);
        assert_eq!(ch.yaw, 0.0);
    }

    #[test]
    fn test_throttle_and_pitch_same_in_both_modes() {
        for mode in [ControlMode::Mode1, ControlMode::Mode2] {
            let input = ControlInput {
                left_stick: StickInput::new(0.0, 0.7),
                right_stick: StickInput::new(0.0, -0.4),
                control_mode: mode,
            };
            let ch = input.channels();
            assert_eq!(ch.throttle, 0.7);
            assert_eq!(ch.pitch, -0.4);
        }
    }

    #[test]
    fn test_dead_zone_snaps_small_deflection() {
        // 4% of radius on x, 50% on y
        let stick = map_joystick(4.0, -50.0, 100.0);
        assert_eq!(stick.x, 0.0);
        assert!((stick.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_screen_down_is_stick_down() {
        let stick = map_joystick(0.0, 30.0, 100.0);
        assert!(stick.y < 0.0);
    }

    #[test]
    fn test_sensitivity_saturates() {
        let stick = map_joystick(80.0, 0.0, 100.0);
        assert_eq!(stick.x, 1.0);
    }

    #[test]
    fn test_displacement_clamped_to_radius() {
        let stick = map_joystick(-500.0, 0.0, 100.0);
        assert_eq!(stick.x, -1.0);
        assert_eq!(stick.y, 0.0);
    }

    #[test]
    fn test_joystick_drag_and_release() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let rect = WidgetRect {
            left: 0.0,
            top: 0.0,
            width: 160.0,
            height: 160.0,
        };
        let mut stick = Joystick::new(rect, move |s| sink.borrow_mut().push(s));

        // Outside the widget: ignored
        assert!(!stick.pointer_down(Vec2::new(300.0, 300.0)));
        assert!(!stick.pointer_move(Vec2::new(80.0, 20.0)));
        assert!(seen.borrow().is_empty());

        assert!(stick.pointer_down(Vec2::new(80.0, 80.0)));
        assert!(stick.is_dragging());
        assert!(stick.pointer_move(Vec2::new(80.0, 20.0)));
        stick.pointer_up();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], StickInput::CENTER);
        assert_eq!(seen[1].x, 0.0);
        assert_eq!(seen[1].y, 1.0);
        assert_eq!(seen[2], StickInput::CENTER);
        assert!(!stick.is_dragging());
        assert_eq!(stick.knob_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_mode_toggle_and_parse() {
        assert_eq!(ControlMode::Mode1.toggled(), ControlMode::Mode2);
        assert_eq!(ControlMode::from_str("MODE1"), Some(ControlMode::Mode1));
        assert_eq!(ControlMode::from_str("mode3"), None);
    }

    proptest! {
        #[test]
        fn prop_mapped_stick_in_unit_square(dx in -1000.0f32..1000.0, dy in -1000.0f32..1000.0, r in 1.0f32..200.0) {
            let s = map_joystick(dx, dy, r);
            prop_assert!((-1.0..=1.0).contains(&s.x));
            prop_assert!((-1.0..=1.0).contains(&s.y));
        }
    }
}
