//! Keyboard, mouse and touch input
//!
//! Browser listeners feed raw events in; the frame driver drains a
//! [`TickInput`] out. Nothing here touches the DOM, so the joystick and
//! tap-to-shoot rules are testable natively.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Knob travel in pixels; full deflection maps to full speed
pub const JOYSTICK_RADIUS: f32 = 40.0;
/// A touch held this long becomes a drag instead of a tap
pub const JOYSTICK_LOCK_MS: f64 = 72.0;

const UP: [&str; 2] = ["KeyW", "ArrowUp"];
const DOWN: [&str; 2] = ["KeyS", "ArrowDown"];
const LEFT: [&str; 2] = ["KeyA", "ArrowLeft"];
const RIGHT: [&str; 2] = ["KeyD", "ArrowRight"];

/// Virtual joystick state
#[derive(Debug, Clone, Default)]
pub struct Joystick {
    pub active: bool,
    pub touch_id: Option<i32>,
    /// Center of the joystick widget
    pub origin: Vec2,
    /// Deflection, length at most 1
    pub vector: Vec2,
    /// Dragging rather than tapping
    pub locked: bool,
    started_ms: f64,
    last_touch: Vec2,
}

impl Joystick {
    fn aim(&mut self, touch: Vec2) {
        let offset = touch - self.origin;
        let distance = offset.length().min(JOYSTICK_RADIUS);
        self.vector = offset.normalize_or_zero() * (distance / JOYSTICK_RADIUS);
    }

    /// Knob displacement in pixels for the widget
    pub fn knob_offset(&self) -> Vec2 {
        self.vector * JOYSTICK_RADIUS
    }
}

/// Accumulated input between simulation ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    pub joystick: Joystick,
    shots: Vec<Vec2>,
    pause: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed, by `KeyboardEvent.code`
    pub fn key_down(&mut self, code: &str) {
        if code == "Escape" {
            self.pause = true;
        }
        self.held.insert(code.to_string());
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    /// Request a pause toggle on the next tick
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Queue a shot toward a canvas point
    pub fn shoot_at(&mut self, target: Vec2) {
        self.shots.push(target);
    }

    /// True for points in the bottom-left quadrant of the viewport
    pub fn in_joystick_zone(point: Vec2, viewport: Vec2) -> bool {
        point.x < viewport.x / 2.0 && point.y > viewport.y / 2.0
    }

    /// Grab the joystick; false if another touch already holds it
    pub fn joystick_start(&mut self, touch_id: i32, origin: Vec2, touch: Vec2, now_ms: f64) -> bool {
        if self.joystick.active {
            return false;
        }
        self.joystick = Joystick {
            active: true,
            touch_id: Some(touch_id),
            origin,
            vector: Vec2::ZERO,
            locked: false,
            started_ms: now_ms,
            last_touch: touch,
        };
        true
    }

    /// Route a new touch: joystick zone grabs the stick, anywhere else shoots
    pub fn touch_start(
        &mut self,
        touch_id: i32,
        touch: Vec2,
        viewport: Vec2,
        joystick_origin: Vec2,
        now_ms: f64,
    ) {
        if Self::in_joystick_zone(touch, viewport) {
            self.joystick_start(touch_id, joystick_origin, touch, now_ms);
        } else if self.joystick.touch_id != Some(touch_id) {
            self.shoot_at(touch);
        }
    }

    /// Track the joystick finger; only a locked stick steers
    pub fn touch_move(&mut self, touch_id: i32, touch: Vec2, now_ms: f64) {
        if !self.joystick.active || self.joystick.touch_id != Some(touch_id) {
            return;
        }
        self.joystick.last_touch = touch;
        self.update(now_ms);
        if self.joystick.locked {
            self.joystick.aim(touch);
        }
    }

    /// Release the joystick finger; a quick tap fires at the release point
    pub fn touch_end(&mut self, touch_id: i32, touch: Vec2, now_ms: f64) {
        if !self.joystick.active || self.joystick.touch_id != Some(touch_id) {
            return;
        }
        self.update(now_ms);
        if !self.joystick.locked {
            self.shoot_at(touch);
        }
        self.joystick = Joystick {
            origin: self.joystick.origin,
            ..Joystick::default()
        };
    }

    /// Lock a held joystick once the tap window has passed
    pub fn update(&mut self, now_ms: f64) {
        let stick = &mut self.joystick;
        if stick.active && !stick.locked && now_ms - stick.started_ms >= JOYSTICK_LOCK_MS {
            stick.locked = true;
            let touch = stick.last_touch;
            stick.aim(touch);
        }
    }

    /// Direction to move in, before scaling by player speed
    pub fn intent(&self) -> Vec2 {
        let mut intent = Vec2::ZERO;
        if self.any_held(&UP) {
            intent.y -= 1.0;
        }
        if self.any_held(&DOWN) {
            intent.y += 1.0;
        }
        if self.any_held(&LEFT) {
            intent.x -= 1.0;
        }
        if self.any_held(&RIGHT) {
            intent.x += 1.0;
        }
        intent + self.joystick.vector
    }

    /// Input for the next tick; one-shot requests are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            intent: self.intent(),
            shots: std::mem::take(&mut self.shots),
            pause: std::mem::take(&mut self.pause),
        }
    }

    /// Continuous input only, for extra substeps in the same host frame
    pub fn held_input(&self) -> TickInput {
        TickInput {
            intent: self.intent(),
            ..Default::default()
        }
    }

    /// Forget held keys (window lost focus)
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}
