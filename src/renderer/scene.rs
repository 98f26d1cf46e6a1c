//! Scene drawing
//!
//! Draws one frame of a [`GameState`]. The canvas is never fully cleared: a
//! translucent black wash leaves short motion trails behind everything.

use glam::Vec2;

use super::{ColorStop, Rect, Renderer};
use crate::consts::PLAYER_RADIUS;
use crate::sim::{Entity, EntityKind, GamePhase, GameState};

/// Trail wash drawn over the previous frame
const TRAIL_WASH: &str = "rgba(0, 0, 0, 0.1)";
const TEXT_FONT: &str = "16px sans-serif";
/// Invulnerability flicker window
const FLICKER_MS: f64 = 50.0;
const SHIELD_RING_GAP: f32 = 5.0;
const SHIELD_RING_WIDTH: f32 = 2.0;
/// Power-up icons are fitted inside this multiple of the radius
const POWER_UP_ICON_SCALE: f32 = 1.5;

/// Presentation toggles that do not affect the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOptions {
    /// Disable the invulnerability flicker
    pub reduced_motion: bool,
}

/// Draw a full frame
pub fn draw_frame(r: &mut dyn Renderer, state: &GameState, options: &SceneOptions) {
    let (width, height) = r.size();
    r.set_alpha(1.0);
    r.fill_rect(Rect::new(0.0, 0.0, width, height), TRAIL_WASH);

    for star in &state.background.stars {
        r.set_alpha(star.alpha);
        r.fill_circle(star.pos, star.radius, "white");
    }
    r.set_alpha(1.0);

    draw_player(r, state, options);

    for particle in &state.particles {
        r.set_alpha(particle.body.alpha);
        r.fill_circle(particle.body.pos, particle.body.radius, &particle.body.color.css());
    }
    for text in &state.texts {
        if let EntityKind::FloatingText(label) = &text.kind {
            r.set_alpha(text.body.alpha);
            r.fill_text(label, text.body.pos, &text.body.color.css(), TEXT_FONT);
        }
    }
    r.set_alpha(1.0);

    // The arena empties out once the round is over
    if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        for power_up in &state.power_ups {
            draw_power_up(r, power_up);
        }
        for entity in state.projectiles.iter().chain(&state.enemies) {
            r.fill_circle(entity.body.pos, entity.body.radius, &entity.body.color.css());
        }
    }

    if state.phase == GamePhase::Paused {
        draw_pause_veil(r, width, height);
    }
}

/// True on the frames an invulnerable ship is hidden
fn flicker_hidden(time_ms: f64) -> bool {
    (time_ms / FLICKER_MS).floor() as u64 % 2 == 0
}

fn draw_player(r: &mut dyn Renderer, state: &GameState, options: &SceneOptions) {
    let player = &state.player;
    if player.body.radius <= 0.0 {
        return;
    }
    if player.invulnerable && !options.reduced_motion && flicker_hidden(state.time_ms) {
        return;
    }
    r.fill_circle(player.body.pos, player.body.radius, &player.body.color.css());
    if player.is_shielded() {
        r.stroke_circle(
            player.body.pos,
            player.body.radius + SHIELD_RING_GAP,
            "cyan",
            SHIELD_RING_WIDTH,
        );
    }
}

fn draw_power_up(r: &mut dyn Renderer, power_up: &Entity) {
    let EntityKind::PowerUp(kind) = power_up.kind else {
        return;
    };
    let body = &power_up.body;
    if r.draw_image(kind.image(), body.pos, body.radius * POWER_UP_ICON_SCALE) {
        return;
    }
    // Icon still loading: a soft glow in the power-up's color
    let stops = [
        ColorStop::new(0.0, body.color.css()),
        ColorStop::new(1.0, "rgba(0, 0, 0, 0)"),
    ];
    r.radial_gradient_circle(body.pos, PLAYER_RADIUS.max(body.radius * 0.5), &stops);
}

fn draw_pause_veil(r: &mut dyn Renderer, width: f32, height: f32) {
    let stops = [
        ColorStop::new(0.0, "rgba(0, 0, 0, 0.15)"),
        ColorStop::new(1.0, "rgba(0, 0, 0, 0.45)"),
    ];
    r.linear_gradient_rect(
        Rect::new(0.0, 0.0, width, height),
        Vec2::ZERO,
        Vec2::new(0.0, height),
        &stops,
    );
}
