//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame. Motion is expressed in
//! per-frame units; `dt_ms` only drives the clocks (session time, spawn
//! accumulator, game-over delay).

use glam::Vec2;

use super::collision::{collect_power_ups, resolve_player_enemies, resolve_projectile_enemies};
use super::entity::UpdateContext;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; each axis is scaled by the base player speed
    pub intent: Vec2,
    /// Points to fire at this frame, in canvas coordinates
    pub shots: Vec<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.frame += 1;
    state.time_ms += dt_ms as f64;

    if input.pause {
        state.toggle_pause();
    }

    // Stars keep twinkling on every screen
    state.background.update(&mut state.rng, state.bounds);

    if state.phase == GamePhase::Paused {
        return;
    }

    match state.phase {
        GamePhase::Playing => {
            let base_speed = state.difficulty.base_player_speed;
            state.player.steer(input.intent, base_speed);
            state.player.update(state.bounds);
            for &target in &input.shots {
                state.fire(target);
            }
        }
        _ => {
            state.player.shrink();
            state.advance_game_over(dt_ms as f64);
        }
    }

    let ctx = UpdateContext {
        bounds: state.bounds,
        target: state.player.body.pos,
        clock_ms: state.time_ms,
    };

    // Explosions and labels finish playing after the round ends
    for particle in state.particles.iter_mut() {
        particle.update(&ctx);
    }
    for text in state.texts.iter_mut() {
        text.update(&ctx);
    }

    if state.phase == GamePhase::Playing {
        for power_up in state.power_ups.iter_mut() {
            power_up.update(&ctx);
        }
        collect_power_ups(state);

        for projectile in state.projectiles.iter_mut() {
            projectile.update(&ctx);
        }
        for enemy in state.enemies.iter_mut() {
            enemy.update(&ctx);
        }

        let died = resolve_player_enemies(state);
        if !died {
            resolve_projectile_enemies(state);
        }

        let due = state.difficulty.advance(dt_ms);
        for _ in 0..due {
            state.try_spawn_enemy();
        }
    }

    state.sweep();
}
