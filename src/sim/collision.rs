//! Collision and combat resolution
//!
//! All pairs use the same circle contact test ([`Body::touches`]). Nothing is
//! removed while scanning: hits raise deletion flags and the frame's sweep
//! compacts the collections afterwards.
//!
//! [`Body::touches`]: super::entity::Body::touches

use rand::Rng;

use super::entity::{Color, Entity, EntityKind, PowerUpKind};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Contact damage from an enemy of `radius` closing at `relative_speed`
#[inline]
pub fn contact_damage(radius: f32, relative_speed: f32) -> f32 {
    radius * DAMAGE_RADIUS_FACTOR + relative_speed * radius * DAMAGE_MOMENTUM_FACTOR
}

/// Whole particles for a burst proportional to `extent`
#[inline]
pub fn particle_count(extent: f32) -> usize {
    extent.max(0.0).floor() as usize
}

/// Roll the drop table for a destroyed enemy
pub fn roll_drop(rng: &mut impl Rng) -> Option<PowerUpKind> {
    let roll: f32 = rng.random();
    if roll < DROP_HEALTH_CHANCE {
        Some(PowerUpKind::HealthBoost)
    } else if roll < DROP_HEALTH_CHANCE + DROP_BUFF_CHANCE {
        let pick = rng.random_range(0..PowerUpKind::TIMED.len());
        Some(PowerUpKind::TIMED[pick])
    } else {
        None
    }
}

/// Player against every enemy
///
/// Returns true if the player died this frame.
pub fn resolve_player_enemies(state: &mut GameState) -> bool {
    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if enemy.is_dead() || !state.player.body.touches(&enemy.body) {
            continue;
        }
        let (pos, vel, radius, color) = (
            enemy.body.pos,
            enemy.body.vel,
            enemy.body.radius,
            enemy.body.color,
        );

        if state.player.is_shielded() {
            state.enemies[i].body.dead = true;
            state.emit_particles(pos, color, particle_count(radius), 2.0, 4.0, false);
            log::debug!("Shield absorbed enemy r={:.1}", radius);
            continue;
        }
        if state.player.invulnerable {
            continue;
        }

        let relative_speed = (state.player.body.vel - vel).length();
        let damage = contact_damage(radius, relative_speed);
        state.player.take_hit(damage, pos);
        state.enemies[i].body.dead = true;
        state.emit_particles(pos, color, particle_count(radius), 2.0, 4.0, false);
        log::debug!(
            "Player hit for {:.1} (health {:.1})",
            damage,
            state.player.health
        );
        state.push_event(GameEvent::HealthChanged {
            current: state.player.health,
            max: state.player.max_health,
        });

        if state.player.health <= 0.0 {
            state.end_round();
            return true;
        }
    }
    false
}

/// Every live projectile against every live enemy
pub fn resolve_projectile_enemies(state: &mut GameState) {
    for i in 0..state.enemies.len() {
        for j in 0..state.projectiles.len() {
            let enemy = &state.enemies[i];
            let shot = &state.projectiles[j];
            if enemy.is_dead() {
                break;
            }
            if shot.is_dead() || !shot.body.touches(&enemy.body) {
                continue;
            }
            let (enemy_pos, radius, color) = (enemy.body.pos, enemy.body.radius, enemy.body.color);
            let impact = shot.body.pos;

            state.projectiles[j].body.dead = true;
            state.emit_particles(impact, color, particle_count(radius * 2.0), 2.0, 6.0, true);

            if radius - ENEMY_SHRINK_ON_HIT > ENEMY_MIN_RADIUS {
                state.enemies[i].body.radius -= ENEMY_SHRINK_ON_HIT;
                state.emit_text(enemy_pos, format!("+{}", SCORE_HIT), Color::White);
                state.award(SCORE_HIT);
            } else {
                state.enemies[i].body.dead = true;
                state.emit_text(enemy_pos, format!("+{}", SCORE_KILL), Color::Gold);
                state.award(SCORE_KILL);
                if let Some(kind) = roll_drop(&mut state.rng) {
                    log::debug!("Dropped {:?}", kind);
                    state.power_ups.push(Entity::power_up(enemy_pos, kind));
                }
            }
        }
    }
}

/// Pick up at most one power-up the player is touching, newest first
pub fn collect_power_ups(state: &mut GameState) -> Option<PowerUpKind> {
    let index = state
        .power_ups
        .iter()
        .rposition(|p| !p.is_dead() && state.player.body.touches(&p.body))?;

    let power_up = &mut state.power_ups[index];
    let EntityKind::PowerUp(kind) = power_up.kind else {
        return None;
    };
    power_up.body.dead = true;
    let pos = power_up.body.pos;

    match kind {
        PowerUpKind::HealthBoost => {
            state.player.heal(HEALTH_BOOST_AMOUNT);
            state.push_event(GameEvent::HealthChanged {
                current: state.player.health,
                max: state.player.max_health,
            });
        }
        timed => state.player.effects.set(timed, POWER_UP_DURATION),
    }
    log::debug!("Collected {:?}", kind);
    state.emit_text(pos, kind.label(), kind.color());
    state.push_event(GameEvent::PowerUpCollected(kind));
    Some(kind)
}
