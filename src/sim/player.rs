//! The player's ship

use glam::Vec2;

use super::entity::{Body, Bounds, Color, Entity, PowerUpKind};
use crate::consts::*;
use crate::{direction_to, perpendicular};

/// Remaining frames on each timed power-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectTimers {
    pub shield: u32,
    pub double_shot: u32,
    pub speed_boost: u32,
}

impl EffectTimers {
    /// Count every timer down by one frame, stopping at zero
    pub fn tick(&mut self) {
        self.shield = self.shield.saturating_sub(1);
        self.double_shot = self.double_shot.saturating_sub(1);
        self.speed_boost = self.speed_boost.saturating_sub(1);
    }

    pub fn get(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Shield => self.shield,
            PowerUpKind::DoubleShot => self.double_shot,
            PowerUpKind::SpeedBoost => self.speed_boost,
            PowerUpKind::HealthBoost => 0,
        }
    }

    /// Start a timed effect. Health boosts are instant and have no timer.
    pub fn set(&mut self, kind: PowerUpKind, frames: u32) {
        match kind {
            PowerUpKind::Shield => self.shield = frames,
            PowerUpKind::DoubleShot => self.double_shot = frames,
            PowerUpKind::SpeedBoost => self.speed_boost = frames,
            PowerUpKind::HealthBoost => {}
        }
    }

    /// Fraction of the full duration left, for HUD bars
    pub fn fraction(&self, kind: PowerUpKind) -> f32 {
        (self.get(kind) as f32 / POWER_UP_DURATION as f32).clamp(0.0, 1.0)
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// May dip below zero on the killing blow
    pub health: f32,
    pub max_health: f32,
    pub effects: EffectTimers,
    pub invulnerable: bool,
    pub invulnerable_ticks: u32,
    /// Displacement applied each frame, decaying toward zero
    pub knockback: Vec2,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, PLAYER_RADIUS, Color::White),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            effects: EffectTimers::default(),
            invulnerable: false,
            invulnerable_ticks: 0,
            knockback: Vec2::ZERO,
        }
    }

    /// Restore the ship for a new round
    pub fn reset(&mut self, pos: Vec2) {
        *self = Self::new(pos);
    }

    pub fn is_shielded(&self) -> bool {
        self.effects.shield > 0
    }

    /// Health as a fraction of max, clamped for display
    pub fn health_fraction(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Set velocity from a directional intent and the current base speed
    pub fn steer(&mut self, intent: Vec2, base_speed: f32) {
        let speed = if self.effects.speed_boost > 0 {
            base_speed * SPEED_BOOST_FACTOR
        } else {
            base_speed
        };
        self.body.vel = intent * speed;
    }

    /// Advance one frame
    pub fn update(&mut self, bounds: Bounds) {
        self.effects.tick();

        if self.invulnerable {
            self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
            if self.invulnerable_ticks == 0 {
                self.invulnerable = false;
            }
        }

        self.body.pos += self.knockback;
        self.knockback *= KNOCKBACK_DECAY;
        if self.knockback.x.abs() < KNOCKBACK_EPSILON {
            self.knockback.x = 0.0;
        }
        if self.knockback.y.abs() < KNOCKBACK_EPSILON {
            self.knockback.y = 0.0;
        }

        self.wrap(bounds);
        self.body.pos += self.body.vel;
    }

    /// Re-enter from the opposite edge once fully off-canvas
    fn wrap(&mut self, bounds: Bounds) {
        let r = self.body.radius;
        let pos = &mut self.body.pos;
        if pos.x + r < 0.0 {
            pos.x = bounds.width + r;
        } else if pos.x - r > bounds.width {
            pos.x = -r;
        }
        if pos.y + r < 0.0 {
            pos.y = bounds.height + r;
        } else if pos.y - r > bounds.height {
            pos.y = -r;
        }
    }

    /// Apply contact damage and the recoil that goes with it
    pub fn take_hit(&mut self, damage: f32, from: Vec2) {
        self.health -= damage;
        self.knockback = direction_to(from, self.body.pos) * KNOCKBACK_IMPULSE;
        self.invulnerable = true;
        self.invulnerable_ticks = INVULNERABILITY_FRAMES;
    }

    /// Restore health up to max, returning the new value
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.health = (self.health + amount).min(self.max_health);
        self.health
    }

    /// Fire toward `target`, two parallel shots while double-shot is active
    pub fn shoot(&self, target: Vec2) -> Vec<Entity> {
        let dir = direction_to(self.body.pos, target);
        let vel = dir * PROJECTILE_SPEED;
        let origin = self.body.pos;

        if self.effects.double_shot > 0 {
            let offset = perpendicular(dir) * DOUBLE_SHOT_OFFSET;
            vec![
                Entity::projectile(origin + offset, vel),
                Entity::projectile(origin - offset, vel),
            ]
        } else {
            vec![Entity::projectile(origin, vel)]
        }
    }

    /// Implode after death; the radius bottoms out at zero
    pub fn shrink(&mut self) {
        if self.body.radius > 0.1 {
            self.body.radius = (self.body.radius - DEATH_SHRINK_PER_FRAME).max(0.0);
        } else {
            self.body.radius = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn test_timers_count_down_and_stop_at_zero() {
        let mut player = Player::new(bounds().center());
        player.effects.set(PowerUpKind::Shield, 2);
        player.effects.set(PowerUpKind::SpeedBoost, 1);
        player.update(bounds());
        assert_eq!(player.effects.shield, 1);
        assert_eq!(player.effects.speed_boost, 0);
        player.update(bounds());
        player.update(bounds());
        assert_eq!(player.effects, EffectTimers::default());
    }

    #[test]
    fn test_invulnerability_clears_when_timer_expires() {
        let mut player = Player::new(bounds().center());
        player.take_hit(5.0, Vec2::new(300.0, 300.0));
        assert!(player.invulnerable);
        for _ in 0..INVULNERABILITY_FRAMES - 1 {
            player.update(bounds());
        }
        assert!(player.invulnerable);
        player.update(bounds());
        assert!(!player.invulnerable);
        assert_eq!(player.invulnerable_ticks, 0);
    }

    #[test]
    fn test_knockback_pushes_away_then_decays_to_zero() {
        let mut player = Player::new(Vec2::new(400.0, 300.0));
        player.take_hit(1.0, Vec2::new(390.0, 300.0));
        assert!((player.knockback - Vec2::new(15.0, 0.0)).length() < 1e-5);

        player.update(bounds());
        assert!((player.body.pos.x - 415.0).abs() < 1e-4);
        assert!((player.knockback.x - 13.5).abs() < 1e-4);

        for _ in 0..60 {
            player.update(bounds());
        }
        assert_eq!(player.knockback, Vec2::ZERO);
    }

    #[test]
    fn test_wraps_only_when_fully_off_canvas() {
        let mut player = Player::new(Vec2::new(-9.0, 300.0));
        player.update(bounds());
        assert_eq!(player.body.pos.x, -9.0);

        player.body.pos.x = -10.5;
        player.update(bounds());
        assert_eq!(player.body.pos.x, 810.0);

        player.body.pos = Vec2::new(400.0, 611.0);
        player.update(bounds());
        assert_eq!(player.body.pos.y, -10.0);
    }

    #[test]
    fn test_velocity_applied_after_wrap() {
        let mut player = Player::new(Vec2::new(400.0, 300.0));
        player.steer(Vec2::new(1.0, -1.0), 5.0);
        player.update(bounds());
        assert_eq!(player.body.pos, Vec2::new(405.0, 295.0));
    }

    #[test]
    fn test_speed_boost_scales_steering() {
        let mut player = Player::new(Vec2::ZERO);
        player.effects.set(PowerUpKind::SpeedBoost, POWER_UP_DURATION);
        player.steer(Vec2::X, 5.0);
        assert!((player.body.vel.x - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut player = Player::new(Vec2::ZERO);
        player.health = 90.0;
        assert_eq!(player.heal(HEALTH_BOOST_AMOUNT), 100.0);
        player.health = 50.0;
        assert_eq!(player.heal(HEALTH_BOOST_AMOUNT), 70.0);
    }

    #[test]
    fn test_single_and_double_shot() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        let shots = player.shoot(Vec2::new(200.0, 100.0));
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].body.vel, Vec2::new(PROJECTILE_SPEED, 0.0));
        assert_eq!(shots[0].body.pos, Vec2::new(100.0, 100.0));

        player.effects.set(PowerUpKind::DoubleShot, 10);
        let shots = player.shoot(Vec2::new(200.0, 100.0));
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].body.pos, Vec2::new(100.0, 110.0));
        assert_eq!(shots[1].body.pos, Vec2::new(100.0, 90.0));
        assert_eq!(shots[0].body.vel, shots[1].body.vel);
    }

    #[test]
    fn test_health_fraction_is_clamped() {
        let mut player = Player::new(Vec2::ZERO);
        player.health = -12.0;
        assert_eq!(player.health_fraction(), 0.0);
        player.health = 50.0;
        assert_eq!(player.health_fraction(), 0.5);
    }

    #[test]
    fn test_shrink_reaches_zero() {
        let mut player = Player::new(Vec2::ZERO);
        for _ in 0..30 {
            player.shrink();
            assert!(player.body.radius >= 0.0);
        }
        assert_eq!(player.body.radius, 0.0);
    }
}
