//! Entity record and per-kind update rules
//!
//! Every transient object in the arena shares one [`Body`] record. What an
//! entity does each frame is decided by its [`EntityKind`] tag, dispatched in
//! [`Entity::update`] to a plain function per kind.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::direction_to;

/// Fill color of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    White,
    Cyan,
    Lime,
    Yellow,
    Gold,
    /// `hsl(hue, 50%, 50%)`
    Hue(f32),
}

impl Color {
    /// Random enemy tint
    pub fn random_hue(rng: &mut impl Rng) -> Self {
        Color::Hue(rng.random_range(0.0..360.0))
    }

    /// CSS color string for the canvas
    pub fn css(&self) -> String {
        match self {
            Color::White => "white".to_string(),
            Color::Cyan => "cyan".to_string(),
            Color::Lime => "lime".to_string(),
            Color::Yellow => "yellow".to_string(),
            Color::Gold => "gold".to_string(),
            Color::Hue(h) => format!("hsl({:.0}, 50%, 50%)", h),
        }
    }
}

/// Canvas extents in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when a circle lies entirely outside the canvas on any axis
    pub fn fully_outside(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius < 0.0
            || pos.x - radius > self.width
            || pos.y + radius < 0.0
            || pos.y - radius > self.height
    }

    /// Random point just beyond one of the four edges
    pub fn random_edge_point(&self, rng: &mut impl Rng, margin: f32) -> Vec2 {
        if rng.random_bool(0.5) {
            let x = if rng.random_bool(0.5) {
                -margin
            } else {
                self.width + margin
            };
            Vec2::new(x, rng.random_range(0.0..=self.height))
        } else {
            let y = if rng.random_bool(0.5) {
                -margin
            } else {
                self.height + margin
            };
            Vec2::new(rng.random_range(0.0..=self.width), y)
        }
    }

    /// Random point on the canvas
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.random_range(0.0..=self.width),
            rng.random_range(0.0..=self.height),
        )
    }
}

/// State shared by every simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// Marked for removal at the next sweep
    pub dead: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: radius.max(0.0),
            color,
            alpha: 1.0,
            dead: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Circle contact test shared by every collision pair
    pub fn touches(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) - self.radius - other.radius < CONTACT_MARGIN
    }

    /// Fade by `amount`; flags the body once alpha reaches zero
    fn fade(&mut self, amount: f32) {
        self.alpha = (self.alpha - amount).max(0.0);
        if self.alpha <= 0.0 {
            self.dead = true;
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    DoubleShot,
    SpeedBoost,
    HealthBoost,
}

impl PowerUpKind {
    /// Power-ups that run on a frame timer
    pub const TIMED: [PowerUpKind; 3] = [
        PowerUpKind::Shield,
        PowerUpKind::DoubleShot,
        PowerUpKind::SpeedBoost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "Shield",
            PowerUpKind::DoubleShot => "DoubleShot",
            PowerUpKind::SpeedBoost => "SpeedBoost",
            PowerUpKind::HealthBoost => "HealthBoost",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Shield => Color::Cyan,
            PowerUpKind::DoubleShot => Color::Lime,
            PowerUpKind::SpeedBoost => Color::Yellow,
            PowerUpKind::HealthBoost => Color::Lime,
        }
    }

    /// Image asset drawn for this power-up
    pub fn image(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield.png",
            PowerUpKind::DoubleShot => "double.png",
            PowerUpKind::SpeedBoost => "speed.png",
            PowerUpKind::HealthBoost => "health.png",
        }
    }
}

/// What an entity is, and the data only that kind carries
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Homes in on the player at its spawn speed
    Enemy,
    Projectile,
    Particle,
    PowerUp(PowerUpKind),
    /// Screen-space label; its body radius is zero
    FloatingText(String),
}

/// Per-frame inputs the update rules read
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext {
    pub bounds: Bounds,
    /// Current player position (homing target)
    pub target: Vec2,
    /// Session clock in milliseconds
    pub clock_ms: f64,
}

/// A simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn enemy(pos: Vec2, radius: f32, color: Color, vel: Vec2) -> Self {
        Self {
            body: Body::new(pos, radius, color).with_velocity(vel),
            kind: EntityKind::Enemy,
        }
    }

    /// Spawn an enemy just off-screen, aimed at `target`
    pub fn spawn_enemy(rng: &mut impl Rng, bounds: Bounds, target: Vec2, level: u32) -> Self {
        let radius = rng.random_range(ENEMY_MIN_SPAWN_RADIUS..ENEMY_MAX_SPAWN_RADIUS);
        let pos = bounds.random_edge_point(rng, radius);
        let color = Color::random_hue(rng);
        let speed = ENEMY_BASE_SPEED * enemy_speed_multiplier(level);
        Self::enemy(pos, radius, color, direction_to(pos, target) * speed)
    }

    pub fn projectile(pos: Vec2, vel: Vec2) -> Self {
        Self {
            body: Body::new(pos, PROJECTILE_RADIUS, Color::White).with_velocity(vel),
            kind: EntityKind::Projectile,
        }
    }

    pub fn particle(pos: Vec2, radius: f32, color: Color, vel: Vec2) -> Self {
        Self {
            body: Body::new(pos, radius, color).with_velocity(vel),
            kind: EntityKind::Particle,
        }
    }

    pub fn power_up(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            body: Body::new(pos, POWER_UP_RADIUS, kind.color()),
            kind: EntityKind::PowerUp(kind),
        }
    }

    /// Rising label with a slight random sideways drift
    pub fn floating_text(
        rng: &mut impl Rng,
        pos: Vec2,
        text: impl Into<String>,
        color: Color,
    ) -> Self {
        let drift = (rng.random::<f32>() - 0.5) * 2.0;
        Self {
            body: Body::new(pos, 0.0, color).with_velocity(Vec2::new(drift, -TEXT_RISE_SPEED)),
            kind: EntityKind::FloatingText(text.into()),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.body.dead
    }

    /// Run this entity's update rule for one frame
    ///
    /// Dead entities are left untouched so the deletion flag is raised once.
    pub fn update(&mut self, ctx: &UpdateContext) {
        if self.body.dead {
            return;
        }
        match &self.kind {
            EntityKind::Enemy => update_enemy(&mut self.body, ctx.target),
            EntityKind::Projectile => update_projectile(&mut self.body, ctx.bounds),
            EntityKind::Particle => update_particle(&mut self.body),
            EntityKind::PowerUp(_) => update_power_up(&mut self.body, ctx.clock_ms),
            EntityKind::FloatingText(_) => update_floating_text(&mut self.body),
        }
    }
}

/// Speed multiplier applied to newly spawned enemies
pub fn enemy_speed_multiplier(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * ENEMY_SPEED_PER_LEVEL
}

fn update_enemy(body: &mut Body, target: Vec2) {
    let speed = body.vel.length();
    body.vel = direction_to(body.pos, target) * speed;
    body.pos += body.vel;
}

fn update_projectile(body: &mut Body, bounds: Bounds) {
    body.pos += body.vel;
    if bounds.fully_outside(body.pos, body.radius) {
        body.dead = true;
    }
}

fn update_particle(body: &mut Body) {
    body.vel *= PARTICLE_FRICTION;
    body.pos += body.vel;
    body.fade(PARTICLE_FADE);
}

fn update_power_up(body: &mut Body, clock_ms: f64) {
    let bob = (clock_ms / POWER_UP_BOB_PERIOD_MS).sin() as f32 * POWER_UP_BOB_AMPLITUDE;
    body.pos.y += bob;
}

fn update_floating_text(body: &mut Body) {
    body.pos += body.vel;
    body.fade(TEXT_FADE);
}
