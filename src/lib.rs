//! Space Game - an arcade space shooter for the browser canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movers, collisions, difficulty, game state)
//! - `game`: Session driver (fixed-step frames, leaderboard, persistence, events)
//! - `leaderboard`: Simulated peer leaderboard
//! - `renderer`: 2D raster surface abstraction and scene drawing
//! - `ui`: HUD abstraction fed by simulation events
//! - `platform`: Browser input handling
//! - `persistence`: Key/value storage (LocalStorage on web)

pub mod game;
pub mod highscores;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use highscores::HighScore;
pub use leaderboard::{Leaderboard, LeaderboardView};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Balance values are tuned by feel. Keep them as they are.
pub mod consts {
    /// Simulation runs one step per display frame (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Host frame gaps above this are clamped (tab switch, debugger)
    pub const MAX_FRAME_GAP_MS: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const SPEED_BOOST_FACTOR: f32 = 1.6;
    /// Knockback decays by this factor every frame
    pub const KNOCKBACK_DECAY: f32 = 0.9;
    /// Knockback axes below this snap to zero
    pub const KNOCKBACK_EPSILON: f32 = 0.1;
    pub const KNOCKBACK_IMPULSE: f32 = 15.0;
    pub const INVULNERABILITY_FRAMES: u32 = 60;
    /// Radius lost per frame while the ship implodes after game over
    pub const DEATH_SHRINK_PER_FRAME: f32 = 0.4;
    pub const DEATH_PARTICLES: usize = 50;

    /// Two circles touch when `distance - r1 - r2` drops below this
    pub const CONTACT_MARGIN: f32 = 1.0;

    /// Contact damage = radius * RADIUS_FACTOR + relative_speed * radius * MOMENTUM_FACTOR
    pub const DAMAGE_RADIUS_FACTOR: f32 = 0.5;
    pub const DAMAGE_MOMENTUM_FACTOR: f32 = 0.2;

    /// Projectiles
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 5.0;
    /// Perpendicular offset of each barrel while double-shot is active
    pub const DOUBLE_SHOT_OFFSET: f32 = 10.0;

    /// Enemies
    pub const ENEMY_MIN_SPAWN_RADIUS: f32 = 4.0;
    pub const ENEMY_MAX_SPAWN_RADIUS: f32 = 30.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    /// Fractional speed gained per difficulty level
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.1;
    pub const ENEMY_SHRINK_ON_HIT: f32 = 10.0;
    /// Enemies that would shrink to this radius or below are destroyed instead
    pub const ENEMY_MIN_RADIUS: f32 = 5.0;

    /// Scoring
    pub const SCORE_HIT: u64 = 100;
    pub const SCORE_KILL: u64 = 250;

    /// Power-up drops on kill
    pub const DROP_HEALTH_CHANCE: f32 = 0.05;
    /// Cumulative with DROP_HEALTH_CHANCE (15% total)
    pub const DROP_BUFF_CHANCE: f32 = 0.10;
    pub const POWER_UP_RADIUS: f32 = 35.0;
    /// Timed power-up duration in frames (5 seconds)
    pub const POWER_UP_DURATION: u32 = 300;
    pub const HEALTH_BOOST_AMOUNT: f32 = 20.0;
    pub const POWER_UP_BOB_AMPLITUDE: f32 = 0.5;
    pub const POWER_UP_BOB_PERIOD_MS: f64 = 200.0;

    /// Visual effects
    pub const PARTICLE_FRICTION: f32 = 0.99;
    pub const PARTICLE_FADE: f32 = 0.01;
    pub const TEXT_FADE: f32 = 0.02;
    pub const TEXT_RISE_SPEED: f32 = 2.0;
    pub const DEFAULT_MAX_PARTICLES: usize = 2000;

    /// Difficulty
    pub const LEVEL_SCORE_STEP: u64 = 2500;
    pub const BASE_MAX_ENEMIES: usize = 5;
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 300.0;
    pub const SCREEN_AREA_PER_ENEMY: f32 = 120_000.0;
    pub const MIN_SCREEN_ENEMIES: usize = 4;
    pub const MAX_SCREEN_ENEMIES: usize = 15;
    pub const NARROW_SCREEN_WIDTH: f32 = 768.0;
    pub const PLAYER_SPEED_NARROW: f32 = 3.0;
    pub const PLAYER_SPEED_WIDE: f32 = 5.0;

    /// Background
    pub const STAR_COUNT: usize = 100;
    pub const STAR_FADE: f32 = 0.005;

    /// Delay between death and the game-over modal
    pub const GAME_OVER_DELAY_MS: f64 = 2000.0;
}

/// Unit vector pointing from `from` toward `to`
///
/// Coincident points yield +X, matching `atan2(0, 0) == 0`.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(Vec2::X)
}

/// Perpendicular vector (rotated +90°)
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
