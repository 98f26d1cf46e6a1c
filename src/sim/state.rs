//! Game state and round lifecycle
//!
//! Everything the simulation mutates lives in [`GameState`]. Presentation
//! learns about changes through the [`GameEvent`] queue, never by reaching in.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::background::Starfield;
use super::difficulty::Difficulty;
use super::entity::{Bounds, Color, Entity, PowerUpKind};
use super::player::Player;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen, no round has been played yet
    Title,
    /// Active gameplay
    Playing,
    /// Gameplay frozen, background still animating
    Paused,
    /// Round ended
    GameOver,
}

/// State-change notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted,
    ScoreChanged(u64),
    HealthChanged { current: f32, max: f32 },
    PowerUpCollected(PowerUpKind),
    LevelChanged(u32),
    Paused,
    Resumed,
    /// The player died; the explosion is playing
    RoundEnded { score: u64 },
    HighScoreChanged(u64),
    /// Explosion delay is over, show the game-over surface
    ShowGameOver { score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub bounds: Bounds,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Simulation frame counter
    pub frame: u64,
    /// Session clock in milliseconds (advances while paused too)
    pub time_ms: f64,
    pub player: Player,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub particles: Vec<Entity>,
    pub texts: Vec<Entity>,
    pub power_ups: Vec<Entity>,
    pub background: Starfield,
    pub difficulty: Difficulty,
    /// Particles beyond this count are not emitted
    pub particle_limit: usize,
    star_count: usize,
    /// Time left before the game-over surface is shown
    game_over_ms: Option<f64>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on the title screen
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let background = Starfield::new(&mut rng, bounds, STAR_COUNT);
        Self {
            seed,
            rng,
            bounds,
            phase: GamePhase::Title,
            score: 0,
            high_score: 0,
            frame: 0,
            time_ms: 0.0,
            player: Player::new(bounds.center()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            power_ups: Vec::new(),
            background,
            difficulty: Difficulty::new(bounds),
            particle_limit: DEFAULT_MAX_PARTICLES,
            star_count: STAR_COUNT,
            game_over_ms: None,
            events: Vec::new(),
        }
    }

    /// True while gameplay advances
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a new round. The high score is left untouched.
    pub fn start_round(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.game_over_ms = None;
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.texts.clear();
        self.power_ups.clear();
        self.player.reset(self.bounds.center());
        self.difficulty.reset();
        self.difficulty.start();

        log::info!("Round started (seed {}, frame {})", self.seed, self.frame);
        self.push_event(GameEvent::RoundStarted);
        self.push_event(GameEvent::ScoreChanged(0));
        self.push_event(GameEvent::HealthChanged {
            current: self.player.health,
            max: self.player.max_health,
        });
    }

    /// Pause or resume a running round
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.difficulty.stop();
                self.push_event(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.difficulty.start();
                self.push_event(GameEvent::Resumed);
            }
            GamePhase::Title | GamePhase::GameOver => {}
        }
    }

    /// Canvas resized: new limits and a fresh starfield
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.background.reseed(&mut self.rng, bounds, self.star_count);
        self.difficulty.adjust_for_screen(bounds);
    }

    /// Change starfield density
    pub fn set_star_count(&mut self, count: usize) {
        if count != self.star_count {
            self.star_count = count;
            self.background.reseed(&mut self.rng, self.bounds, count);
        }
    }

    /// Add points and report the change
    pub fn award(&mut self, points: u64) {
        self.score += points;
        self.push_event(GameEvent::ScoreChanged(self.score));
        if let Some(level) = self.difficulty.update(self.score) {
            log::info!(
                "Difficulty level {} (cap {}, interval {}ms)",
                level,
                self.difficulty.max_enemies,
                self.difficulty.spawn_interval_ms()
            );
            self.push_event(GameEvent::LevelChanged(level));
        }
    }

    /// Spawn one enemy if the population cap allows it
    pub fn try_spawn_enemy(&mut self) -> bool {
        if self.enemies.len() >= self.difficulty.max_enemies {
            return false;
        }
        let target = self.player.body.pos;
        let enemy = Entity::spawn_enemy(&mut self.rng, self.bounds, target, self.difficulty.level);
        log::debug!(
            "Enemy spawned at ({:.0}, {:.0}) r={:.1}",
            enemy.body.pos.x,
            enemy.body.pos.y,
            enemy.body.radius
        );
        self.enemies.push(enemy);
        true
    }

    /// Fire toward a point; ignored unless a round is running
    pub fn fire(&mut self, target: Vec2) {
        if !self.is_running() {
            return;
        }
        let shots = self.player.shoot(target);
        self.projectiles.extend(shots);
    }

    /// Emit `count` particles at `pos`
    ///
    /// `spread` is the velocity span; `jittered` scales each axis by an extra
    /// random factor for an uneven burst.
    pub fn emit_particles(
        &mut self,
        pos: Vec2,
        color: Color,
        count: usize,
        max_radius: f32,
        spread: f32,
        jittered: bool,
    ) {
        let room = self.particle_limit.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let mut axis = || {
                let base = self.rng.random::<f32>() - 0.5;
                if jittered {
                    base * (self.rng.random::<f32>() * spread)
                } else {
                    base * spread
                }
            };
            let vel = Vec2::new(axis(), axis());
            let radius = self.rng.random_range(0.0..max_radius);
            self.particles.push(Entity::particle(pos, radius, color, vel));
        }
    }

    /// Add a rising label
    pub fn emit_text(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        let label = Entity::floating_text(&mut self.rng, pos, text, color);
        self.texts.push(label);
    }

    /// The player died: stop spawning, record the high score, blow up the ship
    pub fn end_round(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.difficulty.stop();
        log::info!("Round over: score {}", self.score);
        self.push_event(GameEvent::RoundEnded { score: self.score });

        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("New high score: {}", self.high_score);
            self.push_event(GameEvent::HighScoreChanged(self.high_score));
        }

        let pos = self.player.body.pos;
        self.emit_particles(pos, Color::White, DEATH_PARTICLES, 3.0, 10.0, true);
        self.game_over_ms = Some(GAME_OVER_DELAY_MS);
    }

    /// Count down to the game-over surface
    pub(crate) fn advance_game_over(&mut self, dt_ms: f64) {
        if let Some(remaining) = self.game_over_ms.as_mut() {
            *remaining -= dt_ms;
            if *remaining <= 0.0 {
                self.game_over_ms = None;
                self.push_event(GameEvent::ShowGameOver { score: self.score });
            }
        }
    }

    /// Drop every entity flagged for deletion
    pub fn sweep(&mut self) {
        self.enemies.retain(|e| !e.is_dead());
        self.projectiles.retain(|e| !e.is_dead());
        self.particles.retain(|e| !e.is_dead());
        self.texts.retain(|e| !e.is_dead());
        self.power_ups.retain(|e| !e.is_dead());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(12345, Bounds::new(1280.0, 720.0))
    }

    #[test]
    fn test_new_session_starts_on_title() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Title);
        assert_eq!(s.background.stars.len(), STAR_COUNT);
        assert!(!s.difficulty.is_spawning());
    }

    #[test]
    fn test_start_round_resets_everything_but_high_score() {
        let mut s = state();
        s.high_score = 9000;
        s.start_round();
        s.score = 4200;
        s.player.health = 12.0;
        s.player.body.radius = 3.0;
        s.player.effects.set(PowerUpKind::Shield, 100);
        s.player.effects.set(PowerUpKind::DoubleShot, 100);
        s.player.effects.set(PowerUpKind::SpeedBoost, 100);
        s.player.invulnerable = true;
        s.fire(Vec2::ZERO);
        s.emit_particles(Vec2::ZERO, Color::White, 10, 2.0, 4.0, false);
        s.emit_text(Vec2::ZERO, "+100", Color::White);
        s.power_ups.push(Entity::power_up(Vec2::ZERO, PowerUpKind::Shield));
        s.try_spawn_enemy();
        s.drain_events();

        s.start_round();
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.score, 0);
        assert_eq!(s.player.health, s.player.max_health);
        assert_eq!(s.player.body.radius, PLAYER_RADIUS);
        assert_eq!(s.player.body.pos, s.bounds.center());
        assert_eq!(s.player.effects.shield, 0);
        assert_eq!(s.player.effects.double_shot, 0);
        assert_eq!(s.player.effects.speed_boost, 0);
        assert!(!s.player.invulnerable);
        assert!(s.enemies.is_empty());
        assert!(s.projectiles.is_empty());
        assert!(s.particles.is_empty());
        assert!(s.texts.is_empty());
        assert!(s.power_ups.is_empty());
        assert_eq!(s.high_score, 9000);
        assert_eq!(s.difficulty.level, 1);
        assert!(s.difficulty.is_spawning());

        let events = s.drain_events();
        assert_eq!(events[0], GameEvent::RoundStarted);
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_pause_toggles_spawner() {
        let mut s = state();
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::Title);

        s.start_round();
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::Paused);
        assert!(!s.difficulty.is_spawning());
        s.toggle_pause();
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(s.difficulty.is_spawning());
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut s = state();
        s.start_round();
        let cap = s.difficulty.max_enemies;
        for _ in 0..cap {
            assert!(s.try_spawn_enemy());
        }
        assert!(!s.try_spawn_enemy());
        assert_eq!(s.enemies.len(), cap);
    }

    #[test]
    fn test_fire_ignored_outside_round() {
        let mut s = state();
        s.fire(Vec2::ZERO);
        assert!(s.projectiles.is_empty());
        s.start_round();
        s.fire(Vec2::ZERO);
        assert_eq!(s.projectiles.len(), 1);
        s.toggle_pause();
        s.fire(Vec2::ZERO);
        assert_eq!(s.projectiles.len(), 1);
    }

    #[test]
    fn test_particle_limit() {
        let mut s = state();
        s.particle_limit = 5;
        s.emit_particles(Vec2::ZERO, Color::White, 10, 2.0, 4.0, false);
        assert_eq!(s.particles.len(), 5);
    }

    #[test]
    fn test_end_round_updates_high_score_and_schedules_modal() {
        let mut s = state();
        s.high_score = 100;
        s.start_round();
        s.score = 350;
        s.drain_events();
        s.end_round();

        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.high_score, 350);
        assert!(!s.difficulty.is_spawning());
        assert_eq!(s.particles.len(), DEATH_PARTICLES);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::RoundEnded { score: 350 }));
        assert!(events.contains(&GameEvent::HighScoreChanged(350)));

        s.advance_game_over(1999.0);
        assert!(s.drain_events().is_empty());
        s.advance_game_over(1.0);
        assert_eq!(s.drain_events(), vec![GameEvent::ShowGameOver { score: 350 }]);
        s.advance_game_over(5000.0);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut s = state();
        s.high_score = 1000;
        s.start_round();
        s.score = 200;
        s.end_round();
        assert_eq!(s.high_score, 1000);
        assert!(!s.drain_events().iter().any(|e| matches!(e, GameEvent::HighScoreChanged(_))));
    }

    #[test]
    fn test_award_raises_level() {
        let mut s = state();
        s.start_round();
        s.drain_events();
        s.award(2400);
        s.award(100);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelChanged(2)));
        assert_eq!(s.difficulty.level, 2);
    }

    #[test]
    fn test_sweep_removes_flagged() {
        let mut s = state();
        s.emit_particles(Vec2::ZERO, Color::White, 3, 2.0, 4.0, false);
        s.particles[1].body.dead = true;
        s.sweep();
        assert_eq!(s.particles.len(), 2);
        assert!(s.particles.iter().all(|p| !p.is_dead()));
    }
}
