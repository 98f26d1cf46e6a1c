//! Difficulty levels and the enemy spawn scheduler
//!
//! The level is a step function of score. The spawner is an accumulator of
//! simulated milliseconds that fires once per elapsed interval, so spawning is
//! fully deterministic and needs no host timer.

use super::entity::Bounds;
use crate::consts::*;

/// Level reached at a given score (1-based)
pub fn level_for_score(score: u64) -> u32 {
    (score / LEVEL_SCORE_STEP) as u32 + 1
}

/// Population cap allowed by the canvas area
pub fn screen_enemy_cap(bounds: Bounds) -> usize {
    let by_area = (bounds.area() / SCREEN_AREA_PER_ENEMY).floor().max(0.0) as usize;
    by_area.clamp(MIN_SCREEN_ENEMIES, MAX_SCREEN_ENEMIES)
}

/// Base player speed for a canvas width
pub fn base_player_speed(bounds: Bounds) -> f32 {
    if bounds.width < NARROW_SCREEN_WIDTH {
        PLAYER_SPEED_NARROW
    } else {
        PLAYER_SPEED_WIDE
    }
}

/// Difficulty state and spawn timer
#[derive(Debug, Clone)]
pub struct Difficulty {
    /// Current level (starts at 1)
    pub level: u32,
    /// Live enemy cap for the current level
    pub max_enemies: usize,
    /// Cap derived from the canvas area
    pub screen_cap: usize,
    pub base_player_speed: f32,
    spawning: bool,
    elapsed_ms: f32,
}

impl Difficulty {
    pub fn new(bounds: Bounds) -> Self {
        let mut difficulty = Self {
            level: 1,
            max_enemies: BASE_MAX_ENEMIES,
            screen_cap: MAX_SCREEN_ENEMIES,
            base_player_speed: PLAYER_SPEED_WIDE,
            spawning: false,
            elapsed_ms: 0.0,
        };
        difficulty.adjust_for_screen(bounds);
        difficulty
    }

    fn level_cap(&self) -> usize {
        self.screen_cap
            .min(BASE_MAX_ENEMIES + self.level.saturating_sub(1) as usize)
    }

    /// Re-derive the screen-dependent limits (call on every resize)
    pub fn adjust_for_screen(&mut self, bounds: Bounds) {
        self.base_player_speed = base_player_speed(bounds);
        self.screen_cap = screen_enemy_cap(bounds);
        self.max_enemies = self.level_cap();
        log::info!(
            "Screen adjusted: speed={}, max enemies cap={}",
            self.base_player_speed,
            self.screen_cap
        );
    }

    /// Recompute the level from score; returns the new level when it changed
    pub fn update(&mut self, score: u64) -> Option<u32> {
        let level = level_for_score(score);
        if level == self.level {
            return None;
        }
        self.level = level;
        self.max_enemies = self.level_cap();
        // New interval takes effect from now
        self.start();
        Some(level)
    }

    /// Back to level 1 for a new round
    ///
    /// The cap returns to the base value; the screen clamp comes back on the
    /// next resize or level change.
    pub fn reset(&mut self) {
        self.level = 1;
        self.max_enemies = BASE_MAX_ENEMIES;
    }

    /// Milliseconds between spawn attempts at the current level
    pub fn spawn_interval_ms(&self) -> f32 {
        (BASE_SPAWN_INTERVAL_MS / self.level as f32).max(MIN_SPAWN_INTERVAL_MS)
    }

    /// (Re)start the spawn timer from zero
    pub fn start(&mut self) {
        self.spawning = true;
        self.elapsed_ms = 0.0;
    }

    /// Cancel the spawn timer
    pub fn stop(&mut self) {
        self.spawning = false;
        self.elapsed_ms = 0.0;
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    /// Advance the spawn timer; returns how many intervals elapsed
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if !self.spawning {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let interval = self.spawn_interval_ms();
        let mut fired = 0;
        while self.elapsed_ms >= interval {
            self.elapsed_ms -= interval;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Bounds {
        Bounds::new(1920.0, 1080.0)
    }

    #[test]
    fn test_level_steps_every_2500_points() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(2499), 1);
        assert_eq!(level_for_score(2500), 2);
        assert_eq!(level_for_score(7500), 4);
    }

    #[test]
    fn test_screen_cap_is_clamped() {
        assert_eq!(screen_enemy_cap(Bounds::new(375.0, 667.0)), 4);
        assert_eq!(screen_enemy_cap(Bounds::new(1280.0, 720.0)), 7);
        assert_eq!(screen_enemy_cap(desktop()), 15);
        assert_eq!(screen_enemy_cap(Bounds::new(4000.0, 4000.0)), 15);
        assert_eq!(screen_enemy_cap(Bounds::new(0.0, 0.0)), 4);
    }

    #[test]
    fn test_player_speed_depends_on_width() {
        assert_eq!(base_player_speed(Bounds::new(767.0, 1000.0)), 3.0);
        assert_eq!(base_player_speed(Bounds::new(768.0, 1000.0)), 5.0);
    }

    #[test]
    fn test_level_transition_recomputes_cap() {
        let mut d = Difficulty::new(desktop());
        for k in 1..6u32 {
            assert_eq!(d.update(2500 * k as u64 - 1), None);
            assert_eq!(d.level, k);
            assert_eq!(d.update(2500 * k as u64), Some(k + 1));
            assert_eq!(d.max_enemies, d.screen_cap.min(5 + k as usize));
        }
    }

    #[test]
    fn test_small_screen_caps_population() {
        let mut d = Difficulty::new(Bounds::new(375.0, 667.0));
        assert_eq!(d.max_enemies, 4);
        d.update(25_000);
        assert_eq!(d.max_enemies, 4);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut d = Difficulty::new(desktop());
        assert_eq!(d.spawn_interval_ms(), 1000.0);
        d.update(2500);
        assert_eq!(d.spawn_interval_ms(), 500.0);
        d.update(25_000);
        assert_eq!(d.spawn_interval_ms(), 300.0);
    }

    #[test]
    fn test_accumulator_fires_once_per_interval() {
        let mut d = Difficulty::new(desktop());
        assert_eq!(d.advance(5000.0), 0, "stopped timer must not fire");

        d.start();
        let mut fired = 0;
        for _ in 0..60 {
            fired += d.advance(FRAME_MS);
        }
        // 60 frames is 1000ms, give or take float error
        assert!((0..=1).contains(&fired));
        fired += d.advance(FRAME_MS);
        assert_eq!(fired, 1);

        d.stop();
        assert_eq!(d.advance(10_000.0), 0);
    }

    #[test]
    fn test_level_change_restarts_timer() {
        let mut d = Difficulty::new(desktop());
        d.start();
        d.advance(900.0);
        d.update(2500);
        // Old progress is discarded; 500ms interval from zero
        assert_eq!(d.advance(450.0), 0);
        assert_eq!(d.advance(50.0), 1);
    }

    #[test]
    fn test_resize_rederives_current_cap() {
        let mut d = Difficulty::new(desktop());
        d.update(5000);
        assert_eq!(d.max_enemies, 7);
        d.adjust_for_screen(Bounds::new(375.0, 667.0));
        assert_eq!(d.max_enemies, 4);
        assert_eq!(d.base_player_speed, 3.0);
    }

    #[test]
    fn test_reset() {
        let mut d = Difficulty::new(desktop());
        d.update(10_000);
        d.reset();
        assert_eq!(d.level, 1);
        assert_eq!(d.max_enemies, BASE_MAX_ENEMIES);
    }

    #[test]
    fn test_reset_restores_base_cap_on_small_screen() {
        let mut d = Difficulty::new(Bounds::new(375.0, 667.0));
        d.update(10_000);
        assert_eq!(d.max_enemies, 4);
        d.reset();
        assert_eq!(d.max_enemies, BASE_MAX_ENEMIES);
        d.adjust_for_screen(Bounds::new(375.0, 667.0));
        assert_eq!(d.max_enemies, 4);
    }
}
