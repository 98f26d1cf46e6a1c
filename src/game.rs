//! Game session
//!
//! Owns everything that outlives a single round: the simulation state, the
//! leaderboard, settings, the persisted high score and the input queue. The
//! host calls [`Game::frame`] once per animation frame with its timestamp.

use crate::consts::*;
use crate::highscores::HighScore;
use crate::leaderboard::Leaderboard;
use crate::persistence::Storage;
use crate::platform::InputState;
use crate::renderer::{Renderer, SceneOptions, draw_frame};
use crate::settings::Settings;
use crate::sim::{Bounds, GameEvent, GameState, tick};
use crate::ui::{Hud, Modal, apply_event, health_fraction, sync_power_ups};

/// Rolling frames-per-second estimate over the last 60 host frames
#[derive(Debug, Clone)]
struct FrameTimer {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl FrameTimer {
    fn new() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we will overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((self.frame_times.len() - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

/// A play session
pub struct Game {
    pub state: GameState,
    pub leaderboard: Leaderboard,
    pub input: InputState,
    settings: Settings,
    high_score: HighScore,
    storage: Box<dyn Storage>,
    accumulator: f32,
    last_time: Option<f64>,
    timer: FrameTimer,
}

impl Game {
    /// New session on the title screen, restoring the high score and settings
    pub fn new(seed: u64, bounds: Bounds, storage: Box<dyn Storage>) -> Self {
        let high_score = HighScore::load_or_default(storage.as_ref());
        let settings = Settings::load_or_default(storage.as_ref());

        let mut state = GameState::new(seed, bounds);
        state.high_score = high_score.0;

        let mut game = Self {
            state,
            leaderboard: Leaderboard::new(seed.wrapping_add(1)),
            input: InputState::new(),
            settings,
            high_score,
            storage,
            accumulator: 0.0,
            last_time: None,
            timer: FrameTimer::new(),
        };
        game.apply_settings();
        log::info!("Game initialized with seed: {}", seed);
        game
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.0
    }

    pub fn fps(&self) -> u32 {
        self.timer.fps
    }

    fn apply_settings(&mut self) {
        self.state.particle_limit = self.settings.max_particles();
        self.state.set_star_count(self.settings.star_count());
    }

    /// Replace the settings, apply them and persist them
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.apply_settings();
        if let Err(e) = self.settings.save(self.storage.as_mut()) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    /// Keyboard entry point: settings hotkeys, everything else goes to input
    ///
    /// `KeyQ` cycles the quality preset, `KeyI` toggles the FPS counter and
    /// `KeyM` toggles reduced motion. The key is still recorded as held.
    pub fn key_down(&mut self, code: &str) {
        let mut settings = self.settings.clone();
        match code {
            "KeyQ" => settings.apply_preset(settings.quality.next()),
            "KeyI" => settings.show_fps = !settings.show_fps,
            "KeyM" => settings.reduced_motion = !settings.reduced_motion,
            _ => {
                self.input.key_down(code);
                return;
            }
        }
        log::info!("Settings changed: {:?}", settings);
        self.update_settings(settings);
        self.input.key_down(code);
    }

    /// Push the current values to a freshly attached HUD
    pub fn sync_hud(&self, hud: &mut dyn Hud) {
        hud.set_high_score(self.high_score.0);
        hud.set_score(self.state.score);
        hud.set_health(health_fraction(
            self.state.player.health,
            self.state.player.max_health,
        ));
        sync_power_ups(hud, &self.state.player.effects);
    }

    /// Begin a new round right away
    pub fn start_round(&mut self) {
        self.input = InputState::new();
        self.state.start_round();
    }

    /// Pause toggle, applied on the next simulation step
    pub fn request_pause(&mut self) {
        self.input.request_pause();
    }

    pub fn resize(&mut self, bounds: Bounds) {
        log::info!("Resized to {}x{}", bounds.width, bounds.height);
        self.state.resize(bounds);
    }

    /// Advance to host time `now_ms` and report what changed
    ///
    /// Returns the number of simulation steps run.
    pub fn frame(&mut self, now_ms: f64, hud: &mut dyn Hud) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_GAP_MS),
            None => FRAME_MS,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;
        self.input.update(now_ms);

        let mut steps = 0;
        while self.accumulator >= FRAME_MS && steps < MAX_SUBSTEPS {
            // One-shot inputs go to the first step only
            let input = if steps == 0 {
                self.input.take_tick_input()
            } else {
                self.input.held_input()
            };
            tick(&mut self.state, &input, FRAME_MS);
            self.accumulator -= FRAME_MS;
            steps += 1;
        }
        self.accumulator = self.accumulator.min(FRAME_MS * MAX_SUBSTEPS as f32);

        for event in self.state.drain_events() {
            if let GameEvent::HighScoreChanged(score) = event {
                self.record_high_score(score);
            }
            apply_event(hud, &event);
        }

        if self.state.is_running() {
            self.leaderboard.update(self.state.score, now_ms);
            sync_power_ups(hud, &self.state.player.effects);
        }

        self.timer.record(now_ms);
        hud.set_fps(self.settings.show_fps.then_some(self.timer.fps));
        steps
    }

    fn record_high_score(&mut self, score: u64) {
        if !self.high_score.submit(score) {
            return;
        }
        if let Err(e) = self.high_score.save(self.storage.as_mut()) {
            log::warn!("Could not save high score: {}", e);
        }
    }

    /// Draw the current state
    pub fn render(&self, r: &mut dyn Renderer) {
        let options = SceneOptions {
            reduced_motion: self.settings.reduced_motion,
        };
        draw_frame(r, &self.state, &options);
    }

    /// Refresh the leaderboard and show it
    pub fn open_leaderboard(&mut self, now_ms: f64, hud: &mut dyn Hud) {
        self.leaderboard.update(self.state.score, now_ms);
        hud.set_leaderboard(&self.leaderboard.view());
        hud.show_modal(Modal::Leaderboard);
    }

    pub fn close_leaderboard(&self, hud: &mut dyn Hud) {
        hud.hide_modal(Modal::Leaderboard);
    }
}
