//! HUD and modal surfaces
//!
//! The simulation never touches the page. It raises [`GameEvent`]s and
//! [`apply_event`] turns them into [`Hud`] setter calls.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomHud;

use crate::leaderboard::{LeaderboardView, RankedEntry};
use crate::sim::{EffectTimers, GameEvent, PowerUpKind};

/// Overlay panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    Pause,
    GameOver,
    Leaderboard,
}

/// Presentation setters the game drives
pub trait Hud {
    fn set_score(&mut self, score: u64);
    fn set_high_score(&mut self, score: u64);
    /// Health bar fill in [0, 1]
    fn set_health(&mut self, fraction: f32);
    /// Power-up indicator; `fraction` is the share of the duration left
    fn set_power_up(&mut self, kind: PowerUpKind, visible: bool, fraction: f32);
    fn show_modal(&mut self, modal: Modal);
    fn hide_modal(&mut self, modal: Modal);
    /// Score printed on the game-over panel
    fn set_final_score(&mut self, score: u64);
    fn set_leaderboard(&mut self, view: &LeaderboardView);
    fn set_level(&mut self, _level: u32) {}
    fn set_fps(&mut self, _fps: Option<u32>) {}
}

/// Health bar fill for a possibly negative health value
pub fn health_fraction(current: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    (current / max).clamp(0.0, 1.0)
}

/// Reflect one simulation event on the HUD
pub fn apply_event(hud: &mut dyn Hud, event: &GameEvent) {
    match *event {
        GameEvent::RoundStarted => {
            hud.hide_modal(Modal::GameOver);
            hud.hide_modal(Modal::Pause);
            hud.hide_modal(Modal::Leaderboard);
            hud.set_level(1);
        }
        GameEvent::ScoreChanged(score) => hud.set_score(score),
        GameEvent::HealthChanged { current, max } => hud.set_health(health_fraction(current, max)),
        GameEvent::LevelChanged(level) => hud.set_level(level),
        GameEvent::Paused => hud.show_modal(Modal::Pause),
        GameEvent::Resumed => hud.hide_modal(Modal::Pause),
        GameEvent::HighScoreChanged(score) => hud.set_high_score(score),
        GameEvent::ShowGameOver { score } => {
            hud.set_final_score(score);
            hud.show_modal(Modal::GameOver);
        }
        // Indicators are refreshed from the timers every frame
        GameEvent::PowerUpCollected(_) | GameEvent::RoundEnded { .. } => {}
    }
}

/// Refresh the three timed power-up indicators
pub fn sync_power_ups(hud: &mut dyn Hud, effects: &EffectTimers) {
    for kind in PowerUpKind::TIMED {
        hud.set_power_up(kind, effects.get(kind) > 0, effects.fraction(kind));
    }
}

/// Score with thousands separators
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn leaderboard_row(row: &RankedEntry) -> String {
    let (row_class, name_class) = if row.entry.is_player {
        ("bg-purple-900/50 border border-purple-500", "text-yellow-300")
    } else {
        ("border-b border-gray-800", "text-white")
    };
    format!(
        "<div class=\"flex justify-between {} p-2 rounded items-center\">\
         <span class=\"text-purple-400 w-12\">#{}</span>\
         <span class=\"{} flex-1 font-bold\">{}</span>\
         <span class=\"text-yellow-400\">{}</span></div>",
        row_class,
        row.rank,
        name_class,
        row.entry.name,
        format_score(row.entry.score)
    )
}

/// Markup for the leaderboard list
pub fn leaderboard_html(view: &LeaderboardView) -> String {
    let mut html: String = view.top.iter().map(leaderboard_row).collect();
    if !view.context.is_empty() {
        html.push_str("<div class=\"text-center text-gray-600 my-2\">...</div>");
        html.extend(view.context.iter().map(leaderboard_row));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Leaderboard;
    use crate::consts::POWER_UP_DURATION;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Score(u64),
        HighScore(u64),
        Health(f32),
        PowerUp(PowerUpKind, bool, f32),
        Show(Modal),
        Hide(Modal),
        FinalScore(u64),
        Leaderboard(usize),
    }

    #[derive(Default)]
    struct RecordingHud {
        calls: Vec<Call>,
    }

    impl Hud for RecordingHud {
        fn set_score(&mut self, score: u64) {
            self.calls.push(Call::Score(score));
        }
        fn set_high_score(&mut self, score: u64) {
            self.calls.push(Call::HighScore(score));
        }
        fn set_health(&mut self, fraction: f32) {
            self.calls.push(Call::Health(fraction));
        }
        fn set_power_up(&mut self, kind: PowerUpKind, visible: bool, fraction: f32) {
            self.calls.push(Call::PowerUp(kind, visible, fraction));
        }
        fn show_modal(&mut self, modal: Modal) {
            self.calls.push(Call::Show(modal));
        }
        fn hide_modal(&mut self, modal: Modal) {
            self.calls.push(Call::Hide(modal));
        }
        fn set_final_score(&mut self, score: u64) {
            self.calls.push(Call::FinalScore(score));
        }
        fn set_leaderboard(&mut self, view: &LeaderboardView) {
            self.calls.push(Call::Leaderboard(view.top.len() + view.context.len()));
        }
    }

    #[test]
    fn test_health_is_clamped() {
        assert_eq!(health_fraction(-12.0, 100.0), 0.0);
        assert_eq!(health_fraction(150.0, 100.0), 1.0);
        assert_eq!(health_fraction(25.0, 100.0), 0.25);
        assert_eq!(health_fraction(10.0, 0.0), 0.0);

        let mut hud = RecordingHud::default();
        apply_event(&mut hud, &GameEvent::HealthChanged { current: -3.0, max: 100.0 });
        assert_eq!(hud.calls, vec![Call::Health(0.0)]);
    }

    #[test]
    fn test_event_mapping() {
        let mut hud = RecordingHud::default();
        apply_event(&mut hud, &GameEvent::ScoreChanged(350));
        apply_event(&mut hud, &GameEvent::Paused);
        apply_event(&mut hud, &GameEvent::Resumed);
        apply_event(&mut hud, &GameEvent::HighScoreChanged(900));
        apply_event(&mut hud, &GameEvent::RoundEnded { score: 900 });
        apply_event(&mut hud, &GameEvent::ShowGameOver { score: 900 });
        assert_eq!(
            hud.calls,
            vec![
                Call::Score(350),
                Call::Show(Modal::Pause),
                Call::Hide(Modal::Pause),
                Call::HighScore(900),
                Call::FinalScore(900),
                Call::Show(Modal::GameOver),
            ]
        );
    }

    #[test]
    fn test_round_start_hides_every_modal() {
        let mut hud = RecordingHud::default();
        apply_event(&mut hud, &GameEvent::RoundStarted);
        for modal in [Modal::Pause, Modal::GameOver, Modal::Leaderboard] {
            assert!(hud.calls.contains(&Call::Hide(modal)));
        }
    }

    #[test]
    fn test_power_up_indicators() {
        let mut effects = EffectTimers::default();
        effects.set(PowerUpKind::Shield, POWER_UP_DURATION / 2);
        let mut hud = RecordingHud::default();
        sync_power_ups(&mut hud, &effects);
        assert_eq!(
            hud.calls,
            vec![
                Call::PowerUp(PowerUpKind::Shield, true, 0.5),
                Call::PowerUp(PowerUpKind::DoubleShot, false, 0.0),
                Call::PowerUp(PowerUpKind::SpeedBoost, false, 0.0),
            ]
        );
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(999), "999");
        assert_eq!(format_score(1000), "1,000");
        assert_eq!(format_score(50_000), "50,000");
        assert_eq!(format_score(1_234_567), "1,234,567");
    }

    #[test]
    fn test_leaderboard_html() {
        let mut board = Leaderboard::new(8);
        board.update(0, 0.0);
        let view = board.view();
        let mut hud = RecordingHud::default();
        hud.set_leaderboard(&view);
        assert_eq!(hud.calls, vec![Call::Leaderboard(7)]);

        let html = leaderboard_html(&view);
        assert!(html.starts_with("<div class=\"flex justify-between border-b"));
        assert!(html.contains("#1</span>"));
        assert!(html.contains(&format_score(view.top[0].entry.score)));
        assert!(html.contains("..."));
        assert!(html.contains(">YOU<"));
        assert!(html.contains("#121</span>"));
        assert_eq!(html.matches("text-yellow-300").count(), 1);
    }
}
