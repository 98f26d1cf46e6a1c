//! DOM-backed HUD
//!
//! Every element is optional: a page without a given element just does not
//! show that piece of the HUD.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::{Hud, Modal, format_score, leaderboard_html};
use crate::leaderboard::LeaderboardView;
use crate::sim::PowerUpKind;

/// HUD over the page's elements
pub struct DomHud {
    document: Document,
}

impl DomHud {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) {
        if let Some(el) = self.element(id) {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_display(&self, id: &str, visible: bool, shown_as: &str) {
        self.set_style(id, "display", if visible { shown_as } else { "none" });
    }

    fn modal_id(modal: Modal) -> &'static str {
        match modal {
            Modal::Pause => "pauseModalEl",
            Modal::GameOver => "modalEl",
            Modal::Leaderboard => "leaderboardModal",
        }
    }

    fn power_up_ids(kind: PowerUpKind) -> Option<(&'static str, &'static str)> {
        match kind {
            PowerUpKind::Shield => Some(("shieldContainer", "shieldBar")),
            PowerUpKind::DoubleShot => Some(("doubleContainer", "doubleBar")),
            PowerUpKind::SpeedBoost => Some(("speedContainer", "speedBar")),
            PowerUpKind::HealthBoost => None,
        }
    }

    /// Reveal the touch controls on touch devices
    pub fn show_mobile_controls(&self) {
        self.set_display("mobileControls", true, "flex");
        self.set_display("leftTouchZone", true, "block");
        self.set_display("joystickContainer", true, "block");
    }

    /// Move the joystick knob by a pixel offset from its rest position
    pub fn set_joystick_knob(&self, dx: f32, dy: f32, active: bool) {
        let transform = if active {
            format!("translate(calc(-50% + {}px), calc(-50% + {}px))", dx, dy)
        } else {
            String::new()
        };
        self.set_style("joystickKnob", "transform", &transform);
        self.set_style("joystickContainer", "opacity", if active { "1.0" } else { "0.5" });
    }
}

impl Hud for DomHud {
    fn set_score(&mut self, score: u64) {
        self.set_text("scoreEl", &score.to_string());
    }

    fn set_high_score(&mut self, score: u64) {
        self.set_text("highScoreEl", &score.to_string());
    }

    fn set_health(&mut self, fraction: f32) {
        self.set_style("hpBarEl", "width", &format!("{}%", fraction * 100.0));
    }

    fn set_power_up(&mut self, kind: PowerUpKind, visible: bool, fraction: f32) {
        let Some((container, bar)) = Self::power_up_ids(kind) else {
            return;
        };
        self.set_display(container, visible, "block");
        self.set_style(bar, "width", &format!("{}%", fraction * 100.0));
    }

    fn show_modal(&mut self, modal: Modal) {
        self.set_display(Self::modal_id(modal), true, "flex");
    }

    fn hide_modal(&mut self, modal: Modal) {
        self.set_display(Self::modal_id(modal), false, "flex");
    }

    fn set_final_score(&mut self, score: u64) {
        self.set_text("bigScoreEl", &score.to_string());
    }

    fn set_leaderboard(&mut self, view: &LeaderboardView) {
        if let Some(list) = self.element("leaderboardList") {
            list.set_inner_html(&leaderboard_html(view));
        }
        if let Some(rank) = view.player_rank {
            self.set_text("playerRankEl", &format!("#{}", format_score(rank as u64)));
        }
    }

    fn set_level(&mut self, level: u32) {
        self.set_text("levelEl", &level.to_string());
    }

    fn set_fps(&mut self, fps: Option<u32>) {
        match fps {
            Some(fps) => {
                self.set_text("fpsEl", &fps.to_string());
                self.set_display("fpsEl", true, "block");
            }
            None => self.set_display("fpsEl", false, "block"),
        }
    }
}
