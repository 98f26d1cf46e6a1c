//! Space Game entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use space_game::Game;
    use space_game::persistence::default_storage;
    use space_game::platform::{is_touch_device, toggle_fullscreen};
    use space_game::renderer::CanvasRenderer;
    use space_game::sim::{Bounds, PowerUpKind};
    use space_game::ui::DomHud;

    /// Touches that start on these panels are UI taps, not shots
    const UI_SELECTORS: &str = "#mobileControls, #pauseModalEl, #modalEl, #leaderboardModal";

    /// Everything the page callbacks share
    struct App {
        game: Game,
        renderer: CanvasRenderer,
        hud: DomHud,
        touch: bool,
    }

    fn viewport() -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::ZERO;
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }

    fn joystick_origin() -> Vec2 {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("joystickContainer"))
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    (rect.top() + rect.height() / 2.0) as f32,
                )
            })
            .unwrap_or(Vec2::ZERO)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Space Game starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")?
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let size = viewport();
        let mut renderer = CanvasRenderer::new(canvas)?;
        renderer.resize(size.x as u32, size.y as u32);
        for kind in [
            PowerUpKind::Shield,
            PowerUpKind::DoubleShot,
            PowerUpKind::SpeedBoost,
            PowerUpKind::HealthBoost,
        ] {
            if let Err(e) = renderer.load_image(kind.image()) {
                log::warn!("Could not load {}: {:?}", kind.image(), e);
            }
        }

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Bounds::new(size.x, size.y), default_storage());
        let mut hud = DomHud::new(document);
        game.sync_hud(&mut hud);

        let touch = is_touch_device();
        if touch {
            hud.show_mobile_controls();
        }

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            hud,
            touch,
        }));

        setup_keyboard(app.clone())?;
        setup_pointer(app.clone())?;
        if touch {
            setup_touch(app.clone())?;
        }
        setup_buttons(app.clone());
        setup_resize(app.clone())?;

        // The loop runs from the start so the starfield animates behind the title
        request_animation_frame(app);

        log::info!("Space Game running!");
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_down(&event.code());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.input.key_up(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Held keys would stick after the window loses focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.input.release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_pointer(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut app = app.borrow_mut();
            // Touch devices shoot from touchstart instead
            if app.touch {
                return;
            }
            let target = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            app.game.input.shoot_at(target);
        });
        window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn on_ui(event: &TouchEvent) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(UI_SELECTORS).ok().flatten())
            .is_some()
    }

    fn setup_touch(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if on_ui(&event) {
                    return;
                }
                let view = viewport();
                let origin = joystick_origin();
                let now = event.time_stamp();
                let touches = event.changed_touches();
                let mut app = app.borrow_mut();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else {
                        continue;
                    };
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    if space_game::platform::InputState::in_joystick_zone(pos, view) {
                        event.prevent_default();
                    }
                    app.game
                        .input
                        .touch_start(touch.identifier(), pos, view, origin, now);
                }
            });
            window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let now = event.time_stamp();
                let touches = event.changed_touches();
                let mut app = app.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        if app.game.input.joystick.touch_id == Some(touch.identifier()) {
                            event.prevent_default();
                        }
                        let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                        app.game.input.touch_move(touch.identifier(), pos, now);
                    }
                }
            });
            window.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let now = event.time_stamp();
                let touches = event.changed_touches();
                let mut app = app.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                        app.game.input.touch_end(touch.identifier(), pos, now);
                    }
                }
            });
            window.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Attach a click handler to an optional button
    fn on_click(id: &str, app: &Rc<RefCell<App>>, action: fn(&mut App, f64)) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.stop_propagation();
            action(&mut app.borrow_mut(), event.time_stamp());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        for id in ["startGameBtn", "restartBtn"] {
            on_click(id, &app, |app, _| app.game.start_round());
        }
        for id in ["pauseBtn", "resumeBtn"] {
            on_click(id, &app, |app, _| app.game.request_pause());
        }
        on_click("fullscreenBtn", &app, |_, _| toggle_fullscreen());
        for id in ["leaderboardBtn", "pauseLeaderboardBtn"] {
            on_click(id, &app, |app, now| {
                let App { game, hud, .. } = app;
                game.open_leaderboard(now, hud);
            });
        }
        on_click("closeLeaderboardBtn", &app, |app, _| {
            let App { game, hud, .. } = app;
            game.close_leaderboard(hud);
        });
    }

    fn setup_resize(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let size = viewport();
            let mut app = app.borrow_mut();
            app.renderer.resize(size.x as u32, size.y as u32);
            app.game.resize(Bounds::new(size.x, size.y));
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut guard = app.borrow_mut();
            let App {
                game,
                renderer,
                hud,
                touch,
            } = &mut *guard;

            game.frame(time, hud);
            game.render(renderer);
            if *touch {
                let stick = &game.input.joystick;
                let knob = stick.knob_offset();
                hud.set_joystick_knob(knob.x, knob.y, stick.active);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Game (native) starting...");
    log::info!("Native mode runs a headless autopilot round - run with `trunk serve` for the web version");

    let score = autopilot::run(2024, 60 * 60 * 3);
    println!("\nAutopilot finished with score {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a crude pilot that flees the nearest enemy and shoots it
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;

    use space_game::Game;
    use space_game::consts::FRAME_MS;
    use space_game::leaderboard::LeaderboardView;
    use space_game::persistence::MemoryStorage;
    use space_game::sim::{Bounds, GamePhase, PowerUpKind};
    use space_game::ui::{Hud, Modal};

    /// HUD that only logs what a page would show
    struct LogHud;

    impl Hud for LogHud {
        fn set_score(&mut self, _score: u64) {}
        fn set_high_score(&mut self, score: u64) {
            log::info!("HUD high score: {}", score);
        }
        fn set_health(&mut self, fraction: f32) {
            log::debug!("HUD health: {:.0}%", fraction * 100.0);
        }
        fn set_power_up(&mut self, _kind: PowerUpKind, _visible: bool, _fraction: f32) {}
        fn show_modal(&mut self, modal: Modal) {
            log::info!("HUD show {:?}", modal);
        }
        fn hide_modal(&mut self, _modal: Modal) {}
        fn set_final_score(&mut self, score: u64) {
            log::info!("HUD final score: {}", score);
        }
        fn set_leaderboard(&mut self, view: &LeaderboardView) {
            log::info!("HUD leaderboard rank: {:?}", view.player_rank);
        }
        fn set_level(&mut self, level: u32) {
            log::info!("HUD level: {}", level);
        }
    }

    const KEYS: [(&str, Vec2); 4] = [
        ("ArrowUp", Vec2::new(0.0, -1.0)),
        ("ArrowDown", Vec2::new(0.0, 1.0)),
        ("ArrowLeft", Vec2::new(-1.0, 0.0)),
        ("ArrowRight", Vec2::new(1.0, 0.0)),
    ];

    fn steer(game: &mut Game) {
        let player = game.state.player.body.pos;
        let nearest = game
            .state
            .enemies
            .iter()
            .map(|e| e.body.pos)
            .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));

        let away = nearest
            .filter(|e| e.distance(player) < 200.0)
            .map(|e| player - e)
            .unwrap_or_else(|| game.state.bounds.center() - player);

        for (code, dir) in KEYS {
            if away.dot(dir) > 1.0 {
                game.input.key_down(code);
            } else {
                game.input.key_up(code);
            }
        }
        if let Some(target) = nearest.filter(|_| game.state.frame % 10 == 0) {
            game.input.shoot_at(target);
        }
    }

    /// Play one round for at most `max_frames`; returns the final score
    pub fn run(seed: u64, max_frames: u64) -> u64 {
        let bounds = Bounds::new(1280.0, 720.0);
        let mut game = Game::new(seed, bounds, Box::new(MemoryStorage::new()));
        let mut hud = LogHud;
        game.sync_hud(&mut hud);
        game.start_round();

        let mut now = 0.0;
        for _ in 0..max_frames {
            if game.state.phase != GamePhase::Playing {
                break;
            }
            steer(&mut game);
            now += FRAME_MS as f64;
            game.frame(now, &mut hud);
        }

        game.open_leaderboard(now + 1000.0, &mut hud);
        log::info!(
            "Autopilot: level {}, score {}, {} frames",
            game.state.difficulty.level,
            game.state.score,
            game.state.frame
        );
        game.state.score
    }
}
