//! Oval Footy entry point
//!
//! Browser builds host the match on a WebGPU canvas. Native builds play a
//! short headless demo match and log the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use oval_footy::audio::{AudioSink, SoundEffect, WebAudio};
    use oval_footy::consts::*;
    use oval_footy::renderer::{RenderState, VertexBatch};
    use oval_footy::scoreboard::MatchPhase;
    use oval_footy::sim::Side;
    use oval_footy::teams::{self, TEAMS};
    use oval_footy::{MatchEngine, Scoreboard, Settings};

    type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

    /// Match instance holding all host state
    struct Game {
        engine: MatchEngine<Scoreboard, WebAudio>,
        settings: Settings,
        render_state: Option<RenderState>,
        batch: VertexBatch,
        last_time: f64,
        /// Kept so `shutdown` can detach them
        key_listeners: Vec<(&'static str, KeyListener)>,
        stopped: bool,
    }

    impl Game {
        fn update(&mut self, dt: f32) {
            if self.engine.scores().phase != MatchPhase::Playing {
                return;
            }
            self.engine.update(dt);
            if self.engine.scores_mut().advance_clock(dt) {
                self.engine.audio_mut().play(SoundEffect::Siren);
                self.engine.release_keys();
            }
        }

        fn render(&mut self) {
            self.batch.clear();
            self.engine.render(&mut self.batch);

            let Some(rs) = &mut self.render_state else {
                return;
            };
            match rs.render(self.batch.vertices()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    rs.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory");
                }
                Err(e) => {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let scores = self.engine.scores();
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };

            for (side, id) in [(Side::Home, "hud-home"), (Side::Away, "hud-away")] {
                let team = self.engine.team(side);
                set_text(id, &format!("{} {}", team.name, scores.score(side)));
            }

            let status = match scores.phase {
                MatchPhase::Playing => format!("Q{}", scores.quarter),
                MatchPhase::Paused => "PAUSED".to_string(),
                MatchPhase::QuarterEnd => format!("END Q{} - Enter to play on", scores.quarter),
                MatchPhase::MatchEnd => match scores.leader() {
                    Some(side) => format!(
                        "FULL TIME - {} by {} - R for a rematch",
                        self.engine.team(side).name,
                        scores.margin()
                    ),
                    None => "FULL TIME - DRAW - R for a rematch".to_string(),
                },
            };
            set_text("hud-quarter", &status);
            if self.settings.show_clock {
                set_text("hud-clock", &scores.format_clock());
            }
        }

        /// Host keys that are not part of the match bindings
        fn host_key(&mut self, code: &str) -> bool {
            match code {
                "Escape" | "KeyP" => {
                    self.engine.scores_mut().toggle_pause();
                    self.engine.release_keys();
                }
                "Enter" => {
                    if self.engine.scores_mut().next_quarter() {
                        log::info!("Quarter {} underway", self.engine.scores().quarter);
                    }
                }
                "KeyM" => {
                    self.settings.muted = self.engine.audio_mut().toggle_mute();
                    self.settings.save();
                }
                "KeyR" => {
                    if self.engine.scores().phase != MatchPhase::MatchEnd {
                        return false;
                    }
                    self.engine.scores_mut().reset();
                    self.engine.rematch(js_sys::Date::now() as u64);
                }
                _ => return false,
            }
            true
        }

        fn shutdown(&mut self) {
            if self.stopped {
                return;
            }
            self.stopped = true;
            if let Some(window) = web_sys::window() {
                for (event, listener) in self.key_listeners.drain(..) {
                    let _ = window.remove_event_listener_with_callback(
                        event,
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
            self.engine.destroy();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Oval Footy starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let (home, away) = settings.team_indices(TEAMS.len());
        let (Some(home), Some(away)) = (teams::team(home), teams::team(away)) else {
            log::error!("Team roster is empty");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let engine = MatchEngine::new(
            home,
            away,
            Scoreboard::new(),
            WebAudio::with_settings(&settings),
            seed,
        );

        if let Some(help) = document.get_element_by_id("controls-help") {
            let class = if settings.show_controls_help { "" } else { "hidden" };
            let _ = help.set_attribute("class", class);
        }

        let game = Rc::new(RefCell::new(Game {
            engine,
            settings,
            render_state: None,
            batch: VertexBatch::new(),
            last_time: 0.0,
            key_listeners: Vec::new(),
            stopped: false,
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let view = (SCREEN_WIDTH, SCREEN_HEIGHT);
                        match RenderState::new(surface, &adapter, width, height, view).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        setup_input_handlers(&window, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        setup_resize(&window, canvas, game.clone());
        setup_shutdown(&window, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        game.borrow_mut().engine.start();
        request_animation_frame(game);

        log::info!("Oval Footy running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let mut listeners = Vec::new();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                let playing = g.engine.scores().phase == MatchPhase::Playing;
                let handled = if event.repeat() {
                    // Held keys still claim their default
                    oval_footy::input::is_game_key(&code)
                } else if playing {
                    g.engine.key_down(&code) || g.host_key(&code)
                } else {
                    // Match keys are swallowed until play resumes
                    g.host_key(&code) || oval_footy::input::is_game_key(&code)
                };
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            listeners.push(("keydown", closure));
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().engine.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            listeners.push(("keyup", closure));
        }

        game.borrow_mut().key_listeners = listeners;
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.engine.release_keys();
                    if g.engine.scores().phase == MatchPhase::Playing {
                        g.engine.scores_mut().toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside). Key-ups are lost while unfocused.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.engine.release_keys();
                if g.settings.mute_on_blur {
                    g.engine.audio_mut().set_muted(true);
                }
                if g.engine.scores().phase == MatchPhase::Playing {
                    g.engine.scores_mut().toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus back: restore sound unless the player muted it themselves
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur && !g.settings.muted && g.engine.audio().is_muted() {
                    g.engine.audio_mut().toggle_mute();
                }
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(rs) = &mut game.borrow_mut().render_state {
                rs.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_shutdown(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().shutdown();
            log::info!("Page hidden for good, match stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.stopped {
                return;
            }

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Oval Footy (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);
    let tuning = args.next().map(|path| load_tuning(&path)).unwrap_or_default();

    demo_match(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> oval_footy::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| oval_footy::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {path}: {e}");
            oval_footy::Tuning::default()
        }
    }
}

/// One simulated minute: the controlled player runs at the ball, kicks on
/// arrival and marks whenever the ball drops near them.
#[cfg(not(target_arch = "wasm32"))]
fn demo_match(seed: u64, tuning: oval_footy::Tuning) {
    use oval_footy::audio::{AudioSink, LogAudio, SoundEffect};
    use oval_footy::consts::FRAME_DT;
    use oval_footy::renderer::VertexBatch;
    use oval_footy::sim::{Direction, FieldGeometry, Side};
    use oval_footy::teams::{self, TEAMS};
    use oval_footy::{MatchEngine, Scoreboard, Settings};

    const FRAMES: usize = 60 * 60;

    let settings = Settings::load();
    let (home, away) = settings.team_indices(TEAMS.len());
    let (Some(home), Some(away)) = (teams::team(home), teams::team(away)) else {
        log::error!("Team roster is empty");
        return;
    };

    let mut audio = LogAudio::new();
    audio.set_muted(settings.muted);
    let mut engine = MatchEngine::with_tuning(
        home,
        away,
        Scoreboard::new(),
        audio,
        seed,
        tuning,
        FieldGeometry::default(),
    );
    engine.start();

    let mut held: Option<&'static str> = None;
    for frame in 0..FRAMES {
        let (player, ball) = {
            let state = engine.state();
            (state.controlled().pos, state.ball.pos)
        };

        // Steer with the key for the dominant axis
        let key = Direction::from_vector(ball - player).map(|direction| match direction {
            Direction::Up => "KeyW",
            Direction::Down => "KeyS",
            Direction::Left => "KeyA",
            Direction::Right => "KeyD",
        });
        if held != key {
            if let Some(old) = held.take() {
                engine.key_up(old);
            }
            if let Some(key) = key {
                engine.key_down(key);
            }
            held = key;
        }

        let near = ball.distance(player) < 20.0;
        if near && frame % 20 == 0 {
            let action = if engine.state().ball.is_in_air() { "KeyK" } else { "KeyJ" };
            engine.key_down(action);
            engine.key_up(action);
        }

        engine.update(FRAME_DT);
        if engine.scores_mut().advance_clock(FRAME_DT) {
            engine.audio_mut().play(SoundEffect::Siren);
        }
    }

    let mut batch = VertexBatch::new();
    engine.render(&mut batch);
    log::debug!("Final frame: {} vertices", batch.vertices().len());

    let scores = engine.scores();
    log::info!(
        "After {}: {} {} v {} {}",
        scores.format_clock(),
        engine.team(Side::Home).name,
        scores.home,
        engine.team(Side::Away).name,
        scores.away
    );
    engine.destroy();
}
