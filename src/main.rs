//! Landmark Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use landmark_runner::assets::{AssetAvailability, AssetStore};
    use landmark_runner::autopilot::Autopilot;
    use landmark_runner::platform::{InputAdapter, KeyAction, classify_key};
    use landmark_runner::renderer::{GpuRenderer, build};
    use landmark_runner::sim::{GameStatus, RenderState};
    use landmark_runner::{Game, GameConfig, Intents, Settings};

    /// Everything the browser loop owns
    struct App {
        game: Game,
        settings: Settings,
        input: InputAdapter,
        autopilot: Option<Autopilot>,
        renderer: Option<GpuRenderer>,
        assets: AssetAvailability,
        /// State produced by the previous frame (autopilot reads this)
        last: RenderState,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(game: Game, settings: Settings) -> Self {
            let last = game.render_state();
            let autopilot = settings.autopilot.then(Autopilot::new);
            Self {
                game,
                settings,
                input: InputAdapter::new(),
                autopilot,
                renderer: None,
                assets: AssetAvailability::default(),
                last,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn toggle_autopilot(&mut self) {
            self.autopilot = match self.autopilot {
                Some(_) => None,
                None => Some(Autopilot::new()),
            };
            log::info!("Autopilot: {}", self.autopilot.is_some());
        }

        /// Human intents, merged with the bot's when it is driving
        fn intents(&mut self) -> Intents {
            let human = self.input.take_intents();
            match self.autopilot.as_mut() {
                Some(bot) => {
                    let auto = bot.intents(&self.last);
                    Intents {
                        jump_pressed: human.jump_pressed || auto.jump_pressed,
                        jump_held: human.jump_held || auto.jump_held,
                        dismiss: human.dismiss || auto.dismiss,
                        restart: human.restart,
                    }
                }
                None => human,
            }
        }

        fn update(&mut self, time: f64) {
            let intents = self.intents();
            let state = self.game.frame(&intents);
            for event in &state.events {
                log::debug!("{:?}", event);
            }
            self.last = state;

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn render(&mut self) {
            let commands = build(&self.last, &self.assets, &self.settings);
            if let Some(ref mut renderer) = self.renderer {
                match renderer.render(&commands) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD and overlays in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.last;
            let language = self.settings.language;

            set_text(document, "#hud-score .hud-value", &state.score.to_string());
            set_text(document, "#hud-lives .hud-value", &state.lives.to_string());
            set_visible(document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            }
            set_visible(document, "hud-demo", self.autopilot.is_some());
            set_visible(document, "loading", state.status == GameStatus::Loading);

            set_visible(document, "landmark-popup", state.popup.is_some());
            if let Some(popup) = &state.popup {
                set_text(document, "#popup-title", &popup.name);
                set_text(document, "#popup-text", popup.description(language));
                set_text(document, "#popup-continue", language.continue_label());
            }

            set_visible(document, "win-screen", state.show_win_screen);
            if state.show_win_screen {
                set_text(document, "#win-title", language.win_title());
                set_text(document, "#win-score", &state.score.to_string());
            }

            set_visible(document, "game-over", state.show_game_over);
            if state.show_game_over {
                set_text(document, "#game-over-title", language.game_over_title());
                set_text(document, "#final-score", &state.score.to_string());
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", err).into());
        }

        log::info!("Landmark Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let settings = Settings::from_query(&window.location().search().unwrap_or_default());
        let config = GameConfig::default();
        let world_size = (config.world.canvas_width, config.world.canvas_height);
        let manifest = config.asset_manifest();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(Game::new(config, seed), settings)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match GpuRenderer::new(surface, &adapter, width, height, world_size).await {
                            Ok(renderer) => app.borrow_mut().renderer = Some(renderer),
                            Err(err) => log::error!("Failed to create device: {}", err),
                        }
                    }
                    Err(err) => log::error!("No graphics adapter: {}", err),
                }
            }
            Err(err) => log::error!("Failed to create surface: {}", err),
        }

        setup_input_handlers(&canvas, app.clone())?;
        setup_buttons(&document, app.clone());
        setup_focus_loss(app.clone())?;

        // Assets load in the background; the game stays in Loading until they settle
        {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let store = AssetStore::fetch("", &manifest).await;
                let availability = store.availability(&manifest);
                let mut a = app.borrow_mut();
                if let Some(renderer) = a.renderer.as_mut() {
                    for (key, image) in store.images() {
                        renderer.upload(key, image);
                    }
                }
                a.game.finish_loading(&availability);
                a.assets = availability;
            });
        }

        request_animation_frame(app);

        log::info!("Landmark Runner running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = classify_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                let mut a = app.borrow_mut();
                match action {
                    KeyAction::Primary => a.input.press(),
                    KeyAction::Dismiss => a.input.request_dismiss(),
                    KeyAction::Restart => a.input.request_restart(),
                    KeyAction::ToggleAutopilot => {
                        if !event.repeat() {
                            a.toggle_autopilot();
                        }
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if classify_key(&event.key()) == Some(KeyAction::Primary) {
                    app.borrow_mut().input.release();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.press();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.release();
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().input.press();
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().input.release();
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("popup-continue") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.request_dismiss();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for id in ["restart-btn", "win-restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    app.borrow_mut().input.request_restart();
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Release held input when the page loses focus
    fn setup_focus_loss(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().input.blur();
                    log::info!("Input released (tab hidden)");
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().input.blur();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

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
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use landmark_runner::assets::AssetStore;
    use landmark_runner::{Game, GameConfig, Settings};

    env_logger::init();
    log::info!("Landmark Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Invalid config {}: {}", path, err);
                return std::process::ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let manifest = config.asset_manifest();
    let store = AssetStore::load_from_dir(std::path::Path::new("assets"), &manifest);
    let availability = store.availability(&manifest);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut game = Game::new(config, seed);
    game.finish_loading(&availability);

    headless::run(&mut game, &availability, &Settings::default());
    std::process::ExitCode::SUCCESS
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> Result<landmark_runner::GameConfig, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(landmark_runner::GameConfig::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use landmark_runner::assets::AssetAvailability;
    use landmark_runner::autopilot::Autopilot;
    use landmark_runner::renderer::build;
    use landmark_runner::sim::{GameEvent, GameStatus};
    use landmark_runner::{Game, Settings};

    /// Ten minutes of frames at 60 Hz
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    pub fn run(game: &mut Game, assets: &AssetAvailability, settings: &Settings) {
        let mut bot = Autopilot::new();
        let mut state = game.render_state();

        for display_frame in 0..MAX_FRAMES {
            let intents = bot.intents(&state);
            state = game.frame(&intents);

            for event in &state.events {
                match event {
                    GameEvent::LandmarkReached { index, .. } => {
                        let name = state.popup.as_ref().map(|p| p.name.as_str()).unwrap_or("?");
                        log::info!("Landmark {} reached: {}", index, name);
                    }
                    GameEvent::Hit { kind, lives_left } => {
                        log::info!("Hit by {} ({} lives left)", kind.as_str(), lives_left)
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            if display_frame % 600 == 0 {
                let commands = build(&state, assets, settings);
                log::debug!(
                    "frame {} status {} score {} ({} draw commands)",
                    state.frame,
                    state.status.as_str(),
                    state.score,
                    commands.len()
                );
            }

            // The bot never restarts, so finishing ends the demo
            if state.status == GameStatus::GameOver || state.show_win_screen {
                break;
            }
        }

        log::info!(
            "Demo finished: {} after {} ticks, score {}, {} lives",
            state.status.as_str(),
            state.frame,
            state.score,
            state.lives
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
