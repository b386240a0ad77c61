//! Tap Jump entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, HtmlSelectElement};

    use tap_jump::config::JumpConfig;
    use tap_jump::consts::SIM_DT;
    use tap_jump::platform::InputScheme;
    use tap_jump::renderer::BoxRenderer;
    use tap_jump::{RoundObserver, SceneDriver};

    const SCORE_PER_SUCCESS: u32 = 100;

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_display(id: &str, value: &str) {
        if let Some(el) = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", value);
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    /// Current value of the level select, if present
    fn selected_level() -> Option<String> {
        let select: HtmlSelectElement = document()?
            .get_element_by_id("jump_select")?
            .dyn_into()
            .ok()?;
        Some(select.value())
    }

    /// Fresh config for the level picked right now
    fn level_config() -> JumpConfig {
        JumpConfig::from_selection(selected_level().as_deref())
    }

    /// Mirrors round outcomes into the score panel and overlay
    #[derive(Default)]
    struct DomObserver {
        score: u32,
    }

    impl DomObserver {
        fn reset(&mut self) {
            self.score = 0;
            set_text("scoreTotal", "0");
        }
    }

    impl RoundObserver for DomObserver {
        fn on_player_success(&mut self) {
            self.score += SCORE_PER_SUCCESS;
            set_text("scoreTotal", &self.score.to_string());
        }

        fn on_player_fail(&mut self) {
            log::info!("Game over with score {}", self.score);
            set_display("app", "block");
        }
    }

    /// Game instance holding all state
    struct Game {
        driver: SceneDriver<BoxRenderer, DomObserver>,
        last_time: f64,
        listening: bool,
    }

    impl Game {
        fn new(renderer: BoxRenderer) -> Self {
            Self {
                driver: SceneDriver::new(renderer, DomObserver::default()),
                last_time: 0.0,
                listening: false,
            }
        }

        fn start(&mut self) {
            set_display("app", "none");
            set_display("score", "block");
            set_display("jump_startGame", "none");
            set_display("jump_restartGame", "inline-block");

            let seed = js_sys::Date::now() as u64;
            if let Err(e) = self.driver.start_level(level_config(), seed) {
                log::error!("Cannot start level: {}", e);
            }
        }

        fn restart(&mut self) {
            set_display("app", "none");
            set_display("score", "block");
            self.driver.observer.reset();

            let seed = js_sys::Date::now() as u64;
            if let Err(e) = self.driver.restart(level_config(), seed) {
                log::error!("Cannot restart level: {}", e);
            }
        }

        fn update(&mut self, dt: f32) {
            if let Err(e) = self.driver.update(dt) {
                log::warn!("Simulation stalled: {}", e);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tap Jump starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = fit_canvas(&window, &canvas);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let clear_color = JumpConfig::default().clear_rgba();
        let renderer = match BoxRenderer::new(surface, &adapter, width, height, clear_color).await {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Renderer init failed: {}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game::new(renderer)));

        setup_start_button(game.clone());
        setup_restart_button(game.clone());
        setup_resize(canvas, game.clone());

        request_animation_frame(game);

        log::info!("Tap Jump ready");
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    /// Press/release listeners on `window`, attached on the first start
    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let scheme = InputScheme::detect();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().driver.press();
            });
            let _ = window.add_event_listener_with_callback(
                scheme.press_event(),
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().driver.release();
            });
            let _ = window.add_event_listener_with_callback(
                scheme.release_event(),
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("jump_startGame") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let attach = {
                    let mut g = game.borrow_mut();
                    g.start();
                    !std::mem::replace(&mut g.listening, true)
                };
                if attach {
                    setup_input_handlers(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No start button; starting immediately");
            game.borrow_mut().start();
            game.borrow_mut().listening = true;
            setup_input_handlers(game);
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("jump_restartGame") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            let mut g = game.borrow_mut();
            g.driver.sink.resize(width, height);
            if g.driver.state().is_some() {
                tap_jump::SceneSink::render(&mut g.driver.sink);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tap_jump::sim::{Camera, GameState, JumpStatus, Platform, Player, TickInput, tick};
    use tap_jump::{RoundObserver, SceneSink};

    /// Sink that only counts what it would draw
    #[derive(Default)]
    pub struct CountingSink {
        pub platforms: usize,
        pub frames: u64,
    }

    impl SceneSink for CountingSink {
        fn add_platform(&mut self, platform: &Platform) {
            self.platforms += 1;
            log::debug!("Platform at {:?}", platform.position);
        }

        fn remove_oldest_platform(&mut self) {
            self.platforms = self.platforms.saturating_sub(1);
        }

        fn clear(&mut self) {
            self.platforms = 0;
        }

        fn update_player(&mut self, _player: &Player) {}

        fn update_camera(&mut self, _camera: &Camera) {}

        fn render(&mut self) {
            self.frames += 1;
        }
    }

    #[derive(Default)]
    pub struct LogObserver {
        pub score: u32,
    }

    impl RoundObserver for LogObserver {
        fn on_player_success(&mut self) {
            self.score += 100;
            log::info!("Landed! score {}", self.score);
        }

        fn on_player_fail(&mut self) {
            log::info!("Fell off with score {}", self.score);
        }
    }

    /// Would releasing on this tick land in the center zone?
    pub fn release_lands_center(state: &GameState) -> bool {
        let mut probe = state.clone();
        let landings = probe.landings;
        let release = TickInput {
            press: false,
            release: true,
        };
        if tick(&mut probe, &release).is_err() {
            return false;
        }
        while probe.status == JumpStatus::Airborne {
            if tick(&mut probe, &TickInput::default()).is_err() {
                return false;
            }
        }
        probe.landings > landings
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use headless::{CountingSink, LogObserver, release_lands_center};
    use tap_jump::config::{Difficulty, JumpConfig};
    use tap_jump::sim::JumpStatus;
    use tap_jump::SceneDriver;

    env_logger::init();
    log::info!("Tap Jump (native) starting...");
    log::info!("Native mode runs a headless autoplay - build for wasm32 to play in the browser");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let jumps = 20;

    let mut driver = SceneDriver::new(CountingSink::default(), LogObserver::default());
    driver.start_level(JumpConfig::from_difficulty(difficulty), seed)?;

    for _ in 0..jumps * 1000 {
        let Some(state) = driver.state() else {
            break;
        };
        if state.is_over() || state.landings >= jumps {
            break;
        }
        let press = state.status == JumpStatus::Idle;
        let release = state.status == JumpStatus::Charging
            && (state.player.scale.y <= state.config.player_min_scale
                || release_lands_center(state));

        if press {
            driver.press();
        }
        if release {
            driver.release();
        }
        driver.step()?;
    }

    let state = driver.state().ok_or("level never started")?;
    println!(
        "seed {} ({}): {} landings, score {}, {} ticks, {} frames, {} platforms on screen",
        seed,
        difficulty.as_str(),
        state.landings,
        driver.observer.score,
        state.time_ticks,
        driver.sink.frames,
        driver.sink.platforms,
    );
    Ok(())
}
