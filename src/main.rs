//! Snowfall entry point
//!
//! Web: wires the canvas, input and image loading to the round and runs the
//! animation frame loop. Native: a headless seeded runner with a simple
//! autopilot, handy for balancing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, Result};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, MouseEvent};

    use snowfall::assets::{AssetResolver, ornament_sources};
    use snowfall::persistence::LocalStorageStore;
    use snowfall::platform;
    use snowfall::renderer::{CanvasSurface, render};
    use snowfall::{GameRound, Settings};

    /// Game instance holding all state
    struct Game {
        round: GameRound,
        surface: CanvasSurface,
        assets: AssetResolver<HtmlImageElement>,
    }

    impl Game {
        /// Match canvas and world to the current window size
        fn fit_to_window(&mut self) {
            match platform::viewport() {
                Ok(viewport) => {
                    let (w, h) = platform::canvas_size(&viewport);
                    self.surface.resize(w, h);
                    self.round.resize(viewport);
                }
                Err(e) => log::warn!("Resize skipped: {e:#}"),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Snowfall starting...");
        if let Err(e) = start() {
            log::error!("Snowfall failed to start: {e:#}");
        }
    }

    fn start() -> Result<()> {
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .context("no canvas#game")?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("#game is not a canvas"))?;

        let settings = Settings::load();
        let viewport = platform::viewport()?;
        let seed = platform::seed_from_time(platform::now_ms());
        let store = LocalStorageStore::new(settings.ceiling_key.clone());
        let sources = ornament_sources(settings.custom_image.as_deref(), platform::current_month());
        let assets = AssetResolver::new(sources, settings.fallback_color.clone());

        let round = GameRound::new(settings, Box::new(store), viewport, seed);
        let surface = CanvasSurface::new(canvas.clone())?;
        let game = Rc::new(RefCell::new(Game {
            round,
            surface,
            assets,
        }));
        game.borrow_mut().fit_to_window();

        let first_source = game.borrow().assets.current_source().map(String::from);
        if let Some(src) = first_source {
            load_image(game.clone(), src);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());
        request_animation_frame(game);

        log::info!("Snowfall running!");
        Ok(())
    }

    /// Load one candidate source, moving down the list on failure
    fn load_image(game: Rc<RefCell<Game>>, src: String) {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Cannot create image element: {e:?}");
                return;
            }
        };

        let onload = {
            let game = game.clone();
            let img = img.clone();
            Closure::once(move || {
                let mut g = game.borrow_mut();
                if !g.round.is_alive() {
                    return;
                }
                let (w, h) = (img.natural_width() as f64, img.natural_height() as f64);
                if let Some(aspect) = g.assets.loaded(img, w, h).and_then(|ready| ready.aspect()) {
                    g.round.correct_aspect(aspect);
                }
            })
        };

        let onerror = {
            let game = game.clone();
            Closure::once(move || {
                let next = {
                    let mut g = game.borrow_mut();
                    if !g.round.is_alive() {
                        return;
                    }
                    g.assets.failed().map(String::from)
                };
                if let Some(next) = next {
                    load_image(game, next);
                }
            })
        };

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        img.set_src(&src);
        onload.forget();
        onerror.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut g = game.borrow_mut();
            if !g.round.is_alive() {
                return;
            }
            let result = g.round.tap(event.offset_x() as f64, event.offset_y() as f64);
            log::debug!("Tap: {:?}", result);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if g.round.is_alive() {
                g.fit_to_window();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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
        let destination = {
            let mut g = game.borrow_mut();
            if !g.round.is_alive() {
                return;
            }
            let destination = g.round.frame(time);
            // Leave the last epilogue frame on screen while navigating
            if destination.is_none() {
                let Game {
                    round,
                    surface,
                    assets,
                } = &mut *g;
                render(surface, round, assets);
            }
            destination
        };

        match destination {
            Some(destination) => platform::navigate(&destination),
            None => request_animation_frame(game),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Result, ensure};
    use clap::Parser;

    use snowfall::assets::{AssetResolver, ornament_sources};
    use snowfall::consts::TICK_MS;
    use snowfall::epilogue::Reveal;
    use snowfall::persistence::{CeilingStore, MemoryStore};
    use snowfall::sim::{TapResult, Viewport};
    use snowfall::{GameRound, RoundPhase, Settings};

    /// Run a seeded round without a browser
    #[derive(Debug, Parser)]
    #[command(name = "snowfall", about = "Headless Snowfall round with an autopilot tapper")]
    pub struct Args {
        /// RNG seed
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Maximum animation frames to run (60 per second)
        #[arg(long, default_value_t = 60 * 60 * 10)]
        pub frames: u32,
        /// Autopilot taps the lowest ornament every N frames (0 = never)
        #[arg(long, default_value_t = 20)]
        pub tap_every: u32,
        /// Starting score ceiling
        #[arg(long)]
        pub ceiling: Option<f64>,
        /// Calendar month used to pick image sources (1-12)
        #[arg(long, default_value_t = 1)]
        pub month: u32,
        /// Time scale
        #[arg(long, default_value_t = 1.0)]
        pub speed: f64,
        /// Print the final round state as JSON
        #[arg(long)]
        pub json: bool,
    }

    pub fn run(args: Args) -> Result<()> {
        ensure!(args.frames > 0, "frames must be > 0");
        ensure!((1..=12).contains(&args.month), "month must be 1-12");
        ensure!(
            args.speed.is_finite() && args.speed > 0.0 && args.speed <= Settings::MAX_SPEED,
            "speed must be in (0, {}]",
            Settings::MAX_SPEED
        );

        let settings = Settings {
            speed: args.speed,
            ..Settings::default()
        };
        let sources = ornament_sources(settings.custom_image.as_deref(), args.month);
        let mut assets = AssetResolver::<()>::new(sources, settings.fallback_color.clone());
        log::info!("Image sources: {:?}", assets.current_source());
        let ready = assets.loaded((), 1.0, 1.0);

        let store = match args.ceiling {
            Some(ceiling) => MemoryStore::with_value(ceiling),
            None => MemoryStore::new(),
        };
        let viewport = Viewport::new(1280.0, 720.0, 1.0);
        let mut round = GameRound::new(settings, Box::new(store), viewport, args.seed);
        if let Some(aspect) = ready.and_then(|r| r.aspect()) {
            round.correct_aspect(aspect);
        }
        round.start(0.0);

        let (mut hits, mut misses) = (0u32, 0u32);
        let mut destination = None;
        for frame in 1..=args.frames {
            let now = frame as f64 * TICK_MS;
            if args.tap_every > 0 && frame % args.tap_every == 0 && round.phase() == RoundPhase::Playing {
                // Ornament centre in screen space
                let world = round.world();
                let target = world
                    .ornaments
                    .iter()
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|o| o.pos / world.viewport.pixel_ratio);
                let (x, y) = target.map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0));
                match round.tap(x, y) {
                    TapResult::Hit { .. } => hits += 1,
                    TapResult::Miss => misses += 1,
                    TapResult::Ignored => {}
                }
            }
            destination = round.frame(now);
            if destination.is_some() {
                break;
            }
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&round.summary())?);
            return Ok(());
        }

        let world = round.world();
        println!(
            "phase={:?} outcome={:?} score={:.2} streak={} hits={} misses={} elapsed={:.0}ms",
            round.phase(),
            world.outcome(),
            world.score,
            world.eat_streak,
            hits,
            misses,
            world.elapsed
        );
        if let Some(epilogue) = round.epilogue() {
            for reveal in epilogue.revealed() {
                if let Reveal::Text { text, .. } = reveal {
                    println!("  {text}");
                }
            }
        }
        if let Some(destination) = destination {
            println!("-> {destination}");
        }
        if let Some(ceiling) = round.store().load() {
            println!("persisted ceiling: {ceiling:.1}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Snowfall (native) starting...");
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
