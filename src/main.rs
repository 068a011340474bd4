//! Plumber: a side-scrolling platformer
//!
//! A small plumber runs, jumps and stomps through a tile level. What the
//! player can do is a set of powers picked up and lost at runtime:
//! - Move and Jump from the start
//! - Large from a mushroom, Fire from a flower, Invincible from a star
//! - EnterPipe and HitBrick for pipes and blocks
//!
//! Powers hook into the player's update and collision events, and the
//! first power that handles an event wins.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod game;
mod level;
mod input;
mod powers;
mod player;
mod enemies;
mod power_ups;
mod fireball;
mod coin_spin;
mod brick;
mod flag;
mod hud;
mod countdown;
mod camera;
mod audio;
mod scene;
mod render;
mod preload;

use std::rc::Rc;
use macroquad::prelude::*;
use input::InputState;
use preload::Loaded;
use render::Renderer;
use scene::{FpsProvider, Scene};

/// Longest step the simulation takes; slower frames play in slow motion
/// instead of tunnelling through tiles
const MAX_STEP: f32 = 1.0 / 30.0;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Plumber v{}", VERSION),
        window_width: 1200,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        // Start windowed on all platforms (WASM: browser handles sizing)
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Plumber v{}", VERSION);

    let Loaded { config, level, mut audio } = match preload::preload().await {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("No playable level: {}", e);
            return;
        }
    };

    let mut renderer = Renderer::new(vec2(config.canvas_width, config.canvas_height));
    let mut input = InputState::new();
    if input.has_gamepad() {
        log::info!("Gamepad connected");
    }

    let fps: FpsProvider = Rc::new(|| get_fps() as i64);
    let mut scene = Scene::create(level, config, None, fps);
    let mut screen = vec2(screen_width(), screen_height());

    loop {
        let now = vec2(screen_width(), screen_height());
        if now != screen {
            screen = now;
            // the canvas is fixed; only its scale on the window changes
            let (w, h) = (scene.config.canvas_width, scene.config.canvas_height);
            scene.on_resize(w, h);
            log::debug!("Window resized to {}x{}", now.x, now.y);
        }

        let dt = get_frame_time().min(MAX_STEP);
        let controls = input.poll();
        scene.tick(dt, &controls);

        for sound in scene.drain_sounds() {
            audio.handle(sound);
        }
        renderer.draw(&scene, dt);

        next_frame().await;
    }
}
