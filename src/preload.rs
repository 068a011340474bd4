//! Startup loading
//!
//! Reads the config, the level and every sound before the first frame of
//! play. Sounds load one per frame so the window stays responsive; a
//! progress bar shows up only when loading drags on.

use macroquad::prelude::*;
use crate::audio::{self, Audio, AUDIO_DIR, MUSIC_DIR};
use crate::config::GameConfig;
use crate::game::Sfx;
use crate::level::{builtin_level, Level, LevelError};

/// Loading shorter than this never shows the bar
const BAR_DELAY: f64 = 0.2;
const BAR_WIDTH: f32 = 0.6;
const BAR_HEIGHT: f32 = 10.0;
/// Vertical position of the bar, as a fraction of the screen
const BAR_Y: f32 = 0.6;
const BAR_COLOR: Color = Color::new(0.97, 0.97, 0.97, 1.0);

pub struct Loaded {
    pub config: GameConfig,
    pub level: Level,
    pub audio: Audio,
}

/// Tracks finished steps and when loading began.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    started: f64,
    total: usize,
    done: usize,
}

impl Progress {
    pub fn new(started: f64, total: usize) -> Self {
        Self { started, total: total.max(1), done: 0 }
    }

    pub fn step(&mut self) {
        self.done = (self.done + 1).min(self.total);
    }

    pub fn fraction(&self) -> f32 {
        self.done as f32 / self.total as f32
    }

    pub fn visible(&self, now: f64) -> bool {
        now - self.started >= BAR_DELAY
    }

    /// Outline of the bar on a screen of `screen` pixels.
    pub fn bar_rect(screen: Vec2) -> Rect {
        let width = screen.x * BAR_WIDTH;
        Rect::new((screen.x - width) / 2.0, screen.y * BAR_Y, width, BAR_HEIGHT)
    }

    async fn advance(&mut self) {
        self.step();
        if self.visible(get_time()) {
            clear_background(BLACK);
            let bar = Self::bar_rect(vec2(screen_width(), screen_height()));
            draw_rectangle_lines(bar.x, bar.y, bar.w, bar.h, 1.0, BAR_COLOR);
            let fill = (bar.w - 4.0) * self.fraction();
            draw_rectangle(bar.x + 2.0, bar.y + 2.0, fill, bar.h - 4.0, BAR_COLOR);
        }
        next_frame().await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn load_config() -> GameConfig {
    crate::config::load_config_or_default(crate::config::CONFIG_PATH)
}

#[cfg(target_arch = "wasm32")]
async fn load_config() -> GameConfig {
    use crate::config::{parse_config, CONFIG_PATH};
    match load_string(CONFIG_PATH).await {
        Ok(text) => parse_config(&text).unwrap_or_else(|e| {
            log::warn!("Using default config ({}): {}", CONFIG_PATH, e);
            GameConfig::default()
        }),
        Err(e) => {
            log::warn!("Using default config ({}): {}", CONFIG_PATH, e);
            GameConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn read_level(path: &str) -> Result<Level, LevelError> {
    crate::level::load_level(path)
}

#[cfg(target_arch = "wasm32")]
async fn read_level(path: &str) -> Result<Level, LevelError> {
    let text = load_string(path)
        .await
        .map_err(|e| LevelError::Validation(format!("can't read {}: {}", path, e)))?;
    crate::level::parse_level(&text)
}

/// The configured level, or the bundled one when it can't be used.
async fn load_level(path: &str) -> Result<Level, LevelError> {
    match read_level(path).await {
        Ok(level) => Ok(level),
        Err(e) => {
            log::error!("Failed to load level {}: {}, using the built-in level", path, e);
            builtin_level()
        }
    }
}

pub async fn preload() -> Result<Loaded, LevelError> {
    let cues = audio::load_manifest(AUDIO_DIR).await;
    let music = audio::load_manifest(MUSIC_DIR).await;
    // config, level, cues, music
    let mut progress = Progress::new(get_time(), Sfx::ALL.len() + 3);

    let config = load_config().await;
    progress.advance().await;

    let level = load_level(&config.level).await?;
    progress.advance().await;

    let mut audio = Audio::new();
    for sfx in Sfx::ALL {
        audio.load_cue(sfx, &cues).await;
        progress.advance().await;
    }
    audio.load_music(&music).await;
    progress.advance().await;

    log::info!(
        "Loaded level '{}', {}/{} sound cues",
        level.name,
        audio.loaded_cues(),
        Sfx::ALL.len()
    );
    Ok(Loaded { config, level, audio })
}
