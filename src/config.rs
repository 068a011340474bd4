//! Game configuration
//!
//! Tunables read from `assets/config.ron`. Any field left out of the file
//! keeps its default, so an empty `()` is a valid config.

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;

pub const CONFIG_PATH: &str = "assets/config.ron";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Post-processing and particle toggles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Sparkle trail behind an invincible player
    pub trails: bool,
    pub vignette: bool,
    pub outline: bool,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self { trails: true, vignette: true, outline: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Pixels per second squared, downward
    pub gravity: f32,
    /// Seconds on the level clock
    pub play_time: u32,
    pub lives: i64,
    /// Lives never run out; the HUD shows INF
    pub infinite_lives: bool,
    /// Player spawn point (sprite center)
    pub init_x: f32,
    pub init_y: f32,
    pub level: String,
    pub help_text: String,
    pub fx: FxConfig,
    pub zoom: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 400.0,
            canvas_height: 240.0,
            gravity: 650.0,
            play_time: 300,
            lives: 3,
            infinite_lives: false,
            init_x: 48.0,
            init_y: 192.0,
            level: "assets/levels/world-1-1.ron".to_string(),
            help_text: "Arrows / WASD: move\nUp / W: jump\nSpace: fireball\nDown / S: enter pipes"
                .to_string(),
            fx: FxConfig::default(),
            zoom: 1.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.lives < 1 {
            return Err(ConfigError::Validation(format!(
                "lives must be at least 1, got {}",
                self.lives
            )));
        }
        if self.play_time < 1 {
            return Err(ConfigError::Validation("play_time must be at least 1 second".into()));
        }
        if self.zoom <= 0.0 {
            return Err(ConfigError::Validation("zoom must be positive".into()));
        }
        Ok(())
    }
}

pub fn parse_config(text: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_config(&text)
}

/// Config from `path`, or the defaults (with a warning) when it can't be used.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> GameConfig {
    match load_config(path.as_ref()) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.as_ref().display());
            config
        }
        Err(e) => {
            log::warn!("Using default config ({}): {}", path.as_ref().display(), e);
            GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("()").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.lives, 3);
        assert_eq!(config.play_time, 300);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = parse_config("(lives: 5, fx: (vignette: false))").unwrap();
        assert_eq!(config.lives, 5);
        assert!(!config.fx.vignette);
        assert!(config.fx.outline);
        assert_eq!(config.gravity, 650.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(parse_config("(lives: 0)"), Err(ConfigError::Validation(_))));
        assert!(matches!(parse_config("(canvas_width: -1.0)"), Err(ConfigError::Validation(_))));
        assert!(matches!(parse_config("(lives: \"many\")"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file_and_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"(play_time: 120)").unwrap();
        assert_eq!(load_config(file.path()).unwrap().play_time, 120);

        let fallback = load_config_or_default("/nonexistent/config.ron");
        assert_eq!(fallback, GameConfig::default());
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = parse_config(include_str!("../assets/config.ron")).unwrap();
        assert_eq!(config.canvas_width, 400.0);
    }
}
