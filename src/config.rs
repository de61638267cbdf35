/*
 * Configuration Module
 *
 * Application settings loaded from an optional TOML file. Every field has a
 * default, so a partial file only overrides what it names, and a missing
 * file means "use the defaults".
 */

use std::fs;
use std::path::Path;

use nannou::color::{rgb, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::params::FlockParams;

pub const CONFIG_FILE: &str = "dots_and_boxes.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid colour {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("grid size {0} is too small, a grid needs at least 2 dots per side")]
    InvalidGridSize(usize),
}

// Parse a "#RRGGBB" colour string
pub fn parse_hex_color(text: &str) -> Result<Rgb<u8>, ConfigError> {
    let invalid = || ConfigError::InvalidColor(text.to_string());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
    Ok(rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Dot counts offered on the setup screen
    pub grid_sizes: Vec<usize>,
    pub default_grid_size: usize,
    pub player_one_color: String,
    pub player_two_color: String,
    /// Delay between the final line and the game-over notification
    pub game_over_delay_ms: u64,
    /// Slack subtracted from the window before laying out the grid
    pub canvas_margin: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid_sizes: vec![3, 5, 7, 9],
            default_grid_size: 5,
            player_one_color: "#FF0000".to_string(),
            player_two_color: "#0000FF".to_string(),
            game_over_delay_ms: 500,
            canvas_margin: 40.0,
        }
    }
}

impl BoardConfig {
    pub fn player_colors(&self) -> Result<(Rgb<u8>, Rgb<u8>), ConfigError> {
        Ok((parse_hex_color(&self.player_one_color)?, parse_hex_color(&self.player_two_color)?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Window in which a repeated tap is treated as a duplicate event
    pub tap_debounce_ms: u64,
    /// Window after a touch in which pointer events are ignored
    pub touch_pointer_suppress_ms: u64,
    /// Tap capture radius as a fraction of the cell size
    pub capture_radius_factor: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tap_debounce_ms: 50,
            touch_pointer_suppress_ms: 500,
            capture_radius_factor: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub line_pulse_ms: u64,
    pub square_ease_ms: u64,
    pub celebration_ms: u64,
    pub touch_ripple_ms: u64,
    pub burst_particles: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            line_pulse_ms: 1000,
            square_ease_ms: 600,
            celebration_ms: 1000,
            touch_ripple_ms: 300,
            burst_particles: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Rate of the fixed physics step
    pub physics_fps: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { physics_fps: 60.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub input: InputConfig,
    pub effects: EffectsConfig,
    pub flock: FlockParams,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads settings from `path`, or returns defaults if the file doesn't exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("Configuration ready ({})", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.board.player_colors()?;
        for color in &self.flock.palette {
            parse_hex_color(color)?;
        }
        let sizes = self.board.grid_sizes.iter().chain(std::iter::once(&self.board.default_grid_size));
        for &size in sizes {
            if size < 2 {
                return Err(ConfigError::InvalidGridSize(size));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color = parse_hex_color("#FF8C00").unwrap();
        assert_eq!((color.red, color.green, color.blue), (255, 140, 0));
        assert!(matches!(parse_hex_color("FF8C00"), Err(ConfigError::InvalidColor(_))));
        assert!(matches!(parse_hex_color("#FF8C0"), Err(ConfigError::InvalidColor(_))));
        assert!(matches!(parse_hex_color("#GG0000"), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.flock.num_particles, 150);
        assert_eq!(config.board.default_grid_size, 5);
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let config = AppConfig::from_toml(
            r##"
            [board]
            player_one_color = "#00FF00"

            [flock]
            num_particles = 40
            "##,
        )
        .unwrap();

        assert_eq!(config.board.player_one_color, "#00FF00");
        assert_eq!(config.board.player_two_color, "#0000FF");
        assert_eq!(config.flock.num_particles, 40);
        assert_eq!(config.flock.max_speed, 2.0);
        assert_eq!(config.input.tap_debounce_ms, 50);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_color = AppConfig::from_toml("[board]\nplayer_two_color = \"blue\"\n");
        assert!(matches!(bad_color, Err(ConfigError::InvalidColor(_))));

        let bad_grid = AppConfig::from_toml("[board]\ngrid_sizes = [1, 5]\n");
        assert!(matches!(bad_grid, Err(ConfigError::InvalidGridSize(1))));

        let bad_toml = AppConfig::from_toml("[board\n");
        assert!(matches!(bad_toml, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("definitely/not/here.toml").unwrap();
        assert_eq!(config.simulation.physics_fps, 60.0);
    }
}
