//! Game tuning and difficulty presets
//!
//! Built fresh for every round from the defaults and the level select.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse_hex_color;

/// Invalid tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` is not a #rrggbb color: {value:?}")]
    InvalidColor { field: &'static str, value: String },
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("player_min_scale must be in (0, 1), got {0}")]
    MinScaleOutOfRange(f32),
    #[error("visible_platforms must be at least 2, got {0}")]
    WindowTooSmall(usize),
}

/// Difficulty levels offered by the start screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Difficult => "Difficult",
        }
    }

    /// Accepts English names and the labels used by the level `<select>`
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "简单" => Some(Difficulty::Easy),
            "medium" | "med" | "中等" => Some(Difficulty::Medium),
            "difficult" | "hard" | "困难" => Some(Difficulty::Difficult),
            _ => None,
        }
    }

    /// Platform footprint (width, depth) for this level
    pub fn cube_size(&self) -> (f32, f32) {
        match self {
            Difficulty::Easy => (4.0, 4.0),
            Difficulty::Medium => (2.0, 4.0),
            Difficulty::Difficult => (2.0, 2.0),
        }
    }

    pub fn apply(&self, config: &mut JumpConfig) {
        let (width, depth) = self.cube_size();
        config.cube_width = width;
        config.cube_depth = depth;
    }
}

/// Everything tunable about a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    // === Colors ===
    pub render_clear_color: String,
    pub cube_color: String,
    pub player_color: String,

    // === Platforms ===
    pub cube_width: f32,
    pub cube_height: f32,
    pub cube_depth: f32,
    /// Upper bound (exclusive) of the random gap between platforms
    pub max_distance: f32,
    /// Platforms kept in the scene; the oldest is evicted beyond this
    pub visible_platforms: usize,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_depth: f32,
    /// Scale floor reached while charging
    pub player_min_scale: f32,
    /// Lateral speed gained per charging tick
    pub player_speed_d: f32,
    /// Vertical speed gained per charging tick
    pub player_speed_y: f32,

    // === Animation ===
    pub charge_scale_step: f32,
    pub recovery_scale_step: f32,
    /// Vertical speed lost per airborne tick
    pub gravity_step: f32,
    /// Radians per tick of the edge topple
    pub topple_step: f32,

    pub difficulty: Difficulty,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            render_clear_color: "#fbde9f".to_string(),
            cube_color: "#ca746e".to_string(),
            player_color: "#ff0000".to_string(),

            cube_width: 4.0,
            cube_height: 2.0,
            cube_depth: 4.0,
            max_distance: 5.0,
            visible_platforms: 6,

            player_width: 1.0,
            player_height: 2.0,
            player_depth: 1.0,
            player_min_scale: 0.1,
            player_speed_d: 0.0015,
            player_speed_y: 0.004,

            charge_scale_step: 0.01,
            recovery_scale_step: 0.05,
            gravity_step: 0.01,
            topple_step: 0.1,

            difficulty: Difficulty::Easy,
        }
    }
}

impl JumpConfig {
    /// Config for a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.set_difficulty(difficulty);
        config
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        difficulty.apply(self);
    }

    /// Height of a platform's top face; the player stands here
    pub fn ground_level(&self) -> f32 {
        self.cube_height / 2.0
    }

    pub fn cube_rgba(&self) -> [f32; 4] {
        parse_hex_color(&self.cube_color).unwrap_or([0.79, 0.45, 0.43, 1.0])
    }

    pub fn player_rgba(&self) -> [f32; 4] {
        parse_hex_color(&self.player_color).unwrap_or([1.0, 0.0, 0.0, 1.0])
    }

    pub fn clear_rgba(&self) -> [f32; 4] {
        parse_hex_color(&self.render_clear_color).unwrap_or([0.98, 0.87, 0.62, 1.0])
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("render_clear_color", &self.render_clear_color),
            ("cube_color", &self.cube_color),
            ("player_color", &self.player_color),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(ConfigError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        for (field, value) in [
            ("cube_width", self.cube_width),
            ("cube_height", self.cube_height),
            ("cube_depth", self.cube_depth),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_depth", self.player_depth),
            ("player_speed_d", self.player_speed_d),
            ("player_speed_y", self.player_speed_y),
            ("charge_scale_step", self.charge_scale_step),
            ("recovery_scale_step", self.recovery_scale_step),
            ("gravity_step", self.gravity_step),
            ("topple_step", self.topple_step),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        // Zero gap is legal (adjacent platforms)
        if !(self.max_distance >= 0.0 && self.max_distance.is_finite()) {
            return Err(ConfigError::NonPositive {
                field: "max_distance",
                value: self.max_distance,
            });
        }

        if !(self.player_min_scale > 0.0 && self.player_min_scale < 1.0) {
            return Err(ConfigError::MinScaleOutOfRange(self.player_min_scale));
        }

        if self.visible_platforms < 2 {
            return Err(ConfigError::WindowTooSmall(self.visible_platforms));
        }

        Ok(())
    }

    /// Defaults plus the difficulty named by a level select value
    ///
    /// Unknown or missing values keep the default preset. Nothing carries
    /// over from earlier rounds.
    pub fn from_selection(value: Option<&str>) -> Self {
        match value.and_then(Difficulty::from_str) {
            Some(difficulty) => Self::from_difficulty(difficulty),
            None => Self::default(),
        }
    }
}
