//! Playfield and tuning configuration.
//!
//! Defaults reproduce the classic 800x600 canvas game: radius 20 bubbles,
//! 15 columns with 5 filled rows, a shot speed of 10 px per step at 60 steps
//! per second.

use serde::{Deserialize, Serialize};

use super::{
    bubble::{ColorId, default_palette},
    hex::HexCoord,
};

/// Everything that shapes a session apart from the color source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub bubble_radius: f32,
    pub palette: Vec<ColorId>,
    /// Bubbles per filled row at the start.
    pub columns: i32,
    /// Rows filled at the start. Everything below starts empty.
    pub initial_rows: i32,
    /// Projectile displacement per simulation step, in pixels.
    pub launch_speed: f32,
    /// Distance from the bottom edge to the shooter.
    pub shooter_offset: f32,
    /// Distance from the shooter to where projectiles spawn.
    pub muzzle_offset: f32,
    /// A bubble deeper than `height - danger_margin` ends the game.
    pub danger_margin: f32,
    /// Left and right shooter positions as fractions of `width`.
    pub lateral_fractions: (f32, f32),
    /// Length of one simulation step in milliseconds.
    pub step_ms: f32,
    /// Cap on simulation steps run by one `tick`.
    pub max_steps_per_tick: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            bubble_radius: 20.0,
            palette: default_palette(),
            columns: 15,
            initial_rows: 5,
            launch_speed: 10.0,
            shooter_offset: 50.0,
            muzzle_offset: 40.0,
            danger_margin: 100.0,
            lateral_fractions: (0.25, 0.75),
            step_ms: 1000.0 / 60.0,
            max_steps_per_tick: 8,
        }
    }
}

/// Rejected configuration. These are setup mistakes, not runtime faults.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A dimension that must be a positive finite number is not.
    NonPositive { field: &'static str, value: f32 },
    EmptyPalette,
    /// Structural fields that cannot describe a playable grid.
    Inconsistent(&'static str),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "`{field}` must be positive and finite, got {value}")
            }
            ConfigError::EmptyPalette => write!(f, "palette must contain at least one color"),
            ConfigError::Inconsistent(reason) => write!(f, "inconsistent configuration: {reason}"),
            ConfigError::Parse(reason) => write!(f, "could not parse configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("bubble_radius", self.bubble_radius),
            ("launch_speed", self.launch_speed),
            ("step_ms", self.step_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.columns <= 0 {
            return Err(ConfigError::Inconsistent("columns must be at least 1"));
        }
        if self.initial_rows < 0 {
            return Err(ConfigError::Inconsistent("initial_rows cannot be negative"));
        }
        // Odd rows are shifted right by a radius and hold one cell fewer.
        let narrowest_row = self.initial_rows.min(2) - 1;
        if narrowest_row >= 0
            && self.columns - 1 > HexCoord::max_col(narrowest_row, self.bubble_radius, self.width)
        {
            return Err(ConfigError::Inconsistent(
                "columns do not fit the width of every filled row",
            ));
        }
        if self.max_steps_per_tick == 0 {
            return Err(ConfigError::Inconsistent("max_steps_per_tick must be at least 1"));
        }
        Ok(())
    }

    /// Vertical position of the shooter.
    pub fn shooter_y(&self) -> f32 {
        self.height - self.shooter_offset
    }

    /// Bubbles below this `y` end the game.
    pub fn danger_line(&self) -> f32 {
        self.height - self.danger_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let config = GameConfig {
            width: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "width",
                value: 0.0
            })
        );

        let config = GameConfig {
            bubble_radius: -3.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "bubble_radius",
                ..
            })
        ));

        let config = GameConfig {
            height: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_palette() {
        let config = GameConfig {
            palette: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn test_rejects_negative_rows() {
        let config = GameConfig {
            initial_rows: -1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_columns_wider_than_playfield() {
        // At width 600 odd rows end at column 13, so 15 columns overhang.
        let config = GameConfig {
            width: 600.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Inconsistent(_))));

        let config = GameConfig {
            width: 600.0,
            columns: 14,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));

        // A single filled row only has to fit the even row.
        let config = GameConfig {
            width: 600.0,
            initial_rows: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "width": 640.0, "palette": [0, 1, 2] }"#).unwrap();
        assert_eq!(config.width, 640.0);
        assert_eq!(config.palette, [ColorId(0), ColorId(1), ColorId(2)]);
        assert_eq!(config.height, 600.0);
    }

    #[test]
    fn test_from_json_validates() {
        assert_eq!(
            GameConfig::from_json(r#"{ "palette": [] }"#),
            Err(ConfigError::EmptyPalette)
        );
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_derived_positions() {
        let config = GameConfig::default();
        assert_eq!(config.shooter_y(), 550.0);
        assert_eq!(config.danger_line(), 500.0);
    }
}
