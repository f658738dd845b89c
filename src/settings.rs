//! Game settings
//!
//! A plain value passed by reference into the level generator, the collision
//! resolver and the paddle/ball constructors. Persisted as JSON; any key
//! missing from the file falls back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Brick cell size (width, height)
    pub brick_size: (f32, f32),

    // === Paddle ===
    /// Paddle size (width, height)
    pub paddle_size: (f32, f32),
    pub paddle_speed: f32,
    /// Distance from the bottom of the screen to the paddle's top edge
    pub paddle_bottom_offset: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed: f32,
    /// Launch spread from vertical when the paddle is at a screen edge (degrees)
    pub max_launch_angle: f32,
    /// Paddle reflection angle at the paddle edge (degrees)
    pub max_reflection_angle: f32,
    /// Minimum vertical speed magnitude after any bounce
    pub min_y_velocity: f32,
    /// Random bounce perturbation (± degrees)
    pub bounce_jitter: f32,
    /// Multiplicative spin decay per frame
    pub spin_friction: f32,

    // === Bricks ===
    /// Per-row probability of a placed brick becoming a moving brick
    pub moving_brick_chance: f64,
    /// Horizontal moving-brick speed (pixels per frame)
    pub moving_brick_speed: i32,

    // === Scoring ===
    pub brick_reward: u32,
    /// Points taken away when a ball leaves the bottom of the screen
    pub ball_lost_penalty: u32,
    pub starting_lives: u32,

    // === Progression ===
    pub difficulty: f32,
    pub difficulty_step: f32,
    /// Level banner overlay duration in frames
    pub banner_frames: u32,

    // === Loop ===
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            brick_size: (BRICK_WIDTH, BRICK_HEIGHT),

            paddle_size: (PADDLE_WIDTH, PADDLE_HEIGHT),
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            max_launch_angle: MAX_LAUNCH_ANGLE,
            max_reflection_angle: MAX_REFLECTION_ANGLE,
            min_y_velocity: MIN_Y_VELOCITY,
            bounce_jitter: BOUNCE_JITTER,
            spin_friction: SPIN_FRICTION,

            moving_brick_chance: MOVING_BRICK_CHANCE,
            moving_brick_speed: MOVING_BRICK_SPEED,

            brick_reward: BRICK_REWARD,
            ball_lost_penalty: 0,
            starting_lives: STARTING_LIVES,

            difficulty: MIN_DIFFICULTY,
            difficulty_step: DIFFICULTY_STEP,
            banner_frames: BANNER_DURATION_FRAMES,

            fps: FPS,
        }
    }
}

impl Settings {
    /// Number of brick columns that fit across the screen
    pub fn max_bricks_x(&self) -> usize {
        (self.screen_width / self.brick_size.0).floor() as usize
    }

    /// Number of brick rows that fit in the top half of the screen
    pub fn max_bricks_y(&self) -> usize {
        ((self.screen_height / 2.0).floor() / self.brick_size.1).floor() as usize
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), SimError> {
        fn positive(name: &'static str, value: f32) -> Result<(), SimError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SimError::InvalidSetting {
                    name,
                    value,
                    safe_range: "> 0",
                })
            }
        }

        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        positive("brick_width", self.brick_size.0)?;
        positive("brick_height", self.brick_size.1)?;
        positive("paddle_width", self.paddle_size.0)?;
        positive("paddle_height", self.paddle_size.1)?;
        positive("paddle_speed", self.paddle_speed)?;
        positive("ball_radius", self.ball_radius)?;
        positive("ball_speed", self.ball_speed)?;

        if self.paddle_size.0 > self.screen_width {
            return Err(SimError::InvalidSetting {
                name: "paddle_width",
                value: self.paddle_size.0,
                safe_range: "<= screen_width",
            });
        }
        if self.min_y_velocity < 0.0 || self.min_y_velocity >= self.ball_speed {
            return Err(SimError::InvalidSetting {
                name: "min_y_velocity",
                value: self.min_y_velocity,
                safe_range: "0 <= v < ball_speed",
            });
        }
        if !(0.0..=90.0).contains(&self.max_reflection_angle) {
            return Err(SimError::InvalidSetting {
                name: "max_reflection_angle",
                value: self.max_reflection_angle,
                safe_range: "0..=90 degrees",
            });
        }
        if !(0.0..90.0).contains(&self.max_launch_angle) {
            return Err(SimError::InvalidSetting {
                name: "max_launch_angle",
                value: self.max_launch_angle,
                safe_range: "0..90 degrees",
            });
        }
        if !(0.0..=1.0).contains(&self.spin_friction) {
            return Err(SimError::InvalidSetting {
                name: "spin_friction",
                value: self.spin_friction,
                safe_range: "0..=1",
            });
        }
        if !(0.0..=1.0).contains(&self.moving_brick_chance) {
            return Err(SimError::InvalidSetting {
                name: "moving_brick_chance",
                value: self.moving_brick_chance as f32,
                safe_range: "0..=1",
            });
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(SimError::InvalidSetting {
                name: "difficulty",
                value: self.difficulty,
                safe_range: "1..=10",
            });
        }
        if self.max_bricks_x() == 0 || self.max_bricks_y() == 0 {
            return Err(SimError::InvalidSetting {
                name: "brick_size",
                value: self.brick_size.0.max(self.brick_size.1),
                safe_range: "at least one brick must fit in the top half of the screen",
            });
        }

        Ok(())
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {}", err);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| SimError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_dimensions() {
        let settings = Settings::default();
        assert_eq!(settings.max_bricks_x(), 8);
        assert_eq!(settings.max_bricks_y(), 15);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "ball_speed": 7.5, "difficulty": 3.0 }"#).unwrap();
        assert_eq!(settings.ball_speed, 7.5);
        assert_eq!(settings.difficulty, 3.0);
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
    }

    #[test]
    fn test_rejects_min_y_velocity_above_speed() {
        let settings = Settings {
            min_y_velocity: 6.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidSetting {
                name: "min_y_velocity",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_difficulty() {
        let err = Settings::from_json(r#"{ "difficulty": 11.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting { name: "difficulty", .. }));
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let settings = Settings {
            moving_brick_speed: 5,
            brick_size: (50.0, 25.0),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/brickfall/settings.json");
        assert_eq!(settings, Settings::default());
    }
}
