//! Physics configuration
//!
//! Defaults come from `consts`. A JSON document may override any subset of
//! fields; missing fields keep their default.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    /// JSON could not be parsed or produced
    Parse(serde_json::Error),
    /// A value is outside its allowed domain
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Tunable physics values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // === Interaction forces ===
    /// Shake impulse magnitude `k`
    pub shake_impulse: f32,
    /// Tilt response, scaled by `TILT_FORCE_SCALE`
    pub tilt_multiplier: f32,
    /// Drag influence radius
    pub drag_radius: f32,
    /// Drag velocity -> impulse
    pub drag_force_multiplier: f32,
    /// Upward flick impulse per unit of flick speed
    pub flick_impulse_up: f32,
    /// Bound on each axis of the flick tumble
    pub flick_angular_velocity: f32,

    // === Scene ===
    pub coin_count: usize,
    pub spawn_area_width: f32,
    pub spawn_area_height: f32,
    pub spawn_depth_variance: f32,

    // === Special coin ===
    pub special_coin_zoom_distance: f32,
    /// Seconds the found coin stays zoomed before the quote shows
    pub special_coin_animation_duration: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            shake_impulse: SHAKE_IMPULSE,
            tilt_multiplier: TILT_MULTIPLIER,
            drag_radius: DRAG_RADIUS,
            drag_force_multiplier: DRAG_FORCE_MULTIPLIER,
            flick_impulse_up: FLICK_IMPULSE_UP,
            flick_angular_velocity: FLICK_ANGULAR_VELOCITY,

            coin_count: COIN_COUNT,
            spawn_area_width: SPAWN_AREA_WIDTH,
            spawn_area_height: SPAWN_AREA_HEIGHT,
            spawn_depth_variance: SPAWN_DEPTH_VARIANCE,

            special_coin_zoom_distance: SPECIAL_COIN_ZOOM_DISTANCE,
            special_coin_animation_duration: SPECIAL_COIN_ANIMATION_DURATION,
        }
    }
}

impl PhysicsConfig {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the force model cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("drag_radius", self.drag_radius),
            ("spawn_area_width", self.spawn_area_width),
            ("spawn_area_height", self.spawn_area_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and > 0",
                });
            }
        }

        let non_negative = [
            ("shake_impulse", self.shake_impulse),
            ("tilt_multiplier", self.tilt_multiplier),
            ("drag_force_multiplier", self.drag_force_multiplier),
            ("flick_impulse_up", self.flick_impulse_up),
            ("flick_angular_velocity", self.flick_angular_velocity),
            ("spawn_depth_variance", self.spawn_depth_variance),
            ("special_coin_zoom_distance", self.special_coin_zoom_distance),
            (
                "special_coin_animation_duration",
                self.special_coin_animation_duration,
            ),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and >= 0",
                });
            }
        }

        Ok(())
    }

    /// Tilt multiplier `m` as used by the force model
    pub fn tilt_force_multiplier(&self) -> f32 {
        self.tilt_multiplier * TILT_FORCE_SCALE
    }

    /// Flicks reach further than drags
    pub fn flick_radius(&self) -> f32 {
        self.drag_radius * FLICK_RADIUS_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.tilt_force_multiplier() - 0.05).abs() < 1e-6);
        assert!((config.flick_radius() - 0.27).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = PhysicsConfig::from_json(r#"{ "drag_radius": 0.3, "coin_count": 10 }"#)
            .expect("valid config");
        assert_eq!(config.drag_radius, 0.3);
        assert_eq!(config.coin_count, 10);
        assert_eq!(config.shake_impulse, SHAKE_IMPULSE);
    }

    #[test]
    fn test_json_survives_reload() {
        let mut config = PhysicsConfig::default();
        config.flick_angular_velocity = 4.0;
        let json = config.to_json().expect("serializes");
        assert_eq!(PhysicsConfig::from_json(&json).expect("parses"), config);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let err = PhysicsConfig::from_json(r#"{ "drag_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "drag_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_magnitude_rejected() {
        let err = PhysicsConfig::from_json(r#"{ "shake_impulse": -1.0 }"#).unwrap_err();
        assert!(err.to_string().contains("shake_impulse"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = PhysicsConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
