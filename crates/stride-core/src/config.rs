//! Movement tuning for a controlled actor.
//!
//! A [`MovementConfig`] is built once per actor and never changes afterwards.
//! Three tunables describe the feel of the character:
//!
//! - `move_speed`: top horizontal speed, also the horizontal acceleration cap
//! - `max_jump_height`: apex height of a fully held jump
//! - `max_jump_time`: time for a full jump to go up and come back down
//!
//! Jump force and gravity are derived from the jump shape and cached on
//! construction:
//!
//! ```text
//! jump_force = 2 * max_jump_height / (max_jump_time / 2)
//! gravity    = -2 * max_jump_height / (max_jump_time / 2)^2
//! ```
//!
//! Every constructor validates its input, including deserialization, so a
//! `MovementConfig` value can never carry a non-finite derived constant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::probe::ProbeShape;

/// Default top horizontal speed (units/second).
pub const DEFAULT_MOVE_SPEED: f32 = 8.0;

/// Default apex height of a full jump (units).
pub const DEFAULT_MAX_JUMP_HEIGHT: f32 = 5.0;

/// Default duration of a full jump (seconds).
pub const DEFAULT_MAX_JUMP_TIME: f32 = 1.0;

/// Errors raised while building a [`MovementConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `max_jump_time` is zero or negative; the derived constants would divide by zero.
    #[error("max_jump_time must be positive, got {0}")]
    NonPositiveJumpTime(f32),

    /// A tunable is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending tunable
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// The tunables are finite but a derived constant is not.
    #[error("{field} derived from the jump shape is not finite ({value}); adjust max_jump_height or max_jump_time")]
    DerivedOverflow {
        /// `jump_force` or `gravity`
        field: &'static str,
        /// Computed value
        value: f32,
    },

    /// A tunable that must be zero or more is negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Name of the offending tunable
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// Probe radius or distance is not a positive finite number.
    #[error("probe {field} must be positive and finite, got {value}")]
    InvalidProbe {
        /// `radius` or `distance`
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// The config document could not be parsed.
    #[error("failed to parse movement config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable movement tuning with cached derived constants.
///
/// # Example
///
/// ```
/// use stride_core::config::MovementConfig;
///
/// let config = MovementConfig::new(8.0, 5.0, 1.0).unwrap();
/// assert_eq!(config.jump_force(), 20.0);
/// assert_eq!(config.gravity(), -40.0);
/// assert_eq!(config.terminal_velocity(), -20.0);
///
/// assert!(MovementConfig::new(8.0, 5.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMovementConfig", into = "RawMovementConfig")]
pub struct MovementConfig {
    move_speed: f32,
    max_jump_height: f32,
    max_jump_time: f32,
    probe: ProbeShape,
    jump_force: f32,
    gravity: f32,
}

impl MovementConfig {
    /// Build a config with the default probe shape.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any tunable is non-finite, `move_speed` or
    /// `max_jump_height` is negative, `max_jump_time` is not positive, or the
    /// derived jump force or gravity overflows.
    pub fn new(move_speed: f32, max_jump_height: f32, max_jump_time: f32) -> Result<Self, ConfigError> {
        Self::with_probe(move_speed, max_jump_height, max_jump_time, ProbeShape::default())
    }

    /// Build a config with a custom probe shape.
    ///
    /// # Errors
    ///
    /// Same as [`MovementConfig::new`], plus [`ConfigError::InvalidProbe`] for a
    /// probe radius or distance that is not positive and finite.
    pub fn with_probe(
        move_speed: f32,
        max_jump_height: f32,
        max_jump_time: f32,
        probe: ProbeShape,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("move_speed", move_speed),
            ("max_jump_height", max_jump_height),
            ("max_jump_time", max_jump_time),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if max_jump_time <= 0.0 {
            return Err(ConfigError::NonPositiveJumpTime(max_jump_time));
        }
        for (field, value) in [("move_speed", move_speed), ("max_jump_height", max_jump_height)] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        for (field, value) in [("radius", probe.radius), ("distance", probe.distance)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidProbe { field, value });
            }
        }

        let half_time = max_jump_time / 2.0;
        let jump_force = 2.0 * max_jump_height / half_time;
        let gravity = -2.0 * max_jump_height / (half_time * half_time);
        // Finite tunables can still overflow here, e.g. a jump time near zero.
        for (field, value) in [("jump_force", jump_force), ("gravity", gravity)] {
            if !value.is_finite() {
                return Err(ConfigError::DerivedOverflow { field, value });
            }
        }

        Ok(Self {
            move_speed,
            max_jump_height,
            max_jump_time,
            probe,
            jump_force,
            gravity,
        })
    }

    /// Parse and validate a config from JSON.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON or invalid tunables.
    ///
    /// # Example
    ///
    /// ```
    /// use stride_core::config::MovementConfig;
    ///
    /// let config = MovementConfig::from_json(r#"{ "move_speed": 6.0 }"#).unwrap();
    /// assert_eq!(config.move_speed(), 6.0);
    /// assert_eq!(config.max_jump_height(), 5.0);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Top horizontal speed, also the horizontal acceleration cap.
    #[must_use]
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Apex height of a fully held jump.
    #[must_use]
    pub fn max_jump_height(&self) -> f32 {
        self.max_jump_height
    }

    /// Duration of a full jump.
    #[must_use]
    pub fn max_jump_time(&self) -> f32 {
        self.max_jump_time
    }

    /// Shape of the ground and wall probes.
    #[must_use]
    pub fn probe(&self) -> ProbeShape {
        self.probe
    }

    /// Upward velocity applied on jump press.
    #[must_use]
    pub fn jump_force(&self) -> f32 {
        self.jump_force
    }

    /// Gravity acceleration (negative, units/second²).
    #[must_use]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Floor on vertical velocity: `gravity / 2`.
    #[must_use]
    pub fn terminal_velocity(&self) -> f32 {
        self.gravity / 2.0
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        let half_time = DEFAULT_MAX_JUMP_TIME / 2.0;
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            max_jump_height: DEFAULT_MAX_JUMP_HEIGHT,
            max_jump_time: DEFAULT_MAX_JUMP_TIME,
            probe: ProbeShape::default(),
            jump_force: 2.0 * DEFAULT_MAX_JUMP_HEIGHT / half_time,
            gravity: -2.0 * DEFAULT_MAX_JUMP_HEIGHT / (half_time * half_time),
        }
    }
}

/// Serialized form: tunables only, derived constants are recomputed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct RawMovementConfig {
    move_speed: f32,
    max_jump_height: f32,
    max_jump_time: f32,
    probe: ProbeShape,
}

impl Default for RawMovementConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            max_jump_height: DEFAULT_MAX_JUMP_HEIGHT,
            max_jump_time: DEFAULT_MAX_JUMP_TIME,
            probe: ProbeShape::default(),
        }
    }
}

impl TryFrom<RawMovementConfig> for MovementConfig {
    type Error = ConfigError;

    fn try_from(raw: RawMovementConfig) -> Result<Self, Self::Error> {
        Self::with_probe(raw.move_speed, raw.max_jump_height, raw.max_jump_time, raw.probe)
    }
}

impl From<MovementConfig> for RawMovementConfig {
    fn from(config: MovementConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            max_jump_height: config.max_jump_height,
            max_jump_time: config.max_jump_time,
            probe: config.probe,
        }
    }
}
