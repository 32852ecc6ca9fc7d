//! Per-actor movement state and the read-only queries derived from it.
//!
//! [`MovementState`] is owned by exactly one controller and mutated once per
//! tick. `running`, `sliding` and `falling` are never stored: they are
//! computed from the current velocity, input and ground contact on demand.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Speed or input magnitude above which an actor counts as running.
pub const RUNNING_THRESHOLD: f32 = 0.25;

/// Mutable movement state of one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Current linear velocity
    pub velocity: Vec2,
    /// Last sampled horizontal intent, in `[-1, 1]`
    pub input_axis: f32,
    /// Ground contact sampled this tick
    pub grounded: bool,
    /// Set by a jump or stomp, cleared by the grounded clamp
    pub jumping: bool,
}

impl MovementState {
    /// Zero everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Moving or steering horizontally with some intent.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.velocity.x.abs() > RUNNING_THRESHOLD || self.input_axis.abs() > RUNNING_THRESHOLD
    }

    /// Steering against the current horizontal velocity (skid).
    #[must_use]
    pub fn is_sliding(&self) -> bool {
        (self.input_axis > 0.0 && self.velocity.x < 0.0) || (self.input_axis < 0.0 && self.velocity.x > 0.0)
    }

    /// Moving down while off the ground.
    ///
    /// This is the animation-facing predicate; gravity uses
    /// [`is_descending_or_released`](crate::vertical::is_descending_or_released).
    #[must_use]
    pub fn is_falling(&self) -> bool {
        self.velocity.y < 0.0 && !self.grounded
    }

    /// Snapshot of every boolean query.
    #[must_use]
    pub fn flags(&self) -> MotionFlags {
        let mut flags = MotionFlags::empty();
        flags.set(MotionFlags::GROUNDED, self.grounded);
        flags.set(MotionFlags::JUMPING, self.jumping);
        flags.set(MotionFlags::RUNNING, self.is_running());
        flags.set(MotionFlags::SLIDING, self.is_sliding());
        flags.set(MotionFlags::FALLING, self.is_falling());
        flags
    }
}

bitflags! {
    /// Read-only movement flags for animation and UI consumers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MotionFlags: u8 {
        /// Ground contact this tick
        const GROUNDED = 1 << 0;
        /// Airborne from a jump or stomp
        const JUMPING = 1 << 1;
        /// Moving or steering horizontally
        const RUNNING = 1 << 2;
        /// Steering against the horizontal velocity
        const SLIDING = 1 << 3;
        /// Moving down while off the ground
        const FALLING = 1 << 4;
    }
}

/// Visual facing of the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Canonical orientation (yaw 0°)
    #[default]
    Right,
    /// Mirrored orientation (yaw 180°)
    Left,
}

impl Facing {
    /// Yaw of the orientation in degrees.
    #[must_use]
    pub fn yaw_degrees(self) -> f32 {
        match self {
            Facing::Right => 0.0,
            Facing::Left => 180.0,
        }
    }

    /// Facing implied by a horizontal velocity; zero keeps `self`.
    #[must_use]
    pub fn toward(self, velocity_x: f32) -> Self {
        if velocity_x > 0.0 {
            Facing::Right
        } else if velocity_x < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}
