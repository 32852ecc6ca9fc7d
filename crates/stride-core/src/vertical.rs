//! Vertical motion: ground detection, the grounded clamp and jump, gravity.
//!
//! Per tick the order is fixed:
//!
//! 1. [`detect_ground`] samples ground contact (no hysteresis)
//! 2. [`apply_grounded`] runs only when grounded: clamp residual descent,
//!    then let a jump press override the clamp
//! 3. [`apply_gravity`] runs every tick: doubled gravity while descending or
//!    once the jump button is released, then the terminal-velocity floor

use glam::Vec2;
use crate::config::MovementConfig;
use crate::probe::{probe_or_miss, ProbeOracle, ProbeQuery};
use crate::state::MovementState;

/// Gravity multiplier applied while descending or after releasing jump.
pub const FALL_GRAVITY_MULTIPLIER: f32 = 2.0;

/// Sample ground contact with a downward probe from `position`.
pub fn detect_ground<P: ProbeOracle + ?Sized>(position: Vec2, config: &MovementConfig, env: &P) -> bool {
    probe_or_miss(env, &ProbeQuery::ground(position, config.probe()))
}

/// Grounded update: clamp descent to zero, then apply a jump press.
///
/// Returns true if a jump was started this tick.
#[must_use]
pub fn apply_grounded(state: &mut MovementState, jump_pressed: bool, jump_force: f32) -> bool {
    state.velocity.y = state.velocity.y.max(0.0);
    state.jumping = state.velocity.y > 0.0;

    if jump_pressed {
        state.velocity.y = jump_force;
        state.jumping = true;
    }
    jump_pressed
}

/// Gravity-multiplier predicate: moving down, or the jump button is up.
///
/// Not the same as [`MovementState::is_falling`], which also requires being
/// off the ground and ignores the button.
#[must_use]
pub fn is_descending_or_released(velocity_y: f32, jump_held: bool) -> bool {
    velocity_y < 0.0 || !jump_held
}

/// Vertical velocity after one tick of gravity.
#[must_use]
pub fn apply_gravity(velocity_y: f32, jump_held: bool, config: &MovementConfig, dt: f32) -> f32 {
    let multiplier = if is_descending_or_released(velocity_y, jump_held) {
        FALL_GRAVITY_MULTIPLIER
    } else {
        1.0
    };
    let velocity_y = velocity_y + config.gravity() * multiplier * dt;
    velocity_y.max(config.terminal_velocity())
}
