//! Fixed-step position integration and play-field clamping.
//!
//! # Fixed Timestep
//!
//! Hosts usually advance physics at [`FIXED_DT`] (1/50 second). Integration
//! is plain explicit Euler: `position += velocity * dt`. Afterwards the
//! horizontal coordinate is clamped into the visible play field so the actor
//! never leaves the frame sideways; there is no vertical clamp.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default fixed physics timestep (1/50 second = 20ms).
pub const FIXED_DT: f32 = 1.0 / 50.0;

/// Default inset from each play-field edge.
pub const DEFAULT_EDGE_MARGIN: f32 = 0.5;

/// Visible horizontal extents of the play field, in world units.
///
/// # Example
///
/// ```
/// use stride_core::integrator::PlayField;
///
/// let field = PlayField::new(-10.0, 10.0);
/// assert_eq!(field.clamp_x(12.0), 9.5);
/// assert_eq!(field.clamp_x(-12.0), -9.5);
/// assert_eq!(field.clamp_x(3.0), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    /// World x of the left viewport edge
    pub left: f32,
    /// World x of the right viewport edge
    pub right: f32,
    /// Inset applied on each side
    pub margin: f32,
}

impl PlayField {
    /// Play field between two edges with the default margin.
    #[must_use]
    pub fn new(left: f32, right: f32) -> Self {
        Self::with_margin(left, right, DEFAULT_EDGE_MARGIN)
    }

    /// Play field with a custom margin. Edges may be given in any order.
    #[must_use]
    pub fn with_margin(left: f32, right: f32, margin: f32) -> Self {
        Self {
            left: left.min(right),
            right: left.max(right),
            margin,
        }
    }

    /// Play field centered on a camera at `center_x` showing `width` units.
    #[must_use]
    pub fn centered(center_x: f32, width: f32) -> Self {
        let half = width.abs() / 2.0;
        Self::new(center_x - half, center_x + half)
    }

    /// A field that never clamps.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            left: f32::NEG_INFINITY,
            right: f32::INFINITY,
            margin: 0.0,
        }
    }

    /// Clamp a horizontal coordinate into `[left + margin, right - margin]`.
    ///
    /// A field narrower than both margins pins `x` to its center.
    #[must_use]
    pub fn clamp_x(&self, x: f32) -> f32 {
        let min = self.left + self.margin;
        let max = self.right - self.margin;
        if min > max {
            (self.left + self.right) / 2.0
        } else {
            x.clamp(min, max)
        }
    }
}

impl Default for PlayField {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Advance `position` by `velocity * dt` and clamp it into `field`.
#[must_use]
pub fn integrate(position: Vec2, velocity: Vec2, dt: f32, field: &PlayField) -> Vec2 {
    let next = position + velocity * dt;
    Vec2::new(field.clamp_x(next.x), next.y)
}
