//! # Ledge
//!
//! Static 2D collision substrate for platformer movement.
//!
//! Ledge stores level geometry as axis-aligned solids and answers short-range
//! circle casts against them. It never moves anything: callers own their
//! bodies and only ask "would a circle travelling this way touch a solid?".
//!
//! - **Solids**: axis-aligned boxes ([`Aabb`]) held in a [`Terrain`]
//! - **Casts**: swept circles ([`CircleCast`]) returning the nearest [`CastHit`]
//! - **Layouts**: ASCII level descriptions parsed into a [`Terrain`]
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use ledge::{Aabb, CircleCast, Terrain};
//!
//! let mut terrain = Terrain::new();
//! terrain.add_solid(Aabb::from_min_max(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)));
//!
//! // A body standing just above the floor probes downward.
//! let cast = CircleCast::new(Vec2::new(0.0, 0.3), 0.25, Vec2::NEG_Y, 0.375);
//! assert!(terrain.circle_cast(&cast).is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cast;
pub mod layout;
pub mod terrain;

// Re-exports for convenience
pub use cast::{CastHit, CircleCast};
pub use layout::{Layout, LayoutError};
pub use terrain::{SolidId, Terrain};

use glam::Vec2;

/// Axis-aligned bounding box in world units (y up).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from two opposite corners, in any order.
    #[must_use]
    pub fn from_min_max(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box from its center and half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Get the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the box.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Grow the box by `amount` on every side.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check if a point is inside the box (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Point of the box nearest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Check if a circle overlaps the box.
    ///
    /// Touching at exactly `radius` does not count as overlap.
    #[must_use]
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) < radius * radius
    }
}
