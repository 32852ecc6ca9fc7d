//! Terrain: the set of static solids a level is made of.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cast::{sweep_circle_aabb, CastHit, CircleCast};
use crate::Aabb;

/// Index of a solid inside its [`Terrain`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SolidId(u32);

impl SolidId {
    /// Creates a `SolidId` from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SolidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SolidId({})", self.0)
    }
}

/// Collection of static axis-aligned solids.
///
/// Solids are stored in insertion order, which is also the tie-break order
/// when two solids are touched at the same cast distance.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use ledge::{Aabb, CircleCast, Terrain};
///
/// let mut terrain = Terrain::new();
/// let wall = terrain.add_solid(Aabb::from_min_max(Vec2::new(2.0, 0.0), Vec2::new(3.0, 4.0)));
///
/// let cast = CircleCast::new(Vec2::new(1.5, 1.0), 0.25, Vec2::X, 0.375);
/// assert_eq!(terrain.circle_cast(&cast).map(|hit| hit.solid), Some(wall));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    solids: Vec<Aabb>,
}

impl Terrain {
    /// Create an empty terrain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a terrain from existing solids.
    #[must_use]
    pub fn with_solids(solids: Vec<Aabb>) -> Self {
        Self { solids }
    }

    /// Add a solid and return its id.
    pub fn add_solid(&mut self, solid: Aabb) -> SolidId {
        // Level geometry stays far below u32::MAX solids.
        #[allow(clippy::cast_possible_truncation)]
        let id = SolidId::new(self.solids.len() as u32);
        self.solids.push(solid);
        id
    }

    /// Get a solid by id.
    #[must_use]
    pub fn get(&self, id: SolidId) -> Option<&Aabb> {
        self.solids.get(id.as_u32() as usize)
    }

    /// All solids in insertion order.
    #[must_use]
    pub fn solids(&self) -> &[Aabb] {
        &self.solids
    }

    /// Number of solids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns true if the terrain has no solids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Box covering every solid, or `None` for an empty terrain.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.solids.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, solid| acc.union(solid)))
    }

    /// Returns true if a circle at `center` overlaps any solid.
    #[must_use]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.solids.iter().any(|solid| solid.intersects_circle(center, radius))
    }

    /// Push a circle out of every solid it overlaps.
    ///
    /// The circle ends up [`CONTACT_SKIN`] clear of each face it was pushed
    /// from. Deep overlaps (center inside a solid) exit through the nearest
    /// face. Corners where two solids meet may need more than one pass, so
    /// the pushes repeat up to [`MAX_DEPENETRATION_PASSES`] times.
    ///
    /// # Example
    ///
    /// ```
    /// use glam::Vec2;
    /// use ledge::{Aabb, Terrain};
    ///
    /// let terrain = Terrain::with_solids(vec![Aabb::from_min_max(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0))]);
    /// let settled = terrain.depenetrate(Vec2::new(1.0, 0.1), 0.25);
    /// assert_eq!(settled.x, 1.0);
    /// assert!(settled.y >= 0.25);
    /// assert!(!terrain.overlaps_circle(settled, 0.25));
    /// ```
    #[must_use]
    pub fn depenetrate(&self, center: Vec2, radius: f32) -> Vec2 {
        let mut center = center;
        for _ in 0..MAX_DEPENETRATION_PASSES {
            let mut moved = false;
            for solid in &self.solids {
                if let Some(push) = push_out(solid, center, radius) {
                    center += push;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
        center
    }

    /// Sweep a circle through the terrain and report the nearest solid touched.
    #[must_use]
    pub fn circle_cast(&self, cast: &CircleCast) -> Option<CastHit> {
        let mut best: Option<CastHit> = None;

        for (index, solid) in self.solids.iter().enumerate() {
            let Some(distance) = sweep_circle_aabb(cast, solid) else {
                continue;
            };
            if best.map_or(true, |hit| distance < hit.distance) {
                #[allow(clippy::cast_possible_truncation)]
                let solid = SolidId::new(index as u32);
                best = Some(CastHit { solid, distance });
            }
        }

        trace!(
            origin = ?cast.origin,
            direction = ?cast.direction,
            hit = ?best,
            "circle_cast"
        );
        best
    }
}

/// Gap left between a depenetrated circle and the face it was pushed from.
pub const CONTACT_SKIN: f32 = 1.0e-3;

/// Upper bound on depenetration sweeps over the solids.
pub const MAX_DEPENETRATION_PASSES: usize = 4;

/// Minimum translation that moves the circle clear of `solid`, if overlapping.
fn push_out(solid: &Aabb, center: Vec2, radius: f32) -> Option<Vec2> {
    if !solid.intersects_circle(center, radius) {
        return None;
    }

    let offset = center - solid.closest_point(center);
    let gap = offset.length();
    if gap > 0.0 {
        return Some(offset / gap * (radius + CONTACT_SKIN - gap));
    }

    // Center inside the box: leave through the nearest face.
    let exits = [
        (center.x - solid.min.x, Vec2::NEG_X),
        (solid.max.x - center.x, Vec2::X),
        (center.y - solid.min.y, Vec2::NEG_Y),
        (solid.max.y - center.y, Vec2::Y),
    ];
    let (depth, normal) = exits
        .into_iter()
        .fold((f32::INFINITY, Vec2::Y), |best, exit| if exit.0 < best.0 { exit } else { best });
    Some(normal * (depth + radius + CONTACT_SKIN))
}
