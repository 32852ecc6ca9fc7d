//! Swept-circle queries against axis-aligned solids.
//!
//! A circle cast moves a circle of `radius` from `origin` along `direction`
//! for at most `distance` units and reports the first solid it touches. The
//! test is exact: the solid is inflated by the radius into a rounded box and a
//! ray is traced against that shape.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::terrain::SolidId;
use crate::Aabb;

/// A circle swept along a direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleCast {
    /// Start position of the circle center
    pub origin: Vec2,
    /// Circle radius
    pub radius: f32,
    /// Travel direction; normalized on use, zero means "overlap test only"
    pub direction: Vec2,
    /// Maximum travel distance
    pub distance: f32,
}

impl CircleCast {
    /// Create a new cast.
    #[must_use]
    pub fn new(origin: Vec2, radius: f32, direction: Vec2, distance: f32) -> Self {
        Self {
            origin,
            radius,
            direction,
            distance,
        }
    }
}

/// Result of a cast that touched a solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastHit {
    /// Solid that was touched first
    pub solid: SolidId,
    /// Distance travelled before touching (0 when already overlapping)
    pub distance: f32,
}

/// Sweep a circle against a single box.
///
/// Returns the travel distance at first contact, or `None` when the circle
/// stays clear of the box for the whole sweep.
#[must_use]
pub fn sweep_circle_aabb(cast: &CircleCast, aabb: &Aabb) -> Option<f32> {
    if aabb.intersects_circle(cast.origin, cast.radius) {
        return Some(0.0);
    }

    let dir = cast.direction.normalize_or_zero();
    if dir == Vec2::ZERO || cast.distance <= 0.0 {
        return None;
    }

    let t = ray_aabb(cast.origin, dir, &aabb.expand(cast.radius))?;
    if t > cast.distance {
        return None;
    }

    // Entry points beyond both faces of a corner hit the rounded part.
    let point = cast.origin + dir * t;
    let corner_x = if point.x < aabb.min.x {
        Some(aabb.min.x)
    } else if point.x > aabb.max.x {
        Some(aabb.max.x)
    } else {
        None
    };
    let corner_y = if point.y < aabb.min.y {
        Some(aabb.min.y)
    } else if point.y > aabb.max.y {
        Some(aabb.max.y)
    } else {
        None
    };

    match (corner_x, corner_y) {
        (Some(x), Some(y)) => {
            ray_circle(cast.origin, dir, Vec2::new(x, y), cast.radius).filter(|t| *t <= cast.distance)
        }
        _ => Some(t),
    }
}

/// Slab test of a unit ray against a box. Returns the entry distance.
fn ray_aabb(origin: Vec2, dir: Vec2, aabb: &Aabb) -> Option<f32> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = f32::INFINITY;

    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], aabb.min[axis], aabb.max[axis]);
        if d == 0.0 {
            // Sliding along a face is not a hit.
            if o <= lo || o >= hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (near, far) = {
            let a = (lo - o) * inv;
            let b = (hi - o) * inv;
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}

/// Unit ray against a circle. Returns the first forward intersection.
fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let b = offset.dot(dir);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_min_max(Vec2::ZERO, Vec2::ONE)
    }

    mod sweep_tests {
        use super::*;

        #[test]
        fn overlapping_start_hits_at_zero() {
            let cast = CircleCast::new(Vec2::new(0.5, 0.5), 0.25, Vec2::X, 1.0);
            assert_eq!(sweep_circle_aabb(&cast, &unit_box()), Some(0.0));
        }

        #[test]
        fn face_hit_distance() {
            // Circle at x=-1 moving right touches the face x=0 after 0.75.
            let cast = CircleCast::new(Vec2::new(-1.0, 0.5), 0.25, Vec2::X, 2.0);
            let t = sweep_circle_aabb(&cast, &unit_box()).unwrap();
            assert!((t - 0.75).abs() < 1e-5);
        }

        #[test]
        fn too_short_misses() {
            let cast = CircleCast::new(Vec2::new(-1.0, 0.5), 0.25, Vec2::X, 0.5);
            assert_eq!(sweep_circle_aabb(&cast, &unit_box()), None);
        }

        #[test]
        fn direction_is_normalized() {
            let cast = CircleCast::new(Vec2::new(-1.0, 0.5), 0.25, Vec2::new(40.0, 0.0), 2.0);
            let t = sweep_circle_aabb(&cast, &unit_box()).unwrap();
            assert!((t - 0.75).abs() < 1e-5);
        }

        #[test]
        fn zero_direction_only_tests_overlap() {
            let clear = CircleCast::new(Vec2::new(-0.3, 0.5), 0.25, Vec2::ZERO, 1.0);
            assert_eq!(sweep_circle_aabb(&clear, &unit_box()), None);

            let touching = CircleCast::new(Vec2::new(-0.2, 0.5), 0.25, Vec2::ZERO, 1.0);
            assert_eq!(sweep_circle_aabb(&touching, &unit_box()), Some(0.0));
        }

        #[test]
        fn moving_away_misses() {
            let cast = CircleCast::new(Vec2::new(-1.0, 0.5), 0.25, Vec2::NEG_X, 5.0);
            assert_eq!(sweep_circle_aabb(&cast, &unit_box()), None);
        }

        #[test]
        fn parallel_outside_slab_misses() {
            let cast = CircleCast::new(Vec2::new(-1.0, 2.0), 0.25, Vec2::X, 5.0);
            assert_eq!(sweep_circle_aabb(&cast, &unit_box()), None);
        }

        #[test]
        fn sliding_along_top_face_misses() {
            // Resting exactly on the box and moving sideways.
            let cast = CircleCast::new(Vec2::new(0.5, 1.25), 0.25, Vec2::X, 1.0);
            assert_eq!(sweep_circle_aabb(&cast, &unit_box()), None);
        }

        #[test]
        fn grazing_corner_misses_rounded_edge() {
            // Ray passes through the inflated box corner but outside the rounded corner.
            let cast = CircleCast::new(Vec2::new(-1.0, 0.4), 0.25, Vec2::new(1.0, 1.0), 5.0);
            assert_eq!(sweep_circle_aabb(&cast, &unit_box()), None);
        }

        #[test]
        fn diagonal_corner_hit() {
            let cast = CircleCast::new(Vec2::new(-1.0, -1.0), 0.25, Vec2::new(1.0, 1.0), 5.0);
            let t = sweep_circle_aabb(&cast, &unit_box()).unwrap();
            let expected = 2.0_f32.sqrt() - 0.25;
            assert!((t - expected).abs() < 1e-4, "t={t}, expected={expected}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reported_contact_is_on_the_surface(
                ox in -5.0f32..5.0,
                oy in -5.0f32..5.0,
                dx in -1.0f32..1.0,
                dy in -1.0f32..1.0,
            ) {
                let cast = CircleCast::new(Vec2::new(ox, oy), 0.25, Vec2::new(dx, dy), 10.0);
                let aabb = unit_box();
                if let Some(t) = sweep_circle_aabb(&cast, &aabb) {
                    prop_assert!((0.0..=10.0).contains(&t));
                    if t > 0.0 {
                        let center = cast.origin + cast.direction.normalize() * t;
                        let gap = aabb.closest_point(center).distance(center);
                        prop_assert!((gap - 0.25).abs() < 1e-3, "gap={}", gap);
                    }
                }
            }
        }
    }
}
