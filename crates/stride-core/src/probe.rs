//! Environment probes.
//!
//! The movement core never owns level geometry. It asks an injected
//! [`ProbeOracle`] whether a short circle cast from the body would touch
//! anything, once downward for ground contact and once along the horizontal
//! velocity for walls.
//!
//! Two oracles ship with the crate:
//!
//! - [`ledge::Terrain`]: real geometry, answered with an exact circle cast
//! - [`ScriptedProbe`]: a deterministic fake answering from scripted queues

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use glam::Vec2;
use ledge::{CircleCast, Terrain};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Default probe circle radius.
pub const DEFAULT_PROBE_RADIUS: f32 = 0.25;

/// Default probe travel distance.
pub const DEFAULT_PROBE_DISTANCE: f32 = 0.375;

/// Shape of the short-range circle cast used by both probes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeShape {
    /// Circle radius
    pub radius: f32,
    /// Maximum travel distance
    pub distance: f32,
}

impl Default for ProbeShape {
    fn default() -> Self {
        Self {
            radius: DEFAULT_PROBE_RADIUS,
            distance: DEFAULT_PROBE_DISTANCE,
        }
    }
}

/// What a probe is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    /// Downward probe for ground contact
    Ground,
    /// Horizontal probe along the current velocity
    Wall,
}

/// A single probe request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeQuery {
    /// Why the probe is issued
    pub kind: ProbeKind,
    /// Body position the cast starts from
    pub origin: Vec2,
    /// Cast shape
    pub shape: ProbeShape,
    /// Cast direction; zero means an overlap-only probe
    pub direction: Vec2,
}

impl ProbeQuery {
    /// Downward ground probe from `origin`.
    #[must_use]
    pub fn ground(origin: Vec2, shape: ProbeShape) -> Self {
        Self {
            kind: ProbeKind::Ground,
            origin,
            shape,
            direction: Vec2::NEG_Y,
        }
    }

    /// Horizontal wall probe toward the sign of `velocity_x`.
    ///
    /// A zero velocity yields a zero-length direction.
    #[must_use]
    pub fn wall(origin: Vec2, shape: ProbeShape, velocity_x: f32) -> Self {
        Self {
            kind: ProbeKind::Wall,
            origin,
            shape,
            direction: Vec2::new(velocity_x, 0.0),
        }
    }
}

/// Errors an oracle may report instead of an answer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProbeError {
    /// The query cannot be answered (non-finite origin or direction).
    #[error("degenerate probe query at {origin:?}")]
    Degenerate {
        /// Origin of the rejected query
        origin: Vec2,
    },

    /// The environment could not be reached.
    #[error("environment unavailable: {0}")]
    Unavailable(String),
}

/// Capability to answer short-range probes against the environment.
///
/// Oracles are shared read-only between actors, hence `Send + Sync`.
pub trait ProbeOracle: Send + Sync {
    /// Returns `Ok(true)` if the probe touches something.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the probe could not be answered. Callers in
    /// this crate treat any error as "no hit".
    fn probe(&self, query: &ProbeQuery) -> Result<bool, ProbeError>;

    /// Host collision response after a physics step: where a body of the
    /// given shape actually ends up once solid geometry pushes it back.
    ///
    /// The default leaves the position untouched.
    fn settle(&self, position: Vec2, shape: &ProbeShape) -> Vec2 {
        let _ = shape;
        position
    }
}

/// Run a probe, mapping failures to "no hit".
pub(crate) fn probe_or_miss<P: ProbeOracle + ?Sized>(oracle: &P, query: &ProbeQuery) -> bool {
    match oracle.probe(query) {
        Ok(hit) => hit,
        Err(error) => {
            warn!(%error, kind = ?query.kind, "probe failed, treating as no hit");
            false
        }
    }
}

impl ProbeOracle for Terrain {
    fn probe(&self, query: &ProbeQuery) -> Result<bool, ProbeError> {
        if !(query.origin.is_finite() && query.direction.is_finite()) {
            return Err(ProbeError::Degenerate { origin: query.origin });
        }
        let cast = CircleCast::new(query.origin, query.shape.radius, query.direction, query.shape.distance);
        Ok(self.circle_cast(&cast).is_some())
    }

    fn settle(&self, position: Vec2, shape: &ProbeShape) -> Vec2 {
        if !position.is_finite() {
            return position;
        }
        self.depenetrate(position, shape.radius)
    }
}

/// One scripted answer queue.
#[derive(Debug)]
struct Script {
    queue: VecDeque<bool>,
    fallback: bool,
}

impl Script {
    fn new(hits: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            queue: hits.into_iter().collect(),
            fallback,
        }
    }

    fn pop(&mut self) -> bool {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

/// Deterministic fake oracle.
///
/// Ground and wall probes each answer from their own queue; once a queue is
/// drained it keeps returning its fallback. Every query is recorded.
///
/// Queued answers are consumed in call order, so a scripted oracle belongs to
/// one controller. Shared across a [`Stage`](crate::stage::Stage), only the
/// fallback answers are deterministic.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use stride_core::probe::{ProbeOracle, ProbeQuery, ProbeShape, ScriptedProbe};
///
/// let oracle = ScriptedProbe::new().with_ground([true, false], false);
/// let query = ProbeQuery::ground(Vec2::ZERO, ProbeShape::default());
///
/// assert_eq!(oracle.probe(&query), Ok(true));
/// assert_eq!(oracle.probe(&query), Ok(false));
/// assert_eq!(oracle.probe(&query), Ok(false));
/// assert_eq!(oracle.queries().len(), 3);
/// ```
#[derive(Debug)]
pub struct ScriptedProbe {
    ground: Mutex<Script>,
    wall: Mutex<Script>,
    log: Mutex<Vec<ProbeQuery>>,
}

impl ScriptedProbe {
    /// An oracle that never reports a hit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ground: Mutex::new(Script::new([], false)),
            wall: Mutex::new(Script::new([], false)),
            log: Mutex::new(Vec::new()),
        }
    }

    /// An oracle that always reports ground and never a wall.
    #[must_use]
    pub fn grounded() -> Self {
        Self::new().with_ground([], true)
    }

    /// Replace the ground script.
    #[must_use]
    pub fn with_ground(self, hits: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            ground: Mutex::new(Script::new(hits, fallback)),
            ..self
        }
    }

    /// Replace the wall script.
    #[must_use]
    pub fn with_walls(self, hits: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            wall: Mutex::new(Script::new(hits, fallback)),
            ..self
        }
    }

    /// Queries received so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<ProbeQuery> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

impl Default for ScriptedProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> ProbeError {
    ProbeError::Unavailable("scripted probe lock poisoned".to_owned())
}

impl ProbeOracle for ScriptedProbe {
    fn probe(&self, query: &ProbeQuery) -> Result<bool, ProbeError> {
        self.log.lock().map_err(poisoned)?.push(*query);
        let script = match query.kind {
            ProbeKind::Ground => &self.ground,
            ProbeKind::Wall => &self.wall,
        };
        let hit = script.lock().map_err(poisoned)?.pop();
        Ok(hit)
    }
}
