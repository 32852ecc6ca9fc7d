//! Scripted input, trajectory recording and determinism hashing.
//!
//! A replay pairs a controller with a sequence of [`InputSample`]s and records
//! one [`TrajectoryPoint`] per step. Given the same configuration, script,
//! environment and timing, the resulting trajectory hash is identical across
//! runs and platforms that share f32 semantics.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::controller::MovementController;
use crate::input::{InputSample, InputSource, JumpEdge};
use crate::integrator::{PlayField, FIXED_DT};
use crate::probe::ProbeOracle;
use crate::state::{Facing, MotionFlags};

/// Shortest and longest run of one held input in a random script, in ticks.
const RANDOM_SEGMENT_TICKS: (usize, usize) = (4, 40);

/// A recorded sequence of input samples, replayed one per tick.
///
/// Once exhausted the script reads as idle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    samples: Vec<InputSample>,
    #[serde(skip)]
    cursor: usize,
}

impl InputScript {
    /// Creates a script from samples.
    #[must_use]
    pub fn new(samples: Vec<InputSample>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Build a script from held levels `(axis, jump_held)`, deriving press edges.
    #[must_use]
    pub fn from_levels(levels: impl IntoIterator<Item = (f32, bool)>) -> Self {
        let mut edge = JumpEdge::default();
        Self::new(levels.into_iter().map(|(axis, held)| edge.sample(axis, held)).collect())
    }

    /// Generate a deterministic pseudo-random script of `len` ticks.
    ///
    /// Input is held in segments, the way a player holds a direction, and the
    /// jump button is held for whole segments so press edges stay sparse.
    ///
    /// # Example
    ///
    /// ```
    /// use stride_core::replay::InputScript;
    ///
    /// let a = InputScript::random(7, 100);
    /// let b = InputScript::random(7, 100);
    /// assert_eq!(a, b);
    /// assert_eq!(a.len(), 100);
    /// ```
    #[must_use]
    pub fn random(seed: u64, len: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut levels = Vec::with_capacity(len);

        while levels.len() < len {
            let run = rng.gen_range(RANDOM_SEGMENT_TICKS.0..=RANDOM_SEGMENT_TICKS.1);
            let axis = match rng.gen_range(0..4) {
                0 => 0.0,
                1 => -1.0,
                2 => 1.0,
                _ => rng.gen_range(-1.0f32..=1.0),
            };
            let held = rng.gen_bool(0.3);
            let remaining = len - levels.len();
            levels.extend(std::iter::repeat((axis, held)).take(run.min(remaining)));
        }

        Self::from_levels(levels)
    }

    /// All samples in the script.
    #[must_use]
    pub fn samples(&self) -> &[InputSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the script has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns true once every sample has been read.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.samples.len()
    }

    /// Restart from the first sample.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl InputSource for InputScript {
    fn sample(&mut self) -> InputSample {
        let sample = self.samples.get(self.cursor).copied().unwrap_or_default();
        self.cursor = self.cursor.saturating_add(1);
        sample
    }
}

/// Step sizes and length of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Logic tick timestep
    pub dt: f32,
    /// Physics step timestep
    pub fixed_dt: f32,
    /// Number of steps to run
    pub ticks: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            dt: FIXED_DT,
            fixed_dt: FIXED_DT,
            ticks: 250,
        }
    }
}

/// Controller state after one replay step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Step index, starting at 0
    pub tick: u64,
    /// Position after the physics step
    pub position: Vec2,
    /// Velocity after the logic tick
    pub velocity: Vec2,
    /// Visual facing
    pub facing: Facing,
    /// Boolean queries
    pub flags: MotionFlags,
}

impl TrajectoryPoint {
    /// Snapshot `controller` as step `tick`.
    #[must_use]
    pub fn capture(tick: u64, controller: &MovementController) -> Self {
        Self {
            tick,
            position: controller.position(),
            velocity: controller.velocity(),
            facing: controller.facing(),
            flags: controller.flags(),
        }
    }
}

/// Recorded replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Creates an empty trajectory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point.
    pub fn push(&mut self, point: TrajectoryPoint) {
        self.points.push(point);
    }

    /// Recorded points in step order.
    #[must_use]
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// The last recorded point.
    #[must_use]
    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Highest y reached, if any point was recorded.
    #[must_use]
    pub fn peak_height(&self) -> Option<f32> {
        self.points.iter().map(|p| p.position.y).reduce(f32::max)
    }

    /// First step at which vertical velocity stopped being positive after
    /// having been positive.
    #[must_use]
    pub fn apex_tick(&self) -> Option<u64> {
        let mut rising = false;
        for point in &self.points {
            if point.velocity.y > 0.0 {
                rising = true;
            } else if rising {
                return Some(point.tick);
            }
        }
        None
    }
}

/// Drive `controller` with `source` for `timing.ticks` steps.
///
/// Each step runs one logic tick, one physics step and a settle pass against
/// `env`, then records the controller.
pub fn run_script<S, P>(
    controller: &mut MovementController,
    source: &mut S,
    env: &P,
    field: &PlayField,
    timing: Timing,
) -> Trajectory
where
    S: InputSource + ?Sized,
    P: ProbeOracle + ?Sized,
{
    let mut trajectory = Trajectory::new();

    for tick in 0..timing.ticks {
        let input = source.sample();
        controller.tick(input, timing.dt, env);
        controller.fixed_tick(timing.fixed_dt, field);
        controller.settle(env);
        trajectory.push(TrajectoryPoint::capture(tick, controller));
    }

    info!(
        ticks = timing.ticks,
        final_position = ?controller.position(),
        peak = ?trajectory.peak_height(),
        "replay finished"
    );
    trajectory
}

/// Compute a deterministic hash of a trajectory.
///
/// Floats are hashed by bit pattern, so `-0.0` and `0.0` differ and any
/// drift in the last place shows up.
#[must_use]
pub fn hash_trajectory(trajectory: &Trajectory) -> u64 {
    let mut hasher = DefaultHasher::new();
    trajectory.points.len().hash(&mut hasher);
    for point in &trajectory.points {
        hash_point(point, &mut hasher);
    }
    hasher.finish()
}

fn hash_point<H: Hasher>(point: &TrajectoryPoint, hasher: &mut H) {
    point.tick.hash(hasher);
    hash_vec2(point.position, hasher);
    hash_vec2(point.velocity, hasher);
    // Discriminant
    match point.facing {
        Facing::Right => 0u8.hash(hasher),
        Facing::Left => 1u8.hash(hasher),
    }
    point.flags.bits().hash(hasher);
}

fn hash_vec2<H: Hasher>(v: Vec2, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}
