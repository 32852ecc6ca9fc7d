//! # Stride Core
//!
//! Character-movement core for a side-scrolling platformer.
//!
//! Each logic tick turns one [`InputSample`] into a velocity for the body;
//! each physics step integrates that velocity into a position clamped to the
//! visible play field. The environment is consulted only through short probes
//! answered by a [`ProbeOracle`], so the core never owns level geometry.
//!
//! ## Architecture
//!
//! - **Configuration**: [`MovementConfig`] holds the tunables and the jump
//!   force and gravity derived from them
//! - **Solvers**: [`horizontal`] and [`vertical`] update velocity in a fixed
//!   order inside [`MovementController::tick`]
//! - **Integration**: [`integrator`] advances position at a fixed timestep
//! - **Contacts**: [`contact`] reacts to stomps and ceiling bonks
//! - **Hosting**: [`Stage`] advances many controllers in parallel, and
//!   [`replay`] records deterministic trajectories from input scripts
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use stride_core::{InputSample, MovementConfig, MovementController, PlayField, Terrain};
//! use stride_core::ledge::Aabb;
//!
//! let mut terrain = Terrain::new();
//! terrain.add_solid(Aabb::from_min_max(Vec2::new(-20.0, -1.0), Vec2::new(20.0, 0.0)));
//!
//! let config = MovementConfig::new(8.0, 5.0, 1.0)?;
//! assert_eq!(config.jump_force(), 20.0);
//! assert_eq!(config.gravity(), -40.0);
//!
//! let mut hero = MovementController::new(config, Vec2::new(0.0, 0.3));
//! hero.tick(InputSample::jump(1.0), 0.02, &terrain);
//! hero.fixed_tick(0.02, &PlayField::new(-20.0, 20.0));
//!
//! assert!(hero.is_jumping());
//! assert!(hero.position().y > 0.3);
//! # Ok::<(), stride_core::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export ledge for terrain-backed probes
pub use ledge;

pub mod config;
pub mod contact;
pub mod controller;
pub mod horizontal;
pub mod input;
pub mod integrator;
pub mod probe;
pub mod replay;
pub mod stage;
pub mod state;
pub mod vertical;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use config::{ConfigError, MovementConfig};
pub use contact::{Contact, ContactResponse, ContactTag};
pub use controller::MovementController;
pub use input::{InputSample, InputSource, JumpEdge};
pub use integrator::{PlayField, FIXED_DT};
pub use ledge::Terrain;
pub use probe::{ProbeError, ProbeKind, ProbeOracle, ProbeQuery, ProbeShape, ScriptedProbe};
pub use replay::{hash_trajectory, run_script, InputScript, Timing, Trajectory, TrajectoryPoint};
pub use stage::{ActorId, Stage, StageError};
pub use state::{Facing, MotionFlags, MovementState};
