//! Stage: a host scheduler for many independent actors.
//!
//! Each actor owns its own [`MovementController`] and pending input; no actor
//! reads or writes another's state. That makes every tick embarrassingly
//! parallel, so the stage advances actors with rayon while sharing the
//! environment oracle read-only.
//!
//! # Determinism
//!
//! Actors are stored in a `BTreeMap` keyed by [`ActorId`] and each actor's
//! update depends only on its own state, its input and the environment. With
//! an oracle whose answers depend only on the query, such as
//! [`Terrain`](crate::Terrain), results are identical regardless of how rayon
//! schedules the work.
//!
//! An oracle that answers from shared mutable state does not have that
//! property. A [`ScriptedProbe`](crate::probe::ScriptedProbe) with non-empty
//! queues hands its scripted answers to whichever actor asks first, so only
//! its fallback-only forms (`new`, `grounded`) are reproducible on a stage.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use stride_core::config::MovementConfig;
//! use stride_core::input::InputSample;
//! use stride_core::integrator::PlayField;
//! use stride_core::probe::ScriptedProbe;
//! use stride_core::stage::Stage;
//!
//! let mut stage = Stage::new(PlayField::unbounded());
//! let hero = stage.spawn(MovementConfig::default(), Vec2::ZERO);
//!
//! stage.set_input(hero, InputSample::steer(1.0)).unwrap();
//! stage.step(0.02, &ScriptedProbe::grounded());
//!
//! assert!(stage.controller(hero).unwrap().position().x > 0.0);
//! assert_eq!(stage.tick_count(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::MovementConfig;
use crate::contact::{Contact, ContactResponse};
use crate::controller::MovementController;
use crate::input::InputSample;
use crate::integrator::PlayField;
use crate::probe::ProbeOracle;

/// Unique identifier for an actor on a stage.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates an `ActorId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by stage operations addressed to one actor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    /// No actor with this id is on the stage.
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),
}

/// One actor on the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Actor {
    controller: MovementController,
    input: InputSample,
}

/// Host scheduler for many independent controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    actors: BTreeMap<ActorId, Actor>,
    field: PlayField,
    next_id: u64,
    steps: u64,
}

impl Stage {
    /// Creates an empty stage clamped to `field`.
    #[must_use]
    pub fn new(field: PlayField) -> Self {
        Self {
            actors: BTreeMap::new(),
            field,
            next_id: 0,
            steps: 0,
        }
    }

    /// Add an active actor and return its id.
    pub fn spawn(&mut self, config: MovementConfig, position: Vec2) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.next_id += 1;
        self.actors.insert(
            id,
            Actor {
                controller: MovementController::new(config, position),
                input: InputSample::idle(),
            },
        );
        debug!(actor = %id, ?position, "spawned");
        id
    }

    /// Remove an actor, returning its controller.
    pub fn despawn(&mut self, id: ActorId) -> Option<MovementController> {
        let actor = self.actors.remove(&id)?;
        debug!(actor = %id, "despawned");
        Some(actor.controller)
    }

    /// Set the input the actor will see on the next logic tick.
    ///
    /// The input stays in effect until replaced, except the jump press edge,
    /// which is consumed by the tick that sees it.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnknownActor`] if `id` is not on the stage.
    pub fn set_input(&mut self, id: ActorId, input: InputSample) -> Result<(), StageError> {
        self.actor_mut(id)?.input = input;
        Ok(())
    }

    /// Deliver a contact-begin notification to an actor.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnknownActor`] if `id` is not on the stage.
    pub fn deliver_contact(&mut self, id: ActorId, contact: &Contact) -> Result<ContactResponse, StageError> {
        let response = self.actor_mut(id)?.controller.on_contact(contact);
        debug!(actor = %id, ?response, "contact delivered");
        Ok(response)
    }

    /// Enable an actor, resetting its movement state.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnknownActor`] if `id` is not on the stage.
    pub fn activate(&mut self, id: ActorId) -> Result<(), StageError> {
        let actor = self.actor_mut(id)?;
        actor.input = InputSample::idle();
        actor.controller.on_activate();
        Ok(())
    }

    /// Disable an actor.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnknownActor`] if `id` is not on the stage.
    pub fn deactivate(&mut self, id: ActorId) -> Result<(), StageError> {
        let actor = self.actor_mut(id)?;
        actor.input = InputSample::idle();
        actor.controller.on_deactivate();
        Ok(())
    }

    /// Run the logic tick for every actor in parallel.
    pub fn tick<P: ProbeOracle + ?Sized>(&mut self, dt: f32, env: &P) {
        self.actors.par_iter_mut().for_each(|(_, actor)| {
            actor.controller.tick(actor.input, dt, env);
            actor.input.jump_pressed = false;
        });
    }

    /// Run the physics step for every actor in parallel.
    pub fn fixed_tick(&mut self, fixed_dt: f32) {
        let field = self.field;
        self.actors.par_iter_mut().for_each(|(_, actor)| {
            actor.controller.fixed_tick(fixed_dt, &field);
        });
    }

    /// Let the environment resolve penetration for every actor in parallel.
    pub fn settle<P: ProbeOracle + ?Sized>(&mut self, env: &P) {
        self.actors.par_iter_mut().for_each(|(_, actor)| {
            actor.controller.settle(env);
        });
    }

    /// One logic tick, one physics step of the same length and a settle pass,
    /// then advance the tick counter.
    pub fn step<P: ProbeOracle + ?Sized>(&mut self, dt: f32, env: &P) {
        self.tick(dt, env);
        self.fixed_tick(dt);
        self.settle(env);
        self.steps += 1;
    }

    /// Steps completed so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.steps
    }

    /// Horizontal play field every actor is clamped to.
    #[must_use]
    pub fn field(&self) -> PlayField {
        self.field
    }

    /// Replace the play field (camera moved).
    pub fn set_field(&mut self, field: PlayField) {
        self.field = field;
    }

    /// Read an actor's controller.
    #[must_use]
    pub fn controller(&self, id: ActorId) -> Option<&MovementController> {
        self.actors.get(&id).map(|actor| &actor.controller)
    }

    /// Iterate actors in id order.
    pub fn controllers(&self) -> impl Iterator<Item = (ActorId, &MovementController)> {
        self.actors.iter().map(|(id, actor)| (*id, &actor.controller))
    }

    /// Number of actors on the stage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Returns true if the stage has no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, StageError> {
        self.actors.get_mut(&id).ok_or(StageError::UnknownActor(id))
    }
}
