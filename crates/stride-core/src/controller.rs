//! The movement controller: one actor's lifecycle and tick sequence.
//!
//! The host scheduler drives the controller through explicit hooks:
//!
//! | Hook | When | Does |
//! |------|------|------|
//! | [`on_activate`](MovementController::on_activate) | actor enabled | reset to a clean state |
//! | [`tick`](MovementController::tick) | every logic frame | horizontal solver, ground probe, grounded update, gravity |
//! | [`fixed_tick`](MovementController::fixed_tick) | every physics step | integrate position, clamp to play field |
//! | [`settle`](MovementController::settle) | after the physics step | let the environment resolve penetration |
//! | [`on_contact`](MovementController::on_contact) | contact begins | stomp / bonk reactions |
//! | [`on_deactivate`](MovementController::on_deactivate) | actor disabled | freeze and zero state |
//!
//! A deactivated controller ignores every hook except `on_activate`.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use stride_core::config::MovementConfig;
//! use stride_core::controller::MovementController;
//! use stride_core::input::InputSample;
//! use stride_core::integrator::PlayField;
//! use stride_core::probe::ScriptedProbe;
//!
//! let mut controller = MovementController::new(MovementConfig::default(), Vec2::ZERO);
//! let ground = ScriptedProbe::grounded();
//!
//! controller.tick(InputSample::jump(0.0), 0.02, &ground);
//! assert!(controller.is_jumping());
//!
//! controller.fixed_tick(0.02, &PlayField::unbounded());
//! assert!(controller.position().y > 0.0);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::MovementConfig;
use crate::contact::{self, Contact, ContactResponse};
use crate::horizontal;
use crate::input::{sanitize_axis, InputSample};
use crate::integrator::{integrate, PlayField};
use crate::probe::ProbeOracle;
use crate::state::{Facing, MotionFlags, MovementState};
use crate::vertical;

/// Character-movement controller for one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementController {
    config: MovementConfig,
    state: MovementState,
    position: Vec2,
    facing: Facing,
    active: bool,
}

impl MovementController {
    /// Creates an active controller at `position` with zeroed state.
    #[must_use]
    pub fn new(config: MovementConfig, position: Vec2) -> Self {
        Self {
            config,
            state: MovementState::default(),
            position,
            facing: Facing::default(),
            active: true,
        }
    }

    /// Enable the actor. Any state from a previous activation is discarded.
    pub fn on_activate(&mut self) {
        self.state.reset();
        self.active = true;
        debug!(position = ?self.position, "activated");
    }

    /// Disable the actor: zero velocity and input, clear jumping, ignore
    /// further hooks until reactivated.
    pub fn on_deactivate(&mut self) {
        self.state.velocity = Vec2::ZERO;
        self.state.input_axis = 0.0;
        self.state.jumping = false;
        self.active = false;
        debug!(position = ?self.position, "deactivated");
    }

    /// Run one logic tick with this frame's input.
    ///
    /// Order: horizontal solver (with wall probe), ground probe, grounded
    /// update (clamp then jump), gravity. A negative or non-finite `dt`
    /// skips the tick.
    pub fn tick<P: ProbeOracle + ?Sized>(&mut self, input: InputSample, dt: f32, env: &P) {
        if !self.active {
            return;
        }
        if !is_valid_dt(dt) {
            warn!(dt, "rejected logic tick with invalid dt");
            return;
        }

        let axis = sanitize_axis(input.axis);
        horizontal::solve(
            &mut self.state,
            &mut self.facing,
            self.position,
            axis,
            &self.config,
            dt,
            env,
        );

        let was_grounded = self.state.grounded;
        self.state.grounded = vertical::detect_ground(self.position, &self.config, env);
        if self.state.grounded != was_grounded {
            debug!(grounded = self.state.grounded, vy = self.state.velocity.y, "ground contact changed");
        }

        if self.state.grounded {
            if vertical::apply_grounded(&mut self.state, input.jump_pressed, self.config.jump_force()) {
                debug!(vy = self.state.velocity.y, x = self.position.x, "jump");
            }
        }

        self.state.velocity.y = vertical::apply_gravity(self.state.velocity.y, input.jump_held, &self.config, dt);

        trace!(
            velocity = ?self.state.velocity,
            grounded = self.state.grounded,
            jumping = self.state.jumping,
            "tick"
        );
    }

    /// Run one physics step: integrate and clamp into the play field.
    pub fn fixed_tick(&mut self, fixed_dt: f32, field: &PlayField) {
        if !self.active {
            return;
        }
        if !is_valid_dt(fixed_dt) {
            warn!(fixed_dt, "rejected physics tick with invalid dt");
            return;
        }
        self.position = integrate(self.position, self.state.velocity, fixed_dt, field);
    }

    /// Let the environment push the body out of solid geometry after a
    /// physics step.
    pub fn settle<P: ProbeOracle + ?Sized>(&mut self, env: &P) {
        if !self.active {
            return;
        }
        let settled = env.settle(self.position, &self.config.probe());
        if settled != self.position {
            trace!(from = ?self.position, to = ?settled, "settled");
            self.position = settled;
        }
    }

    /// React to a contact-begin notification.
    ///
    /// Returns [`ContactResponse::Ignored`] while deactivated.
    pub fn on_contact(&mut self, contact: &Contact) -> ContactResponse {
        if !self.active {
            return ContactResponse::Ignored;
        }
        contact::resolve(&mut self.state, contact, self.config.jump_force())
    }

    /// Move the body without integrating (spawn, respawn, scripted warp).
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Configuration the controller was built with.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Current movement state.
    #[must_use]
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    /// Mutable access to the movement state, for hosts restoring a snapshot.
    pub fn state_mut(&mut self) -> &mut MovementState {
        &mut self.state
    }

    /// Body position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    /// Visual facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the controller is accepting hooks.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ground contact sampled on the last tick.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    /// In the air from a jump or stomp.
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.state.jumping
    }

    /// See [`MovementState::is_running`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// See [`MovementState::is_sliding`].
    #[must_use]
    pub fn is_sliding(&self) -> bool {
        self.state.is_sliding()
    }

    /// See [`MovementState::is_falling`].
    #[must_use]
    pub fn is_falling(&self) -> bool {
        self.state.is_falling()
    }

    /// Snapshot of every boolean query.
    #[must_use]
    pub fn flags(&self) -> MotionFlags {
        self.state.flags()
    }
}

fn is_valid_dt(dt: f32) -> bool {
    dt.is_finite() && dt >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactTag;
    use crate::probe::{ProbeKind, ScriptedProbe};

    fn classic() -> MovementController {
        MovementController::new(MovementConfig::new(8.0, 5.0, 1.0).unwrap(), Vec2::ZERO)
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn grounded_jump_press() {
            let mut controller = classic();
            controller.tick(InputSample::jump(0.0), 0.0, &ScriptedProbe::grounded());
            assert_eq!(controller.velocity().y, 20.0);
            assert!(controller.is_jumping());
            assert!(controller.is_grounded());
        }

        #[test]
        fn jump_press_in_the_air_is_ignored() {
            let mut controller = classic();
            controller.tick(InputSample::jump(0.0), 0.0, &ScriptedProbe::new());
            assert_eq!(controller.velocity().y, 0.0);
            assert!(!controller.is_jumping());
        }

        #[test]
        fn gravity_runs_after_jump_in_same_tick() {
            let mut controller = classic();
            controller.tick(InputSample::jump(0.0), 0.1, &ScriptedProbe::grounded());
            // 20 + (-40 * 1 * 0.1) = 16: rising with jump held uses single gravity.
            assert!((controller.velocity().y - 16.0).abs() < 1e-5);
        }

        #[test]
        fn resting_on_ground_settles_at_gravity_step() {
            let mut controller = classic();
            let ground = ScriptedProbe::grounded();
            for _ in 0..3 {
                controller.tick(InputSample::idle(), 0.1, &ground);
            }
            // Clamp to 0, then one step of doubled gravity.
            assert!((controller.velocity().y + 8.0).abs() < 1e-5);
            assert!(!controller.is_jumping());
            assert!(!controller.is_falling());
        }

        #[test]
        fn airborne_fall_step() {
            let mut controller = classic();
            controller.state_mut().velocity.y = -1.0;
            controller.tick(InputSample::idle(), 0.1, &ScriptedProbe::new());
            assert!((controller.velocity().y + 9.0).abs() < 1e-5);
            assert!(controller.is_falling());
        }

        #[test]
        fn grounded_steering() {
            let mut controller = classic();
            controller.tick(InputSample::steer(1.0), 0.1, &ScriptedProbe::grounded());
            assert!((controller.velocity().x - 0.8).abs() < 1e-6);
            assert_eq!(controller.facing(), Facing::Right);
            assert!(controller.is_running());
        }

        #[test]
        fn wall_probe_precedes_ground_probe() {
            let mut controller = classic();
            let env = ScriptedProbe::grounded();
            controller.tick(InputSample::steer(-1.0), 0.1, &env);
            let kinds: Vec<ProbeKind> = env.queries().iter().map(|q| q.kind).collect();
            assert_eq!(kinds, vec![ProbeKind::Wall, ProbeKind::Ground]);
        }

        #[test]
        fn invalid_dt_skips_tick() {
            let mut controller = classic();
            let env = ScriptedProbe::grounded();
            controller.tick(InputSample::jump(1.0), f32::NAN, &env);
            controller.tick(InputSample::jump(1.0), -0.1, &env);
            assert_eq!(controller.velocity(), Vec2::ZERO);
            assert!(env.queries().is_empty());
        }

        #[test]
        fn out_of_range_axis_is_clamped() {
            let mut controller = classic();
            let input = InputSample {
                axis: 5.0,
                jump_pressed: false,
                jump_held: false,
            };
            controller.tick(input, 1.0, &ScriptedProbe::grounded());
            assert!((controller.velocity().x - 8.0).abs() < 1e-6);
            assert_eq!(controller.state().input_axis, 1.0);
        }
    }

    mod fixed_tick_tests {
        use super::*;

        #[test]
        fn integrates_velocity() {
            let mut controller = classic();
            controller.state_mut().velocity = Vec2::new(4.0, 10.0);
            controller.fixed_tick(0.5, &PlayField::unbounded());
            assert_eq!(controller.position(), Vec2::new(2.0, 5.0));
        }

        #[test]
        fn clamps_to_play_field() {
            let mut controller = classic();
            controller.state_mut().velocity = Vec2::new(-100.0, 0.0);
            controller.fixed_tick(1.0, &PlayField::new(-5.0, 5.0));
            assert_eq!(controller.position().x, -4.5);
        }

        #[test]
        fn settle_defers_to_environment() {
            let terrain = ledge::Terrain::with_solids(vec![ledge::Aabb::from_min_max(
                Vec2::new(-5.0, -1.0),
                Vec2::new(5.0, 0.0),
            )]);
            let mut controller = classic();
            controller.teleport(Vec2::new(1.0, 0.1));
            controller.settle(&terrain);
            assert!(controller.position().y > 0.25);

            controller.on_deactivate();
            controller.teleport(Vec2::new(1.0, 0.1));
            controller.settle(&terrain);
            assert_eq!(controller.position(), Vec2::new(1.0, 0.1));
        }

        #[test]
        fn invalid_fixed_dt_is_rejected() {
            let mut controller = classic();
            controller.state_mut().velocity = Vec2::new(1.0, 1.0);
            controller.fixed_tick(f32::INFINITY, &PlayField::unbounded());
            assert_eq!(controller.position(), Vec2::ZERO);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn deactivate_freezes_and_zeroes() {
            let mut controller = classic();
            let ground = ScriptedProbe::grounded();
            controller.tick(InputSample::jump(1.0), 0.1, &ground);
            controller.on_deactivate();

            assert!(!controller.is_active());
            assert_eq!(controller.velocity(), Vec2::ZERO);
            assert_eq!(controller.state().input_axis, 0.0);
            assert!(!controller.is_jumping());

            controller.tick(InputSample::jump(1.0), 0.1, &ground);
            controller.state_mut().velocity = Vec2::new(3.0, 3.0);
            controller.fixed_tick(0.1, &PlayField::unbounded());
            assert_eq!(controller.position(), Vec2::ZERO);
            assert_eq!(
                controller.on_contact(&Contact::new(ContactTag::Enemy, Vec2::NEG_Y)),
                ContactResponse::Ignored
            );
        }

        #[test]
        fn reactivation_starts_clean() {
            let mut controller = classic();
            controller.state_mut().velocity = Vec2::new(3.0, -7.0);
            controller.state_mut().jumping = true;
            controller.state_mut().input_axis = -1.0;
            controller.state_mut().grounded = true;

            controller.on_deactivate();
            controller.on_activate();

            assert!(controller.is_active());
            assert_eq!(*controller.state(), MovementState::default());
        }

        #[test]
        fn activation_keeps_position() {
            let mut controller = classic();
            controller.teleport(Vec2::new(4.0, 2.0));
            controller.on_deactivate();
            controller.on_activate();
            assert_eq!(controller.position(), Vec2::new(4.0, 2.0));
        }
    }

    mod contact_tests {
        use super::*;

        #[test]
        fn stomp_sets_half_jump_rebound() {
            let mut controller = classic();
            controller.state_mut().velocity.y = -15.0;
            let response = controller.on_contact(&Contact::new(ContactTag::Enemy, Vec2::new(0.1, -1.0)));
            assert_eq!(response, ContactResponse::Stomp);
            assert_eq!(controller.velocity().y, 10.0);
            assert!(controller.is_jumping());
        }

        #[test]
        fn bonk_zeroes_ascent() {
            let mut controller = classic();
            controller.state_mut().velocity.y = 12.0;
            let response = controller.on_contact(&Contact::new(ContactTag::Other, Vec2::Y));
            assert_eq!(response, ContactResponse::Bonk);
            assert_eq!(controller.velocity().y, 0.0);
        }
    }

    #[test]
    fn controller_serialization_roundtrip() {
        let mut controller = classic();
        controller.tick(InputSample::jump(-1.0), 0.1, &ScriptedProbe::grounded());
        let json = serde_json::to_string(&controller).unwrap();
        let back: MovementController = serde_json::from_str(&json).unwrap();
        assert_eq!(controller, back);
    }
}
