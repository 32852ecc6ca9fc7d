//! Horizontal motion: acceleration-limited approach, wall stop, facing.

use glam::Vec2;
use tracing::trace;

use crate::config::MovementConfig;
use crate::probe::{probe_or_miss, ProbeOracle, ProbeQuery};
use crate::state::{Facing, MovementState};

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
#[must_use]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Horizontal velocity after one tick of steering with `axis`.
///
/// The target is `axis * move_speed`; the velocity changes by at most
/// `move_speed * dt`, so any target is reached within one second from rest.
#[must_use]
pub fn approach_velocity(velocity_x: f32, axis: f32, move_speed: f32, dt: f32) -> f32 {
    move_towards(velocity_x, axis * move_speed, move_speed * dt)
}

/// Run the horizontal solver for one tick.
///
/// Updates `state.input_axis` and `state.velocity.x`, stops against walls and
/// turns `facing` toward the resulting velocity.
pub fn solve<P: ProbeOracle + ?Sized>(
    state: &mut MovementState,
    facing: &mut Facing,
    position: Vec2,
    axis: f32,
    config: &MovementConfig,
    dt: f32,
    env: &P,
) {
    state.input_axis = axis;
    state.velocity.x = approach_velocity(state.velocity.x, axis, config.move_speed(), dt);

    let query = ProbeQuery::wall(position, config.probe(), state.velocity.x);
    if probe_or_miss(env, &query) {
        trace!(vx = state.velocity.x, "wall stop");
        state.velocity.x = 0.0;
    }

    *facing = facing.toward(state.velocity.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ProbeKind, ScriptedProbe};

    mod move_towards_tests {
        use super::*;

        #[test]
        fn steps_by_max_delta() {
            assert!((move_towards(0.0, 8.0, 0.8) - 0.8).abs() < 1e-6);
            assert!((move_towards(0.0, -8.0, 0.8) + 0.8).abs() < 1e-6);
        }

        #[test]
        fn snaps_when_close() {
            assert_eq!(move_towards(7.5, 8.0, 0.8), 8.0);
            assert_eq!(move_towards(8.0, 8.0, 0.8), 8.0);
        }

        #[test]
        fn zero_step_holds() {
            assert_eq!(move_towards(3.0, 8.0, 0.0), 3.0);
        }
    }

    mod solve_tests {
        use super::*;

        #[test]
        fn accelerates_toward_target() {
            let config = MovementConfig::new(8.0, 5.0, 1.0).unwrap();
            let mut state = MovementState::default();
            let mut facing = Facing::Left;
            let env = ScriptedProbe::grounded();

            solve(&mut state, &mut facing, Vec2::ZERO, 1.0, &config, 0.1, &env);

            assert!((state.velocity.x - 0.8).abs() < 1e-6);
            assert_eq!(state.input_axis, 1.0);
            assert_eq!(facing, Facing::Right);
        }

        #[test]
        fn wall_hit_stops_horizontal_motion() {
            let config = MovementConfig::default();
            let mut state = MovementState {
                velocity: Vec2::new(5.0, 2.0),
                ..MovementState::default()
            };
            let mut facing = Facing::Right;
            let env = ScriptedProbe::new().with_walls([true], false);

            solve(&mut state, &mut facing, Vec2::ZERO, 1.0, &config, 0.1, &env);

            assert_eq!(state.velocity.x, 0.0);
            assert_eq!(state.velocity.y, 2.0);
            assert_eq!(facing, Facing::Right);
        }

        #[test]
        fn wall_stop_lasts_one_tick() {
            let config = MovementConfig::default();
            let mut state = MovementState::default();
            let mut facing = Facing::Right;
            let env = ScriptedProbe::new().with_walls([true], false);

            solve(&mut state, &mut facing, Vec2::ZERO, 1.0, &config, 0.1, &env);
            assert_eq!(state.velocity.x, 0.0);
            solve(&mut state, &mut facing, Vec2::ZERO, 1.0, &config, 0.1, &env);
            assert!((state.velocity.x - 0.8).abs() < 1e-6);
        }

        #[test]
        fn wall_probe_follows_velocity_direction() {
            let config = MovementConfig::default();
            let mut state = MovementState {
                velocity: Vec2::new(-4.0, 0.0),
                ..MovementState::default()
            };
            let mut facing = Facing::Right;
            let env = ScriptedProbe::new();
            let origin = Vec2::new(2.0, 3.0);

            solve(&mut state, &mut facing, origin, 0.0, &config, 0.1, &env);

            let queries = env.queries();
            assert_eq!(queries.len(), 1);
            assert_eq!(queries[0].kind, ProbeKind::Wall);
            assert_eq!(queries[0].origin, origin);
            assert!(queries[0].direction.x < 0.0);
            assert_eq!(facing, Facing::Left);
        }

        #[test]
        fn resting_actor_probes_with_zero_direction_and_keeps_facing() {
            let config = MovementConfig::default();
            let mut state = MovementState::default();
            let mut facing = Facing::Left;
            let env = ScriptedProbe::new();

            solve(&mut state, &mut facing, Vec2::ZERO, 0.0, &config, 0.1, &env);

            assert_eq!(env.queries()[0].direction, Vec2::ZERO);
            assert_eq!(facing, Facing::Left);
        }

        #[test]
        fn decelerates_when_input_released() {
            let config = MovementConfig::default();
            let mut state = MovementState {
                velocity: Vec2::new(8.0, 0.0),
                ..MovementState::default()
            };
            let mut facing = Facing::Right;
            let env = ScriptedProbe::new();

            solve(&mut state, &mut facing, Vec2::ZERO, 0.0, &config, 0.25, &env);
            assert!((state.velocity.x - 6.0).abs() < 1e-6);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn approach_is_monotone_without_overshoot(
                axis in -1.0f32..=1.0,
                move_speed in 0.5f32..20.0,
                dt in 0.001f32..0.1,
            ) {
                let target = axis * move_speed;
                let mut vx = 0.0f32;
                let mut elapsed = 0.0f32;
                while elapsed < 1.0 {
                    let next = approach_velocity(vx, axis, move_speed, dt);
                    prop_assert!((target - next).abs() <= (target - vx).abs() + 1e-5);
                    prop_assert!(next.abs() <= target.abs() + 1e-5);
                    vx = next;
                    elapsed += dt;
                }
                prop_assert!((vx - target).abs() < 1e-3, "vx={} target={}", vx, target);
            }
        }
    }
}
