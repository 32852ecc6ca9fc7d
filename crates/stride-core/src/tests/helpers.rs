//! Fixtures shared by the crate-level suites.

use glam::Vec2;
use ledge::Layout;

use crate::config::MovementConfig;
use crate::controller::MovementController;
use crate::input::InputSample;
use crate::integrator::PlayField;
use crate::probe::ProbeOracle;
use crate::replay::{run_script, InputScript, Timing, Trajectory};

// =============================================================================
// Configuration
// =============================================================================

/// The classic tuning: `move_speed = 8`, `max_jump_height = 5`, `max_jump_time = 1`.
pub fn classic_config() -> MovementConfig {
    MovementConfig::new(8.0, 5.0, 1.0).unwrap()
}

/// Controller with the classic tuning at `position`.
pub fn classic_controller(position: Vec2) -> MovementController {
    MovementController::new(classic_config(), position)
}

// =============================================================================
// Levels
// =============================================================================

/// Flat floor, a spawn point and a wall on the right.
///
/// Tiles are one unit; the floor's top face is at `y = 1`, the wall's left
/// face at `x = 15`. The spawn tile is centered on `(1.5, 1.5)`.
pub const CORRIDOR: &str = "\
...............#
...............#
...............#
.P.............#
################
";

/// A floor that ends halfway across an empty pit.
pub const LEDGE: &str = "\
.P......
####....
";

/// Parse a layout with unit tiles.
pub fn parse_level(text: &str) -> Layout {
    Layout::parse(text, 1.0).unwrap()
}

/// Spawn point of a parsed layout.
pub fn spawn_of(layout: &Layout) -> Vec2 {
    layout.spawn.unwrap()
}

// =============================================================================
// Driving controllers
// =============================================================================

/// Run `samples` through `controller` at `dt`, one physics step per logic tick.
pub fn drive<P: ProbeOracle + ?Sized>(
    controller: &mut MovementController,
    samples: Vec<InputSample>,
    env: &P,
    field: &PlayField,
    dt: f32,
) -> Trajectory {
    let timing = Timing {
        dt,
        fixed_dt: dt,
        ticks: samples.len() as u64,
    };
    run_script(controller, &mut InputScript::new(samples), env, field, timing)
}

/// `count` copies of one sample.
pub fn repeat(sample: InputSample, count: usize) -> Vec<InputSample> {
    vec![sample; count]
}

/// A jump press followed by `held` ticks of holding and `released` idle ticks.
pub fn jump_then_hold(axis: f32, held: usize, released: usize) -> Vec<InputSample> {
    let mut samples = vec![InputSample::jump(axis)];
    samples.extend(repeat(InputSample::hold_jump(axis), held));
    samples.extend(repeat(InputSample::steer(axis), released));
    samples
}
