//! Input samples fed to the controller once per logic tick.
//!
//! The core consumes raw, unsmoothed input: a horizontal axis in `[-1, 1]`
//! and the jump button as two discrete states, the press edge for this tick
//! and the held level.

use serde::{Deserialize, Serialize};

/// One tick of player intent.
///
/// Deserialization goes through [`InputSample::new`], so scripted samples get
/// the same axis clamp and press-implies-held rule as live ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInputSample")]
pub struct InputSample {
    /// Horizontal intent, `-1` full left to `1` full right
    pub axis: f32,
    /// Jump button went down this tick
    pub jump_pressed: bool,
    /// Jump button is currently down
    pub jump_held: bool,
}

impl InputSample {
    /// Creates a sample, clamping `axis` into `[-1, 1]`.
    ///
    /// A pressed edge implies the button is held.
    #[must_use]
    pub fn new(axis: f32, jump_pressed: bool, jump_held: bool) -> Self {
        Self {
            axis: sanitize_axis(axis),
            jump_pressed,
            jump_held: jump_held || jump_pressed,
        }
    }

    /// No input at all.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Horizontal input only.
    #[must_use]
    pub fn steer(axis: f32) -> Self {
        Self::new(axis, false, false)
    }

    /// Jump press on this tick (held as well).
    #[must_use]
    pub fn jump(axis: f32) -> Self {
        Self::new(axis, true, true)
    }

    /// Jump held from an earlier tick, no new press.
    #[must_use]
    pub fn hold_jump(axis: f32) -> Self {
        Self::new(axis, false, true)
    }

    /// Derives the press edge from two held levels.
    ///
    /// # Example
    ///
    /// ```
    /// use stride_core::input::InputSample;
    ///
    /// assert!(InputSample::from_levels(0.0, true, false).jump_pressed);
    /// assert!(!InputSample::from_levels(0.0, true, true).jump_pressed);
    /// ```
    #[must_use]
    pub fn from_levels(axis: f32, held: bool, previously_held: bool) -> Self {
        Self::new(axis, held && !previously_held, held)
    }
}

/// Serialized form of an [`InputSample`]; every field is optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct RawInputSample {
    axis: f32,
    jump_pressed: bool,
    jump_held: bool,
}

impl From<RawInputSample> for InputSample {
    fn from(raw: RawInputSample) -> Self {
        Self::new(raw.axis, raw.jump_pressed, raw.jump_held)
    }
}

/// Clamp an axis reading into `[-1, 1]`; NaN reads as `0`.
#[must_use]
pub fn sanitize_axis(axis: f32) -> f32 {
    if axis.is_nan() {
        0.0
    } else {
        axis.clamp(-1.0, 1.0)
    }
}

/// Tracks the jump button level across ticks to produce press edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpEdge {
    held: bool,
}

impl JumpEdge {
    /// Feed the current level and build the tick's sample.
    pub fn sample(&mut self, axis: f32, held: bool) -> InputSample {
        let sample = InputSample::from_levels(axis, held, self.held);
        self.held = held;
        sample
    }

    /// Forget the previous level.
    pub fn reset(&mut self) {
        self.held = false;
    }
}

/// Pull-style input collaborator, polled once per logic tick.
pub trait InputSource {
    /// Read this tick's sample.
    fn sample(&mut self) -> InputSample;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_is_clamped() {
        assert_eq!(InputSample::steer(3.0).axis, 1.0);
        assert_eq!(InputSample::steer(-7.5).axis, -1.0);
        assert_eq!(InputSample::steer(0.3).axis, 0.3);
    }

    #[test]
    fn nan_axis_reads_as_zero() {
        assert_eq!(sanitize_axis(f32::NAN), 0.0);
        assert_eq!(InputSample::steer(f32::NAN).axis, 0.0);
    }

    #[test]
    fn press_implies_held() {
        let sample = InputSample::new(0.0, true, false);
        assert!(sample.jump_pressed);
        assert!(sample.jump_held);
    }

    #[test]
    fn convenience_constructors() {
        assert_eq!(InputSample::idle(), InputSample::default());
        let jump = InputSample::jump(-1.0);
        assert!(jump.jump_pressed && jump.jump_held);
        let hold = InputSample::hold_jump(0.5);
        assert!(!hold.jump_pressed && hold.jump_held);
    }

    #[test]
    fn deserialized_press_implies_held() {
        let sample: InputSample = serde_json::from_str(r#"{ "jump_pressed": true, "jump_held": false }"#).unwrap();
        assert!(sample.jump_pressed);
        assert!(sample.jump_held);
        assert_eq!(sample.axis, 0.0);
    }

    #[test]
    fn deserialized_axis_is_clamped() {
        let sample: InputSample = serde_json::from_str(r#"{ "axis": 4.5 }"#).unwrap();
        assert_eq!(sample, InputSample::steer(1.0));
    }

    #[test]
    fn jump_edge_fires_once_per_press() {
        let mut edge = JumpEdge::default();
        let levels = [false, true, true, false, true];
        let pressed: Vec<bool> = levels
            .iter()
            .map(|&held| edge.sample(0.0, held).jump_pressed)
            .collect();
        assert_eq!(pressed, vec![false, true, false, false, true]);
    }

    #[test]
    fn jump_edge_reset_rearms() {
        let mut edge = JumpEdge::default();
        assert!(edge.sample(0.0, true).jump_pressed);
        edge.reset();
        assert!(edge.sample(0.0, true).jump_pressed);
    }
}
