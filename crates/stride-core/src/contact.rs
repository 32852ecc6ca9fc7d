//! Contact-begin reactions: stomping enemies and bonking ceilings.
//!
//! The host collision system reports each new contact with the other body's
//! classification and the direction from this body toward it. Which side was
//! struck is decided by [`dot_test`], a pure function of that direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::MovementState;

/// Minimum alignment for a contact direction to count as "from" a side.
pub const CONTACT_DOT_THRESHOLD: f32 = 0.25;

/// Returns true if `direction` points along `test` by more than the threshold.
///
/// Both vectors are normalized first; a zero direction never passes.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use stride_core::contact::dot_test;
///
/// // The other body is below and slightly to the right: struck from above.
/// assert!(dot_test(Vec2::new(0.3, -1.0), Vec2::NEG_Y));
/// // Side-on contact is not from above.
/// assert!(!dot_test(Vec2::new(1.0, -0.1), Vec2::NEG_Y));
/// ```
#[must_use]
pub fn dot_test(direction: Vec2, test: Vec2) -> bool {
    direction.normalize_or_zero().dot(test.normalize_or_zero()) > CONTACT_DOT_THRESHOLD
}

/// Classification of the other body in a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactTag {
    /// Can be stomped
    Enemy,
    /// Picked up by an external collaborator, no physical reaction
    PowerUp,
    /// Anything else: blocks, platforms, pipes
    Other,
}

/// A contact-begin notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Classification of the other body
    pub tag: ContactTag,
    /// Direction from this body toward the other body
    pub direction: Vec2,
}

impl Contact {
    /// Creates a contact.
    #[must_use]
    pub fn new(tag: ContactTag, direction: Vec2) -> Self {
        Self { tag, direction }
    }
}

/// What the controller did with a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactResponse {
    /// Landed on an enemy from above and rebounded
    Stomp,
    /// Hit something overhead; ascent stopped
    Bonk,
    /// No physical reaction
    Ignored,
}

/// Apply the reaction for `contact` to `state`.
///
/// - Enemy below: rebound at half jump force and mark as jumping
/// - Non-power-up overhead: zero vertical velocity
/// - Anything else: no change
pub fn resolve(state: &mut MovementState, contact: &Contact, jump_force: f32) -> ContactResponse {
    match contact.tag {
        ContactTag::Enemy => {
            if dot_test(contact.direction, Vec2::NEG_Y) {
                state.velocity.y = jump_force / 2.0;
                state.jumping = true;
                debug!(vy = state.velocity.y, "stomp");
                ContactResponse::Stomp
            } else {
                ContactResponse::Ignored
            }
        }
        ContactTag::Other if dot_test(contact.direction, Vec2::Y) => {
            state.velocity.y = 0.0;
            debug!("bonk");
            ContactResponse::Bonk
        }
        ContactTag::Other | ContactTag::PowerUp => ContactResponse::Ignored,
    }
}
