//! Views of host entities as seen by rule conditions.
//!
//! The host owns its creatures; conditions only borrow them for the duration of one
//! evaluation through these traits.

use crate::rules::{ClassId, ItemId};

/// Any creature that can show up as the subject or target of a stat calculation.
pub trait Creature {
    /// `Some` when this creature is a player character.
    fn as_player(&self) -> Option<&dyn Player>;
}

/// A player character.
pub trait Player {
    /// Class the player is currently playing (the active sub-class, if any).
    fn active_class_id(&self) -> ClassId;

    /// Registered for an olympiad match.
    fn is_oly_participant(&self) -> bool;

    /// Currently fighting in a started olympiad match.
    fn is_oly_competition_started(&self) -> bool;

    /// Item id occupying the given paperdoll slot.
    fn paperdoll_item_id(&self, slot: usize) -> Option<ItemId>;

    fn in_competition(&self) -> bool {
        self.is_oly_participant() || self.is_oly_competition_started()
    }
}
