//! Paperdoll slot indices and the two-hand slot alias.

/// Right hand. Two-handed weapons are stored here.
pub const PAPERDOLL_RHAND: usize = 7;

/// Index the host reports for two-handed items. Nothing is ever stored in it.
pub const PAPERDOLL_LRHAND: usize = 14;

/// Map a host paperdoll index to the slot that actually holds the item.
pub fn equip_slot(index: usize) -> usize {
    if index == PAPERDOLL_LRHAND {
        PAPERDOLL_RHAND
    } else {
        index
    }
}
