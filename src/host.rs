//! What the module needs from the game server.
//!
//! The server owns players, their stat pipelines and the item data; these traits are the
//! only way the module reaches them.

use std::sync::Arc;

use evo_stat_mods_shared::{Channel, Creature, ItemId};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub type ObjectId = u32;

/// Body part bitmask of an item template.
pub type BodyPart = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemTemplate {
    pub item_id: ItemId,
    pub body_part: BodyPart,
}

/// Tag under which stat funcs are grouped so one owner can remove all of its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatOwner(pub SmolStr);

impl StatOwner {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }
}

impl Default for StatOwner {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Static game data, consulted only while loading rules.
pub trait Catalog {
    fn item_template(&self, item_id: ItemId) -> Option<ItemTemplate>;

    /// Paperdoll index for a body part, `None` if the item cannot be worn.
    fn paperdoll_index(&self, body_part: BodyPart) -> Option<usize>;

    /// Resolve a stat name used in the rule file.
    fn stat(&self, name: &str) -> Option<Channel> {
        (!name.is_empty()).then(|| Channel::new(name))
    }
}

/// One step of a stat calculation.
pub struct StatEnv<'a> {
    pub character: Option<&'a dyn Creature>,
    pub target: Option<&'a dyn Creature>,
    pub value: f64,
}

/// A function the host runs while computing one stat of one player.
///
/// Funcs on the same stat run in ascending `order`.
pub trait StatFunc: Send + Sync {
    fn stat(&self) -> &Channel;
    fn order(&self) -> u32;
    fn owner(&self) -> &StatOwner;
    fn calc(&self, env: &mut StatEnv<'_>);
}

pub trait PlayerEnterListener: Send + Sync {
    fn on_player_enter(&self, player: ObjectId);
}

/// The running game server.
pub trait Host: Catalog + Send + Sync + 'static {
    fn add_stat_func(&self, player: ObjectId, func: Arc<dyn StatFunc>);

    /// Drop every stat func of `owner` from the player.
    fn remove_stats_owner(&self, player: ObjectId, owner: &StatOwner);

    /// Called for every player entering the world.
    fn add_enter_listener(&self, listener: Arc<dyn PlayerEnterListener>);

    fn remove_enter_listener(&self, listener: &Arc<dyn PlayerEnterListener>);

    fn online_players(&self) -> Vec<ObjectId>;
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn item_template(&self, item_id: ItemId) -> Option<ItemTemplate> {
        (**self).item_template(item_id)
    }

    fn paperdoll_index(&self, body_part: BodyPart) -> Option<usize> {
        (**self).paperdoll_index(body_part)
    }

    fn stat(&self, name: &str) -> Option<Channel> {
        (**self).stat(name)
    }
}

impl<H: Host> Host for Arc<H> {
    fn add_stat_func(&self, player: ObjectId, func: Arc<dyn StatFunc>) {
        (**self).add_stat_func(player, func)
    }

    fn remove_stats_owner(&self, player: ObjectId, owner: &StatOwner) {
        (**self).remove_stats_owner(player, owner)
    }

    fn add_enter_listener(&self, listener: Arc<dyn PlayerEnterListener>) {
        (**self).add_enter_listener(listener)
    }

    fn remove_enter_listener(&self, listener: &Arc<dyn PlayerEnterListener>) {
        (**self).remove_enter_listener(listener)
    }

    fn online_players(&self) -> Vec<ObjectId> {
        (**self).online_players()
    }
}
