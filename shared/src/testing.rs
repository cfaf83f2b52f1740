use std::collections::HashMap;

use crate::actor::{Creature, Player};
use crate::rules::{ClassId, ItemId};

#[derive(Default)]
pub struct TestPlayer {
    pub class_id: ClassId,
    pub oly_participant: bool,
    pub oly_started: bool,
    pub paperdoll: HashMap<usize, ItemId>,
}

impl TestPlayer {
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            ..Default::default()
        }
    }

    pub fn equip(&mut self, slot: usize, item_id: ItemId) {
        self.paperdoll.insert(slot, item_id);
    }
}

impl Player for TestPlayer {
    fn active_class_id(&self) -> ClassId {
        self.class_id
    }

    fn is_oly_participant(&self) -> bool {
        self.oly_participant
    }

    fn is_oly_competition_started(&self) -> bool {
        self.oly_started
    }

    fn paperdoll_item_id(&self, slot: usize) -> Option<ItemId> {
        self.paperdoll.get(&slot).copied()
    }
}

impl Creature for TestPlayer {
    fn as_player(&self) -> Option<&dyn Player> {
        Some(self)
    }
}

pub struct TestMonster;

impl Creature for TestMonster {
    fn as_player(&self) -> Option<&dyn Player> {
        None
    }
}
