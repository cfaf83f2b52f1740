#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use evo_stat_mods::host::{
    BodyPart, Catalog, Host, ItemTemplate, ObjectId, PlayerEnterListener, StatEnv, StatFunc,
    StatOwner,
};
use evo_stat_mods::shared::{Channel, ClassId, Creature, ItemId, Player};

pub const SLOT_R_HAND: BodyPart = 0x0080;
pub const SLOT_CHEST: BodyPart = 0x0400;
pub const SLOT_LR_HAND: BodyPart = 0x4000;

pub const DRAGON_SLAYER: ItemId = 81;
pub const ANGEL_SLAYER: ItemId = 6367;
pub const DRACONIC_ARMOR: ItemId = 6379;

#[derive(Clone, Default)]
pub struct MockPlayer {
    pub class_id: ClassId,
    pub oly_participant: bool,
    pub oly_started: bool,
    pub paperdoll: HashMap<usize, ItemId>,
}

impl MockPlayer {
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            ..Default::default()
        }
    }

    pub fn wearing(mut self, slot: usize, item_id: ItemId) -> Self {
        self.paperdoll.insert(slot, item_id);
        self
    }
}

impl Player for MockPlayer {
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

impl Creature for MockPlayer {
    fn as_player(&self) -> Option<&dyn Player> {
        Some(self)
    }
}

pub struct MockMonster;

impl Creature for MockMonster {
    fn as_player(&self) -> Option<&dyn Player> {
        None
    }
}

/// In-memory game server: online players, their stat funcs and enter listeners.
#[derive(Default)]
pub struct MockHost {
    online: Mutex<BTreeMap<ObjectId, MockPlayer>>,
    funcs: Mutex<HashMap<ObjectId, Vec<Arc<dyn StatFunc>>>>,
    listeners: Mutex<Vec<Arc<dyn PlayerEnterListener>>>,
    login_on_subscribe: Mutex<Option<(ObjectId, MockPlayer)>>,
    pub listener_removals: Mutex<usize>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Put a player in the world and fire the enter event.
    pub fn enter(&self, id: ObjectId, player: MockPlayer) {
        self.online.lock().unwrap().insert(id, player);
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener.on_player_enter(id);
        }
    }

    /// Put a player in the world without firing the enter event.
    pub fn spawn_silently(&self, id: ObjectId, player: MockPlayer) {
        self.online.lock().unwrap().insert(id, player);
    }

    /// Have `player` enter the next time a listener subscribes, before it is registered.
    pub fn login_on_subscribe(&self, id: ObjectId, player: MockPlayer) {
        *self.login_on_subscribe.lock().unwrap() = Some((id, player));
    }

    pub fn update(&self, id: ObjectId, change: impl FnOnce(&mut MockPlayer)) {
        if let Some(player) = self.online.lock().unwrap().get_mut(&id) {
            change(player);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn func_count(&self, id: ObjectId) -> usize {
        self.funcs.lock().unwrap().get(&id).map_or(0, Vec::len)
    }

    pub fn funcs_of(&self, id: ObjectId) -> Vec<Arc<dyn StatFunc>> {
        self.funcs.lock().unwrap().get(&id).cloned().unwrap_or_default()
    }

    /// Run the player's funcs for `stat` in order, starting from `base`.
    pub fn calc(&self, id: ObjectId, stat: &str, base: f64, target: Option<&dyn Creature>) -> f64 {
        let channel = Channel::new(stat);
        let mut funcs: Vec<_> = self
            .funcs_of(id)
            .into_iter()
            .filter(|f| f.stat() == &channel)
            .collect();
        funcs.sort_by_key(|f| f.order());

        let online = self.online.lock().unwrap();
        let player = online.get(&id).expect("player online");
        let mut env = StatEnv {
            character: Some(player),
            target,
            value: base,
        };
        for func in funcs {
            func.calc(&mut env);
        }
        env.value
    }
}

impl Catalog for MockHost {
    fn item_template(&self, item_id: ItemId) -> Option<ItemTemplate> {
        let body_part = match item_id {
            DRAGON_SLAYER => SLOT_R_HAND,
            ANGEL_SLAYER => SLOT_LR_HAND,
            DRACONIC_ARMOR => SLOT_CHEST,
            _ => return None,
        };
        Some(ItemTemplate { item_id, body_part })
    }

    fn paperdoll_index(&self, body_part: BodyPart) -> Option<usize> {
        match body_part {
            SLOT_R_HAND => Some(7),
            SLOT_CHEST => Some(10),
            SLOT_LR_HAND => Some(14),
            _ => None,
        }
    }
}

impl Host for MockHost {
    fn add_stat_func(&self, player: ObjectId, func: Arc<dyn StatFunc>) {
        self.funcs.lock().unwrap().entry(player).or_default().push(func);
    }

    fn remove_stats_owner(&self, player: ObjectId, owner: &StatOwner) {
        if let Some(funcs) = self.funcs.lock().unwrap().get_mut(&player) {
            funcs.retain(|f| f.owner() != owner);
        }
    }

    fn add_enter_listener(&self, listener: Arc<dyn PlayerEnterListener>) {
        let login = self.login_on_subscribe.lock().unwrap().take();
        if let Some((id, player)) = login {
            self.enter(id, player);
        }
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_enter_listener(&self, listener: &Arc<dyn PlayerEnterListener>) {
        *self.listener_removals.lock().unwrap() += 1;
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    fn online_players(&self) -> Vec<ObjectId> {
        self.online.lock().unwrap().keys().copied().collect()
    }
}

/// Rule file in a scratch directory, removed on drop.
pub struct RuleFile {
    path: PathBuf,
}

impl RuleFile {
    pub fn new(name: &str, xml: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("evo_stat_mods_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{name}.xml"));
        std::fs::write(&path, xml).unwrap();
        Self { path }
    }

    pub fn rewrite(&self, xml: &str) {
        std::fs::write(&self.path, xml).unwrap();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RuleFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
