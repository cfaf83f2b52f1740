//! Publishing rule snapshots and wiring them into live players.
//!
//! One `ArcSwap` holds the snapshot every new hook captures. Load, shutdown and the
//! enter handler serialize on a gate so a shutdown never races an attach; the stat
//! funcs themselves never touch it.

use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, error, info};

use evo_stat_mods_shared::{Channel, Creature, RuleRegistry, evaluate};

use crate::config::ModConfig;
use crate::hook::StatModFunc;
use crate::host::{Host, ObjectId, PlayerEnterListener, StatOwner};
use crate::parser::{RuleSource, read_rules};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleReason {
    Missing,
    Disabled,
    NoRules,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Enabled { channels: usize, rules: usize },
    Idle(IdleReason),
    /// The file was rejected; whatever was published before is still live.
    Failed,
}

struct State<H> {
    host: H,
    current: ArcSwap<RuleRegistry>,
    gate: Mutex<()>,
    order: u32,
    owner: StatOwner,
}

impl<H: Host> State<H> {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace whatever this module had on the player with one func per channel.
    fn attach(&self, player: ObjectId, registry: &Arc<RuleRegistry>) {
        self.host.remove_stats_owner(player, &self.owner);
        for channel in registry.channels() {
            let func = StatModFunc::new(
                channel.clone(),
                registry.clone(),
                self.order,
                self.owner.clone(),
            );
            self.host.add_stat_func(player, Arc::new(func));
        }
        debug!("Attached {} stat funcs to player {player}", registry.channel_count());
    }

    fn player_entered(&self, player: ObjectId) {
        let _gate = self.lock();
        let registry = self.current.load_full();
        if registry.is_empty() {
            return;
        }
        self.attach(player, &registry);
    }
}

struct EnterListener<H> {
    state: Weak<State<H>>,
}

impl<H: Host> PlayerEnterListener for EnterListener<H> {
    fn on_player_enter(&self, player: ObjectId) {
        if let Some(state) = self.state.upgrade() {
            state.player_entered(player);
        }
    }
}

/// The stat modifier module as seen by the server's script manager.
pub struct StatModifierExt<H: Host> {
    state: Arc<State<H>>,
    config: ModConfig,
    listener: Option<Arc<dyn PlayerEnterListener>>,
}

impl<H: Host> StatModifierExt<H> {
    pub fn new(host: H, config: ModConfig) -> Self {
        let state = State {
            host,
            current: ArcSwap::new(RuleRegistry::empty()),
            gate: Mutex::new(()),
            order: config.func_order,
            owner: config.owner.clone(),
        };
        Self {
            state: Arc::new(state),
            config,
            listener: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.state.host
    }

    pub fn config(&self) -> &ModConfig {
        &self.config
    }

    /// The published snapshot. Empty while idle.
    pub fn current(&self) -> Arc<RuleRegistry> {
        self.state.current.load_full()
    }

    pub fn is_enabled(&self) -> bool {
        self.listener.is_some()
    }

    /// Apply the published rules to `value` without going through a host hook.
    pub fn evaluate(
        &self,
        channel: &Channel,
        value: f64,
        subject: Option<&dyn Creature>,
        target: Option<&dyn Creature>,
    ) -> f64 {
        evaluate(&self.state.current.load(), channel, value, subject, target)
    }

    /// Read the rule file and go live with it.
    ///
    /// Never fails outward: a rejected file is logged and leaves the current state alone.
    pub fn load(&mut self) -> LoadStatus {
        let path = self.config.rules_path.clone();

        let parsed = match read_rules(&path, &self.state.host) {
            Ok(RuleSource::Rules(parsed)) => parsed,
            Ok(RuleSource::Missing) => {
                info!("Stat modifiers: config file not found: {}", path.display());
                return self.idle(IdleReason::Missing, &path);
            }
            Ok(RuleSource::Disabled) => {
                info!("Stat modifiers: config disabled via 'enabled=\"false\"'.");
                return self.idle(IdleReason::Disabled, &path);
            }
            Err(e) => {
                error!("Stat modifiers: error loading config {}: {e}", path.display());
                return LoadStatus::Failed;
            }
        };

        if parsed.registry.is_empty() {
            return self.idle(IdleReason::NoRules, &path);
        }

        // Subscribe before publishing and outside the gate. Earlier entrants are covered
        // by the online pass.
        if self.listener.is_none() {
            let listener: Arc<dyn PlayerEnterListener> = Arc::new(EnterListener {
                state: Arc::downgrade(&self.state),
            });
            self.state.host.add_enter_listener(listener.clone());
            self.listener = Some(listener);
        }

        let registry = Arc::new(parsed.registry);
        {
            let _gate = self.state.lock();
            self.state.current.store(registry.clone());
            for player in self.state.host.online_players() {
                self.state.attach(player, &registry);
            }
        }

        let status = LoadStatus::Enabled {
            channels: registry.channel_count(),
            rules: registry.rule_count(),
        };
        info!(
            "Stat modifiers: enabled. Config={}, stats={}, rules={}, warnings={}",
            path.display(),
            registry.channel_count(),
            registry.rule_count(),
            parsed.warnings.len()
        );
        status
    }

    pub fn reload(&mut self) -> LoadStatus {
        self.shutdown();
        self.load()
    }

    /// Detach from every player and publish the empty snapshot. Safe to repeat.
    pub fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.state.host.remove_enter_listener(&listener);
        }

        let state = &self.state;
        let _gate = state.lock();
        if !state.current.load().is_empty() {
            let players = state.host.online_players();
            for &player in &players {
                state.host.remove_stats_owner(player, &state.owner);
            }
            debug!("Detached stat funcs from {} players", players.len());
        }
        state.current.store(RuleRegistry::empty());
    }

    /// Same as the host firing the enter event at this module.
    pub fn on_player_enter(&self, player: ObjectId) {
        self.state.player_entered(player);
    }

    fn idle(&mut self, reason: IdleReason, path: &Path) -> LoadStatus {
        self.shutdown();
        info!(
            "Stat modifiers: no modifiers loaded (file: {}). Module is idle.",
            path.display()
        );
        LoadStatus::Idle(reason)
    }
}

impl<H: Host> Drop for StatModifierExt<H> {
    fn drop(&mut self) {
        if self.is_enabled() {
            self.shutdown();
        }
    }
}
