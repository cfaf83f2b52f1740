use std::sync::Arc;

use evo_stat_mods_shared::{Channel, RuleRegistry, evaluate};

use crate::host::{StatEnv, StatFunc, StatOwner};

/// Applies one channel of a rule snapshot inside the host stat pipeline.
///
/// Holds no per-player state, so a single instance can serve every player.
pub struct StatModFunc {
    channel: Channel,
    registry: Arc<RuleRegistry>,
    order: u32,
    owner: StatOwner,
}

impl StatModFunc {
    pub fn new(channel: Channel, registry: Arc<RuleRegistry>, order: u32, owner: StatOwner) -> Self {
        Self {
            channel,
            registry,
            order,
            owner,
        }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }
}

impl StatFunc for StatModFunc {
    fn stat(&self) -> &Channel {
        &self.channel
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn owner(&self) -> &StatOwner {
        &self.owner
    }

    fn calc(&self, env: &mut StatEnv<'_>) {
        env.value = evaluate(&self.registry, &self.channel, env.value, env.character, env.target);
    }
}
