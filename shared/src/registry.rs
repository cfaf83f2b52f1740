//! Rule snapshot indexed by channel, then by subject class.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::rules::{Channel, ClassId, Rule};

static EMPTY: LazyLock<Arc<RuleRegistry>> = LazyLock::new(|| Arc::new(RuleRegistry::default()));

/// Immutable once built. Rule order inside a class list is load order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleRegistry {
    by_channel: HashMap<Channel, HashMap<ClassId, Vec<Rule>>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared empty snapshot, published while the module is idle.
    pub fn empty() -> Arc<Self> {
        EMPTY.clone()
    }

    /// Append `rule` to the list of `class_id` on the rule's channel.
    pub fn push(&mut self, class_id: ClassId, rule: Rule) {
        self.by_channel
            .entry(rule.channel.clone())
            .or_default()
            .entry(class_id)
            .or_default()
            .push(rule);
    }

    pub fn with(mut self, class_id: ClassId, rule: Rule) -> Self {
        self.push(class_id, rule);
        self
    }

    pub fn rules_for(&self, channel: &Channel, class_id: ClassId) -> &[Rule] {
        self.by_channel
            .get(channel)
            .and_then(|by_class| by_class.get(&class_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.by_channel.keys()
    }

    pub fn channel_count(&self) -> usize {
        self.by_channel.len()
    }

    pub fn rule_count(&self) -> usize {
        self.by_channel
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_channel.is_empty()
    }
}
