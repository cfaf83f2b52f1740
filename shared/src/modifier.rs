//! Folding matching rules into one multiplier and offset.
//!
//! Multiplier deltas are summed, not multiplied: two `mul val="1.1"` and
//! `mul val="1.05"` rules give `1.15`, not `1.155`. Config authors balance around this.

use crate::actor::{Creature, Player};
use crate::registry::RuleRegistry;
use crate::rules::{Channel, Rule};

/// Accumulated contribution of every matching rule.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Modifier {
    pub mul_delta: f64,
    pub add: f64,
}

impl Modifier {
    pub fn multiplier(&self) -> f64 {
        1.0 + self.mul_delta
    }

    /// Scale, then shift.
    pub fn apply(&self, value: f64) -> f64 {
        value * self.multiplier() + self.add
    }

    pub fn is_neutral(&self) -> bool {
        self.mul_delta == 0.0 && self.add == 0.0
    }

    fn absorb(&mut self, rule: &Rule) {
        self.mul_delta += rule.mul_delta;
        self.add += rule.add;
    }
}

pub fn fold_rules(rules: &[Rule], subject: &dyn Player, target: Option<&dyn Creature>) -> Modifier {
    rules
        .iter()
        .filter(|rule| rule.matches(Some(subject), target))
        .fold(Modifier::default(), |mut acc, rule| {
            acc.absorb(rule);
            acc
        })
}

/// Value of `channel` after this registry's rules, given the value computed so far.
///
/// Non-player subjects and classes without rules get `value` back untouched.
pub fn evaluate(
    registry: &RuleRegistry,
    channel: &Channel,
    value: f64,
    subject: Option<&dyn Creature>,
    target: Option<&dyn Creature>,
) -> f64 {
    let Some(player) = subject.and_then(|creature| creature.as_player()) else {
        return value;
    };

    let rules = registry.rules_for(channel, player.active_class_id());
    if rules.is_empty() {
        return value;
    }

    fold_rules(rules, player, target).apply(value)
}
