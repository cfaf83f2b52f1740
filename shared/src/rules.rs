//! Data-driven stat modifier rules
//!
//! Built from small blocks: conditions test a (subject, target) pair, a rule is an
//! ordered condition chain plus the multiplier delta and additive offset it contributes
//! to one stat channel.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

use crate::actor::{Creature, Player};

pub type ClassId = i32;
pub type ItemId = i32;

// ============================================================================
// LEVEL 1: CHANNELS
// ============================================================================

/// A host stat channel, identified by its data file name (`pAtk`, `runSpd`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(pub SmolStr);

impl Channel {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// LEVEL 2: CONDITIONS
// ============================================================================

/// Olympiad scoping of a rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionMode {
    OlyOnly,
    NonOlyOnly,
    #[default]
    Any,
}

impl CompetitionMode {
    /// Parse the data file spelling (`OLY_ONLY`, `NON_OLY_ONLY`, `ANY`), ignoring case.
    pub fn from_xml(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "OLY_ONLY" => Some(Self::OlyOnly),
            "NON_OLY_ONLY" => Some(Self::NonOlyOnly),
            "ANY" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn allows(self, in_competition: bool) -> bool {
        match self {
            Self::OlyOnly => in_competition,
            Self::NonOlyOnly => !in_competition,
            Self::Any => true,
        }
    }
}

/// An item the subject must wear, with its paperdoll slot already resolved.
///
/// `slot` is `None` when the host has no slot for the item's body part; such an item
/// never counts as equipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_id: ItemId,
    pub slot: Option<usize>,
}

impl EquippedItem {
    pub fn is_worn_by(&self, player: &dyn Player) -> bool {
        self.slot
            .and_then(|slot| player.paperdoll_item_id(slot))
            .is_some_and(|worn| worn == self.item_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Subject plays `class_id` and its olympiad state fits `mode`.
    SubjectClass {
        class_id: ClassId,
        mode: CompetitionMode,
    },
    /// Target is a player of this class.
    TargetClass(ClassId),
    /// Subject wears at least one of these items.
    Equipped(Vec<EquippedItem>),
}

impl Condition {
    pub fn test(&self, subject: Option<&dyn Player>, target: Option<&dyn Creature>) -> bool {
        match self {
            Condition::SubjectClass { class_id, mode } => subject.is_some_and(|player| {
                player.active_class_id() == *class_id && mode.allows(player.in_competition())
            }),
            Condition::TargetClass(class_id) => target
                .and_then(|creature| creature.as_player())
                .is_some_and(|player| player.active_class_id() == *class_id),
            Condition::Equipped(items) => subject
                .is_some_and(|player| items.iter().any(|item| item.is_worn_by(player))),
        }
    }
}

/// Short-circuit AND over an ordered condition chain.
pub fn check_conditions(
    conditions: &[Condition],
    subject: Option<&dyn Player>,
    target: Option<&dyn Creature>,
) -> bool {
    conditions.iter().all(|c| c.test(subject, target))
}

// ============================================================================
// LEVEL 3: RULES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub channel: Channel,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Added to the multiplier; a `mul val="1.2"` directive stores `0.2`.
    #[serde(default)]
    pub mul_delta: f64,
    #[serde(default)]
    pub add: f64,
}

impl Rule {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            conditions: Vec::new(),
            mul_delta: 0.0,
            add: 0.0,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Append a copy of `conditions` to the chain.
    pub fn with_conditions(mut self, conditions: &[Condition]) -> Self {
        self.conditions.extend_from_slice(conditions);
        self
    }

    /// Scale by `factor`, stored as the delta `factor - 1.0`.
    pub fn mul(mut self, factor: f64) -> Self {
        self.mul_delta += factor - 1.0;
        self
    }

    pub fn add(mut self, value: f64) -> Self {
        self.add = value;
        self
    }

    pub fn matches(&self, subject: Option<&dyn Player>, target: Option<&dyn Creature>) -> bool {
        check_conditions(&self.conditions, subject, target)
    }
}
