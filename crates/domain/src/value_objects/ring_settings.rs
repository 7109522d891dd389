//! Ring settings value object
//!
//! Settings are plain serde data so they can be loaded from the environment,
//! stored next to a world, or sent to a UI unchanged.

use serde::{Deserialize, Serialize};

use crate::aggregates::SpellStorageLedger;
use crate::entities::SpellDescriptor;

fn default_capacity_levels() -> u32 {
    SpellStorageLedger::DEFAULT_CAPACITY
}

fn default_allow_self_spells() -> bool {
    true
}

/// Table-level rules for every ring in a world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RingSettings {
    /// Total spell levels a ring can hold
    #[serde(default = "default_capacity_levels")]
    pub capacity_levels: u32,

    /// Whether spells that only target their caster may be stored
    #[serde(default = "default_allow_self_spells")]
    pub allow_self_spells: bool,
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            capacity_levels: default_capacity_levels(),
            allow_self_spells: default_allow_self_spells(),
        }
    }
}

impl RingSettings {
    /// Whether table policy lets this spell into a ring at all.
    pub fn permits(&self, spell: &SpellDescriptor) -> bool {
        self.allow_self_spells || !spell.targets_self()
    }

    /// An empty ledger sized for these settings.
    pub fn empty_ledger(&self) -> SpellStorageLedger {
        SpellStorageLedger::with_capacity(self.capacity_levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SpellTarget;
    use crate::ids::SpellId;

    #[test]
    fn defaults_match_standard_ring() {
        let settings = RingSettings::default();
        assert_eq!(settings.capacity_levels, 5);
        assert!(settings.allow_self_spells);
        assert_eq!(settings.empty_ledger().capacity(), 5);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let settings: RingSettings = serde_json::from_str("{\"allowSelfSpells\": false}").unwrap();
        assert_eq!(settings.capacity_levels, 5);
        assert!(!settings.allow_self_spells);
    }

    #[test]
    fn self_spells_blocked_only_when_disallowed() {
        let shield = SpellDescriptor::new(SpellId::new("shield").unwrap(), "Shield", 1)
            .unwrap()
            .with_target(SpellTarget::SelfOnly);
        let web = SpellDescriptor::new(SpellId::new("web").unwrap(), "Web", 2).unwrap();

        let strict = RingSettings {
            allow_self_spells: false,
            ..RingSettings::default()
        };
        assert!(!strict.permits(&shield));
        assert!(strict.permits(&web));
        assert!(RingSettings::default().permits(&shield));
    }
}
