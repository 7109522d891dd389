//! Caster spellcasting data - the slice of a character sheet the ring reads.
//!
//! The host owns the full sheet. A `CasterProfile` carries just enough to
//! snapshot the caster's power and to account for the slot spent on storing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{
    CasterSnapshot, SlotKind, DEFAULT_SPELL_ATTACK_BONUS, DEFAULT_SPELL_SAVE_DC,
    MAX_STORABLE_LEVEL,
};
use crate::ids::CasterId;

/// A pool of spell slots at a given level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlotPool {
    /// Currently available slots
    current: u8,
    /// Maximum slots
    max: u8,
}

impl SpellSlotPool {
    /// Create a full pool.
    pub fn new(max: u8) -> Self {
        Self { current: max, max }
    }

    /// Create a pool with some slots already spent. `current` is capped at `max`.
    pub fn with_current(current: u8, max: u8) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn has_slots(&self) -> bool {
        self.current > 0
    }

    /// Use one slot. Returns false when the pool is empty.
    pub fn use_slot(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Give back one slot, never above `max`.
    pub fn restore_one(&mut self) {
        self.current = self.current.saturating_add(1).min(self.max);
    }
}

/// Pact magic: a single pool whose slots are all of one level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PactSlots {
    pub level: u8,
    pub pool: SpellSlotPool,
}

/// A slot the caster could spend to store a particular spell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotOption {
    pub level: u8,
    pub kind: SlotKind,
    pub available: u8,
    pub max: u8,
}

impl SlotOption {
    pub fn is_available(&self) -> bool {
        self.available > 0
    }
}

/// Spellcasting view of a character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CasterProfile {
    id: CasterId,
    name: String,
    /// Spell attack bonus, if the sheet computes one
    #[serde(default)]
    attack_bonus: Option<i32>,
    /// Spell save DC, if the sheet computes one
    #[serde(default)]
    save_dc: Option<i32>,
    /// Regular slots by level (1-9)
    #[serde(default)]
    slots: BTreeMap<u8, SpellSlotPool>,
    #[serde(default)]
    pact: Option<PactSlots>,
}

impl CasterProfile {
    pub fn new(id: CasterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attack_bonus: None,
            save_dc: None,
            slots: BTreeMap::new(),
            pact: None,
        }
    }

    pub fn with_spellcasting(mut self, attack_bonus: i32, save_dc: i32) -> Self {
        self.attack_bonus = Some(attack_bonus);
        self.save_dc = Some(save_dc);
        self
    }

    pub fn with_slots(mut self, level: u8, pool: SpellSlotPool) -> Self {
        self.slots.insert(level, pool);
        self
    }

    pub fn with_pact_slots(mut self, level: u8, pool: SpellSlotPool) -> Self {
        self.pact = Some(PactSlots { level, pool });
        self
    }

    pub fn id(&self) -> &CasterId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &BTreeMap<u8, SpellSlotPool> {
        &self.slots
    }

    pub fn pact(&self) -> Option<&PactSlots> {
        self.pact.as_ref()
    }

    /// Whether the character has any slot pool at all.
    pub fn is_spellcaster(&self) -> bool {
        self.slots.values().any(|p| p.max() > 0)
            || self.pact.is_some_and(|p| p.pool.max() > 0)
    }

    /// Freeze the caster's current power for a stored spell.
    pub fn snapshot(&self) -> CasterSnapshot {
        CasterSnapshot {
            caster_id: Some(self.id.clone()),
            caster_name: self.name.clone(),
            attack_bonus: self.attack_bonus.unwrap_or(DEFAULT_SPELL_ATTACK_BONUS),
            save_dc: self.save_dc.unwrap_or(DEFAULT_SPELL_SAVE_DC),
        }
    }

    /// Slots this caster could spend to store a spell of `base_level`.
    /// Empty for cantrips.
    ///
    /// Regular slots from the spell's level up to the ring's ceiling, in
    /// ascending order, followed by the pact pool when its level fits. Pools
    /// with `max == 0` are skipped; empty-but-real pools are listed with
    /// `available == 0` so a UI can show them disabled.
    pub fn storable_slot_options(&self, base_level: u8) -> Vec<SlotOption> {
        if base_level == 0 {
            return Vec::new();
        }
        let mut options: Vec<SlotOption> = self
            .slots
            .range(base_level..=MAX_STORABLE_LEVEL)
            .filter(|(_, pool)| pool.max() > 0)
            .map(|(&level, pool)| SlotOption {
                level,
                kind: SlotKind::Spell,
                available: pool.current(),
                max: pool.max(),
            })
            .collect();

        if let Some(pact) = self.pact {
            if pact.pool.max() > 0 && (base_level..=MAX_STORABLE_LEVEL).contains(&pact.level) {
                options.push(SlotOption {
                    level: pact.level,
                    kind: SlotKind::Pact,
                    available: pact.pool.current(),
                    max: pact.pool.max(),
                });
            }
        }

        options
    }

    /// Spend one slot of the given level and kind.
    ///
    /// Pact slots only match when `level` equals the pact level.
    pub fn consume_slot(&mut self, level: u8, kind: SlotKind) -> bool {
        match kind {
            SlotKind::Spell => self
                .slots
                .get_mut(&level)
                .is_some_and(|pool| pool.use_slot()),
            SlotKind::Pact => match self.pact.as_mut() {
                Some(pact) if pact.level == level => pact.pool.use_slot(),
                _ => false,
            },
        }
    }

    /// Give back a slot previously spent with `consume_slot`.
    ///
    /// Returns false if no matching pool exists.
    pub fn restore_slot(&mut self, level: u8, kind: SlotKind) -> bool {
        match kind {
            SlotKind::Spell => match self.slots.get_mut(&level) {
                Some(pool) => {
                    pool.restore_one();
                    true
                }
                None => false,
            },
            SlotKind::Pact => match self.pact.as_mut() {
                Some(pact) if pact.level == level => {
                    pact.pool.restore_one();
                    true
                }
                _ => false,
            },
        }
    }
}
