//! SpellStorageLedger aggregate - the spells held by one ring.
//!
//! # Lifecycle
//!
//! A ledger lives for exactly one operation: it is decoded from the host
//! document, mutated at most a few times, serialized back, and dropped. The
//! host document is the only state that survives between operations.
//!
//! # Invariants
//!
//! - Every successful mutation leaves `compute_used_levels() <= capacity()`
//! - A failed mutation leaves the ledger untouched
//! - `revision` advances by one on each successful mutation and never
//!   passes [`MAX_REVISION`]
//!
//! A document loaded from the host may already be over capacity (two clients
//! racing, or hand-edited data). That ledger is still usable: stores fail
//! until enough entries are removed.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::aggregates::ledger_document::{self, LedgerDocument, StoredSpellRecord, MAX_REVISION};
use crate::entities::{
    CasterSnapshot, SlotKind, SpellDescriptor, StoredSpellEntry, MAX_STORABLE_LEVEL,
};
use crate::error::LedgerError;

/// What `load` found in the raw host data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Records skipped because they were malformed
    pub dropped: usize,
    /// Levels used by the records that were kept
    pub used_levels: u32,
    pub capacity: u32,
    /// The stored revision was out of range and restarted at 0
    pub revision_reset: bool,
}

impl LoadReport {
    pub fn is_over_capacity(&self) -> bool {
        self.used_levels > self.capacity
    }

    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && !self.is_over_capacity() && !self.revision_reset
    }
}

/// Capacity-limited list of stored spells.
///
/// Entries are addressed by index. Removing an entry shifts every later
/// index down by one, so indices must not be reused across mutations.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use spellring_domain::{CasterId, CasterProfile, SlotKind, SpellDescriptor, SpellId};
/// use spellring_domain::aggregates::SpellStorageLedger;
///
/// let caster = CasterProfile::new(CasterId::new("gale").unwrap(), "Gale")
///     .with_spellcasting(7, 15);
/// let fireball = SpellDescriptor::new(SpellId::new("fireball").unwrap(), "Fireball", 3).unwrap();
///
/// let mut ledger = SpellStorageLedger::new();
/// ledger.store(&fireball, caster.snapshot(), 3, SlotKind::Spell, Utc::now()).unwrap();
///
/// assert_eq!(ledger.compute_used_levels(), 3);
/// assert_eq!(ledger.remaining_capacity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellStorageLedger {
    capacity: u32,
    entries: Vec<StoredSpellEntry>,
    revision: u64,
}

impl Default for SpellStorageLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellStorageLedger {
    /// Level budget of a standard Ring of Spell Storing.
    pub const DEFAULT_CAPACITY: u32 = 5;

    // =========================================================================
    // Construction
    // =========================================================================

    /// Empty ledger with the standard 5-level budget.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Empty ledger with a custom level budget.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
            revision: 0,
        }
    }

    /// Decode untrusted host data with the standard budget.
    pub fn load(raw: &Value) -> (Self, LoadReport) {
        Self::load_with_capacity(raw, Self::DEFAULT_CAPACITY)
    }

    /// Decode untrusted host data. Never fails: malformed records are
    /// dropped and counted in the report.
    pub fn load_with_capacity(raw: &Value, capacity: u32) -> (Self, LoadReport) {
        let decoded = ledger_document::decode(raw);
        let ledger = Self {
            capacity,
            entries: decoded.entries,
            revision: decoded.revision,
        };
        let report = LoadReport {
            dropped: decoded.dropped,
            used_levels: ledger.compute_used_levels(),
            capacity,
            revision_reset: decoded.revision_reset,
        };
        (ledger, report)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn entries(&self) -> &[StoredSpellEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&StoredSpellEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Revision of the host document this ledger reflects, plus one per
    /// mutation applied since.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sum of stored levels across all entries.
    pub fn compute_used_levels(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| u32::from(e.stored_level()))
            .sum()
    }

    /// Levels still free. Zero when the ledger was loaded over capacity.
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.compute_used_levels())
    }

    pub fn can_store(&self, level: u8) -> bool {
        u32::from(level) <= self.remaining_capacity()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Store a spell at `requested_level`.
    ///
    /// Checks, first failure wins:
    /// 1. the spell is not a cantrip and `requested_level` is at least its
    ///    base level
    /// 2. `requested_level` is at most [`MAX_STORABLE_LEVEL`]
    /// 3. the ring has `requested_level` levels free
    ///
    /// Content policy (e.g. refusing self-targeting spells) is the caller's
    /// job, as is spending the caster's slot and persisting the result.
    pub fn store(
        &mut self,
        spell: &SpellDescriptor,
        caster: CasterSnapshot,
        requested_level: u8,
        slot_kind: SlotKind,
        now: DateTime<Utc>,
    ) -> Result<StoredSpellEntry, LedgerError> {
        let min_level = spell.base_level();
        let level_ok =
            !spell.is_cantrip() && (min_level..=MAX_STORABLE_LEVEL).contains(&requested_level);
        if !level_ok {
            return Err(LedgerError::invalid_level(
                requested_level,
                min_level,
                MAX_STORABLE_LEVEL,
            ));
        }
        if !self.can_store(requested_level) {
            return Err(LedgerError::insufficient_capacity(
                u32::from(requested_level),
                self.remaining_capacity(),
            ));
        }

        let revision = self.next_revision()?;
        let entry = StoredSpellEntry::capture(spell, caster, requested_level, slot_kind, now);
        self.entries.push(entry.clone());
        self.revision = revision;
        Ok(entry)
    }

    /// Take the entry at `index` out of the ring to be cast.
    ///
    /// The returned entry carries the original caster's snapshot; resolving
    /// the spell is up to the caller.
    pub fn cast_at(&mut self, index: usize) -> Result<StoredSpellEntry, LedgerError> {
        self.take(index)
    }

    /// Discard the entry at `index` without casting it.
    pub fn remove_at(&mut self, index: usize) -> Result<StoredSpellEntry, LedgerError> {
        self.take(index)
    }

    fn take(&mut self, index: usize) -> Result<StoredSpellEntry, LedgerError> {
        if index >= self.entries.len() {
            return Err(LedgerError::not_found(index, self.entries.len()));
        }
        let revision = self.next_revision()?;
        let entry = self.entries.remove(index);
        self.revision = revision;
        Ok(entry)
    }

    fn next_revision(&self) -> Result<u64, LedgerError> {
        self.revision
            .checked_add(1)
            .filter(|r| *r <= MAX_REVISION)
            .ok_or(LedgerError::RevisionExhausted {
                revision: self.revision,
            })
    }

    // =========================================================================
    // Persistence shape
    // =========================================================================

    pub fn to_document(&self) -> LedgerDocument {
        LedgerDocument {
            stored_spells: self.entries.iter().map(StoredSpellRecord::from).collect(),
            revision: self.revision,
        }
    }

    /// Value to hand to the host document store. Inverse of [`Self::load`].
    pub fn serialize(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.to_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CasterId, SpellId};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn caster() -> CasterSnapshot {
        CasterSnapshot {
            caster_id: Some(CasterId::new("gale").unwrap()),
            caster_name: "Gale".into(),
            attack_bonus: 7,
            save_dc: 15,
        }
    }

    fn spell(id: &str, name: &str, base_level: u8) -> SpellDescriptor {
        SpellDescriptor::new(SpellId::new(id).unwrap(), name, base_level).unwrap()
    }

    fn store(
        ledger: &mut SpellStorageLedger,
        s: &SpellDescriptor,
        level: u8,
    ) -> Result<StoredSpellEntry, LedgerError> {
        ledger.store(s, caster(), level, SlotKind::Spell, now())
    }

    #[test]
    fn new_ledger_is_empty_with_standard_budget() {
        let ledger = SpellStorageLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.capacity(), 5);
        assert_eq!(ledger.compute_used_levels(), 0);
        assert_eq!(ledger.remaining_capacity(), 5);
        assert!(ledger.can_store(5));
        assert!(!ledger.can_store(6));
    }

    #[test]
    fn cannot_store_below_spell_minimum() {
        let mut ledger = SpellStorageLedger::new();
        let fireball = spell("fireball", "Fireball", 3);

        let err = store(&mut ledger, &fireball, 2).unwrap_err();
        assert_eq!(err, LedgerError::invalid_level(2, 3, 5));
        assert!(ledger.is_empty());
        assert_eq!(ledger.revision(), 0);
    }

    #[test]
    fn cantrips_cannot_be_stored() {
        let mut ledger = SpellStorageLedger::new();
        let fire_bolt = spell("fire-bolt", "Fire Bolt", 0);

        for level in 0..=MAX_STORABLE_LEVEL {
            let err = store(&mut ledger, &fire_bolt, level).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidLevel { min: 0, .. }));
        }
        assert!(ledger.is_empty());
        assert_eq!(ledger.revision(), 0);
    }

    #[test]
    fn can_store_at_minimum_or_upcast() {
        let fireball = spell("fireball", "Fireball", 3);

        let mut ledger = SpellStorageLedger::new();
        let entry = store(&mut ledger, &fireball, 3).unwrap();
        assert!(!entry.is_upcast());

        let mut ledger = SpellStorageLedger::new();
        let entry = store(&mut ledger, &fireball, 5).unwrap();
        assert!(entry.is_upcast());
        assert_eq!(entry.base_level(), 3);
    }

    #[test]
    fn cannot_store_above_ring_ceiling() {
        let mut ledger = SpellStorageLedger::with_capacity(10);
        let bolt = spell("chain-lightning", "Chain Lightning", 6);

        let err = store(&mut ledger, &bolt, 6).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidLevel { requested: 6, .. }));

        let missile = spell("magic-missile", "Magic Missile", 1);
        let err = store(&mut ledger, &missile, 6).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidLevel { max: 5, .. }));
    }

    #[test]
    fn invalid_level_checked_before_capacity() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("cone", "Cone of Cold", 5), 5).unwrap();

        let err = store(&mut ledger, &spell("fireball", "Fireball", 3), 2).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidLevel { .. }));
    }

    #[test]
    fn capacity_boundary() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("cone", "Cone of Cold", 5), 5).unwrap();

        let err = store(&mut ledger, &spell("shield", "Shield", 1), 1).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_capacity(1, 0));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.revision(), 1);
    }

    #[test]
    fn custom_capacity_is_respected() {
        let mut ledger = SpellStorageLedger::with_capacity(3);
        let err = store(&mut ledger, &spell("cone", "Cone of Cold", 5), 5).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_capacity(5, 3));
    }

    #[test]
    fn removal_shifts_later_indices() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("a", "A", 1), 1).unwrap();
        store(&mut ledger, &spell("b", "B", 2), 2).unwrap();

        let removed = ledger.remove_at(0).unwrap();
        assert_eq!(removed.name(), "A");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].name(), "B");

        let cast = ledger.cast_at(0).unwrap();
        assert_eq!(cast.name(), "B");
        assert!(ledger.is_empty());
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("a", "A", 1), 1).unwrap();
        let before = ledger.clone();

        assert_eq!(ledger.cast_at(1).unwrap_err(), LedgerError::not_found(1, 1));
        assert_eq!(ledger.remove_at(7).unwrap_err(), LedgerError::not_found(7, 1));
        assert_eq!(ledger, before);
    }

    #[test]
    fn cast_hands_back_original_caster_snapshot() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("fireball", "Fireball", 3), 4).unwrap();

        let entry = ledger.cast_at(0).unwrap();
        assert_eq!(entry.caster().attack_bonus, 7);
        assert_eq!(entry.caster().save_dc, 15);
        assert_eq!(entry.stored_level(), 4);
    }

    #[test]
    fn serialize_then_load_round_trips() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("shield", "Shield", 1), 1).unwrap();
        ledger
            .store(&spell("hex", "Hex", 1), caster(), 3, SlotKind::Pact, now())
            .unwrap();

        let (loaded, report) = SpellStorageLedger::load(&ledger.serialize().unwrap());
        assert!(report.is_clean());
        assert_eq!(loaded, ledger);
        assert_eq!(loaded.revision(), 2);
    }

    #[test]
    fn serialized_shape_matches_host_document() {
        let mut ledger = SpellStorageLedger::new();
        store(&mut ledger, &spell("shield", "Shield", 1), 1).unwrap();

        let raw = ledger.serialize().unwrap();
        let first = &raw["storedSpells"][0];
        assert_eq!(first["id"], "shield");
        assert_eq!(first["name"], "Shield");
        assert_eq!(first["level"], 1);
        assert_eq!(first["originalLevel"], 1);
        assert_eq!(first["originalCaster"]["id"], "gale");
        assert_eq!(first["originalCaster"]["spellSaveDC"], 15);
        assert_eq!(first["storedAt"], 1_700_000_000_000_i64);
        assert_eq!(raw["revision"], 1);
    }

    #[test]
    fn load_drops_malformed_records() {
        let raw = json!({ "storedSpells": [
            { "name": "X" },
            { "name": "Y", "level": 2, "casterSnapshot": { "id": "gale", "name": "Gale" } }
        ]});

        let (ledger, report) = SpellStorageLedger::load(&raw);
        assert_eq!(report.dropped, 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].name(), "Y");
        assert_eq!(ledger.compute_used_levels(), 2);
    }

    #[test]
    fn load_tolerates_missing_or_foreign_values() {
        let values = [
            Value::Null,
            json!("garbage"),
            json!(42),
            json!({}),
            json!({ "storedSpells": null }),
        ];
        for raw in values {
            let (ledger, report) = SpellStorageLedger::load(&raw);
            assert!(ledger.is_empty());
            assert_eq!(report.dropped, 0);
        }
    }

    #[test]
    fn over_capacity_load_is_usable_but_blocks_stores() {
        let record = json!({ "name": "Fireball", "level": 3, "originalCaster": { "id": "gale" } });
        let raw = json!({ "storedSpells": [record.clone(), record], "revision": 9 });

        let (mut ledger, report) = SpellStorageLedger::load(&raw);
        assert!(report.is_over_capacity());
        assert_eq!(ledger.compute_used_levels(), 6);
        assert_eq!(ledger.remaining_capacity(), 0);

        let err = store(&mut ledger, &spell("shield", "Shield", 1), 1).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_capacity(1, 0));

        ledger.remove_at(0).unwrap();
        assert_eq!(ledger.remaining_capacity(), 2);
        assert!(store(&mut ledger, &spell("shield", "Shield", 1), 1).is_ok());
        assert_eq!(ledger.revision(), 11);
    }

    #[test]
    fn out_of_range_revision_restarts_at_zero() {
        let (mut ledger, report) =
            SpellStorageLedger::load(&json!({ "storedSpells": [], "revision": u64::MAX }));
        assert!(report.revision_reset);
        assert!(!report.is_clean());
        assert_eq!(ledger.revision(), 0);

        store(&mut ledger, &spell("shield", "Shield", 1), 1).unwrap();
        assert_eq!(ledger.revision(), 1);
    }

    #[test]
    fn exhausted_revision_fails_without_mutating() {
        let record = json!({ "name": "Shield", "level": 1, "originalCaster": {} });
        let raw = json!({ "storedSpells": [record], "revision": MAX_REVISION });
        let (mut ledger, report) = SpellStorageLedger::load(&raw);
        assert!(report.is_clean());
        let before = ledger.clone();

        let err = store(&mut ledger, &spell("web", "Web", 2), 2).unwrap_err();
        assert_eq!(
            err,
            LedgerError::RevisionExhausted {
                revision: MAX_REVISION
            }
        );
        assert!(matches!(
            ledger.cast_at(0),
            Err(LedgerError::RevisionExhausted { .. })
        ));
        assert!(matches!(
            ledger.remove_at(0),
            Err(LedgerError::RevisionExhausted { .. })
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn used_levels_never_exceed_capacity_across_mutations() {
        let mut ledger = SpellStorageLedger::new();
        let spells = [
            spell("shield", "Shield", 1),
            spell("web", "Web", 2),
            spell("fireball", "Fireball", 3),
        ];
        // Deterministic mix of stores, casts and removes
        let script: [(u8, usize); 12] = [
            (1, 0), (2, 1), (3, 2), (0, 0), (3, 2), (2, 1),
            (0, 1), (1, 0), (4, 2), (0, 0), (5, 0), (0, 2),
        ];

        for (level, which) in script {
            if level == 0 {
                let _ = if which % 2 == 0 {
                    ledger.cast_at(which)
                } else {
                    ledger.remove_at(which)
                };
            } else {
                let _ = store(&mut ledger, &spells[which], level);
            }
            assert!(ledger.compute_used_levels() <= ledger.capacity());
        }
    }

    #[test]
    fn concrete_shield_and_fireball_scenario() {
        let mut ledger = SpellStorageLedger::new();
        let shield = spell("shield", "Shield", 1);
        let fireball = spell("fireball", "Fireball", 3);

        store(&mut ledger, &shield, 1).unwrap();
        assert_eq!((ledger.compute_used_levels(), ledger.remaining_capacity()), (1, 4));

        store(&mut ledger, &fireball, 3).unwrap();
        assert_eq!((ledger.compute_used_levels(), ledger.remaining_capacity()), (4, 1));

        let err = store(&mut ledger, &fireball, 3).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_capacity(3, 1));

        let cast = ledger.cast_at(0).unwrap();
        assert_eq!(cast.name(), "Shield");
        assert_eq!((ledger.compute_used_levels(), ledger.remaining_capacity()), (3, 2));

        let removed = ledger.remove_at(0).unwrap();
        assert_eq!(removed.name(), "Fireball");
        assert_eq!((ledger.compute_used_levels(), ledger.remaining_capacity()), (0, 5));
    }
}
