//! Persisted shape of a ring's ledger.
//!
//! ```json
//! {
//!   "storedSpells": [
//!     {
//!       "id": "...", "name": "Fireball",
//!       "level": 3, "originalLevel": 3, "spellType": "spell",
//!       "originalCaster": { "id": "...", "name": "...", "spellAttackBonus": 7, "spellSaveDC": 15 },
//!       "storedAt": 1700000000000
//!     }
//!   ],
//!   "revision": 4
//! }
//! ```
//!
//! Reading is forgiving: host documents may be missing, use the legacy
//! bare-array shape, or hold half-written records. A record is kept as long
//! as it has a name, an integer stored level and a caster object; every other
//! field falls back to a default when absent or of the wrong type. Records
//! that still cannot be turned into a valid entry are skipped and counted.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::entities::{
    CasterSnapshot, SlotKind, StoredSpellEntry, DEFAULT_SPELL_ATTACK_BONUS, DEFAULT_SPELL_SAVE_DC,
};
use crate::ids::{CasterId, SpellId};

const UNKNOWN_CASTER_NAME: &str = "Unknown";

/// Highest revision a document may carry. Storage backends keep revisions
/// as signed 64-bit integers.
pub const MAX_REVISION: u64 = i64::MAX as u64;

/// Top-level document written to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    pub stored_spells: Vec<StoredSpellRecord>,
    pub revision: u64,
}

/// One stored spell as written to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSpellRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_type: Option<String>,
    pub original_caster: CasterRecord,
    pub stored_at: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CasterRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "spellAttackBonus")]
    pub spell_attack_bonus: i32,
    #[serde(rename = "spellSaveDC")]
    pub spell_save_dc: i32,
}

impl From<&StoredSpellEntry> for StoredSpellRecord {
    fn from(entry: &StoredSpellEntry) -> Self {
        let caster = entry.caster();
        Self {
            id: entry.spell_id().map(|id| id.to_string()),
            name: entry.name().to_string(),
            level: entry.stored_level(),
            original_level: Some(entry.base_level()),
            spell_type: Some(entry.slot_kind().to_string()),
            original_caster: CasterRecord {
                id: caster.caster_id.as_ref().map(|id| id.to_string()),
                name: Some(caster.caster_name.clone()),
                spell_attack_bonus: caster.attack_bonus,
                spell_save_dc: caster.save_dc,
            },
            stored_at: Some(Number::from(entry.stored_at_epoch_millis())),
        }
    }
}

impl StoredSpellRecord {
    /// Read one raw record. `None` unless it has a non-empty `name`, an
    /// integer `level` and a caster object (`originalCaster`, or the older
    /// `casterSnapshot` when the former is absent).
    pub fn from_value(raw: &Value) -> Option<Self> {
        let fields = raw.as_object()?;
        let name = fields.get("name")?.as_str()?.to_string();
        let level = small_int(fields.get("level"))?;
        let caster = fields
            .get("originalCaster")
            .and_then(Value::as_object)
            .or_else(|| fields.get("casterSnapshot").and_then(Value::as_object))?;

        Some(Self {
            id: scalar_string(fields.get("id")),
            name,
            level,
            original_level: small_int(fields.get("originalLevel")),
            spell_type: fields
                .get("spellType")
                .and_then(Value::as_str)
                .map(str::to_string),
            original_caster: CasterRecord::from_fields(caster),
            stored_at: match fields.get("storedAt") {
                Some(Value::Number(ms)) => Some(ms.clone()),
                _ => None,
            },
        })
    }

    /// Convert into a domain entry. `None` when the record breaks an entry
    /// invariant. Legacy records without `originalLevel` are treated as not
    /// upcast.
    pub fn into_entry(self) -> Option<StoredSpellEntry> {
        let slot_kind = self
            .spell_type
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(SlotKind::Spell);

        let caster = CasterSnapshot {
            caster_id: self.original_caster.id.and_then(|id| CasterId::new(id).ok()),
            caster_name: self
                .original_caster
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_CASTER_NAME.to_string()),
            attack_bonus: self.original_caster.spell_attack_bonus,
            save_dc: self.original_caster.spell_save_dc,
        };

        let stored_at = self
            .stored_at
            .and_then(|ms| {
                ms.as_i64()
                    .or_else(|| ms.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            })
            .unwrap_or(0);

        StoredSpellEntry::restore(
            self.id.and_then(|id| SpellId::new(id).ok()),
            self.name,
            self.level,
            self.original_level.unwrap_or(self.level),
            slot_kind,
            caster,
            stored_at,
        )
    }
}

impl CasterRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            id: scalar_string(fields.get("id")),
            name: fields.get("name").and_then(Value::as_str).map(str::to_string),
            spell_attack_bonus: int_or(fields.get("spellAttackBonus"), DEFAULT_SPELL_ATTACK_BONUS),
            spell_save_dc: int_or(fields.get("spellSaveDC"), DEFAULT_SPELL_SAVE_DC),
        }
    }
}

/// Strings as-is, numbers in their JSON spelling. Anything else is absent.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn small_int(value: Option<&Value>) -> Option<u8> {
    value?.as_u64().and_then(|n| u8::try_from(n).ok())
}

/// Whole numbers that fit an `i32`; `default` for anything else.
fn int_or(value: Option<&Value>, default: i32) -> i32 {
    value
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(default)
}

/// Result of reading raw host data.
#[derive(Debug, Clone, Default)]
pub struct DecodedLedger {
    pub entries: Vec<StoredSpellEntry>,
    pub revision: u64,
    pub dropped: usize,
    /// The stored revision was above [`MAX_REVISION`] and was read as 0
    pub revision_reset: bool,
}

/// Read whatever the host handed back. Never fails.
pub fn decode(raw: &Value) -> DecodedLedger {
    let (items, revision, revision_reset): (&[Value], u64, bool) = match raw {
        Value::Array(items) => (items.as_slice(), 0, false),
        Value::Object(map) => (
            map.get("storedSpells")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            document_revision(raw),
            map.get("revision")
                .and_then(Value::as_u64)
                .is_some_and(|r| r > MAX_REVISION),
        ),
        _ => (&[], 0, false),
    };

    let mut entries = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for item in items {
        match StoredSpellRecord::from_value(item).and_then(StoredSpellRecord::into_entry) {
            Some(entry) => entries.push(entry),
            None => dropped += 1,
        }
    }

    DecodedLedger {
        entries,
        revision,
        dropped,
        revision_reset,
    }
}

/// Revision stamped on a raw document. 0 for legacy or missing data, and
/// for values above [`MAX_REVISION`].
pub fn document_revision(raw: &Value) -> u64 {
    raw.get("revision")
        .and_then(Value::as_u64)
        .filter(|r| *r <= MAX_REVISION)
        .unwrap_or(0)
}
