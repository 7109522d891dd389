//! Spell descriptor - the parts of a spell definition the ring cares about.
//!
//! The full spell (components, duration, damage) stays with the host. The
//! ring only needs identity, display name, minimum level and whether the
//! spell targets its caster.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::SpellId;

/// Highest level a spell can have.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Who a spell can target, reduced to what storage policy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpellTarget {
    /// Spell affects only the caster (e.g. Shield, Mirror Image)
    SelfOnly,
    /// Creatures, objects, points or areas other than just the caster
    #[default]
    Other,
}

/// A spell offered for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDescriptor {
    id: SpellId,
    name: String,
    /// Intrinsic minimum level (0 for cantrips)
    base_level: u8,
    #[serde(default)]
    target: SpellTarget,
}

impl SpellDescriptor {
    /// Create a spell descriptor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank or
    /// `base_level` is above [`MAX_SPELL_LEVEL`].
    pub fn new(id: SpellId, name: impl Into<String>, base_level: u8) -> Result<Self, DomainError> {
        if base_level > MAX_SPELL_LEVEL {
            return Err(DomainError::validation(format!(
                "Spell level {base_level} is above {MAX_SPELL_LEVEL}"
            )));
        }
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Spell name cannot be empty"));
        }
        Ok(Self {
            id,
            name: trimmed.to_string(),
            base_level,
            target: SpellTarget::Other,
        })
    }

    pub fn with_target(mut self, target: SpellTarget) -> Self {
        self.target = target;
        self
    }

    pub fn id(&self) -> &SpellId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_level(&self) -> u8 {
        self.base_level
    }

    pub fn target(&self) -> SpellTarget {
        self.target
    }

    pub fn targets_self(&self) -> bool {
        self.target == SpellTarget::SelfOnly
    }

    /// Cantrips use no slot and can never be stored in a ring.
    pub fn is_cantrip(&self) -> bool {
        self.base_level == 0
    }
}
