//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use spellring_domain::RingSettings;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database holding ring documents
    pub db_path: PathBuf,
    /// JSON file with caster profiles
    pub casters_file: PathBuf,
    /// Table rules applied to every ring
    pub ring: RingSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = RingSettings::default();
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            db_path: var("SPELLRING_DB_PATH", "./data/rings.db").into(),
            casters_file: var("SPELLRING_CASTERS_FILE", "./data/casters.json").into(),
            ring: RingSettings {
                capacity_levels: var(
                    "SPELLRING_CAPACITY",
                    &defaults.capacity_levels.to_string(),
                )
                .trim()
                .parse()
                .context("SPELLRING_CAPACITY must be a non-negative integer")?,
                allow_self_spells: parse_bool(&var(
                    "SPELLRING_ALLOW_SELF_SPELLS",
                    &defaults.allow_self_spells.to_string(),
                ))
                .context("SPELLRING_ALLOW_SELF_SPELLS must be true or false")?,
            },
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("./data/rings.db"));
        assert_eq!(config.casters_file, PathBuf::from("./data/casters.json"));
        assert_eq!(config.ring, RingSettings::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("SPELLRING_DB_PATH", "/tmp/r.db"),
            ("SPELLRING_CAPACITY", " 8 "),
            ("SPELLRING_ALLOW_SELF_SPELLS", "no"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/r.db"));
        assert_eq!(config.ring.capacity_levels, 8);
        assert!(!config.ring.allow_self_spells);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = load(&[("SPELLRING_CAPACITY", "five")]).unwrap_err();
        assert!(err.to_string().contains("SPELLRING_CAPACITY"));

        let err = load(&[("SPELLRING_ALLOW_SELF_SPELLS", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("SPELLRING_ALLOW_SELF_SPELLS"));
    }
}
