//! spellring - command line front end for Ring of Spell Storing ledgers.

use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spellring_domain::aggregates::StoredSpellRecord;
use spellring_domain::{
    CasterId, ItemId, SlotKind, SlotOption, SpellDescriptor, SpellId, SpellTarget,
    StoredSpellEntry,
};
use spellring_engine::infrastructure::{
    clock::SystemClock, config::AppConfig, in_memory::InMemoryCasterDirectory,
    sqlite_store::SqliteDocumentStore,
};
use spellring_engine::App;

const USAGE: &str = "Usage: spellring <command>

Commands:
  list <item>
  levels <item> <caster> <base-level>
  store <item> <caster> <spell-id> <spell-name> <base-level> <level> [pact] [self]
  cast <item> <index>
  remove <item> <index>";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryView {
    index: usize,
    #[serde(flatten)]
    record: StoredSpellRecord,
}

impl EntryView {
    fn new(index: usize, entry: &StoredSpellEntry) -> Self {
        Self {
            index,
            record: StoredSpellRecord::from(entry),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RingView {
    item_id: String,
    used: u32,
    remaining: u32,
    capacity: u32,
    stored_spells: Vec<EntryView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CastView {
    spell: StoredSpellRecord,
    cast_level: u8,
    spell_attack_bonus: i32,
    spell_save_dc: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelsView {
    caster_id: String,
    base_level: u8,
    options: Vec<SlotOption>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spellring_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("{USAGE}");
    };

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    if let Some(parent) = config.db_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let db_path = config
        .db_path
        .to_str()
        .context("SPELLRING_DB_PATH must be valid UTF-8")?;

    let clock = Arc::new(SystemClock::new());
    let documents = Arc::new(SqliteDocumentStore::new(db_path, clock.clone()).await?);
    let casters = Arc::new(InMemoryCasterDirectory::from_json_file(&config.casters_file).await?);
    let app = App::new(documents, casters, clock, config.ring);

    match (command.as_str(), rest) {
        ("list", [item]) => list(&app, item).await,
        ("levels", [item, caster, base_level]) => levels(&app, item, caster, base_level).await,
        ("store", [item, caster, spell_id, spell_name, base_level, level, flags @ ..]) => {
            let spell = parse_spell(spell_id, spell_name, base_level, flags)?;
            let slot_kind = if flags.iter().any(|f| f == "pact") {
                SlotKind::Pact
            } else {
                SlotKind::Spell
            };
            let level: u8 = level.parse().context("level must be a number")?;
            let item_id: ItemId = item.parse()?;
            let caster_id: CasterId = caster.parse()?;

            let entry = app
                .use_cases
                .ring
                .store
                .execute(&item_id, &caster_id, &spell, level, slot_kind)
                .await?;
            print_json(&StoredSpellRecord::from(&entry))
        }
        ("cast", [item, index]) => {
            let item_id: ItemId = item.parse()?;
            let outcome = app
                .use_cases
                .ring
                .cast
                .execute(&item_id, parse_index(index)?)
                .await?;
            print_json(&CastView {
                spell: StoredSpellRecord::from(&outcome.entry),
                cast_level: outcome.cast_level,
                spell_attack_bonus: outcome.attack_bonus,
                spell_save_dc: outcome.save_dc,
            })
        }
        ("remove", [item, index]) => {
            let item_id: ItemId = item.parse()?;
            let entry = app
                .use_cases
                .ring
                .remove
                .execute(&item_id, parse_index(index)?)
                .await?;
            print_json(&StoredSpellRecord::from(&entry))
        }
        _ => bail!("Unknown command or wrong arguments: {command}\n\n{USAGE}"),
    }
}

async fn list(app: &App, item: &str) -> anyhow::Result<()> {
    let item_id: ItemId = item.parse()?;
    let summary = app.use_cases.ring.inspect.execute(&item_id).await?;
    print_json(&RingView {
        item_id: item_id.to_string(),
        used: summary.used,
        remaining: summary.remaining,
        capacity: summary.capacity,
        stored_spells: summary
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| EntryView::new(i, e))
            .collect(),
    })
}

async fn levels(app: &App, item: &str, caster: &str, base_level: &str) -> anyhow::Result<()> {
    let item_id: ItemId = item.parse()?;
    let caster_id: CasterId = caster.parse()?;
    let base_level: u8 = base_level.parse().context("base-level must be a number")?;
    let options = app
        .use_cases
        .ring
        .inspect
        .storable_levels(&item_id, &caster_id, base_level)
        .await?;
    print_json(&LevelsView {
        caster_id: caster_id.to_string(),
        base_level,
        options,
    })
}

fn parse_spell(
    id: &str,
    name: &str,
    base_level: &str,
    flags: &[String],
) -> anyhow::Result<SpellDescriptor> {
    if let Some(flag) = flags.iter().find(|f| !matches!(f.as_str(), "pact" | "self")) {
        bail!("Unknown store flag: {flag}");
    }
    let base_level: u8 = base_level.parse().context("base-level must be a number")?;
    let mut spell = SpellDescriptor::new(SpellId::new(id)?, name, base_level)?;
    if flags.iter().any(|f| f == "self") {
        spell = spell.with_target(SpellTarget::SelfOnly);
    }
    Ok(spell)
}

fn parse_index(raw: &str) -> anyhow::Result<usize> {
    raw.parse().context("index must be a non-negative number")
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
