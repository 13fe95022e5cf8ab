//! Bundled datasets compiled into the binary.

use serde_json::Value;

use crate::model::PetAbility;
use crate::normalize::normalize_pet_ability;

const ABILITIES_JSON: &str = include_str!("../data/abilities/dd2_abilities.json");
const DEFENSES_JSON: &str = include_str!("../data/defenses/dd2_defenses.json");
const SHARDS_JSON: &str = include_str!("../data/shards/dd2_shards_data.json");
const MODS_JSON: &str = include_str!("../data/mods/dd2_mods_data.json");
const LINKS_JSON: &str = include_str!("../data/links/dd2_links.json");
const PETS_JSON: &str = include_str!("../data/pets/dd2_pet_abilities.json");

/// Raw seed records, still in their community shapes. The registry builder
/// normalizes them; nothing here is trusted beyond "it parsed".
#[derive(Clone, Debug, Default)]
pub struct SeedData {
    pub abilities: Vec<Value>,
    pub defenses: Vec<Value>,
    pub shards: Vec<Value>,
    pub mods: Vec<Value>,
    pub links: Vec<Value>,
    pub pets: Vec<PetAbility>,
}

impl SeedData {
    pub fn bundled() -> Self {
        Self::from_documents(&SeedDocuments {
            abilities: ABILITIES_JSON,
            defenses: DEFENSES_JSON,
            shards: SHARDS_JSON,
            mods: MODS_JSON,
            links: LINKS_JSON,
            pets: PETS_JSON,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_documents(docs: &SeedDocuments<'_>) -> Self {
        Self {
            abilities: records(docs.abilities, "abilities", None),
            defenses: records(docs.defenses, "defenses", Some("defenses")),
            shards: records(docs.shards, "shards", None),
            mods: records(docs.mods, "mods", None),
            links: records(docs.links, "links", Some("resources")),
            pets: records(docs.pets, "pet abilities", None)
                .iter()
                .filter_map(normalize_pet_ability)
                .collect(),
        }
    }
}

/// Source text of each bundled document.
#[derive(Clone, Copy, Debug)]
pub struct SeedDocuments<'a> {
    pub abilities: &'a str,
    pub defenses: &'a str,
    pub shards: &'a str,
    pub mods: &'a str,
    pub links: &'a str,
    pub pets: &'a str,
}

/// Records of one bundled document: a bare array, or an array under `wrapper`.
/// A document that does not parse contributes nothing.
fn records(text: &str, what: &str, wrapper: Option<&str>) -> Vec<Value> {
    let doc: Value = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            log::warn!("bundled {what} dataset unreadable: {err}");
            return Vec::new();
        }
    };
    let list = match (doc, wrapper) {
        (Value::Array(items), _) => items,
        (Value::Object(mut obj), Some(key)) => match obj.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    log::debug!("bundled {what}: {} records", list.len());
    list
}
