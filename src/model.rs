//! Core data models for the DD2 planner.
//! Every entity the pages read lives in `DataRegistry`; the wire names match the
//! persisted blob so a snapshot written by an older session still decodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const STANDARD_SLOTS: [&str; 6] = ["weapon", "helmet", "chest", "gloves", "boots", "relic"];
pub const SHIELD_SLOTS: [&str; 7] =
    ["weapon", "shield", "helmet", "chest", "gloves", "boots", "relic"];
pub const DUAL_WIELD_SLOTS: [&str; 7] =
    ["weapon1", "weapon2", "helmet", "chest", "gloves", "boots", "relic"];

/// Slots a shard lands in when the raw record names neither slots nor heroes.
pub const ALL_SHARD_SLOTS: [&str; 6] = ["relic", "weapon", "helmet", "chest", "gloves", "boots"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotLayout {
    Standard,
    Shield,
    DualWield,
}

impl SlotLayout {
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            SlotLayout::Standard => &STANDARD_SLOTS,
            SlotLayout::Shield => &SHIELD_SLOTS,
            SlotLayout::DualWield => &DUAL_WIELD_SLOTS,
        }
    }

    pub fn to_vec(self) -> Vec<String> {
        self.slots().iter().map(|s| s.to_string()).collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub health: f64,
    pub damage: f64,
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    /// Stable short code (`h1`..`h21`); never regenerated.
    pub id: String,
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub role_tags: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub equipment_slots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<HeroStats>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapDifficulty {
    Campaign,
    Chaos,
    Mastery,
    Onslaught,
}

impl MapDifficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            MapDifficulty::Campaign => "campaign",
            MapDifficulty::Chaos => "chaos",
            MapDifficulty::Mastery => "mastery",
            MapDifficulty::Onslaught => "onslaught",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub id: String,
    pub name: String,
    #[serde(rename = "maxDU")]
    pub max_du: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub difficulty: MapDifficulty,
}

/// Pass-through defense record. Fields the planner does not interpret
/// (`mana_cost`, `defense_type`, `base_def_power`, ...) stay in `fields`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defense {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Display name of the owning hero, as written in the source data.
    #[serde(default)]
    pub hero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Defense {
    /// Raw string-ish field, e.g. `defense_type` or `mana_cost`.
    pub fn field_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn defense_type(&self) -> Option<String> {
        self.field_str("defense_type")
    }
}

/// Shard drop source: either a bare label or a structured record carrying `difficulty`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShardSource {
    Label(String),
    Detailed(Map<String, Value>),
}

impl ShardSource {
    pub fn label(&self) -> &str {
        match self {
            ShardSource::Label(s) => s,
            ShardSource::Detailed(obj) => obj
                .get("difficulty")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ShardSource::Label(s) => s.is_empty(),
            ShardSource::Detailed(obj) => obj.is_empty(),
        }
    }
}

impl Default for ShardSource {
    fn default() -> Self {
        ShardSource::Label("Unknown".into())
    }
}

/// One hero entry listed on a shard (used for display and hero linking).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardHero {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gilded: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shard {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub source: ShardSource,
    #[serde(default)]
    pub compatible_slots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_id: Option<String>,
    #[serde(default)]
    pub heroes: Vec<ShardHero>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_levels: Option<Value>,
}

impl Shard {
    pub fn first_hero_name(&self) -> Option<&str> {
        self.heroes.first().and_then(|h| h.name.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mod {
    pub id: String,
    pub name: String,
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub compatible_slots: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw hero name from the source record, kept so a merge can re-resolve `hero_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub author: String,
    pub name: String,
    pub description: String,
    pub link: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ability {
    pub name: String,
    pub status_effects: Vec<String>,
    pub ability_type: String,
    pub mana_cost: f64,
    pub recharge: String,
    pub damage_type: String,
    pub damage_scalar: f64,
    pub heroes: Vec<String>,
    pub icon_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetAbility {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub notes: String,
    #[serde(rename = "cooldownSec", skip_serializing_if = "Option::is_none")]
    pub cooldown_sec: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tower {
    pub id: String,
    pub name: String,
    #[serde(rename = "duCost")]
    pub du_cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// The defense this tower was synthesized from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Defense>,
}

pub const BUILD_SLOT_POSITIONS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSlot {
    pub slot_id: String,
    pub shards: [Option<String>; BUILD_SLOT_POSITIONS],
    pub mods: [Option<String>; BUILD_SLOT_POSITIONS],
}

impl BuildSlot {
    pub fn empty(slot_id: &str) -> Self {
        Self {
            slot_id: slot_id.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: String,
    pub name: String,
    pub hero_id: String,
    pub custom_color: String,
    #[serde(default)]
    pub slots: BTreeMap<String, BuildSlot>,
    /// Milliseconds since the epoch.
    pub last_edited: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistItemKind {
    #[default]
    Note,
    Level,
    Hero,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(rename = "type", default)]
    pub kind: ChecklistItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_hero_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub sections: Vec<ChecklistSection>,
}

/// The single aggregate every page reads from. Snapshots are replaced, never patched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataRegistry {
    /// Bumped once per applied action.
    #[serde(default)]
    pub version: u64,
    pub heroes: Vec<Hero>,
    pub maps: Vec<MapData>,
    pub towers: Vec<Tower>,
    pub shards: Vec<Shard>,
    pub mods: Vec<Mod>,
    pub checklists: Vec<Checklist>,
    pub builds: Vec<Build>,
    pub abilities: Vec<Ability>,
    pub defenses: Vec<Defense>,
    pub links: Vec<ResourceLink>,
}

impl DataRegistry {
    pub fn hero(&self, id: &str) -> Option<&Hero> {
        self.heroes.iter().find(|h| h.id == id)
    }

    pub fn tower(&self, id: &str) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn build(&self, id: &str) -> Option<&Build> {
        self.builds.iter().find(|b| b.id == id)
    }
}
