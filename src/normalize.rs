//! Entity normalizers. Each takes one loosely-shaped community JSON record and
//! returns a fully-defaulted typed entity. None of them fail: absent, empty or
//! wrong-typed fields fall through to the next known shape and finally to a
//! default literal.

use serde_json::{Map, Value};

use crate::heroes::resolve_hero_id;
use crate::model::{
    ALL_SHARD_SLOTS, Ability, Defense, Hero, Mod, PetAbility, ResourceLink, Shard, ShardHero,
    ShardSource, Tower,
};
use crate::util::slugify;

/// Field path into a raw record, e.g. `&["icons", "plain"]`.
type FieldPath = &'static [&'static str];

const SHARD_ICON_FALLBACKS: &[FieldPath] = &[&["iconUrl"], &["image"]];
const MOD_ICON_PATHS: &[FieldPath] = &[&["image"], &["iconUrl"], &["icons", "plain"]];
const MOD_SOURCE_PATHS: &[FieldPath] = &[&["drop"], &["source"]];
const DEFENSE_ICON_PATHS: &[FieldPath] = &[&["image_url"], &["iconUrl"], &["icons", "plain"]];
const DEFENSE_NAME_PATHS: &[FieldPath] = &[&["name"], &["material"]];
const DEFENSE_HERO_PATHS: &[FieldPath] = &[&["hero"], &["heroId"]];
const MANA_COST_KEYS: [&str; 2] = ["mana_cost", "duCost"];

/// Keys owned by the typed part of `Defense`; everything else is passed through.
const DEFENSE_TYPED_KEYS: [&str; 4] = ["name", "iconUrl", "hero", "heroId"];

fn lookup<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(raw, |cur, key| cur.as_object()?.get(*key))
}

/// A value usable as text: non-empty strings, and numbers rendered as decimal.
fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(raw: &Value, paths: &[FieldPath]) -> Option<String> {
    paths.iter().find_map(|p| text(lookup(raw, p)))
}

fn text_or(raw: &Value, key: &str, default: &str) -> String {
    text(raw.get(key)).unwrap_or_else(|| default.to_string())
}

fn number(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items.iter().filter_map(|i| text(Some(i))).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn lower_all(slots: impl IntoIterator<Item = String>) -> Vec<String> {
    slots.into_iter().map(|s| s.to_lowercase()).collect()
}

fn decode_shard_hero(raw: &Value) -> ShardHero {
    ShardHero {
        name: text(raw.get("name")),
        slot: text(raw.get("slot")),
        gilded: raw.get("gilded").filter(|g| !g.is_null()).cloned(),
        image: text(raw.get("image")),
    }
}

fn decode_shard_source(raw: Option<&Value>) -> ShardSource {
    match raw {
        Some(Value::Object(obj)) => ShardSource::Detailed(obj.clone()),
        Some(Value::String(s)) => ShardSource::Label(s.clone()),
        _ => ShardSource::default(),
    }
}

pub fn normalize_shard(raw: &Value, heroes: &[Hero]) -> Shard {
    let hero_entries = raw.get("heroes").and_then(Value::as_array);
    let linked: Vec<ShardHero> = hero_entries
        .map(|hs| hs.iter().map(decode_shard_hero).collect())
        .unwrap_or_default();
    let hero_name = linked.first().and_then(|h| h.name.clone());

    let explicit_slots = string_list(raw.get("compatibleSlots"));
    let compatible_slots = if !explicit_slots.is_empty() {
        explicit_slots
    } else if hero_entries.is_some() {
        linked.iter().filter_map(|h| h.slot.clone()).collect()
    } else {
        ALL_SHARD_SLOTS.iter().map(|s| s.to_string()).collect()
    };

    let description = match raw.get("description") {
        Some(Value::String(s)) => s.clone(),
        other => other
            .and_then(|d| text(d.get("text")))
            .unwrap_or_else(|| "No description".to_string()),
    };

    let icon_url = linked
        .first()
        .and_then(|h| h.image.clone())
        .or_else(|| first_text(raw, SHARD_ICON_FALLBACKS));

    let name = text(raw.get("name"));
    Shard {
        id: text(raw.get("id"))
            .unwrap_or_else(|| format!("s_{}", slugify(name.as_deref().unwrap_or("shard")))),
        name: name.unwrap_or_else(|| "Unknown Shard".to_string()),
        description,
        source: decode_shard_source(raw.get("source")),
        compatible_slots: lower_all(compatible_slots),
        icon_url,
        hero_id: resolve_hero_id(hero_name.as_deref(), heroes),
        heroes: linked,
        upgrade_levels: raw.get("upgradeLevels").filter(|v| !v.is_null()).cloned(),
    }
}

/// Slot compatibility of a mod is fixed by its type, never by the record.
pub fn mod_slots(kind: &str) -> &'static [&'static str] {
    match kind {
        "Weapon" => &["weapon", "weapon1", "weapon2"],
        "Relic" => &["relic"],
        "Armor" => &["helmet", "chest", "gloves", "boots"],
        _ => &["relic"],
    }
}

pub fn normalize_mod(raw: &Value, heroes: &[Hero]) -> Mod {
    let hero = raw.get("hero").and_then(Value::as_str).filter(|h| !h.is_empty());
    let kind = text_or(raw, "type", "Any");
    let name = text(raw.get("name"));
    Mod {
        id: text(raw.get("id"))
            .unwrap_or_else(|| format!("m_{}", slugify(name.as_deref().unwrap_or("mod")))),
        name: name.unwrap_or_else(|| "Unknown Mod".to_string()),
        description: text_or(raw, "description", "No description"),
        source: first_text(raw, MOD_SOURCE_PATHS).unwrap_or_else(|| "Unknown".to_string()),
        compatible_slots: lower_all(mod_slots(&kind).iter().map(|s| s.to_string())),
        hero_id: resolve_hero_id(hero, heroes),
        hero: hero.map(str::to_string),
        icon_url: first_text(raw, MOD_ICON_PATHS),
        kind,
    }
}

pub fn normalize_link(raw: &Value) -> ResourceLink {
    ResourceLink {
        author: text_or(raw, "author", "Unknown"),
        name: text_or(raw, "name", "Untitled"),
        description: text_or(raw, "description", "No description"),
        link: text_or(raw, "link", "#"),
    }
}

pub fn normalize_defense(raw: &Value, heroes: &[Hero]) -> Defense {
    let hero = first_text(raw, DEFENSE_HERO_PATHS).unwrap_or_default();
    let mut fields: Map<String, Value> = raw.as_object().cloned().unwrap_or_default();
    for key in DEFENSE_TYPED_KEYS {
        fields.remove(key);
    }
    Defense {
        name: first_text(raw, DEFENSE_NAME_PATHS).unwrap_or_else(|| "Unknown Defense".to_string()),
        icon_url: first_text(raw, DEFENSE_ICON_PATHS),
        hero_id: resolve_hero_id(Some(hero.as_str()), heroes),
        hero,
        fields,
    }
}

/// Digits-only reading of a mana-cost text such as `"1,200 mana"`. No digits is 0;
/// a cost too large for `u32` saturates.
pub fn parse_mana_cost(value: Option<&Value>) -> u32 {
    let Some(raw) = text(value) else { return 0 };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// Derive the tower record for a defense. Nameless defenses produce no tower.
pub fn synthesize_tower(defense: &Defense, heroes: &[Hero]) -> Option<Tower> {
    if defense.name.is_empty() {
        return None;
    }
    let cost = MANA_COST_KEYS
        .iter()
        .find_map(|k| defense.fields.get(*k).filter(|v| text(Some(*v)).is_some()));
    Some(Tower {
        id: format!("t_{}", slugify(&defense.name)),
        name: defense.name.clone(),
        du_cost: parse_mana_cost(cost),
        hero_id: defense
            .hero_id
            .clone()
            .or_else(|| resolve_hero_id(Some(defense.hero.as_str()), heroes)),
        icon_url: defense.icon_url.clone(),
        stats: Some(defense.clone()),
    })
}

/// Tolerant decode of a tower entry from a persisted snapshot.
pub fn decode_saved_tower(raw: &Value) -> Option<Tower> {
    let name = text(raw.get("name"))?;
    let du_cost = match raw.get("duCost") {
        Some(Value::Number(n)) => n.as_u64().and_then(|c| u32::try_from(c).ok()).unwrap_or(0),
        other => parse_mana_cost(other),
    };
    Some(Tower {
        id: text(raw.get("id")).unwrap_or_else(|| format!("t_{}", slugify(&name))),
        du_cost,
        hero_id: text(raw.get("heroId")),
        icon_url: text(raw.get("iconUrl")),
        stats: raw
            .get("stats")
            .filter(|s| s.is_object())
            .and_then(|s| serde_json::from_value(s.clone()).ok()),
        name,
    })
}

/// Abilities are kept verbatim; only the field types are coerced.
pub fn normalize_ability(raw: &Value) -> Option<Ability> {
    raw.as_object()?;
    Some(Ability {
        name: text_or(raw, "name", ""),
        status_effects: string_list(raw.get("statusEffects")),
        ability_type: text_or(raw, "abilityType", ""),
        mana_cost: number(raw.get("manaCost")).unwrap_or(0.0),
        recharge: text_or(raw, "recharge", ""),
        damage_type: text_or(raw, "damageType", ""),
        damage_scalar: number(raw.get("damageScalar")).unwrap_or(0.0),
        heroes: string_list(raw.get("heroes")),
        icon_url: text_or(raw, "iconUrl", ""),
    })
}

pub fn normalize_pet_ability(raw: &Value) -> Option<PetAbility> {
    raw.as_object()?;
    Some(PetAbility {
        name: text_or(raw, "name", ""),
        kind: text_or(raw, "type", ""),
        description: text_or(raw, "description", ""),
        notes: text_or(raw, "notes", ""),
        cooldown_sec: number(raw.get("cooldownSec")),
    })
}
