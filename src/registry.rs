//! Registry builder and the snapshot reducer.
//!
//! The registry is rebuilt at start-up from the persisted snapshot plus the
//! bundled seed data, then only ever replaced: every user action produces a new
//! snapshot with a bumped version.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use yew::Reducible;

use crate::heroes::{default_heroes, default_maps};
use crate::import::apply_import;
use crate::loadout::{SlotItemKind, create_build, set_color, set_slot_item};
use crate::merge::dedup_merge;
use crate::model::{Build, Checklist, DataRegistry, Hero, MapData};
use crate::normalize::{
    decode_saved_tower, normalize_ability, normalize_defense, normalize_link, normalize_mod,
    normalize_shard, synthesize_tower,
};
use crate::seed::SeedData;

/// Built-in heroes and maps, everything else empty.
pub fn initial_registry() -> DataRegistry {
    DataRegistry {
        version: 0,
        heroes: default_heroes(),
        maps: default_maps(),
        towers: Vec::new(),
        shards: Vec::new(),
        mods: Vec::new(),
        checklists: Vec::new(),
        builds: Vec::new(),
        abilities: Vec::new(),
        defenses: Vec::new(),
        links: Vec::new(),
    }
}

/// The persisted blob, decoded key by key. Entity lists stay raw so they go
/// through the same normalizers as bundled data.
#[derive(Debug, Default)]
struct SavedState {
    version: u64,
    heroes: Option<Vec<Hero>>,
    maps: Option<Vec<MapData>>,
    checklists: Vec<Checklist>,
    builds: Vec<Build>,
    towers: Vec<Value>,
    defenses: Vec<Value>,
    shards: Vec<Value>,
    mods: Vec<Value>,
    links: Vec<Value>,
}

fn typed<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = obj.get(key)?;
    match serde_json::from_value(raw.clone()) {
        Ok(v) => Some(v),
        Err(err) => {
            log::warn!("saved `{key}` unreadable, using defaults: {err}");
            None
        }
    }
}

fn raw_list(obj: &Map<String, Value>, key: &str) -> Vec<Value> {
    obj.get(key).and_then(Value::as_array).cloned().unwrap_or_default()
}

fn decode_saved(blob: Option<&str>) -> SavedState {
    let Some(blob) = blob else { return SavedState::default() };
    let obj = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(obj)) => obj,
        Ok(_) => {
            log::warn!("saved registry is not an object, starting fresh");
            return SavedState::default();
        }
        Err(err) => {
            log::warn!("saved registry unreadable, starting fresh: {err}");
            return SavedState::default();
        }
    };
    SavedState {
        version: obj.get("version").and_then(Value::as_u64).unwrap_or(0),
        heroes: typed(&obj, "heroes"),
        maps: typed(&obj, "maps"),
        checklists: typed(&obj, "checklists").unwrap_or_default(),
        builds: typed(&obj, "builds").unwrap_or_default(),
        towers: raw_list(&obj, "towers"),
        defenses: raw_list(&obj, "defenses"),
        shards: raw_list(&obj, "shards"),
        mods: raw_list(&obj, "mods"),
        links: raw_list(&obj, "links"),
    }
}

/// Assemble the start-up snapshot. Saved entities come first so bundled data
/// only refreshes the fields the merge policies let it.
pub fn build_registry(saved: Option<&str>, seed: &SeedData) -> DataRegistry {
    let saved = decode_saved(saved);
    let heroes = saved.heroes.filter(|h| !h.is_empty()).unwrap_or_else(default_heroes);
    let maps = saved.maps.filter(|m| !m.is_empty()).unwrap_or_else(default_maps);

    let defenses = dedup_merge(
        saved.defenses.iter().chain(&seed.defenses).map(|r| normalize_defense(r, &heroes)),
        &heroes,
    );
    let derived_towers = defenses.iter().filter_map(|d| synthesize_tower(d, &heroes));
    let towers = dedup_merge(
        saved.towers.iter().filter_map(decode_saved_tower).chain(derived_towers),
        &heroes,
    );
    let shards = dedup_merge(
        saved.shards.iter().chain(&seed.shards).map(|r| normalize_shard(r, &heroes)),
        &heroes,
    );
    let mods = dedup_merge(
        saved.mods.iter().chain(&seed.mods).map(|r| normalize_mod(r, &heroes)),
        &heroes,
    );
    let links = dedup_merge(saved.links.iter().chain(&seed.links).map(normalize_link), &heroes);
    let abilities = seed.abilities.iter().filter_map(normalize_ability).collect();

    let registry = DataRegistry {
        version: saved.version,
        heroes,
        maps,
        towers,
        shards,
        mods,
        checklists: saved.checklists,
        builds: saved.builds,
        abilities,
        defenses,
        links,
    };
    log::info!(
        "registry ready: {} heroes, {} towers, {} shards, {} mods, {} links, {} builds",
        registry.heroes.len(),
        registry.towers.len(),
        registry.shards.len(),
        registry.mods.len(),
        registry.links.len(),
        registry.builds.len()
    );
    registry
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryAction {
    Import { payload: Value, filename: String },
    CreateBuild { hero_id: String, now: i64 },
    SetBuildSlotItem {
        build_id: String,
        slot_id: String,
        kind: SlotItemKind,
        index: usize,
        item_id: Option<String>,
        now: i64,
    },
    SetBuildColor { build_id: String, color: String, now: i64 },
    RenameBuild { build_id: String, name: String, now: i64 },
    DeleteBuild { build_id: String },
    /// Replaces the checklist with the same id, or appends it.
    UpsertChecklist(Checklist),
    DeleteChecklist { checklist_id: String },
    ToggleChecklistItem { checklist_id: String, item_id: String },
}

impl DataRegistry {
    /// `(snapshot, action) -> snapshot`. The version moves on every action, even
    /// one that turned out to be a no-op, except a rejected import.
    pub fn apply(&self, action: RegistryAction) -> DataRegistry {
        use RegistryAction::*;
        let mut next = match action {
            Import { payload, filename } => match apply_import(self, &payload, &filename) {
                Ok(next) => next,
                Err(err) => {
                    log::warn!("{err}");
                    return self.clone();
                }
            },
            CreateBuild { hero_id, now } => {
                let mut next = self.clone();
                let existing = next.builds.iter().filter(|b| b.hero_id == hero_id).count();
                let mut build = create_build(&hero_id, existing, now);
                let mut suffix = 1;
                while next.build(&build.id).is_some() {
                    build.id = format!("b_{now}_{suffix}");
                    suffix += 1;
                }
                next.builds.push(build);
                next
            }
            SetBuildSlotItem { build_id, slot_id, kind, index, item_id, now } => {
                self.with_build(&build_id, |b| {
                    set_slot_item(b, &slot_id, kind, index, item_id, now);
                })
            }
            SetBuildColor { build_id, color, now } => self.with_build(&build_id, |b| {
                set_color(b, &color, now);
            }),
            RenameBuild { build_id, name, now } => self.with_build(&build_id, |b| {
                let name = name.trim();
                if !name.is_empty() {
                    b.name = name.to_string();
                    b.last_edited = now;
                }
            }),
            DeleteBuild { build_id } => {
                let mut next = self.clone();
                next.builds.retain(|b| b.id != build_id);
                next
            }
            UpsertChecklist(list) => {
                let mut next = self.clone();
                match next.checklists.iter_mut().find(|c| c.id == list.id) {
                    Some(slot) => *slot = list,
                    None => next.checklists.push(list),
                }
                next
            }
            DeleteChecklist { checklist_id } => {
                let mut next = self.clone();
                next.checklists.retain(|c| c.id != checklist_id);
                next
            }
            ToggleChecklistItem { checklist_id, item_id } => {
                let mut next = self.clone();
                let item = next
                    .checklists
                    .iter_mut()
                    .filter(|c| c.id == checklist_id)
                    .flat_map(|c| c.sections.iter_mut())
                    .flat_map(|s| s.items.iter_mut())
                    .find(|i| i.id == item_id);
                if let Some(item) = item {
                    item.is_completed = !item.is_completed;
                }
                next
            }
        };
        next.version = self.version + 1;
        next
    }

    fn with_build(&self, build_id: &str, edit: impl FnOnce(&mut Build)) -> DataRegistry {
        let mut next = self.clone();
        if let Some(build) = next.builds.iter_mut().find(|b| b.id == build_id) {
            edit(build);
        }
        next
    }
}

impl Reducible for DataRegistry {
    type Action = RegistryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = self.apply(action);
        if next.version == self.version {
            return self;
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChecklistItem, ChecklistItemKind, ChecklistSection, ShardSource};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn garbage_blob_falls_back_to_defaults() {
        for blob in ["not json", "[1,2,3]", "\"str\"", "null"] {
            let reg = build_registry(Some(blob), &SeedData::empty());
            assert_eq!(reg.heroes, default_heroes());
            assert_eq!(reg.maps, default_maps());
            assert!(reg.towers.is_empty());
            assert!(reg.shards.is_empty());
            assert!(reg.mods.is_empty());
            assert!(reg.checklists.is_empty());
            assert!(reg.builds.is_empty());
        }
    }

    #[test]
    fn empty_saved_heroes_and_maps_use_builtin_tables() {
        let blob = json!({"heroes": [], "maps": [], "builds": []}).to_string();
        let reg = build_registry(Some(&blob), &SeedData::empty());
        assert_eq!(reg.heroes.len(), 21);
        assert_eq!(reg.heroes, default_heroes());
        assert_eq!(reg.maps.len(), 2);
        assert_eq!(reg.maps, default_maps());
    }

    #[test]
    fn one_bad_key_does_not_sink_the_rest() {
        let blob = json!({
            "version": 7,
            "heroes": "corrupt",
            "builds": [{"id": "b_1", "name": "Mine", "heroId": "h20", "customColor": "red", "slots": {}, "lastEdited": 1}],
            "shards": [{"name": "Kept"}]
        })
        .to_string();
        let reg = build_registry(Some(&blob), &SeedData::empty());
        assert_eq!(reg.version, 7);
        assert_eq!(reg.heroes, default_heroes());
        assert_eq!(reg.builds.len(), 1);
        assert_eq!(reg.shards[0].name, "Kept");
    }

    #[test]
    fn bundled_updates_refresh_saved_entities() {
        let seed = SeedData {
            shards: vec![json!({"name": "Destruction", "description": "Fixed text", "iconUrl": "http://new.png", "source": "Chaos 1"})],
            ..SeedData::empty()
        };
        let blob = json!({"shards": [{"id": "s_saved", "name": "Destruction", "description": "Typo", "source": ""}]}).to_string();
        let reg = build_registry(Some(&blob), &seed);
        assert_eq!(reg.shards.len(), 1);
        let s = &reg.shards[0];
        assert_eq!(s.id, "s_saved");
        assert_eq!(s.description, "Fixed text");
        assert_eq!(s.icon_url.as_deref(), Some("http://new.png"));
        assert_eq!(s.source, ShardSource::Label("Chaos 1".into()));
    }

    #[test]
    fn towers_are_derived_from_defenses_and_keep_saved_first() {
        let seed = SeedData {
            defenses: vec![
                json!({"name": "Ballista", "mana_cost": "1,200 mana", "hero": "Squire"}),
                json!({"name": "Wall", "mana_cost": "20"}),
            ],
            ..SeedData::empty()
        };
        let blob =
            json!({"towers": [{"id": "t_custom", "name": "Wall", "duCost": 25}]}).to_string();
        let reg = build_registry(Some(&blob), &seed);
        let names: Vec<_> = reg.towers.iter().map(|t| (t.name.as_str(), t.du_cost)).collect();
        assert_eq!(names, vec![("Wall", 25), ("Ballista", 1200)]);
        assert_eq!(reg.tower("t_ballista").and_then(|t| t.hero_id.as_deref()), Some("h20"));
    }

    #[test]
    fn abilities_come_from_the_bundle() {
        let seed =
            SeedData { abilities: vec![json!({"name": "Seismic Slam"})], ..SeedData::empty() };
        let blob = json!({"abilities": [{"name": "Stale"}]}).to_string();
        let reg = build_registry(Some(&blob), &seed);
        assert_eq!(reg.abilities.len(), 1);
        assert_eq!(reg.abilities[0].name, "Seismic Slam");
    }

    #[test]
    fn bundled_seed_builds_cleanly() {
        let reg = build_registry(None, &SeedData::bundled());
        assert_eq!(reg.defenses.len(), reg.towers.len());
        let mut names: Vec<_> = reg.defenses.iter().map(|d| d.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), reg.defenses.len());
        assert!(!reg.links.is_empty());
    }

    #[test]
    fn every_action_bumps_the_version() {
        let reg = initial_registry();
        let reg = reg.apply(RegistryAction::CreateBuild { hero_id: "h20".into(), now: 10 });
        assert_eq!(reg.version, 1);
        let id = reg.builds[0].id.clone();
        let reg = reg.apply(RegistryAction::SetBuildSlotItem {
            build_id: id.clone(),
            slot_id: "relic".into(),
            kind: SlotItemKind::Shard,
            index: 0,
            item_id: Some("s_destruction".into()),
            now: 11,
        });
        assert_eq!(reg.version, 2);
        assert_eq!(reg.builds[0].slots["relic"].shards[0].as_deref(), Some("s_destruction"));
        let reg = reg.apply(RegistryAction::SetBuildColor {
            build_id: id.clone(),
            color: "teal".into(),
            now: 12,
        });
        let reg = reg.apply(RegistryAction::RenameBuild {
            build_id: id.clone(),
            name: "  Ballista spam ".into(),
            now: 13,
        });
        assert_eq!(reg.builds[0].name, "Ballista spam");
        assert_eq!(reg.builds[0].custom_color, "teal");
        assert_eq!(reg.builds[0].last_edited, 13);
        let reg = reg.apply(RegistryAction::DeleteBuild { build_id: id });
        assert!(reg.builds.is_empty());
        assert_eq!(reg.version, 5);
    }

    #[test]
    fn builds_created_in_the_same_tick_get_distinct_ids() {
        let reg = initial_registry()
            .apply(RegistryAction::CreateBuild { hero_id: "h20".into(), now: 10 })
            .apply(RegistryAction::CreateBuild { hero_id: "h20".into(), now: 10 });
        assert_eq!(reg.builds[0].id, "b_10");
        assert_eq!(reg.builds[1].id, "b_10_1");
        assert_eq!(reg.builds[1].name, "New Build 2");
    }

    #[test]
    fn rejected_import_keeps_the_snapshot() {
        let reg = initial_registry();
        let payload = json!({"x": 1});
        let next = reg.apply(RegistryAction::Import { payload, filename: "x.json".into() });
        assert_eq!(next, reg);
        let next = reg.apply(RegistryAction::Import {
            payload: json!([{"name": "Sharp", "type": "Weapon"}]),
            filename: "mods.json".into(),
        });
        assert_eq!(next.version, 1);
        assert_eq!(next.mods.len(), 1);
    }

    #[test]
    fn checklist_actions() {
        let list = Checklist {
            id: "c1".into(),
            title: "Collections".into(),
            category: "General".into(),
            icon: None,
            sections: vec![ChecklistSection {
                id: "sec".into(),
                title: "Pets".into(),
                items: vec![ChecklistItem {
                    id: "i1".into(),
                    label: "Dragon".into(),
                    is_completed: false,
                    kind: ChecklistItemKind::Note,
                    current_value: None,
                    max_value: None,
                    linked_hero_id: None,
                    notes: None,
                    image_url: None,
                }],
            }],
        };
        let reg = initial_registry().apply(RegistryAction::UpsertChecklist(list.clone()));
        let reg = reg.apply(RegistryAction::ToggleChecklistItem {
            checklist_id: "c1".into(),
            item_id: "i1".into(),
        });
        assert!(reg.checklists[0].sections[0].items[0].is_completed);
        let renamed = Checklist { title: "Renamed".into(), ..list };
        let reg = reg.apply(RegistryAction::UpsertChecklist(renamed));
        assert_eq!(reg.checklists.len(), 1);
        assert_eq!(reg.checklists[0].title, "Renamed");
        let reg = reg.apply(RegistryAction::DeleteChecklist { checklist_id: "c1".into() });
        assert!(reg.checklists.is_empty());
        assert_eq!(reg.version, 4);
    }

    #[test]
    fn reducer_reuses_the_rc_for_rejected_imports() {
        let reg = Rc::new(initial_registry());
        let same = reg
            .clone()
            .reduce(RegistryAction::Import { payload: json!(1), filename: "n.json".into() });
        assert!(Rc::ptr_eq(&reg, &same));
        let moved = reg.clone().reduce(RegistryAction::DeleteBuild { build_id: "none".into() });
        assert_eq!(moved.version, 1);
    }
}
