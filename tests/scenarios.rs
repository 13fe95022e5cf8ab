use dd2_planner::config::REGISTRY_STORAGE_KEY;
use dd2_planner::heroes::{default_heroes, default_maps, resolve_hero_id};
use dd2_planner::import::{ImportKind, apply_import, import_batch};
use dd2_planner::normalize::{normalize_defense, synthesize_tower};
use dd2_planner::registry::{RegistryAction, build_registry};
use dd2_planner::search::{SearchCategory, SearchIndex, fuzzy_score};
use dd2_planner::seed::SeedData;
use dd2_planner::storage::{KeyValueStore, MemoryStore, load_snapshot_blob, save_snapshot};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn imported_shard_links_its_hero() {
    let registry = build_registry(None, &SeedData::empty());
    let payload = json!([{
        "name": "Abyssal Hunger",
        "heroes": [{"name": "Abyss Lord", "slot": "relic"}]
    }]);
    let next = apply_import(&registry, &payload, "dd2_shards_data.json").unwrap();

    assert_eq!(next.shards.len(), 1);
    let shard = &next.shards[0];
    assert_eq!(shard.hero_id, resolve_hero_id(Some("Abyss Lord"), &next.heroes));
    assert_eq!(shard.hero_id.as_deref(), Some("h1"));
    assert_eq!(shard.compatible_slots, vec!["relic".to_string()]);
}

#[test]
fn repeated_shard_keeps_the_later_icon() {
    let registry = build_registry(None, &SeedData::empty());
    let (next, reports) = import_batch(
        &registry,
        [
            ("shards_a.json", r#"[{"name": "Tenacity", "iconUrl": ""}]"#),
            ("shards_b.json", r#"[{"name": "Tenacity", "iconUrl": "http://x/y.png"}]"#),
        ],
    );

    assert!(reports.iter().all(|r| r.is_ok()));
    assert_eq!(next.shards.len(), 1);
    assert_eq!(next.shards[0].icon_url.as_deref(), Some("http://x/y.png"));
}

#[test]
fn scattered_query_scores_below_contiguous_one() {
    let scattered = fuzzy_score("hnt", "Huntress");
    let contiguous = fuzzy_score("hunt", "Huntress");
    assert!(scattered.is_some());
    assert!(scattered < contiguous);
    assert_eq!(fuzzy_score("zzz", "Huntress"), None);
}

#[test]
fn mana_cost_text_becomes_du_cost() {
    let heroes = default_heroes();
    let raw = json!({"name": "Ballista", "mana_cost": "1,200 mana"});
    let defense = normalize_defense(&raw, &heroes);
    let tower = synthesize_tower(&defense, &heroes).unwrap();
    assert_eq!(tower.du_cost, 1200);
    assert_eq!(tower.id, "t_ballista");
}

#[test]
fn corrupt_saved_state_starts_from_defaults() {
    let store = MemoryStore::with_entry(REGISTRY_STORAGE_KEY, "not json");
    let registry = build_registry(load_snapshot_blob(&store).as_deref(), &SeedData::empty());
    assert_eq!(registry.heroes, default_heroes());
    assert_eq!(registry.maps, default_maps());
    assert!(registry.towers.is_empty());
    assert!(registry.shards.is_empty());
    assert!(registry.mods.is_empty());
    assert!(registry.checklists.is_empty());
    assert!(registry.builds.is_empty());
}

#[test]
fn bundled_seed_builds_a_deduplicated_registry() {
    let registry = build_registry(None, &SeedData::bundled());

    assert_eq!(registry.defenses.len(), 9);
    assert_eq!(registry.towers.len(), 9);
    assert_eq!(registry.shards.len(), 7);
    assert_eq!(registry.mods.len(), 6);
    assert_eq!(registry.links.len(), 3);
    assert_eq!(registry.abilities.len(), 7);

    let flame = registry.towers.iter().find(|t| t.name == "Flameburst Tower").unwrap();
    assert_eq!(flame.du_cost, 40);
    assert_eq!(flame.hero_id.as_deref(), Some("h3"));
    let aura = registry.towers.iter().find(|t| t.name == "Lightning Aura").unwrap();
    assert_eq!(aura.du_cost, 1200);
    let frosty = registry.towers.iter().find(|t| t.name == "Frosty Power").unwrap();
    assert_eq!(frosty.hero_id, None);
}

#[test]
fn persisted_snapshot_survives_a_restart() {
    let seed = SeedData::bundled();
    let store = MemoryStore::default();
    let registry = build_registry(load_snapshot_blob(&store).as_deref(), &seed)
        .apply(RegistryAction::CreateBuild { hero_id: "h20".into(), now: 1_700_000_000_000 });
    save_snapshot(&store, &registry).unwrap();
    assert!(store.get(REGISTRY_STORAGE_KEY).unwrap().is_some());

    let restarted = build_registry(load_snapshot_blob(&store).as_deref(), &seed);
    assert_eq!(restarted.version, registry.version);
    assert_eq!(restarted.builds, registry.builds);
    assert_eq!(restarted.towers.len(), registry.towers.len());
    assert_eq!(restarted.shards.len(), registry.shards.len());
}

#[test]
fn failed_file_does_not_abort_the_batch() {
    let registry = build_registry(None, &SeedData::empty());
    let (next, reports) = import_batch(
        &registry,
        [
            ("broken.json", "{ nope".to_string()),
            (
                "dd2_mods_data.json",
                json!([{"name": "Sharpened Blades", "type": "Weapon"}]).to_string(),
            ),
            ("notes.json", json!({"hello": "world"}).to_string()),
        ],
    );

    let statuses: Vec<String> = reports.iter().map(|r| r.status()).collect();
    assert_eq!(statuses[0], "Error parsing broken.json");
    assert_eq!(statuses[1], "Imported dd2_mods_data.json");
    assert!(!reports[2].is_ok());
    assert_eq!(reports[1].outcome.as_ref().ok(), Some(&ImportKind::Mods));
    assert_eq!(next.mods.len(), 1);
    assert_eq!(next.mods[0].compatible_slots, vec!["weapon", "weapon1", "weapon2"]);
}

#[test]
fn dispatched_import_bumps_version_only_when_accepted() {
    let registry = build_registry(None, &SeedData::empty());
    let accepted = registry.apply(RegistryAction::Import {
        payload: json!({"defenses": [{"name": "Ballista", "mana_cost": "60", "hero": "Squire"}]}),
        filename: "upload.json".into(),
    });
    assert_eq!(accepted.version, registry.version + 1);
    assert_eq!(accepted.towers[0].hero_id.as_deref(), Some("h20"));

    let rejected =
        accepted.apply(RegistryAction::Import { payload: json!(42), filename: "x.json".into() });
    assert_eq!(rejected, accepted);
}

#[test]
fn search_groups_registry_entities_in_display_order() {
    let seed = SeedData::bundled();
    let registry = build_registry(None, &seed);
    let index = SearchIndex::build(&registry, &seed.pets);
    let results = index.search("flame");

    let categories: Vec<SearchCategory> = results.groups.iter().map(|g| g.category).collect();
    assert!(categories.contains(&SearchCategory::Defenses));
    assert!(categories.contains(&SearchCategory::Shards));
    let mut sorted = categories.clone();
    sorted.sort();
    assert_eq!(categories, sorted);

    let defenses = results.groups.iter().find(|g| g.category == SearchCategory::Defenses).unwrap();
    assert_eq!(defenses.items[0].label, "Flameburst Tower");
}
