//! Built-in hero roster, default maps and the hero-name resolver.

use crate::model::SlotLayout::{self, DualWield, Shield, Standard};
use crate::model::{Hero, MapData, MapDifficulty};

const ICON_BASE: &str = "https://static.wikia.nocookie.net/dungeondefenders/images";

// (id, name, roles, color, layout, icon path)
#[rustfmt::skip]
const HERO_TABLE: &[(&str, &str, &[&str], &str, SlotLayout, &str)] = &[
    ("h20", "Squire", &["Tank", "Builder"], "bg-orange-600", Shield, "9/91/Squire_Icon.png"),
    ("h3", "Apprentice", &["DPS", "Builder"], "bg-blue-600", Standard, "2/2d/Apprentice_Icon.png"),
    ("h13", "Huntress", &["DPS", "Builder"], "bg-green-600", Standard, "9/96/Huntress_Icon.png"),
    ("h17", "Monk", &["Support", "Builder"], "bg-yellow-600", Standard, "3/3d/Monk_Icon.png"),
    ("h1", "Abyss Lord", &["Builder", "Tank"], "bg-purple-700", Standard, "6/65/Abyss_Lord_Icon.png"),
    ("h2", "Adept", &["DPS", "Builder"], "bg-violet-600", Standard, "8/88/Adept_Icon.png"),
    ("h4", "Aquarion", &["DPS", "Builder"], "bg-cyan-500", Standard, "c/c2/Aquarion_Icon.png"),
    ("h5", "Barbarian", &["DPS"], "bg-red-700", DualWield, "a/a2/Barbarian_Icon.png"),
    ("h6", "Countess", &["Tank", "Builder"], "bg-orange-500", Shield, "c/c5/Countess_Icon.png"),
    ("h7", "Cyborg", &["DPS", "Builder"], "bg-zinc-600", Standard, "5/5f/Cyborg_Icon.png"),
    ("h8", "Dryad", &["Builder", "Support"], "bg-emerald-600", Standard, "4/4d/Dryad_Icon.png"),
    ("h9", "Engineer", &["Builder", "DPS"], "bg-teal-700", Standard, "a/a7/Engineer_Icon.png"),
    ("h10", "Frostweaver", &["Builder", "CC"], "bg-sky-500", Standard, "5/5d/Frostweaver_Icon.png"),
    ("h11", "Gunwitch", &["DPS"], "bg-pink-700", Standard, "8/8f/Gunwitch_Icon.png"),
    ("h12", "Hunter", &["DPS", "Builder"], "bg-emerald-700", Standard, "f/f6/Hunter_Icon.png"),
    ("h14", "Initiate", &["Support", "Builder"], "bg-amber-500", Standard, "8/88/Initiate_Icon.png"),
    ("h15", "Lavamancer", &["Tank", "Builder"], "bg-red-800", Standard, "c/c8/Lavamancer_Icon.png"),
    ("h16", "Mercenary", &["DPS"], "bg-slate-700", Standard, "3/36/Mercenary_Icon.png"),
    ("h18", "Mystic", &["Builder", "Support"], "bg-indigo-600", Standard, "8/8f/Mystic_Icon.png"),
    ("h19", "Series EV2", &["Builder", "DPS"], "bg-teal-600", Standard, "d/d3/Series_EV2_Icon.png"),
    ("h21", "Jester", &["Support", "DPS"], "bg-fuchsia-700", Standard, "9/9d/Jester_Icon.png"),
];

pub fn default_heroes() -> Vec<Hero> {
    HERO_TABLE
        .iter()
        .map(|&(id, name, roles, color, layout, icon)| Hero {
            id: id.to_string(),
            name: name.to_string(),
            class: name.to_string(),
            role_tags: roles.iter().map(|r| r.to_string()).collect(),
            color: color.to_string(),
            equipment_slots: layout.to_vec(),
            icon_url: Some(format!("{ICON_BASE}/{icon}")),
            stats: None,
        })
        .collect()
}

pub fn default_maps() -> Vec<MapData> {
    vec![
        MapData {
            id: "m1".into(),
            name: "The Gates of Dragonfall".into(),
            max_du: 1000,
            image_url: None,
            difficulty: MapDifficulty::Campaign,
        },
        MapData {
            id: "m2".into(),
            name: "Nimbus Reach".into(),
            max_du: 1200,
            image_url: None,
            difficulty: MapDifficulty::Chaos,
        },
    ]
}

/// Case-insensitive exact match on hero name. A miss is a normal outcome:
/// the entity simply stays hero-agnostic.
pub fn resolve_hero_id(name: Option<&str>, heroes: &[Hero]) -> Option<String> {
    let name = name.filter(|n| !n.is_empty())?;
    let wanted = name.to_lowercase();
    heroes
        .iter()
        .find(|h| h.name.to_lowercase() == wanted)
        .map(|h| h.id.clone())
}

pub fn hero_name<'a>(id: Option<&str>, heroes: &'a [Hero]) -> Option<&'a str> {
    let id = id?;
    heroes.iter().find(|h| h.id == id).map(|h| h.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn roster_has_unique_ids_and_names() {
        let heroes = default_heroes();
        assert_eq!(heroes.len(), 21);
        let mut ids: Vec<_> = heroes.iter().map(|h| h.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 21);
    }

    #[test]
    fn slot_layouts_follow_weapon_style() {
        let heroes = default_heroes();
        let squire = heroes.iter().find(|h| h.name == "Squire").unwrap();
        assert!(squire.equipment_slots.contains(&"shield".to_string()));
        let barbarian = heroes.iter().find(|h| h.name == "Barbarian").unwrap();
        assert_eq!(barbarian.equipment_slots[0], "weapon1");
        assert_eq!(barbarian.equipment_slots.len(), 7);
        let monk = heroes.iter().find(|h| h.name == "Monk").unwrap();
        assert_eq!(monk.equipment_slots.len(), 6);
    }

    #[rstest]
    #[case("squire")]
    #[case("SQUIRE")]
    #[case("Squire")]
    fn resolves_regardless_of_case(#[case] name: &str) {
        assert_eq!(resolve_hero_id(Some(name), &default_heroes()).as_deref(), Some("h20"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Squir"))]
    #[case(Some("Abyss-Lord"))]
    fn near_misses_resolve_to_nothing(#[case] name: Option<&str>) {
        assert_eq!(resolve_hero_id(name, &default_heroes()), None);
    }

    #[test]
    fn hero_name_looks_up_by_id() {
        let heroes = default_heroes();
        assert_eq!(hero_name(Some("h1"), &heroes), Some("Abyss Lord"));
        assert_eq!(hero_name(Some("nope"), &heroes), None);
        assert_eq!(hero_name(None, &heroes), None);
    }

    proptest! {
        #[test]
        fn resolution_ignores_case(
            idx in 0usize..21,
            upper in proptest::collection::vec(any::<bool>(), 0..16),
        ) {
            let heroes = default_heroes();
            let name: String = heroes[idx]
                .name
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if upper.get(i).copied().unwrap_or(false) {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    }
                })
                .collect();
            let resolved = resolve_hero_id(Some(&name), &heroes);
            prop_assert_eq!(resolved.clone(), Some(heroes[idx].id.clone()));
            prop_assert_eq!(resolved, resolve_hero_id(Some(&name), &heroes));
        }
    }
}
