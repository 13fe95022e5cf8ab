//! Dedup-by-name reducer with per-kind field merge policies.
//!
//! Records are folded in order: the first occurrence of a name fixes its position
//! and base record, later occurrences are merged into it field by field according
//! to the policy table of their kind. Defenses, towers and links keep the first
//! occurrence and drop the rest.

use indexmap::IndexMap;
use serde_json::Value;

use crate::heroes::resolve_hero_id;
use crate::model::{Defense, Hero, Mod, ResourceLink, Shard, ShardSource, Tower};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPolicy {
    /// First-seen value always stays.
    KeepFirst,
    /// Incoming value replaces the existing one unless it is empty.
    PreferNonEmptyIncoming,
    /// Existing value stays unless it is empty.
    PreferExisting,
}

/// Emptiness as the merge policies see it.
pub trait MergeValue {
    fn is_blank(&self) -> bool;
}

impl MergeValue for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> MergeValue for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl MergeValue for Option<String> {
    fn is_blank(&self) -> bool {
        self.as_deref().is_none_or(str::is_empty)
    }
}

impl MergeValue for Option<Value> {
    fn is_blank(&self) -> bool {
        matches!(self, None | Some(Value::Null))
    }
}

impl MergeValue for ShardSource {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

pub fn pick<T: MergeValue>(policy: FieldPolicy, existing: T, incoming: T) -> T {
    match policy {
        FieldPolicy::KeepFirst => existing,
        FieldPolicy::PreferNonEmptyIncoming if incoming.is_blank() => existing,
        FieldPolicy::PreferNonEmptyIncoming => incoming,
        FieldPolicy::PreferExisting if existing.is_blank() => incoming,
        FieldPolicy::PreferExisting => existing,
    }
}

fn merge_field<T: MergeValue + Default>(policy: FieldPolicy, existing: &mut T, incoming: T) {
    *existing = pick(policy, std::mem::take(existing), incoming);
}

#[derive(Clone, Copy, Debug)]
pub struct ShardPolicy {
    pub id: FieldPolicy,
    pub description: FieldPolicy,
    pub source: FieldPolicy,
    pub compatible_slots: FieldPolicy,
    pub icon_url: FieldPolicy,
    pub heroes: FieldPolicy,
    pub upgrade_levels: FieldPolicy,
    /// A blank result is re-derived from the merged first hero name.
    pub hero_id: FieldPolicy,
}

pub const SHARD_POLICY: ShardPolicy = ShardPolicy {
    id: FieldPolicy::KeepFirst,
    description: FieldPolicy::PreferNonEmptyIncoming,
    source: FieldPolicy::PreferNonEmptyIncoming,
    compatible_slots: FieldPolicy::PreferNonEmptyIncoming,
    icon_url: FieldPolicy::PreferNonEmptyIncoming,
    heroes: FieldPolicy::PreferNonEmptyIncoming,
    upgrade_levels: FieldPolicy::PreferNonEmptyIncoming,
    hero_id: FieldPolicy::PreferExisting,
};

#[derive(Clone, Copy, Debug)]
pub struct ModPolicy {
    pub id: FieldPolicy,
    pub description: FieldPolicy,
    pub source: FieldPolicy,
    pub compatible_slots: FieldPolicy,
    pub kind: FieldPolicy,
    pub icon_url: FieldPolicy,
    pub hero: FieldPolicy,
    /// A blank result is re-derived from the merged hero name.
    pub hero_id: FieldPolicy,
}

pub const MOD_POLICY: ModPolicy = ModPolicy {
    id: FieldPolicy::KeepFirst,
    description: FieldPolicy::PreferNonEmptyIncoming,
    source: FieldPolicy::PreferNonEmptyIncoming,
    compatible_slots: FieldPolicy::PreferNonEmptyIncoming,
    kind: FieldPolicy::PreferNonEmptyIncoming,
    icon_url: FieldPolicy::PreferNonEmptyIncoming,
    hero: FieldPolicy::PreferExisting,
    hero_id: FieldPolicy::PreferExisting,
};

/// Dedup identity. Case-sensitive, never the id.
pub trait Keyed {
    fn key(&self) -> &str;
}

pub trait Merge: Keyed + Sized {
    fn merge_from(&mut self, incoming: Self, heroes: &[Hero]);
}

impl Keyed for Shard {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Merge for Shard {
    fn merge_from(&mut self, incoming: Shard, heroes: &[Hero]) {
        let p = SHARD_POLICY;
        merge_field(p.id, &mut self.id, incoming.id);
        merge_field(p.description, &mut self.description, incoming.description);
        merge_field(p.source, &mut self.source, incoming.source);
        merge_field(p.compatible_slots, &mut self.compatible_slots, incoming.compatible_slots);
        merge_field(p.icon_url, &mut self.icon_url, incoming.icon_url);
        merge_field(p.heroes, &mut self.heroes, incoming.heroes);
        merge_field(p.upgrade_levels, &mut self.upgrade_levels, incoming.upgrade_levels);
        merge_field(p.hero_id, &mut self.hero_id, incoming.hero_id);
        if self.hero_id.is_none() {
            self.hero_id = resolve_hero_id(self.first_hero_name(), heroes);
        }
    }
}

impl Keyed for Mod {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Merge for Mod {
    fn merge_from(&mut self, incoming: Mod, heroes: &[Hero]) {
        let p = MOD_POLICY;
        merge_field(p.id, &mut self.id, incoming.id);
        merge_field(p.description, &mut self.description, incoming.description);
        merge_field(p.source, &mut self.source, incoming.source);
        merge_field(p.compatible_slots, &mut self.compatible_slots, incoming.compatible_slots);
        merge_field(p.kind, &mut self.kind, incoming.kind);
        merge_field(p.icon_url, &mut self.icon_url, incoming.icon_url);
        merge_field(p.hero, &mut self.hero, incoming.hero);
        merge_field(p.hero_id, &mut self.hero_id, incoming.hero_id);
        if self.hero_id.is_none() {
            self.hero_id = resolve_hero_id(self.hero.as_deref(), heroes);
        }
    }
}

macro_rules! keep_first {
    ($($ty:ty),* $(,)?) => {$(
        impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.name
            }
        }

        impl Merge for $ty {
            fn merge_from(&mut self, _incoming: $ty, _heroes: &[Hero]) {}
        }
    )*};
}

keep_first!(Defense, Tower, ResourceLink);

/// Fold records into a list unique by name, in first-occurrence order.
pub fn dedup_merge<T: Merge>(items: impl IntoIterator<Item = T>, heroes: &[Hero]) -> Vec<T> {
    let mut acc: IndexMap<String, T> = IndexMap::new();
    for item in items {
        match acc.get_mut(item.key()) {
            Some(existing) => existing.merge_from(item, heroes),
            None => {
                acc.insert(item.key().to_string(), item);
            }
        }
    }
    acc.into_values().collect()
}

/// Treat `incoming` as later occurrences relative to `existing`.
pub fn union<T: Merge + Clone>(existing: &[T], incoming: Vec<T>, heroes: &[Hero]) -> Vec<T> {
    dedup_merge(existing.iter().cloned().chain(incoming), heroes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heroes::default_heroes;
    use crate::normalize::{normalize_defense, normalize_link, normalize_mod, normalize_shard};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn shard(raw: serde_json::Value) -> Shard {
        normalize_shard(&raw, &default_heroes())
    }

    #[test]
    fn later_icon_overrides_empty_icon() {
        let merged = dedup_merge(
            vec![
                shard(json!({"name": "Abyssal Hunger", "iconUrl": ""})),
                shard(json!({"name": "Abyssal Hunger", "iconUrl": "http://x/y.png"})),
            ],
            &default_heroes(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].icon_url.as_deref(), Some("http://x/y.png"));
    }

    #[test]
    fn empty_incoming_keeps_existing_presentation() {
        let merged = dedup_merge(
            vec![
                shard(json!({"name": "S", "iconUrl": "http://a.png", "source": "Chaos 1", "compatibleSlots": ["relic"]})),
                shard(json!({"name": "S", "source": "", "heroes": []})),
            ],
            &default_heroes(),
        );
        assert_eq!(merged[0].icon_url.as_deref(), Some("http://a.png"));
        assert_eq!(merged[0].source.label(), "Chaos 1");
        assert_eq!(merged[0].compatible_slots, vec!["relic"]);
    }

    #[test]
    fn shard_id_is_kept_and_description_refreshed() {
        let merged = dedup_merge(
            vec![
                shard(json!({"id": "saved-id", "name": "S", "description": "typo"})),
                shard(json!({"id": "bundle-id", "name": "S", "description": "fixed"})),
            ],
            &default_heroes(),
        );
        assert_eq!(merged[0].id, "saved-id");
        assert_eq!(merged[0].description, "fixed");
    }

    #[test]
    fn shard_hero_id_prefers_existing_then_rederives() {
        let heroes = default_heroes();
        let merged = dedup_merge(
            vec![
                shard(json!({"name": "S", "heroes": [{"name": "Squire", "slot": "relic"}]})),
                shard(json!({"name": "S", "heroes": [{"name": "Monk", "slot": "relic"}]})),
            ],
            &heroes,
        );
        assert_eq!(merged[0].hero_id.as_deref(), Some("h20"));
        assert_eq!(merged[0].first_hero_name(), Some("Monk"));

        let mut unresolved = shard(json!({"name": "T"}));
        unresolved.heroes = Vec::new();
        let incoming = shard(json!({"name": "T", "heroes": [{"name": "Not A Hero"}]}));
        unresolved.merge_from(incoming, &heroes);
        assert_eq!(unresolved.hero_id, None);
    }

    #[test]
    fn mod_merge_follows_policy() {
        let heroes = default_heroes();
        let old = json!({"name": "M", "type": "Relic", "image": "http://old.png"});
        let new = json!({"name": "M", "type": "Weapon", "hero": "Squire", "drop": "Chaos 2"});
        let first = normalize_mod(&old, &heroes);
        let second = normalize_mod(&new, &heroes);
        let merged = dedup_merge(vec![first, second], &heroes);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!(m.kind, "Weapon");
        assert_eq!(m.compatible_slots, vec!["weapon", "weapon1", "weapon2"]);
        assert_eq!(m.icon_url.as_deref(), Some("http://old.png"));
        assert_eq!(m.hero.as_deref(), Some("Squire"));
        assert_eq!(m.hero_id.as_deref(), Some("h20"));
        assert_eq!(m.source, "Chaos 2");
    }

    #[test]
    fn keep_first_kinds_skip_duplicates() {
        let heroes = default_heroes();
        let defenses = dedup_merge(
            vec![
                normalize_defense(&json!({"name": "Ballista", "mana_cost": "30"}), &heroes),
                normalize_defense(&json!({"name": "Ballista", "mana_cost": "60"}), &heroes),
            ],
            &heroes,
        );
        assert_eq!(defenses.len(), 1);
        assert_eq!(defenses[0].field_str("mana_cost").as_deref(), Some("30"));

        let links = dedup_merge(
            vec![
                normalize_link(&json!({"name": "Wiki", "author": "A"})),
                normalize_link(&json!({"name": "Wiki", "author": "B"})),
            ],
            &heroes,
        );
        assert_eq!(links[0].author, "A");
    }

    #[test]
    fn output_follows_first_occurrence_order() {
        let merged = dedup_merge(
            vec![shard(json!({"name": "B"})), shard(json!({"name": "A"})), shard(json!({"name": "B", "iconUrl": "http://b.png"}))],
            &default_heroes(),
        );
        let names: Vec<_> = merged.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(merged[0].icon_url.as_deref(), Some("http://b.png"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let records = vec![shard(json!({"name": "Ward"})), shard(json!({"name": "ward"}))];
        let merged = dedup_merge(records, &default_heroes());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn pick_table() {
        use FieldPolicy::*;
        assert_eq!(pick(KeepFirst, "a".to_string(), "b".to_string()), "a");
        assert_eq!(pick(PreferNonEmptyIncoming, "a".to_string(), String::new()), "a");
        assert_eq!(pick(PreferNonEmptyIncoming, "a".to_string(), "b".to_string()), "b");
        assert_eq!(pick(PreferExisting, String::new(), "b".to_string()), "b");
        assert_eq!(pick(PreferExisting, "a".to_string(), "b".to_string()), "a");
        assert_eq!(pick(PreferExisting, None::<String>, Some("b".into())), Some("b".into()));
    }

    proptest! {
        #[test]
        fn name_set_does_not_depend_on_order(
            names in prop::collection::vec(prop_oneof![Just("Ward"), Just("Blaze"), Just("ward"), Just("Frost")], 0..12),
            seed in any::<u64>(),
        ) {
            let heroes = default_heroes();
            let records: Vec<Shard> = names.iter().map(|n| shard(json!({"name": n}))).collect();
            let mut shuffled = records.clone();
            // deterministic permutation from the seed
            let len = shuffled.len();
            if len > 1 {
                for i in 0..len {
                    let j = ((seed >> (i % 64)) as usize).wrapping_add(i * 7) % len;
                    shuffled.swap(i, j);
                }
            }
            let a: BTreeSet<String> = dedup_merge(records, &heroes).into_iter().map(|s| s.name).collect();
            let b: BTreeSet<String> = dedup_merge(shuffled, &heroes).into_iter().map(|s| s.name).collect();
            let expected: BTreeSet<String> = names.iter().map(|n| n.to_string()).collect();
            prop_assert_eq!(&a, &expected);
            prop_assert_eq!(a, b);
        }
    }
}
