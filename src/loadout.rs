//! Build (loadout) editing helpers.

use std::cmp::Reverse;

use crate::model::{BUILD_SLOT_POSITIONS, Build, BuildSlot, Mod, Shard};

pub const DEFAULT_BUILD_COLOR: &str = "zinc";

/// Colour tags a build can be labelled with.
pub const BUILD_COLORS: [&str; 16] = [
    "red", "orange", "amber", "green", "emerald", "teal", "cyan", "blue", "indigo", "violet",
    "purple", "fuchsia", "pink", "rose", "slate", "zinc",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotItemKind {
    Shard,
    Mod,
}

/// Anything that can be socketed into a build slot.
pub trait Socketable {
    fn name(&self) -> &str;
    fn hero_id(&self) -> Option<&str>;
    fn compatible_slots(&self) -> &[String];
}

impl Socketable for Shard {
    fn name(&self) -> &str {
        &self.name
    }
    fn hero_id(&self) -> Option<&str> {
        self.hero_id.as_deref()
    }
    fn compatible_slots(&self) -> &[String] {
        &self.compatible_slots
    }
}

impl Socketable for Mod {
    fn name(&self) -> &str {
        &self.name
    }
    fn hero_id(&self) -> Option<&str> {
        self.hero_id.as_deref()
    }
    fn compatible_slots(&self) -> &[String] {
        &self.compatible_slots
    }
}

/// A fresh, empty build for `hero_id`. `existing` is the number of builds the hero already has.
pub fn create_build(hero_id: &str, existing: usize, now: i64) -> Build {
    Build {
        id: format!("b_{now}"),
        name: format!("New Build {}", existing + 1),
        hero_id: hero_id.to_string(),
        custom_color: DEFAULT_BUILD_COLOR.to_string(),
        slots: Default::default(),
        last_edited: now,
    }
}

/// Put `item_id` (or nothing) at `index` of a slot's shard or mod row.
/// Returns false when the index is out of range; the build is left untouched.
pub fn set_slot_item(
    build: &mut Build,
    slot_id: &str,
    kind: SlotItemKind,
    index: usize,
    item_id: Option<String>,
    now: i64,
) -> bool {
    if index >= BUILD_SLOT_POSITIONS {
        return false;
    }
    let slot = build
        .slots
        .entry(slot_id.to_string())
        .or_insert_with(|| BuildSlot::empty(slot_id));
    match kind {
        SlotItemKind::Shard => slot.shards[index] = item_id,
        SlotItemKind::Mod => slot.mods[index] = item_id,
    }
    build.last_edited = now;
    true
}

/// Unknown colour tags are ignored.
pub fn set_color(build: &mut Build, color: &str, now: i64) -> bool {
    if !BUILD_COLORS.contains(&color) {
        return false;
    }
    build.custom_color = color.to_string();
    build.last_edited = now;
    true
}

fn fits_slot(item_slots: &[String], slot_id: &str) -> bool {
    let slot = slot_id.to_lowercase();
    let mut lowered = item_slots.iter().map(|s| s.to_lowercase());
    if slot.contains("weapon") {
        lowered.any(|s| s.contains("weapon"))
    } else {
        lowered.any(|s| s == slot)
    }
}

/// Items that may go into `slot_id` for `hero_id`: hero-agnostic items and the
/// hero's own items, hero-specific first, then by name.
pub fn compatible_items<'a, T: Socketable>(
    collection: &'a [T],
    hero_id: &str,
    slot_id: &str,
) -> Vec<&'a T> {
    let mut items: Vec<&T> = collection
        .iter()
        .filter(|item| item.hero_id().is_none_or(|h| h == hero_id))
        .filter(|item| fits_slot(item.compatible_slots(), slot_id))
        .collect();
    items.sort_by_cached_key(|item| {
        (Reverse(item.hero_id().is_some()), item.name().to_lowercase())
    });
    items
}
