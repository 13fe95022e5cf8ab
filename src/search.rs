//! Global search: a flat index derived from the registry and a small fuzzy ranker.

use crate::config::{SEARCH_GROUP_CAP, SEARCH_RESULT_CAP};
use crate::heroes::hero_name;
use crate::model::{DataRegistry, PetAbility, ShardSource};
use crate::util::format_value;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchCategory {
    Tools,
    Heroes,
    Maps,
    Builds,
    Collections,
    Abilities,
    Defenses,
    Shards,
    Mods,
    Links,
    PetAbilities,
}

impl SearchCategory {
    /// Display order of result groups.
    pub const ORDER: [SearchCategory; 11] = [
        SearchCategory::Tools,
        SearchCategory::Heroes,
        SearchCategory::Maps,
        SearchCategory::Builds,
        SearchCategory::Collections,
        SearchCategory::Abilities,
        SearchCategory::Defenses,
        SearchCategory::Shards,
        SearchCategory::Mods,
        SearchCategory::Links,
        SearchCategory::PetAbilities,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchCategory::Tools => "Tools",
            SearchCategory::Heroes => "Heroes",
            SearchCategory::Maps => "Maps",
            SearchCategory::Builds => "Builds",
            SearchCategory::Collections => "Collections",
            SearchCategory::Abilities => "Abilities",
            SearchCategory::Defenses => "Defenses",
            SearchCategory::Shards => "Shards",
            SearchCategory::Mods => "Mods",
            SearchCategory::Links => "Links",
            SearchCategory::PetAbilities => "Pet Abilities",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Maps,
    Gold,
    Builds,
    Heroes,
    Checklists,
    Encyclopedia,
    Settings,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Page::Maps => "maps",
            Page::Gold => "gold",
            Page::Builds => "builds",
            Page::Heroes => "heroes",
            Page::Checklists => "checklists",
            Page::Encyclopedia => "encyclopedia",
            Page::Settings => "settings",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncyclopediaTab {
    Abilities,
    Defenses,
    Mods,
    Shards,
    Links,
    Pets,
}

/// What selecting a result should do beyond switching page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchAction {
    Hero(String),
    Build(String),
    Checklist(String),
    Map(String),
    Encyclopedia { tab: EncyclopediaTab, query: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchItem {
    pub id: String,
    pub label: String,
    pub category: SearchCategory,
    pub page: Page,
    pub subtitle: Option<String>,
    pub keywords: Option<String>,
    pub action: Option<SearchAction>,
}

impl SearchItem {
    fn new(id: String, label: &str, category: SearchCategory, page: Page) -> Self {
        Self {
            id,
            label: label.to_string(),
            category,
            page,
            subtitle: None,
            keywords: None,
            action: None,
        }
    }

    fn subtitle(mut self, text: &str) -> Self {
        self.subtitle = Some(text.to_string()).filter(|s| !s.is_empty());
        self
    }

    fn keywords(mut self, text: &str) -> Self {
        self.keywords = Some(text.to_string()).filter(|s| !s.trim().is_empty());
        self
    }

    fn action(mut self, action: SearchAction) -> Self {
        self.action = Some(action);
        self
    }

    /// The text a query is scored against.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.label,
            self.subtitle.as_deref().unwrap_or(""),
            self.keywords.as_deref().unwrap_or(""),
            self.category.label()
        )
    }

    /// Second line under the label.
    pub fn caption(&self) -> &str {
        self.subtitle.as_deref().unwrap_or(self.category.label())
    }
}

// (id, label, page, subtitle, keywords)
#[rustfmt::skip]
const TOOLS: [(&str, &str, Page, &str, &str); 7] = [
    ("tool-maps", "Map Planner", Page::Maps, "Layouts, DU, lanes", "maps planner"),
    ("tool-gold", "Gold Calculator", Page::Gold, "Runs, resets, projections", "gold calculator"),
    ("tool-builds", "Build Editor", Page::Builds, "Shards, mods, builds", "builds editor"),
    ("tool-heroes", "Heroes Library", Page::Heroes, "Roster and loadouts", "heroes library"),
    ("tool-checklists", "Collection Tracker", Page::Checklists, "Lists and notes", "collections tracker"),
    ("tool-encyclopedia", "Encyclopedia", Page::Encyclopedia, "Game data index", "encyclopedia data"),
    ("tool-settings", "Settings", Page::Settings, "Imports and preferences", "settings"),
];

fn encyclopedia(tab: EncyclopediaTab, name: &str) -> SearchAction {
    SearchAction::Encyclopedia { tab, query: name.to_string() }
}

/// A structured source without a difficulty reads as plain "Shard".
fn shard_caption(source: &ShardSource) -> String {
    let text = match source {
        ShardSource::Label(s) if s.trim().is_empty() => return String::new(),
        ShardSource::Label(s) => s.as_str(),
        ShardSource::Detailed(obj) => match obj.get("difficulty").and_then(Value::as_str) {
            Some(d) if !d.trim().is_empty() => d,
            _ => return "Shard".to_string(),
        },
    };
    format_value(&Value::from(text))
}

/// Ranker. `None` means no match. A contiguous hit always takes the substring
/// path; otherwise every query char must appear in order, runs scoring higher
/// than scattered hits.
pub fn fuzzy_score(query: &str, target: &str) -> Option<i64> {
    let q: Vec<char> = query.trim().to_lowercase().chars().collect();
    let t: Vec<char> = target.to_lowercase().chars().collect();
    if q.is_empty() || t.is_empty() {
        return None;
    }
    if let Some(idx) = t.windows(q.len()).position(|w| w == q.as_slice()) {
        let slack = (t.len() as i64 - q.len() as i64).max(0);
        return Some(200 - idx as i64 - slack);
    }
    let mut score = 0i64;
    let mut cursor = 0usize;
    let mut consecutive = 0i64;
    for &ch in &q {
        let found = cursor + t[cursor..].iter().position(|&c| c == ch)?;
        if found == cursor {
            consecutive += 1;
            score += 15 + consecutive * 2;
        } else {
            consecutive = 0;
            let gap = (found - cursor) as i64;
            score += (10 - gap).max(1);
        }
        cursor = found + 1;
    }
    Some(score)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchGroup {
    pub category: SearchCategory,
    pub items: Vec<SearchItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Non-empty groups in display order.
    pub groups: Vec<SearchGroup>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchIndex {
    items: Vec<SearchItem>,
}

impl SearchIndex {
    pub fn build(registry: &DataRegistry, pets: &[PetAbility]) -> Self {
        let mut items: Vec<SearchItem> = TOOLS
            .iter()
            .map(|&(id, label, page, subtitle, keywords)| {
                SearchItem::new(id.to_string(), label, SearchCategory::Tools, page)
                    .subtitle(subtitle)
                    .keywords(keywords)
            })
            .collect();

        for map in &registry.maps {
            items.push(
                SearchItem::new(
                    format!("map-{}", map.id),
                    &map.name,
                    SearchCategory::Maps,
                    Page::Maps,
                )
                .subtitle(map.difficulty.as_str())
                .action(SearchAction::Map(map.id.clone())),
            );
        }
        for hero in &registry.heroes {
            items.push(
                SearchItem::new(
                    format!("hero-{}", hero.id),
                    &hero.name,
                    SearchCategory::Heroes,
                    Page::Heroes,
                )
                .subtitle(&hero.class)
                .keywords(&hero.role_tags.join(" "))
                .action(SearchAction::Hero(hero.id.clone())),
            );
        }
        for build in &registry.builds {
            let owner =
                hero_name(Some(build.hero_id.as_str()), &registry.heroes).unwrap_or("Unknown");
            items.push(
                SearchItem::new(
                    format!("build-{}", build.id),
                    &build.name,
                    SearchCategory::Builds,
                    Page::Builds,
                )
                .subtitle(owner)
                .action(SearchAction::Build(build.id.clone())),
            );
        }
        for list in &registry.checklists {
            items.push(
                SearchItem::new(
                    format!("checklist-{}", list.id),
                    &list.title,
                    SearchCategory::Collections,
                    Page::Checklists,
                )
                .subtitle(&list.category)
                .action(SearchAction::Checklist(list.id.clone())),
            );
        }
        for ability in &registry.abilities {
            items.push(
                SearchItem::new(
                    format!("ability-{}", ability.name),
                    &ability.name,
                    SearchCategory::Abilities,
                    Page::Encyclopedia,
                )
                .subtitle(&ability.ability_type)
                .keywords(&ability.heroes.join(" "))
                .action(encyclopedia(EncyclopediaTab::Abilities, &ability.name)),
            );
        }
        for defense in &registry.defenses {
            let kind = defense.defense_type().unwrap_or_else(|| "Defense".to_string());
            items.push(
                SearchItem::new(
                    format!("defense-{}", defense.name),
                    &defense.name,
                    SearchCategory::Defenses,
                    Page::Encyclopedia,
                )
                .subtitle(&kind)
                .keywords(&defense.hero)
                .action(encyclopedia(EncyclopediaTab::Defenses, &defense.name)),
            );
        }
        for shard in &registry.shards {
            let source = shard_caption(&shard.source);
            items.push(
                SearchItem::new(
                    format!("shard-{}", shard.id),
                    &shard.name,
                    SearchCategory::Shards,
                    Page::Encyclopedia,
                )
                .subtitle(&source)
                .keywords(&shard.compatible_slots.join(" "))
                .action(encyclopedia(EncyclopediaTab::Shards, &shard.name)),
            );
        }
        for m in &registry.mods {
            let kind = if m.kind.is_empty() { "Mod" } else { m.kind.as_str() };
            items.push(
                SearchItem::new(
                    format!("mod-{}", m.id),
                    &m.name,
                    SearchCategory::Mods,
                    Page::Encyclopedia,
                )
                .subtitle(kind)
                .keywords(&m.compatible_slots.join(" "))
                .action(encyclopedia(EncyclopediaTab::Mods, &m.name)),
            );
        }
        for link in &registry.links {
            items.push(
                SearchItem::new(
                    format!("link-{}", link.name),
                    &link.name,
                    SearchCategory::Links,
                    Page::Encyclopedia,
                )
                .subtitle(&link.author)
                .keywords(&link.description)
                .action(encyclopedia(EncyclopediaTab::Links, &link.name)),
            );
        }
        for (index, pet) in pets.iter().enumerate() {
            let kind = if pet.kind.is_empty() { "Pet Ability" } else { pet.kind.as_str() };
            items.push(
                SearchItem::new(
                    format!("pet-{index}-{}", pet.name),
                    &pet.name,
                    SearchCategory::PetAbilities,
                    Page::Encyclopedia,
                )
                .subtitle(kind)
                .keywords(&format!("{} {}", pet.description, pet.notes))
                .action(encyclopedia(EncyclopediaTab::Pets, &pet.name)),
            );
        }

        log::debug!("search index rebuilt: {} items", items.len());
        Self { items }
    }

    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    /// Matching items, best first, capped. Ties keep index order.
    pub fn ranked(&self, query: &str) -> Vec<&SearchItem> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(i64, &SearchItem)> = self
            .items
            .iter()
            .filter_map(|item| fuzzy_score(query, &item.haystack()).map(|s| (s, item)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(SEARCH_RESULT_CAP).map(|(_, item)| item).collect()
    }

    pub fn search(&self, query: &str) -> SearchResults {
        let ranked = self.ranked(query);
        let groups = SearchCategory::ORDER
            .iter()
            .filter_map(|&category| {
                let items: Vec<SearchItem> = ranked
                    .iter()
                    .filter(|item| item.category == category)
                    .take(SEARCH_GROUP_CAP)
                    .map(|item| (*item).clone())
                    .collect();
                (!items.is_empty()).then_some(SearchGroup { category, items })
            })
            .collect();
        SearchResults { groups }
    }
}
