//! Fixed planner constants and persisted UI preferences.

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

pub const REGISTRY_STORAGE_KEY: &str = "dd2_planner_data";
pub const FONT_STORAGE_KEY: &str = "dd2_font";

/// Ranked results kept after sorting, before grouping.
pub const SEARCH_RESULT_CAP: usize = 60;
/// Results shown per category group.
pub const SEARCH_GROUP_CAP: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontOption {
    pub id: &'static str,
    pub label: &'static str,
    pub stack: &'static str,
}

pub const FONT_OPTIONS: &[FontOption] = &[
    FontOption {
        id: "code-jetbrains",
        label: "Code: JetBrains Mono",
        stack: concat!(
            "\"JetBrains Mono\",\"Fira Code\",\"Cascadia Code\",",
            "\"Consolas\",\"Menlo\",\"Monaco\",\"Liberation Mono\",",
            "\"Courier New\",monospace",
        ),
    },
    FontOption {
        id: "code-fira",
        label: "Code: Fira Code",
        stack: concat!(
            "\"Fira Code\",\"JetBrains Mono\",\"Cascadia Code\",",
            "\"Consolas\",\"Menlo\",\"Monaco\",\"Liberation Mono\",",
            "\"Courier New\",monospace",
        ),
    },
    FontOption {
        id: "code-cascadia",
        label: "Code: Cascadia Code",
        stack: concat!(
            "\"Cascadia Code\",\"JetBrains Mono\",\"Fira Code\",",
            "\"Consolas\",\"Menlo\",\"Monaco\",\"Liberation Mono\",",
            "\"Courier New\",monospace",
        ),
    },
    FontOption {
        id: "gothic",
        label: "Gothic: Blackletter",
        stack: concat!(
            "\"Pirata One\",\"UnifrakturMaguntia\",\"Old English Text MT\",",
            "\"Blackletter\",\"Palatino Linotype\",\"Times New Roman\",",
            "serif",
        ),
    },
    FontOption {
        id: "kawaii",
        label: "Kawaii: Playful",
        stack: concat!(
            "\"Comic Sans MS\",\"Comic Neue\",\"Chalkboard SE\",",
            "\"Marker Felt\",\"Segoe Print\",\"Trebuchet MS\",cursive",
        ),
    },
    FontOption {
        id: "arcade",
        label: "Arcade: Pixel",
        stack: concat!(
            "\"Press Start 2P\",\"VT323\",\"Pixel Operator\",",
            "\"Courier New\",monospace",
        ),
    },
    FontOption {
        id: "system",
        label: "System UI",
        stack: concat!(
            "ui-sans-serif, system-ui, -apple-system, \"Segoe UI\", Roboto,",
            " \"Helvetica Neue\", Arial, \"Noto Sans\",",
            " \"Liberation Sans\", sans-serif",
        ),
    },
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSettings {
    pub font_choice: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            font_choice: FONT_OPTIONS[0].id.to_string(),
        }
    }
}

impl PlannerSettings {
    /// Missing, unreadable or unknown values fall back to the default font.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(FONT_STORAGE_KEY) {
            Ok(Some(id)) if font_option(&id).is_some() => Self { font_choice: id },
            Ok(_) => Self::default(),
            Err(err) => {
                log::warn!("font preference unreadable, using default: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        if let Err(err) = store.set(FONT_STORAGE_KEY, &self.font_choice) {
            log::warn!("font preference not saved: {err}");
        }
    }

    pub fn font(&self) -> &'static FontOption {
        font_option(&self.font_choice).unwrap_or(&FONT_OPTIONS[0])
    }
}

pub fn font_option(id: &str) -> Option<&'static FontOption> {
    FONT_OPTIONS.iter().find(|f| f.id == id)
}
