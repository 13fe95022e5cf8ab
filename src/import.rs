//! User data import: classify a dropped JSON file, pull its records out and fold
//! them into the registry as later occurrences of whatever is already loaded.

use std::fmt;

use serde_json::Value;

use crate::error::ImportError;
use crate::merge::union;
use crate::model::DataRegistry;
use crate::normalize::{
    normalize_ability, normalize_defense, normalize_link, normalize_mod, normalize_shard,
    synthesize_tower,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Towers,
    Shards,
    Mods,
    Links,
    Abilities,
    Unknown,
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportKind::Towers => "towers",
            ImportKind::Shards => "shards",
            ImportKind::Mods => "mods",
            ImportKind::Links => "links",
            ImportKind::Abilities => "abilities",
            ImportKind::Unknown => "unknown",
        }
    }

    /// Keys a wrapped payload may carry its records under.
    fn wrapper_keys(self) -> &'static [&'static str] {
        match self {
            ImportKind::Towers => &["materials", "defenses", "towers"],
            ImportKind::Shards => &["shards"],
            ImportKind::Mods => &["mods"],
            ImportKind::Links => &["resources"],
            ImportKind::Abilities => &["abilities"],
            ImportKind::Unknown => &[],
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in order; the first substring hit decides.
const FILENAME_HINTS: [(&str, ImportKind); 6] = [
    ("defenses", ImportKind::Towers),
    ("shards", ImportKind::Shards),
    ("mods", ImportKind::Mods),
    ("links", ImportKind::Links),
    ("abilities", ImportKind::Abilities),
    ("materials", ImportKind::Towers),
];

// First-element fields that give a bare array away.
const ARRAY_SNIFF: [(&str, ImportKind); 3] = [
    ("base_def_power", ImportKind::Towers),
    ("upgradeLevels", ImportKind::Shards),
    ("hero", ImportKind::Mods),
];

const WRAPPED_SNIFF: [ImportKind; 5] = [
    ImportKind::Towers,
    ImportKind::Shards,
    ImportKind::Mods,
    ImportKind::Links,
    ImportKind::Abilities,
];

fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

pub fn classify(payload: &Value, filename: &str) -> ImportKind {
    // Hints ignore case: exported files arrive as `DD2_Shards.json` as often as `dd2_shards.json`.
    let lowered = filename.to_lowercase();
    if let Some((_, kind)) = FILENAME_HINTS.iter().find(|(hint, _)| lowered.contains(hint)) {
        return *kind;
    }
    match payload {
        Value::Array(items) => {
            let first = items.first();
            ARRAY_SNIFF
                .iter()
                .find(|(field, _)| truthy(first.and_then(|f| f.get(field))))
                .map_or(ImportKind::Unknown, |(_, kind)| *kind)
        }
        Value::Object(obj) => WRAPPED_SNIFF
            .into_iter()
            .find(|kind| {
                kind.wrapper_keys()
                    .iter()
                    .any(|k| obj.get(*k).is_some_and(Value::is_array))
            })
            .unwrap_or(ImportKind::Unknown),
        _ => ImportKind::Unknown,
    }
}

/// Records of `kind` in `payload`: the payload itself when it is an array,
/// otherwise the first array under one of the kind's wrapper keys.
pub fn extract_records(payload: &Value, kind: ImportKind) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        Value::Object(obj) => kind
            .wrapper_keys()
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// A classified file, ready to be folded into a registry.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportFile {
    pub filename: String,
    pub kind: ImportKind,
    pub records: Vec<Value>,
}

pub fn parse_payload(filename: &str, text: &str) -> Result<Value, ImportError> {
    serde_json::from_str(text).map_err(|source| ImportError::Parse {
        filename: filename.to_string(),
        source,
    })
}

pub fn prepare_import(payload: &Value, filename: &str) -> Result<ImportFile, ImportError> {
    let kind = classify(payload, filename);
    if kind == ImportKind::Unknown {
        return Err(ImportError::Unclassified { filename: filename.to_string() });
    }
    let records = extract_records(payload, kind);
    if records.is_empty() {
        return Err(ImportError::NoRecords { filename: filename.to_string(), kind });
    }
    log::info!("Importing {filename} as {kind} ({} records)", records.len());
    Ok(ImportFile { filename: filename.to_string(), kind, records })
}

/// Fold a prepared file into `registry`. The result keeps the input's version;
/// bumping it is the caller's business.
pub fn ingest(registry: &DataRegistry, file: &ImportFile) -> DataRegistry {
    let heroes = &registry.heroes;
    let mut next = registry.clone();
    match file.kind {
        ImportKind::Towers => {
            let defenses: Vec<_> =
                file.records.iter().map(|r| normalize_defense(r, heroes)).collect();
            let towers: Vec<_> =
                defenses.iter().filter_map(|d| synthesize_tower(d, heroes)).collect();
            next.defenses = union(&registry.defenses, defenses, heroes);
            next.towers = union(&registry.towers, towers, heroes);
        }
        ImportKind::Shards => {
            let shards = file.records.iter().map(|r| normalize_shard(r, heroes)).collect();
            next.shards = union(&registry.shards, shards, heroes);
        }
        ImportKind::Mods => {
            let mods = file.records.iter().map(|r| normalize_mod(r, heroes)).collect();
            next.mods = union(&registry.mods, mods, heroes);
        }
        ImportKind::Links => {
            let links = file.records.iter().map(normalize_link).collect();
            next.links = union(&registry.links, links, heroes);
        }
        ImportKind::Abilities => {
            next.abilities = file.records.iter().filter_map(normalize_ability).collect();
        }
        ImportKind::Unknown => {}
    }
    next
}

/// Classify, extract and fold one parsed payload.
pub fn apply_import(
    registry: &DataRegistry,
    payload: &Value,
    filename: &str,
) -> Result<DataRegistry, ImportError> {
    let file = prepare_import(payload, filename)?;
    Ok(ingest(registry, &file))
}

#[derive(Debug)]
pub struct ImportReport {
    pub filename: String,
    pub outcome: Result<ImportKind, ImportError>,
}

impl ImportReport {
    /// One-line status shown next to the file picker.
    pub fn status(&self) -> String {
        match &self.outcome {
            Ok(_) => format!("Imported {}", self.filename),
            Err(ImportError::Parse { filename, .. }) => format!("Error parsing {filename}"),
            Err(err) => err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The file never produced text, so nothing was parsed.
    pub fn read_failed(filename: &str, message: impl Into<String>) -> Self {
        let err = ImportError::Read { filename: filename.to_string(), message: message.into() };
        log::warn!("{err}");
        Self { filename: filename.to_string(), outcome: Err(err) }
    }
}

/// Parse and classify one file's text without touching any registry. The
/// payload comes back only when the file is importable.
pub fn inspect_file(filename: &str, text: &str) -> (ImportReport, Option<Value>) {
    let checked = parse_payload(filename, text)
        .and_then(|payload| prepare_import(&payload, filename).map(|file| (file.kind, payload)));
    match checked {
        Ok((kind, payload)) => {
            let report = ImportReport { filename: filename.to_string(), outcome: Ok(kind) };
            (report, Some(payload))
        }
        Err(err) => {
            log::warn!("{err}");
            (ImportReport { filename: filename.to_string(), outcome: Err(err) }, None)
        }
    }
}

/// Fold `(filename, text)` pairs into `registry` one at a time, in the order
/// given (i.e. completion order). A failing file is reported and skipped.
pub fn import_batch<I, N, T>(registry: &DataRegistry, files: I) -> (DataRegistry, Vec<ImportReport>)
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: AsRef<str>,
{
    let mut current = registry.clone();
    let mut reports = Vec::new();
    for (name, text) in files {
        let filename: String = name.into();
        let outcome = parse_payload(&filename, text.as_ref())
            .and_then(|payload| prepare_import(&payload, &filename))
            .map(|file| {
                current = ingest(&current, &file);
                file.kind
            });
        if let Err(err) = &outcome {
            log::warn!("{err}");
        }
        reports.push(ImportReport { filename, outcome });
    }
    (current, reports)
}
