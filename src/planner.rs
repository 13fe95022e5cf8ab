//! Map planner arithmetic: DU budget and the tower picker list.

use std::collections::BTreeMap;

use crate::model::{MapData, Tower};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DuBudget {
    pub max: u32,
    pub used: u64,
    /// Negative once the plan is over budget.
    pub remaining: i64,
    pub percent: f64,
}

impl DuBudget {
    pub fn over_budget(&self) -> bool {
        self.remaining < 0
    }
}

/// Budget of `planned` (tower id -> count) on `map`. Unknown tower ids count for nothing.
pub fn du_budget(
    map: Option<&MapData>,
    planned: &BTreeMap<String, u32>,
    towers: &[Tower],
) -> DuBudget {
    let max = map.map_or(0, |m| m.max_du);
    let used: u64 = planned
        .iter()
        .filter_map(|(id, count)| {
            let tower = towers.iter().find(|t| &t.id == id)?;
            Some(u64::from(tower.du_cost) * u64::from(*count))
        })
        .sum();
    let remaining = i64::from(max) - i64::try_from(used).unwrap_or(i64::MAX);
    let percent = if max > 0 { used as f64 / f64::from(max) * 100.0 } else { 0.0 };
    DuBudget { max, used, remaining, percent }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TowerSort {
    #[default]
    Name,
    /// Most expensive first.
    DuCost,
}

/// Towers whose name contains `term` (case-insensitive), sorted for the picker.
pub fn filter_towers<'a>(towers: &'a [Tower], term: &str, sort: TowerSort) -> Vec<&'a Tower> {
    let term = term.trim().to_lowercase();
    let mut out: Vec<&Tower> = towers
        .iter()
        .filter(|t| t.name.to_lowercase().contains(&term))
        .collect();
    out.sort_by_cached_key(|t| t.name.to_lowercase());
    if sort == TowerSort::DuCost {
        out.sort_by(|a, b| b.du_cost.cmp(&a.du_cost));
    }
    out
}
