//! Core of the DD2 planner: entity normalization, the merged data registry,
//! user imports and global search. Everything here runs on native targets;
//! only `storage::BrowserStore` and `util::ConsoleLogger` touch the browser.

pub mod config;
pub mod error;
pub mod heroes;
pub mod import;
pub mod loadout;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod planner;
pub mod registry;
pub mod search;
pub mod seed;
pub mod storage;
pub mod util;
