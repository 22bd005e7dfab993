//! dzt-core: mod config parsing and DayZ economy XML generation
//!
//! Pipeline, leaves first:
//! - `includes`: `#include "..."` expansion into an ordered, cycle-safe file list
//! - `cfg_parser`: tolerant extraction of `CfgVehicles` class declarations
//! - `records`: aggregation, scope filter, first-wins dedupe
//! - `xml` / `merge`: types.xml and spawnabletypes.xml rendering, additive merge
//! - `vehicle_spec`: JSON loadout spec validation and rendering
//!
//! Everything returns text; writing files is left to the caller.
pub mod backup;
pub mod cfg_parser;
pub mod error;
pub mod extract;
pub mod generate;
pub mod includes;
pub mod merge;
pub mod mission;
pub mod records;
pub mod vehicle_spec;
pub mod xml;

pub use cfg_parser::{ConfigClass, parse_cfg_vehicles};
pub use error::{Error, Result};
pub use generate::{
    GenerateOptions, GenerateStats, GeneratedDocument, ModClasses, generate_spawnable_types,
    generate_types, load_classes,
};
pub use includes::collect_config_files;
pub use merge::{MergeOutcome, merge_types};
pub use records::{aggregate, dedupe_by_name, filter_by_scope};
pub use xml::{TypeDefaults, TypeFlags, TypeOverrides, emit_spawnable_types, emit_types};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CONFIG_ENTRY: &str = "config.cpp";

/// A file is its own entry; a directory must hold `config.cpp` directly.
pub fn find_config_entry(p: &Path) -> Option<PathBuf> {
    if p.is_file() {
        return Some(p.to_path_buf());
    }
    let direct = p.join(CONFIG_ENTRY);
    if p.is_dir() && direct.is_file() {
        Some(direct)
    } else {
        None
    }
}

/// Every `config.cpp` below `root`, sorted. Used to point at nested entries
/// (`addons/<name>/config.cpp`) when the given path has none.
pub fn find_config_files(root: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file() && e.file_name().eq_ignore_ascii_case(CONFIG_ENTRY))
        .map(|e| e.into_path())
        .collect();
    out.sort();
    out
}
