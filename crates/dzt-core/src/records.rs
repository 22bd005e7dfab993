use std::collections::HashSet;

use crate::cfg_parser::ConfigClass;

/// Base-class fragments that mark a class as a spawnable vehicle.
pub const VEHICLE_BASE_HINTS: &[&str] = &["Car", "Truck", "Vehicle", "Helicopter", "Boat"];

/// Concatenates per-file record lists in file-visit order.
pub fn aggregate<I>(per_file: I) -> Vec<ConfigClass>
where
    I: IntoIterator<Item = Vec<ConfigClass>>,
{
    per_file.into_iter().flatten().collect()
}

/// Keeps records whose scope equals `scope`. `None` keeps everything;
/// records without a scope never match a requested value.
pub fn filter_by_scope(records: Vec<ConfigClass>, scope: Option<i32>) -> Vec<ConfigClass> {
    match scope {
        None => records,
        Some(s) => records.into_iter().filter(|c| c.scope == Some(s)).collect(),
    }
}

/// Stable dedupe on `name`, first occurrence wins.
pub fn dedupe_by_name(records: Vec<ConfigClass>) -> Vec<ConfigClass> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|c| seen.insert(c.name.clone()))
        .collect()
}

pub fn is_likely_vehicle(class: &ConfigClass) -> bool {
    class
        .base_class
        .as_deref()
        .is_some_and(|base| VEHICLE_BASE_HINTS.iter().any(|h| base.contains(h)))
}

pub fn class_names(records: &[ConfigClass]) -> Vec<String> {
    records.iter().map(|c| c.name.clone()).collect()
}
