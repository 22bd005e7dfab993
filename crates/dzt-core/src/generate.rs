// Entry path -> finished document text. Nothing here writes files.
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::cfg_parser::{ConfigClass, parse_cfg_vehicles};
use crate::error::{Error, Result};
use crate::includes::collect_config_sources;
use crate::merge::merge_types;
use crate::records::{aggregate, class_names, dedupe_by_name, filter_by_scope, is_likely_vehicle};
use crate::xml::{TypeOverrides, emit_spawnable_types, emit_types};

#[derive(Debug, Clone)]
pub struct ModClasses {
    pub entry: PathBuf,
    pub files: Vec<PathBuf>,
    pub classes: Vec<ConfigClass>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Only classes with exactly this scope; `None` keeps all.
    pub scope: Option<i32>,
    pub overrides: TypeOverrides,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStats {
    pub total_classes: usize,
    pub included: usize,
    pub added: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub document: String,
    pub stats: GenerateStats,
}

/// Finds the entry config, expands includes and parses every file from the
/// text the include walk read.
/// Records keep include pre-order, then in-file order.
pub fn load_classes(mod_path: &Path) -> Result<ModClasses> {
    let entry = crate::find_config_entry(mod_path)
        .ok_or_else(|| Error::ConfigNotFound(mod_path.to_path_buf()))?;
    let sources = collect_config_sources(&entry);

    let per_file: Vec<Vec<ConfigClass>> = sources
        .par_iter()
        .map(|src| {
            let mut classes = parse_cfg_vehicles(&src.text);
            for c in &mut classes {
                c.source_file = Some(src.path.clone());
            }
            tracing::debug!(file = %src.path.display(), classes = classes.len(), "parsed");
            classes
        })
        .collect();

    let classes = aggregate(per_file);
    let files: Vec<PathBuf> = sources.into_iter().map(|s| s.path).collect();
    tracing::info!(files = files.len(), classes = classes.len(), "loaded mod config");
    Ok(ModClasses {
        entry,
        files,
        classes,
    })
}

/// types.xml for a mod. With `existing`, merges into that document
/// instead of emitting a fresh one.
pub fn generate_types(
    mod_path: &Path,
    opts: &GenerateOptions,
    existing: Option<&str>,
) -> Result<GeneratedDocument> {
    let loaded = load_classes(mod_path)?;
    let total_classes = loaded.classes.len();
    let names = class_names(&dedupe_by_name(filter_by_scope(loaded.classes, opts.scope)));

    let (document, added) = match existing {
        Some(base) => {
            let merged = merge_types(base, &names, &opts.overrides);
            (merged.document, merged.added)
        }
        None => (emit_types(&names, &opts.overrides), names.len()),
    };
    Ok(GeneratedDocument {
        document,
        stats: GenerateStats {
            total_classes,
            included: names.len(),
            added,
        },
    })
}

/// Skeleton spawnabletypes.xml; `vehicles_only` keeps classes whose base
/// looks like a vehicle.
pub fn generate_spawnable_types(mod_path: &Path, vehicles_only: bool) -> Result<GeneratedDocument> {
    let loaded = load_classes(mod_path)?;
    let total_classes = loaded.classes.len();
    let mut classes = loaded.classes;
    if vehicles_only {
        classes.retain(is_likely_vehicle);
    }
    let names = class_names(&dedupe_by_name(classes));
    Ok(GeneratedDocument {
        document: emit_spawnable_types(&names),
        stats: GenerateStats {
            total_classes,
            included: names.len(),
            added: names.len(),
        },
    })
}
