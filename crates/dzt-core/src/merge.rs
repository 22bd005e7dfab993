// Additive merge into an existing types.xml. Existing names are found with
// an attribute scan rather than a full parse so hand-edited files survive.
// Known limitation: a `<type name="X"` inside a comment also counts as
// declared, and single-quoted `name='X'` attributes are not recognised.
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::xml::{TYPES_ROOT, TypeOverrides, emit_type_blocks, emit_types};

static TYPE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<type\s+name="([^"]+)""#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub document: String,
    pub added: usize,
}

/// Names already declared by `<type name="...">` elements.
pub fn existing_type_names(document: &str) -> HashSet<&str> {
    TYPE_NAME_RE
        .captures_iter(document)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Appends blocks for names not yet present in `existing`. Never touches
/// existing blocks; returns the input unchanged when nothing is missing.
pub fn merge_types<S: AsRef<str>>(
    existing: &str,
    candidates: &[S],
    overrides: &TypeOverrides,
) -> MergeOutcome {
    let declared = existing_type_names(existing);
    let mut seen = HashSet::new();
    let missing: Vec<&str> = candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|n| !declared.contains(n) && seen.insert(*n))
        .collect();

    if missing.is_empty() {
        tracing::debug!("merge: all candidate types already present");
        return MergeOutcome {
            document: existing.to_string(),
            added: 0,
        };
    }

    let closing = format!("</{TYPES_ROOT}>");
    let document = match existing.rfind(&closing) {
        Some(idx) => {
            let before = existing[..idx].trim_end();
            let after = &existing[idx..];
            let blocks = emit_type_blocks(&missing, overrides);
            format!("{before}\n{blocks}{after}")
        }
        None => {
            tracing::warn!("merge: no closing </{TYPES_ROOT}> tag, appending a full document");
            format!("{existing}\n{}", emit_types(&missing, overrides))
        }
    };
    tracing::info!(added = missing.len(), "merged new types");
    MergeOutcome {
        document,
        added: missing.len(),
    }
}
