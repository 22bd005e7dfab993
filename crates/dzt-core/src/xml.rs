// types.xml / spawnabletypes.xml rendering. Output is a pure function of the
// inputs: no timestamps, no map iteration order.
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
pub const TYPES_ROOT: &str = "types";
pub const SPAWNABLE_ROOT: &str = "spawnabletypes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFlags {
    pub count_in_cargo: bool,
    pub count_in_hoarder: bool,
    pub count_in_map: bool,
    pub count_in_player: bool,
    pub crafted: bool,
    pub deloot: bool,
}

impl Default for TypeFlags {
    fn default() -> Self {
        Self {
            count_in_cargo: false,
            count_in_hoarder: false,
            count_in_map: true,
            count_in_player: false,
            crafted: false,
            deloot: false,
        }
    }
}

/// Fully populated values written into every `<type>` block of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefaults {
    pub nominal: i64,
    pub lifetime: i64,
    pub restock: i64,
    pub min: i64,
    pub quantmin: i64,
    pub quantmax: i64,
    pub cost: i64,
    pub flags: TypeFlags,
    pub categories: Vec<String>,
    pub usages: Vec<String>,
}

impl Default for TypeDefaults {
    fn default() -> Self {
        Self {
            nominal: 0,
            lifetime: 7800,
            restock: 3600,
            min: 0,
            quantmin: -1,
            quantmax: -1,
            cost: 100,
            flags: TypeFlags::default(),
            categories: Vec::new(),
            usages: Vec::new(),
        }
    }
}

/// Batch-wide overrides; unset fields fall back to [`TypeDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOverrides {
    pub nominal: Option<i64>,
    pub lifetime: Option<i64>,
    pub restock: Option<i64>,
    pub min: Option<i64>,
    pub quantmin: Option<i64>,
    pub quantmax: Option<i64>,
    pub cost: Option<i64>,
    pub flags: Option<TypeFlags>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub usages: Vec<String>,
}

impl TypeOverrides {
    pub fn resolve(&self) -> TypeDefaults {
        let d = TypeDefaults::default();
        TypeDefaults {
            nominal: self.nominal.unwrap_or(d.nominal),
            lifetime: self.lifetime.unwrap_or(d.lifetime),
            restock: self.restock.unwrap_or(d.restock),
            min: self.min.unwrap_or(d.min),
            quantmin: self.quantmin.unwrap_or(d.quantmin),
            quantmax: self.quantmax.unwrap_or(d.quantmax),
            cost: self.cost.unwrap_or(d.cost),
            flags: self.flags.unwrap_or(d.flags),
            categories: dedupe_ordered(&self.categories),
            usages: dedupe_ordered(&self.usages),
        }
    }
}

fn dedupe_ordered(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        if !out.contains(it) {
            out.push(it.clone());
        }
    }
    out
}

/// Complete types.xml document for `names`.
pub fn emit_types<S: AsRef<str>>(names: &[S], overrides: &TypeOverrides) -> String {
    let mut out = String::new();
    write_types_document(&mut out, names, &overrides.resolve()).ok();
    out
}

/// Just the `<type>` blocks, newline-terminated, for splicing into an
/// existing document.
pub fn emit_type_blocks<S: AsRef<str>>(names: &[S], overrides: &TypeOverrides) -> String {
    let mut out = String::new();
    write_type_blocks(&mut out, names, &overrides.resolve()).ok();
    out
}

fn write_types_document<S: AsRef<str>>(
    out: &mut String,
    names: &[S],
    d: &TypeDefaults,
) -> std::fmt::Result {
    writeln!(out, "{XML_DECL}")?;
    writeln!(out, "<{TYPES_ROOT}>")?;
    write_type_blocks(out, names, d)?;
    writeln!(out, "</{TYPES_ROOT}>")
}

fn write_type_blocks<S: AsRef<str>>(
    out: &mut String,
    names: &[S],
    d: &TypeDefaults,
) -> std::fmt::Result {
    for name in names {
        write_type_block(out, name.as_ref(), d)?;
    }
    Ok(())
}

fn write_type_block(out: &mut String, name: &str, d: &TypeDefaults) -> std::fmt::Result {
    writeln!(out, "  <type name=\"{}\">", escape_xml(name))?;
    writeln!(out, "    <nominal>{}</nominal>", d.nominal)?;
    writeln!(out, "    <lifetime>{}</lifetime>", d.lifetime)?;
    writeln!(out, "    <restock>{}</restock>", d.restock)?;
    writeln!(out, "    <min>{}</min>", d.min)?;
    writeln!(out, "    <quantmin>{}</quantmin>", d.quantmin)?;
    writeln!(out, "    <quantmax>{}</quantmax>", d.quantmax)?;
    writeln!(out, "    <cost>{}</cost>", d.cost)?;
    let f = &d.flags;
    writeln!(
        out,
        "    <flags count_in_cargo=\"{}\" count_in_hoarder=\"{}\" count_in_map=\"{}\" count_in_player=\"{}\" crafted=\"{}\" deloot=\"{}\"/>",
        bit(f.count_in_cargo),
        bit(f.count_in_hoarder),
        bit(f.count_in_map),
        bit(f.count_in_player),
        bit(f.crafted),
        bit(f.deloot)
    )?;
    for c in &d.categories {
        writeln!(out, "    <category name=\"{}\"/>", escape_xml(c))?;
    }
    for u in &d.usages {
        writeln!(out, "    <usage name=\"{}\"/>", escape_xml(u))?;
    }
    writeln!(out, "  </type>")
}

fn bit(b: bool) -> u8 {
    u8::from(b)
}

/// Name-only spawnabletypes.xml skeleton.
pub fn emit_spawnable_types<S: AsRef<str>>(names: &[S]) -> String {
    let mut out = String::new();
    write_spawnable_document(&mut out, names).ok();
    out
}

fn write_spawnable_document<S: AsRef<str>>(out: &mut String, names: &[S]) -> std::fmt::Result {
    writeln!(out, "{XML_DECL}")?;
    writeln!(out, "<{SPAWNABLE_ROOT}>")?;
    for name in names {
        writeln!(out, "  <type name=\"{}\">", escape_xml(name.as_ref()))?;
        writeln!(out, "  </type>")?;
    }
    writeln!(out, "</{SPAWNABLE_ROOT}>")
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_block_shape() {
        let doc = emit_types(&["Foo"], &TypeOverrides::default());
        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<types>
  <type name="Foo">
    <nominal>0</nominal>
    <lifetime>7800</lifetime>
    <restock>3600</restock>
    <min>0</min>
    <quantmin>-1</quantmin>
    <quantmax>-1</quantmax>
    <cost>100</cost>
    <flags count_in_cargo="0" count_in_hoarder="0" count_in_map="1" count_in_player="0" crafted="0" deloot="0"/>
  </type>
</types>
"#;
        assert_eq!(doc, expected);
    }

    #[test]
    fn overrides_apply_to_every_block() {
        let ov = TypeOverrides {
            nominal: Some(5),
            min: Some(2),
            categories: vec!["tools".into()],
            usages: vec!["Military".into(), "Police".into(), "Military".into()],
            ..Default::default()
        };
        let doc = emit_types(&["A", "B"], &ov);
        assert_eq!(doc.matches("<nominal>5</nominal>").count(), 2);
        assert_eq!(doc.matches("<min>2</min>").count(), 2);
        assert_eq!(doc.matches("<category name=\"tools\"/>").count(), 2);
        assert_eq!(doc.matches("<usage name=\"Military\"/>").count(), 2);
        assert_eq!(doc.matches("<usage name=\"Police\"/>").count(), 2);
        assert!(doc.find("Military").unwrap() < doc.find("Police").unwrap());
    }

    #[test]
    fn document_wraps_the_same_blocks() {
        let ov = TypeOverrides {
            usages: vec!["Town".into()],
            ..Default::default()
        };
        let names = ["A", "B"];
        let blocks = emit_type_blocks(&names, &ov);
        assert_eq!(
            emit_types(&names, &ov),
            format!("{XML_DECL}\n<types>\n{blocks}</types>\n")
        );
        assert!(emit_type_blocks::<&str>(&[], &ov).is_empty());
    }

    #[test]
    fn deterministic() {
        let ov = TypeOverrides {
            cost: Some(7),
            ..Default::default()
        };
        assert_eq!(emit_types(&["A", "B"], &ov), emit_types(&["A", "B"], &ov));
    }

    #[test]
    fn escapes_names() {
        assert_eq!(escape_xml(r#"a&b<c>"d'"#), "a&amp;b&lt;c&gt;&quot;d&apos;");
        let doc = emit_spawnable_types(&["X<Y"]);
        assert!(doc.contains("<type name=\"X&lt;Y\">"));
    }

    #[test]
    fn spawnable_skeleton() {
        let doc = emit_spawnable_types(&["Car1", "Car2"]);
        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<spawnabletypes>
  <type name="Car1">
  </type>
  <type name="Car2">
  </type>
</spawnabletypes>
"#;
        assert_eq!(doc, expected);
    }
}
